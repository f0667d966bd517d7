use anyhow::{anyhow, Result};
use monetization_bot::config::database_url_from_env;
use monetization_bot::database::connection::{remove_sqlite_files, sqlite_file_path, DatabaseManager};
use monetization_bot::database::models::Order;
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    dotenvy::dotenv().ok();
    let database_url = database_url_from_env();

    match command {
        "migrate" | "up" => run_migrations(&database_url).await,
        "check" => check_database(&database_url).await,
        "reset" => reset_database(&database_url).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn run_migrations(database_url: &str) -> Result<()> {
    println!("🔧 Monetization Bot - Database Migration Tool");
    println!("=============================================");
    println!("📊 Database URL: {}", mask_url(database_url));
    println!("🚀 Running database migrations...");

    let db_manager = DatabaseManager::new(database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match db_manager.run_migrations().await {
        Ok(_) => println!("✅ Migrations completed successfully!"),
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database(database_url: &str) -> Result<()> {
    println!("🔍 Checking database connection and schema...");
    println!("📊 Database URL: {}", mask_url(database_url));

    let db_manager = DatabaseManager::new(database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
            match Order::count_pending(&db_manager.pool).await {
                Ok(pending) => println!("🧾 Unpaid orders: {pending}"),
                Err(e) => println!("⚠️  Could not count orders: {e}"),
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    Ok(())
}

async fn reset_database(database_url: &str) -> Result<()> {
    if sqlite_file_path(database_url).is_none() {
        return Err(anyhow!("Reset is only supported for file-backed SQLite databases"));
    }

    println!("⚠️  WARNING: This will delete ALL orders and payment records!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    for file in remove_sqlite_files(database_url)? {
        println!("🗑️  Deleted database file: {}", file.display());
    }

    println!("🔄 Recreating database schema...");
    run_migrations(database_url).await?;

    println!("✅ Database reset completed!");
    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&db_manager.pool)
    .await?;

    Ok(tables)
}

fn mask_url(url: &str) -> String {
    match sqlite_file_path(url).and_then(|path| Path::new(path).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🔧 Monetization Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Run database migrations (default)");
    println!("    check          Check database connection and schema");
    println!("    reset          Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/orders.db)");
    println!();
}
