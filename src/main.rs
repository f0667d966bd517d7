//! # Monetization Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, starts
//! the order expiry job, and runs the Telegram bot next to the HTTP server
//! that receives Paystack webhooks.

use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use monetization_bot::bot::handlers::{BotContext, BotHandler, State};
use monetization_bot::config::Config;
use monetization_bot::database::connection::DatabaseManager;
use monetization_bot::payments::{paystack::PaystackClient, PaymentGateway};
use monetization_bot::services::{
    checkout::CheckoutService, delivery::DeliveryService, expiry::ExpiryService, http::HttpService,
    orders::OrderService, webhook::WebhookProcessor,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monetization_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    info!("Starting Monetization Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, admins: {}",
        config.database_url,
        config.http_port,
        config.admin_ids.len()
    );
    if config.paystack.secret_key.is_none() {
        tracing::warn!("PAYSTACK_SECRET_KEY not set, only static payment links will work");
    }

    // Initialize database
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    db_manager.run_migrations().await?;
    let db = Arc::new(db_manager);
    info!("Database initialized successfully");

    let bot = Bot::new(&config.telegram_bot_token);

    // Payment plumbing
    let gateway: Arc<dyn PaymentGateway> = Arc::new(PaystackClient::new(&config.paystack)?);
    let checkout = CheckoutService::new(gateway.clone(), config.clone());
    let orders = Arc::new(OrderService::new(db.clone(), config.clone(), checkout));
    let delivery = Arc::new(DeliveryService::new(Arc::new(bot.clone()), db.clone(), &config));
    let webhooks = Arc::new(WebhookProcessor::new(
        db.clone(),
        gateway,
        config.paystack.webhook_secret.clone(),
    ));

    // Start order expiry
    let mut expiry_service = ExpiryService::new(db.clone(), config.order_ttl_hours)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create expiry service: {}", e))?;
    match expiry_service.sweep_now().await {
        Ok(removed) => info!("Startup sweep removed {} stale orders", removed),
        Err(e) => tracing::warn!("Startup sweep failed: {}", e),
    }
    if let Err(e) = expiry_service.start().await {
        tracing::error!("Failed to start expiry service: {}", e);
    }

    let http_service = HttpService::new(db.clone(), webhooks, delivery);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;
    info!("HTTP server starting on port {}", config.http_port);

    let ctx = Arc::new(BotContext {
        config: config.clone(),
        orders,
    });

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, BotHandler::schema())
            .dependencies(dptree::deps![InMemStorage::<State>::new(), ctx])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let http_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, http_service.router).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    // Either task finishing means shutdown
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = http_task => {
            if let Err(e) = result {
                tracing::error!("HTTP task error: {}", e);
            }
        }
    }

    if let Err(e) = expiry_service.stop().await {
        tracing::warn!("Error stopping expiry service: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
