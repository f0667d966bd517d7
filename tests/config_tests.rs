use monetization_bot::config::Config;
use monetization_bot::database::models::Service;
use std::env;
use std::sync::{Mutex, MutexGuard};

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const VARS: &[&str] = &[
    "TELEGRAM_BOT_TOKEN",
    "DATABASE_URL",
    "HTTP_PORT",
    "PORT",
    "EXTERNAL_URL",
    "PAYSTACK_SECRET_KEY",
    "PAYSTACK_WEBHOOK_SECRET",
    "PAYSTACK_BASE_URL",
    "PAYSTACK_TIKTOK",
    "PAYSTACK_FACEBOOK",
    "TUTORIAL_LINK",
    "SUPPORT_LINK",
    "PRICE_TIKTOK",
    "PRICE_FACEBOOK",
    "GROUP_ID",
    "ADMIN_IDS",
    "ORDER_TTL_HOURS",
];

/// Locks the environment and starts from a clean slate with only the token set.
fn clean_env() -> MutexGuard<'static, ()> {
    let guard = CONFIG_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    for var in VARS {
        env::remove_var(var);
    }
    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    guard
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = clean_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.database_url, "sqlite:./data/orders.db");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.support_link, "https://wa.me/0000000000");
    assert_eq!(config.price_tiktok, 6000);
    assert_eq!(config.price_facebook, 8000);
    assert_eq!(config.paystack.base_url, "https://api.paystack.co");
    assert!(config.paystack.secret_key.is_none());
    assert!(config.paystack.webhook_secret.is_none());
    assert!(config.group_id.is_none());
    assert!(config.admin_ids.is_empty());
    assert!(config.tutorial_link.is_none());
    assert!(config.payment_callback_url().is_none());
    assert_eq!(config.order_ttl_hours, 24);
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = clean_env();

    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("EXTERNAL_URL", "https://bot.example.com/");
    env::set_var("PAYSTACK_SECRET_KEY", "sk_live_x");
    env::set_var("PAYSTACK_WEBHOOK_SECRET", "whsec_y");
    env::set_var("PAYSTACK_TIKTOK", "https://paystack.com/pay/tiktok");
    env::set_var("TUTORIAL_LINK", "https://t.me/tuto");
    env::set_var("SUPPORT_LINK", "https://wa.me/2250700000000");
    env::set_var("PRICE_TIKTOK", "5000");
    env::set_var("PRICE_FACEBOOK", "9000");
    env::set_var("GROUP_ID", "-1001234567890");
    env::set_var("ADMIN_IDS", "111, 222,,333");
    env::set_var("ORDER_TTL_HOURS", "6");

    let config = Config::from_env().unwrap();

    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.external_url.as_deref(), Some("https://bot.example.com"));
    assert_eq!(
        config.payment_callback_url().as_deref(),
        Some("https://bot.example.com/thank-you")
    );
    assert_eq!(config.paystack.secret_key.as_deref(), Some("sk_live_x"));
    assert_eq!(config.paystack.webhook_secret.as_deref(), Some("whsec_y"));
    assert_eq!(config.static_link_for(Service::TikTok), Some("https://paystack.com/pay/tiktok"));
    assert_eq!(config.static_link_for(Service::Facebook), None);
    assert_eq!(config.tutorial_link.as_deref(), Some("https://t.me/tuto"));
    assert_eq!(config.price_for(Service::TikTok), 5000);
    assert_eq!(config.price_for(Service::Facebook), 9000);
    assert_eq!(config.group_id, Some(-1001234567890));
    assert_eq!(config.admin_ids, vec![111, 222, 333]);
    assert!(config.is_admin(222));
    assert!(!config.is_admin(444));
    assert_eq!(config.order_ttl_hours, 6);

    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_missing_required_token() {
    let _guard = clean_env();
    env::remove_var("TELEGRAM_BOT_TOKEN");

    let result = Config::from_env();
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("TELEGRAM_BOT_TOKEN must be set"));
}

#[test]
fn test_config_blank_token_counts_as_missing() {
    let _guard = clean_env();
    env::set_var("TELEGRAM_BOT_TOKEN", "   ");

    assert!(Config::from_env().is_err());
}

#[test]
fn test_config_port_falls_back_to_platform_port() {
    let _guard = clean_env();
    env::set_var("PORT", "10000");

    assert_eq!(Config::from_env().unwrap().http_port, 10000);

    env::set_var("HTTP_PORT", "8081");
    assert_eq!(Config::from_env().unwrap().http_port, 8081);

    env::remove_var("PORT");
    env::remove_var("HTTP_PORT");
}

#[test]
fn test_config_invalid_port() {
    let _guard = clean_env();
    env::set_var("HTTP_PORT", "invalid_port");

    let result = Config::from_env();
    assert!(result.unwrap_err().to_string().contains("Invalid HTTP_PORT"));

    env::remove_var("HTTP_PORT");
}

#[test]
fn test_webhook_secret_falls_back_to_secret_key() {
    let _guard = clean_env();
    env::set_var("PAYSTACK_SECRET_KEY", "sk_test_abc");

    let config = Config::from_env().unwrap();
    assert_eq!(config.paystack.webhook_secret.as_deref(), Some("sk_test_abc"));

    env::remove_var("PAYSTACK_SECRET_KEY");
}

#[test]
fn test_group_id_zero_means_no_group() {
    let _guard = clean_env();
    env::set_var("GROUP_ID", "0");

    assert!(Config::from_env().unwrap().group_id.is_none());

    env::set_var("GROUP_ID", "not-a-chat");
    assert!(Config::from_env().unwrap_err().to_string().contains("Invalid GROUP_ID"));

    env::remove_var("GROUP_ID");
}

#[test]
fn test_invalid_price_fails_at_startup() {
    let _guard = clean_env();
    env::set_var("PRICE_TIKTOK", "6000 F");

    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("PRICE_TIKTOK"));

    env::remove_var("PRICE_TIKTOK");
}

#[test]
fn test_invalid_admin_ids() {
    let _guard = clean_env();
    env::set_var("ADMIN_IDS", "111,bob");

    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("Invalid ADMIN_IDS"));

    env::remove_var("ADMIN_IDS");
}

#[test]
fn test_invalid_order_ttl() {
    let _guard = clean_env();
    env::set_var("ORDER_TTL_HOURS", "0");

    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("Invalid ORDER_TTL_HOURS"));

    env::remove_var("ORDER_TTL_HOURS");
}
