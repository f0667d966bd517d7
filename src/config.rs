use anyhow::{anyhow, Result};
use std::env;

use crate::database::models::Service;
use crate::utils::validation::parse_admin_ids;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/orders.db";
const DEFAULT_SUPPORT_LINK: &str = "https://wa.me/0000000000";
const DEFAULT_PAYSTACK_BASE_URL: &str = "https://api.paystack.co";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub external_url: Option<String>,
    pub paystack: PaystackConfig,
    pub tutorial_link: Option<String>,
    pub support_link: String,
    pub price_tiktok: u64,
    pub price_facebook: u64,
    pub group_id: Option<i64>,
    pub admin_ids: Vec<i64>,
    pub order_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct PaystackConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub base_url: String,
    pub static_link_tiktok: Option<String>,
    pub static_link_facebook: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let telegram_bot_token = optional_var("TELEGRAM_BOT_TOKEN")
            .ok_or_else(|| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        let database_url = database_url_from_env();

        // Hosting platforms usually inject PORT; HTTP_PORT wins when both are set.
        let port_str = optional_var("HTTP_PORT")
            .or_else(|| optional_var("PORT"))
            .unwrap_or_else(|| "3000".to_string());
        let http_port = port_str
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let secret_key = optional_var("PAYSTACK_SECRET_KEY");
        let webhook_secret = optional_var("PAYSTACK_WEBHOOK_SECRET").or_else(|| secret_key.clone());
        let paystack = PaystackConfig {
            secret_key,
            webhook_secret,
            base_url: optional_var("PAYSTACK_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PAYSTACK_BASE_URL.to_string()),
            static_link_tiktok: optional_var("PAYSTACK_TIKTOK"),
            static_link_facebook: optional_var("PAYSTACK_FACEBOOK"),
        };

        let group_id = match optional_var("GROUP_ID") {
            Some(raw) => {
                let id: i64 = raw.parse().map_err(|_| anyhow!("Invalid GROUP_ID"))?;
                (id != 0).then_some(id)
            }
            None => None,
        };

        let admin_ids = parse_admin_ids(&optional_var("ADMIN_IDS").unwrap_or_default())
            .map_err(|e| anyhow!("Invalid ADMIN_IDS: {}", e))?;

        let order_ttl_hours = match optional_var("ORDER_TTL_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .ok_or_else(|| anyhow!("Invalid ORDER_TTL_HOURS"))?,
            None => 24,
        };

        Ok(Config {
            telegram_bot_token,
            database_url,
            http_port,
            external_url: optional_var("EXTERNAL_URL").map(|url| url.trim_end_matches('/').to_string()),
            paystack,
            tutorial_link: optional_var("TUTORIAL_LINK"),
            support_link: optional_var("SUPPORT_LINK")
                .unwrap_or_else(|| DEFAULT_SUPPORT_LINK.to_string()),
            price_tiktok: parse_price("PRICE_TIKTOK", 6000)?,
            price_facebook: parse_price("PRICE_FACEBOOK", 8000)?,
            group_id,
            admin_ids,
            order_ttl_hours,
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    pub fn price_for(&self, service: Service) -> u64 {
        match service {
            Service::TikTok => self.price_tiktok,
            Service::Facebook => self.price_facebook,
        }
    }

    pub fn static_link_for(&self, service: Service) -> Option<&str> {
        match service {
            Service::TikTok => self.paystack.static_link_tiktok.as_deref(),
            Service::Facebook => self.paystack.static_link_facebook.as_deref(),
        }
    }

    /// Where Paystack redirects the customer after checkout.
    pub fn payment_callback_url(&self) -> Option<String> {
        self.external_url.as_ref().map(|base| format!("{base}/thank-you"))
    }
}

/// `DATABASE_URL` alone, for tools that never talk to Telegram.
pub fn database_url_from_env() -> String {
    optional_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Reads a variable, treating unset and blank values the same way.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_price(name: &str, default: u64) -> Result<u64> {
    match optional_var(name) {
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|price| *price > 0)
            .ok_or_else(|| anyhow!("Invalid {}: expected a positive integer amount", name)),
        None => Ok(default),
    }
}
