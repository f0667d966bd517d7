#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use monetization_bot::config::{Config, PaystackConfig};
use monetization_bot::database::connection::DatabaseManager;
use monetization_bot::payments::{
    signature, Checkout, CheckoutRequest, PaymentError, PaymentGateway, VerifiedTransaction,
    SERVICE_TYPE_FIELD, TELEGRAM_ID_FIELD, WHATSAPP_FIELD,
};
use monetization_bot::services::delivery::Notifier;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tempfile::{tempdir, TempDir};

pub const SECRET: &str = "sk_test_secret";
pub const ADMIN_ID: i64 = 1000;
pub const GROUP_ID: i64 = -100555;
pub const TUTORIAL: &str = "https://t.me/monetization_tuto";

pub async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

pub fn test_config() -> Config {
    Config {
        telegram_bot_token: "test_token".to_string(),
        database_url: "sqlite::memory:".to_string(),
        http_port: 3000,
        external_url: Some("https://bot.example.com".to_string()),
        paystack: PaystackConfig {
            secret_key: Some(SECRET.to_string()),
            webhook_secret: Some(SECRET.to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
            static_link_tiktok: None,
            static_link_facebook: None,
        },
        tutorial_link: Some(TUTORIAL.to_string()),
        support_link: "https://wa.me/0000000000".to_string(),
        price_tiktok: 6000,
        price_facebook: 8000,
        group_id: Some(GROUP_ID),
        admin_ids: vec![ADMIN_ID],
        order_ttl_hours: 24,
    }
}

/// In-memory stand-in for Paystack.
#[derive(Default)]
pub struct FakeGateway {
    pub fail_initialize: bool,
    pub initialized: Mutex<Vec<CheckoutRequest>>,
    pub verified: Mutex<HashMap<String, VerifiedTransaction>>,
    pub verify_calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn failing() -> Self {
        Self {
            fail_initialize: true,
            ..Self::default()
        }
    }

    /// Makes `reference` verify as a successful charge with the given metadata.
    pub fn confirm(&self, reference: &str, metadata: serde_json::Value) {
        self.verified.lock().unwrap().insert(
            reference.to_string(),
            VerifiedTransaction {
                reference: reference.to_string(),
                amount: Some(600_000),
                metadata,
            },
        );
    }

    pub fn initialized(&self) -> Vec<CheckoutRequest> {
        self.initialized.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn initialize(&self, request: &CheckoutRequest) -> Result<Checkout, PaymentError> {
        if self.fail_initialize {
            return Err(PaymentError::Rejected("Invalid key".to_string()));
        }
        self.initialized.lock().unwrap().push(request.clone());
        Ok(Checkout {
            authorization_url: format!("https://checkout.paystack.com/{}", request.reference),
            reference: request.reference.clone(),
        })
    }

    async fn verify(&self, reference: &str) -> Result<Option<VerifiedTransaction>, PaymentError> {
        self.verify_calls.lock().unwrap().push(reference.to_string());
        Ok(self.verified.lock().unwrap().get(reference).cloned())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Records every message instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(i64, String)>>,
    pub failing_chats: HashSet<i64>,
}

impl RecordingNotifier {
    pub fn failing_for(chat_id: i64) -> Self {
        Self {
            failing_chats: HashSet::from([chat_id]),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        if self.failing_chats.contains(&chat_id) {
            anyhow::bail!("Forbidden: bot was blocked by the user");
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

pub fn metadata(user_id: &str, service: &str) -> serde_json::Value {
    serde_json::json!({
        "custom_fields": [
            { "display_name": "Telegram ID", "variable_name": TELEGRAM_ID_FIELD, "value": user_id },
            { "display_name": "Service", "variable_name": SERVICE_TYPE_FIELD, "value": service },
            { "display_name": "WhatsApp", "variable_name": WHATSAPP_FIELD, "value": "+2250700000000" },
        ]
    })
}

pub fn charge_success(reference: &str) -> Vec<u8> {
    serde_json::json!({
        "event": "charge.success",
        "data": { "reference": reference, "status": "success", "amount": 600000 }
    })
    .to_string()
    .into_bytes()
}

pub fn signed(payload: &[u8]) -> String {
    signature::sign(SECRET, payload)
}
