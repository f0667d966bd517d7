use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::Service;

pub mod paystack;
pub mod signature;

pub const TELEGRAM_ID_FIELD: &str = "telegram_id";
pub const SERVICE_TYPE_FIELD: &str = "service_type";
pub const WHATSAPP_FIELD: &str = "whatsapp_number";

const REFERENCE_PREFIX: &str = "tg";

/// `tg{user_id}-{uuid}`. Unique per checkout; the user id prefix keeps
/// references readable in the Paystack dashboard.
pub fn new_reference(user_id: i64) -> String {
    format!("{}{}-{}", REFERENCE_PREFIX, user_id, Uuid::new_v4().simple())
}

/// Whether `reference` has the shape produced by [`new_reference`]. Static
/// pay pages get references generated by Paystack instead.
pub fn is_issued_reference(reference: &str) -> bool {
    let Some((user_id, token)) = reference
        .strip_prefix(REFERENCE_PREFIX)
        .and_then(|rest| rest.split_once('-'))
    else {
        return false;
    };

    !user_id.is_empty() && user_id.bytes().all(|b| b.is_ascii_digit()) && !token.is_empty()
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment provider is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("HTTP error talking to payment provider: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payment provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Payment provider rejected the request: {0}")]
    Rejected(String),

    #[error("Unexpected response from payment provider: {0}")]
    InvalidResponse(String),

    #[error("Invalid payment provider URL: {0}")]
    InvalidUrl(String),
}

impl PaymentError {
    /// Transport failures and throttling are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            PaymentError::Status { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Narrower than [`is_retryable`](Self::is_retryable), for requests that
    /// must not run twice: only failures where the processor cannot have
    /// acted on the request (no connection, or throttled).
    pub fn is_retryable_unprocessed(&self) -> bool {
        match self {
            PaymentError::Http(e) => e.is_connect(),
            PaymentError::Status { status, .. } => *status == 429,
            _ => false,
        }
    }
}

/// Everything the processor needs to open a checkout for one order.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: i64,
    pub service: Service,
    pub amount: u64,
    pub whatsapp: String,
    pub reference: String,
    pub callback_url: Option<String>,
}

impl CheckoutRequest {
    /// Placeholder address; Paystack requires one and users never give theirs.
    pub fn email(&self) -> String {
        format!("telegram{}@noemail.local", self.user_id)
    }

    /// Custom fields echoed back by the processor on verification.
    pub fn metadata(&self) -> Value {
        serde_json::json!({
            "custom_fields": [
                { "display_name": "Telegram ID", "variable_name": TELEGRAM_ID_FIELD, "value": self.user_id.to_string() },
                { "display_name": "Service", "variable_name": SERVICE_TYPE_FIELD, "value": self.service.as_str() },
                { "display_name": "WhatsApp", "variable_name": WHATSAPP_FIELD, "value": self.whatsapp },
            ]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub authorization_url: String,
    pub reference: String,
}

/// A transaction the processor confirmed as successful.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifiedTransaction {
    pub reference: String,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub metadata: Value,
}

impl VerifiedTransaction {
    /// Looks up a custom field by `variable_name`.
    ///
    /// Paystack sends metadata either as an object or as a JSON-encoded
    /// string, and values either as strings or numbers.
    pub fn custom_field(&self, variable_name: &str) -> Option<String> {
        let metadata = match &self.metadata {
            Value::String(raw) => serde_json::from_str(raw).ok()?,
            other => other.clone(),
        };

        metadata
            .get("custom_fields")?
            .as_array()?
            .iter()
            .find(|field| field.get("variable_name").and_then(Value::as_str) == Some(variable_name))
            .and_then(|field| match field.get("value")? {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|value| !value.is_empty())
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a checkout and returns the URL the customer pays on.
    async fn initialize(&self, request: &CheckoutRequest) -> Result<Checkout, PaymentError>;

    /// Confirms a reference with the processor. `Ok(None)` means the
    /// processor does not consider the charge successful.
    async fn verify(&self, reference: &str) -> Result<Option<VerifiedTransaction>, PaymentError>;

    fn name(&self) -> &str;
}
