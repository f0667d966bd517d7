use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::bot::texts::NOT_AVAILABLE;
use crate::database::{
    connection::DatabaseManager,
    models::{Order, PaymentTransition},
};
use crate::payments::{signature, PaymentGateway, SERVICE_TYPE_FIELD, TELEGRAM_ID_FIELD};
use crate::services::delivery::PaidOrder;
use crate::utils::logging::{log_database_error, log_payment_event};

pub const CHARGE_SUCCESS: &str = "charge.success";

/// Why a webhook was not turned into a delivery.
///
/// Paystack retries anything that is not a 200, so only failures a retry
/// could fix map to an error status.
#[derive(Error, Debug)]
pub enum WebhookRejection {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid json")]
    InvalidJson,

    #[error("missing reference")]
    MissingReference,

    #[error("verification failed")]
    VerificationFailed,

    #[error("no telegram id")]
    NoTelegramId,

    #[error("invalid telegram id")]
    InvalidTelegramId,

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl WebhookRejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookRejection::InvalidSignature
            | WebhookRejection::InvalidJson
            | WebhookRejection::MissingReference => StatusCode::BAD_REQUEST,
            WebhookRejection::VerificationFailed
            | WebhookRejection::NoTelegramId
            | WebhookRejection::InvalidTelegramId => StatusCode::OK,
            WebhookRejection::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    /// Not a `charge.success` event.
    Ignored { event: String },
    /// The reference was reconciled by an earlier delivery of this webhook.
    Duplicate { reference: String },
    /// First confirmation of this charge; the caller owns delivery.
    Paid(PaidOrder),
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    data: Value,
}

pub struct WebhookProcessor {
    db: Arc<DatabaseManager>,
    gateway: Arc<dyn PaymentGateway>,
    secret: Option<String>,
}

impl WebhookProcessor {
    pub fn new(db: Arc<DatabaseManager>, gateway: Arc<dyn PaymentGateway>, secret: Option<String>) -> Self {
        if secret.is_none() {
            warn!("No Paystack webhook secret configured, webhook signatures will not be checked");
        }
        Self { db, gateway, secret }
    }

    /// Validates a raw webhook body and applies it to the order table.
    pub async fn process(
        &self,
        signature_header: Option<&str>,
        payload: &[u8],
    ) -> Result<WebhookOutcome, WebhookRejection> {
        if let Some(secret) = &self.secret {
            let valid = signature_header
                .map(|sig| signature::verify(secret, payload, sig))
                .unwrap_or(false);
            if !valid {
                warn!("Invalid Paystack webhook signature");
                return Err(WebhookRejection::InvalidSignature);
            }
        }

        let event: WebhookEvent =
            serde_json::from_slice(payload).map_err(|_| WebhookRejection::InvalidJson)?;

        let event_name = event.event.unwrap_or_default();
        if event_name != CHARGE_SUCCESS {
            tracing::info!("Ignored Paystack event: {}", event_name);
            return Ok(WebhookOutcome::Ignored { event: event_name });
        }

        let reference = event
            .data
            .get("reference")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(WebhookRejection::MissingReference)?
            .to_string();

        // The webhook body is only a hint; the processor's own record decides.
        let verified = match self.gateway.verify(&reference).await {
            Ok(Some(verified)) => verified,
            Ok(None) => {
                log_payment_event("verification_failed", &reference, None, Some("not successful"));
                return Err(WebhookRejection::VerificationFailed);
            }
            Err(e) => {
                log_payment_event("verification_failed", &reference, None, Some(&e.to_string()));
                return Err(WebhookRejection::VerificationFailed);
            }
        };

        let known_order = Order::find_by_reference(&self.db.pool, &reference).await?;

        let user_id = match verified.custom_field(TELEGRAM_ID_FIELD) {
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                warn!("Invalid telegram_id in metadata for {}: {}", reference, raw);
                WebhookRejection::InvalidTelegramId
            })?,
            None => match &known_order {
                Some(order) => order.user_id,
                None => {
                    tracing::error!("No telegram_id in metadata for ref {}", reference);
                    return Err(WebhookRejection::NoTelegramId);
                }
            },
        };

        let service = verified
            .custom_field(SERVICE_TYPE_FIELD)
            .or_else(|| known_order.as_ref().map(|o| o.service.clone()))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let transition = Order::reconcile_payment(&self.db.pool, &reference, user_id, &service)
            .await
            .map_err(|e| {
                log_database_error("reconcile_payment", "pending_orders", &e.to_string(), Some(&reference));
                WebhookRejection::Database(e)
            })?;

        match transition {
            PaymentTransition::Duplicate => {
                log_payment_event("duplicate_webhook", &reference, Some(user_id), None);
                Ok(WebhookOutcome::Duplicate { reference })
            }
            PaymentTransition::Applied { order } => {
                let details = if order.is_some() { "order marked paid" } else { "no pending order" };
                log_payment_event("payment_confirmed", &reference, Some(user_id), Some(details));
                Ok(WebhookOutcome::Paid(PaidOrder {
                    user_id,
                    service,
                    reference,
                    order,
                }))
            }
        }
    }
}
