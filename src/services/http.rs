use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::database::{connection::DatabaseManager, models::Order};
use crate::payments::signature::SIGNATURE_HEADER;
use crate::services::delivery::DeliveryService;
use crate::services::webhook::{WebhookOutcome, WebhookProcessor};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
    pub pending_orders: i64,
}

/// Body of every webhook answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: String,
    pub message: String,
}

impl WebhookResponse {
    fn new(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub webhooks: Arc<WebhookProcessor>,
    pub delivery: Arc<DeliveryService>,
    pub start_time: DateTime<Utc>,
}

pub struct HttpService {
    pub router: Router,
}

impl HttpService {
    pub fn new(
        db: Arc<DatabaseManager>,
        webhooks: Arc<WebhookProcessor>,
        delivery: Arc<DeliveryService>,
    ) -> Self {
        let state = AppState {
            db,
            webhooks,
            delivery,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .route("/paystack-webhook", post(paystack_webhook))
            .route("/thank-you", get(thank_you))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(state);

        Self { router }
    }
}

async fn paystack_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    match state.webhooks.process(signature, &body).await {
        Ok(WebhookOutcome::Paid(paid)) => {
            state.delivery.spawn(paid);
            (StatusCode::OK, Json(WebhookResponse::new("ok", "delivery initiated")))
        }
        Ok(WebhookOutcome::Duplicate { .. }) => {
            (StatusCode::OK, Json(WebhookResponse::new("ok", "already processed")))
        }
        Ok(WebhookOutcome::Ignored { event }) => (
            StatusCode::OK,
            Json(WebhookResponse::new("ignored", format!("event {event} ignored"))),
        ),
        Err(rejection) => (
            rejection.status_code(),
            Json(WebhookResponse::new("error", rejection.to_string())),
        ),
    }
}

async fn thank_you() -> Html<&'static str> {
    Html(
        "<!doctype html><html lang=\"fr\"><head><meta charset=\"utf-8\"><title>Merci</title></head>\
         <body><h1>✅ Merci pour votre paiement !</h1>\
         <p>Retournez sur Telegram : le bot vous envoie le tutoriel dès que Paystack confirme le paiement.</p>\
         </body></html>",
    )
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let pending_orders = Order::count_pending(&state.db.pool).await;
    let response_time_ms = start.elapsed().as_millis() as u64;
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    let Ok(pending_orders) = pending_orders else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: "healthy".to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
            pending_orders,
        },
        uptime_seconds: uptime,
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match test_database_connection(&state.db).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn test_database_connection(db: &DatabaseManager) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(&db.pool).await?;
    Ok(())
}
