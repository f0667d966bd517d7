use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::task::JoinHandle;

use crate::bot::texts;
use crate::config::Config;
use crate::database::{connection::DatabaseManager, models::Order};
use crate::utils::logging::{log_database_error, log_payment_event};

/// Gap between the customer message and the admin notice, to stay clear of
/// Telegram's flood limits.
const DEFAULT_PAUSE: Duration = Duration::from_millis(150);

/// Outbound text messages. Implemented by the Telegram bot; tests record.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl Notifier for Bot {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        self.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }
}

/// A charge that passed reconciliation and still needs its side effects.
#[derive(Debug, Clone)]
pub struct PaidOrder {
    pub user_id: i64,
    pub service: String,
    pub reference: String,
    /// The order row, when the user still had one at payment time.
    pub order: Option<Order>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub customer_notified: bool,
    pub admins_notified: bool,
    pub order_deleted: bool,
}

pub struct DeliveryService {
    notifier: Arc<dyn Notifier>,
    db: Arc<DatabaseManager>,
    tutorial_link: Option<String>,
    group_id: Option<i64>,
    pause: Duration,
}

impl DeliveryService {
    pub fn new(notifier: Arc<dyn Notifier>, db: Arc<DatabaseManager>, config: &Config) -> Self {
        Self {
            notifier,
            db,
            tutorial_link: config.tutorial_link.clone(),
            group_id: config.group_id,
            pause: DEFAULT_PAUSE,
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Runs delivery in the background so the webhook can answer right away.
    pub fn spawn(self: &Arc<Self>, paid: PaidOrder) -> JoinHandle<DeliveryReport> {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.deliver(&paid).await })
    }

    /// Sends the tutorial, notifies the admin group and removes the order.
    /// Each step is attempted even when an earlier one failed.
    pub async fn deliver(&self, paid: &PaidOrder) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        let text = texts::payment_confirmed(self.tutorial_link.as_deref());
        match self.notifier.send_text(paid.user_id, &text).await {
            Ok(()) => {
                report.customer_notified = true;
                log_payment_event("tutorial_sent", &paid.reference, Some(paid.user_id), None);
            }
            Err(e) => {
                tracing::error!("Failed to send tutorial to {}: {}", paid.user_id, e);
            }
        }

        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }

        if let Some(group_id) = self.group_id {
            let notice = texts::admin_payment_notice(
                paid.user_id,
                &paid.service,
                &paid.reference,
                paid.order.as_ref().map(|o| o.country.as_str()),
                paid.order.as_ref().map(|o| o.whatsapp.as_str()),
            );
            match self.notifier.send_text(group_id, &notice).await {
                Ok(()) => report.admins_notified = true,
                Err(e) => tracing::error!("Failed to notify admin group {}: {}", group_id, e),
            }
        }

        match Order::delete_paid(&self.db.pool, paid.user_id).await {
            Ok(deleted) => report.order_deleted = deleted,
            Err(e) => log_database_error(
                "delete_paid",
                "pending_orders",
                &e.to_string(),
                Some(&format!("user {}", paid.user_id)),
            ),
        }

        report
    }
}
