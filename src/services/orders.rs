use std::sync::Arc;

use crate::config::Config;
use crate::database::{
    connection::DatabaseManager,
    models::{NewOrder, Order},
};
use crate::services::checkout::{CheckoutService, PaymentLink};
use crate::utils::logging::{log_database_operation, log_payment_event};

/// What the conversation should tell the user once all data is collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Admins skip payment; the order has already been removed.
    AdminBypass { tutorial_link: Option<String> },
    /// Order is pending and linked to `link.reference` when there is one.
    AwaitingPayment(PaymentLink),
    /// No usable payment link: the processor failed (the order has been
    /// removed) or the order changed while the checkout was being created.
    PaymentUnavailable,
}

/// Order bookkeeping behind the conversation, independent of Telegram.
pub struct OrderService {
    db: Arc<DatabaseManager>,
    config: Arc<Config>,
    checkout: CheckoutService,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseManager>, config: Arc<Config>, checkout: CheckoutService) -> Self {
        Self { db, config, checkout }
    }

    /// Persists the order (replacing any earlier one) and prepares payment.
    pub async fn submit(&self, new_order: &NewOrder) -> Result<Submission, sqlx::Error> {
        let pool = &self.db.pool;
        let user_id = new_order.user_id;

        Order::save(pool, new_order).await?;
        log_database_operation("save", "pending_orders", Some(&format!("user {user_id} {}", new_order.service)));

        if self.config.is_admin(user_id) {
            Order::delete(pool, user_id).await?;
            return Ok(Submission::AdminBypass {
                tutorial_link: self.config.tutorial_link.clone(),
            });
        }

        match self.checkout.payment_link(new_order).await {
            Ok(link) => {
                if let Some(reference) = &link.reference {
                    if !Order::attach_reference(pool, user_id, reference).await? {
                        // Cancelled or settled while the checkout was being created.
                        tracing::warn!(
                            "Order of user {} changed before reference {} could be attached",
                            user_id,
                            reference
                        );
                        return Ok(Submission::PaymentUnavailable);
                    }
                }
                Ok(Submission::AwaitingPayment(link))
            }
            Err(e) => {
                tracing::error!("Failed to create payment link for user {}: {}", user_id, e);
                Order::delete(pool, user_id).await?;
                Ok(Submission::PaymentUnavailable)
            }
        }
    }

    /// Drops the user's order, paid or not. Returns whether one existed.
    pub async fn cancel(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let deleted = Order::delete(&self.db.pool, user_id).await?;
        if deleted {
            log_payment_event("order_cancelled", "-", Some(user_id), None);
        }
        Ok(deleted)
    }
}
