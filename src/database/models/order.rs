use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::{ProcessedPayment, Service};
use crate::payments::is_issued_reference;

const ORDER_COLUMNS: &str =
    "user_id, username, service, country, whatsapp, created_at, paid, pay_reference, paid_at";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub user_id: i64,
    pub username: Option<String>,
    pub service: String,
    pub country: String,
    pub whatsapp: String,
    pub created_at: i64, // unix seconds
    pub paid: bool,
    pub pay_reference: Option<String>,
    pub paid_at: Option<i64>,
}

/// Data collected by the conversation before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: i64,
    pub username: Option<String>,
    pub service: Service,
    pub country: String,
    pub whatsapp: String,
}

/// Result of applying a confirmed charge to the order table.
#[derive(Debug, Clone)]
pub enum PaymentTransition {
    /// First time this reference is seen. `order` is the row that was flipped
    /// to paid, if the user still had one.
    Applied { order: Option<Order> },
    /// The reference is already in the ledger; nothing was changed.
    Duplicate,
}

impl Order {
    pub fn service(&self) -> Option<Service> {
        self.service.parse().ok()
    }

    /// Inserts the order, replacing whatever the user had before.
    pub async fn save(pool: &SqlitePool, new_order: &NewOrder) -> Result<Self, sqlx::Error> {
        let now = Utc::now().timestamp();

        sqlx::query(
            r#"
            REPLACE INTO pending_orders
                (user_id, username, service, country, whatsapp, created_at, paid, pay_reference, paid_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, NULL, NULL)
            "#,
        )
        .bind(new_order.user_id)
        .bind(&new_order.username)
        .bind(new_order.service.as_str())
        .bind(&new_order.country)
        .bind(&new_order.whatsapp)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_user(pool, new_order.user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM pending_orders WHERE user_id = ?");
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_reference(
        pool: &SqlitePool,
        reference: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM pending_orders WHERE pay_reference = ?");
        sqlx::query_as::<_, Order>(&query)
            .bind(reference)
            .fetch_optional(pool)
            .await
    }

    /// Links the user's unpaid order to the reference sent to the processor.
    pub async fn attach_reference(
        pool: &SqlitePool,
        user_id: i64,
        reference: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pending_orders SET pay_reference = ? WHERE user_id = ? AND paid = 0",
        )
        .bind(reference)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pending_orders WHERE user_id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Post-delivery cleanup. Leaves a newer unpaid order alone.
    pub async fn delete_paid(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pending_orders WHERE user_id = ? AND paid = 1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_stale_unpaid(pool: &SqlitePool, older_than: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pending_orders WHERE paid = 0 AND created_at < ?")
            .bind(older_than)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_pending(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pending_orders WHERE paid = 0")
            .fetch_one(pool)
            .await
    }

    /// Applies a confirmed charge exactly once per reference.
    ///
    /// The ledger insert and the order update share one transaction, so a
    /// duplicate webhook either sees the ledger row and stops, or waits for the
    /// first one to commit.
    pub async fn reconcile_payment(
        pool: &SqlitePool,
        reference: &str,
        user_id: i64,
        service: &str,
    ) -> Result<PaymentTransition, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !ProcessedPayment::record(&mut tx, reference, user_id, service).await? {
            tx.rollback().await?;
            return Ok(PaymentTransition::Duplicate);
        }

        let order = Self::mark_paid(&mut tx, reference, user_id).await?;
        tx.commit().await?;

        Ok(PaymentTransition::Applied { order })
    }

    /// Flips the order holding `reference`. A reference the bot did not issue
    /// comes from a static pay page and falls back to the user's unpaid order
    /// that was never given one.
    ///
    /// Bot-issued references never take that fallback: between `save` and
    /// `attach_reference` a new order has no reference yet, and a late
    /// webhook for the previous checkout must not claim it.
    async fn mark_paid(
        conn: &mut SqliteConnection,
        reference: &str,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let now = Utc::now().timestamp();
        let matches_by_user = !is_issued_reference(reference);

        let updated = sqlx::query(
            r#"
            UPDATE pending_orders
            SET paid = 1, pay_reference = ?, paid_at = ?
            WHERE paid = 0
              AND (pay_reference = ? OR (? AND user_id = ? AND pay_reference IS NULL))
            "#,
        )
        .bind(reference)
        .bind(now)
        .bind(reference)
        .bind(matches_by_user)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        let query = format!("SELECT {ORDER_COLUMNS} FROM pending_orders WHERE pay_reference = ?");
        sqlx::query_as::<_, Order>(&query)
            .bind(reference)
            .fetch_optional(&mut *conn)
            .await
    }
}
