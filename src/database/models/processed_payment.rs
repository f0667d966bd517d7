use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

/// Ledger row for a payment reference that has already been reconciled.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProcessedPayment {
    pub reference: String,
    pub user_id: i64,
    pub service: String,
    pub processed_at: i64,
}

impl ProcessedPayment {
    /// Returns `false` when the reference was already recorded.
    pub async fn record(
        conn: &mut SqliteConnection,
        reference: &str,
        user_id: i64,
        service: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO processed_payments (reference, user_id, service, processed_at) VALUES (?, ?, ?, ?)",
        )
        .bind(reference)
        .bind(user_id)
        .bind(service)
        .bind(Utc::now().timestamp())
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn find(pool: &SqlitePool, reference: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProcessedPayment>(
            "SELECT reference, user_id, service, processed_at FROM processed_payments WHERE reference = ?",
        )
        .bind(reference)
        .fetch_optional(pool)
        .await
    }
}
