use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::database::{connection::DatabaseManager, models::Order};
use crate::utils::logging::{log_database_operation, log_system_event};

/// Top of every hour.
const SWEEP_SCHEDULE: &str = "0 0 * * * *";

/// Removes orders whose checkout was abandoned.
pub struct ExpiryService {
    db: Arc<DatabaseManager>,
    ttl: Duration,
    scheduler: JobScheduler,
}

impl ExpiryService {
    pub async fn new(db: Arc<DatabaseManager>, ttl_hours: i64) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            db,
            ttl: Duration::hours(ttl_hours),
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let db = self.db.clone();
        let ttl = self.ttl;

        let sweep_job = Job::new_async(SWEEP_SCHEDULE, move |_uuid, _l| {
            let db = db.clone();
            Box::pin(async move {
                if let Err(e) = sweep_stale_orders(&db, ttl).await {
                    tracing::error!("Failed to sweep stale orders: {}", e);
                }
            })
        })?;

        self.scheduler.add(sweep_job).await?;
        self.scheduler.start().await?;

        log_system_event(
            "Expiry service started",
            Some(&format!("unpaid orders expire after {}h", self.ttl.num_hours())),
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    pub async fn sweep_now(&self) -> Result<u64, sqlx::Error> {
        sweep_stale_orders(&self.db, self.ttl).await
    }
}

/// Deletes unpaid orders created more than `ttl` ago. Paid orders are left
/// for delivery to clean up.
pub async fn sweep_stale_orders(db: &DatabaseManager, ttl: Duration) -> Result<u64, sqlx::Error> {
    let cutoff = (Utc::now() - ttl).timestamp();
    let removed = Order::delete_stale_unpaid(&db.pool, cutoff).await?;

    if removed > 0 {
        log_database_operation(
            "expire",
            "pending_orders",
            Some(&format!("{removed} unpaid orders older than {}h", ttl.num_hours())),
        );
    }
    Ok(removed)
}
