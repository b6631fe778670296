// SQLite Maintenance Implementation
use crate::dedup_store::SqliteDedupStore;
use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobpulse_core::error::{AppError, Result};
use jobpulse_core::port::{DedupWindowStore, Maintenance, MaintenanceStats, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// SQLite maintenance implementation
pub struct SqliteMaintenance {
    pool: SqlitePool,
    dedup: SqliteDedupStore,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteMaintenance {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            dedup: SqliteDedupStore::new(pool.clone()),
            pool,
            time_provider,
        }
    }

    /// Get DB file size in bytes
    async fn get_db_size(&self) -> Result<i64> {
        let page_count: i64 = sqlx::query_scalar("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get page count: {}", e)))?;

        let page_size: i64 = sqlx::query_scalar("PRAGMA page_size")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get page size: {}", e)))?;

        Ok(page_count * page_size)
    }

    async fn count(&self, sql: &str) -> Result<i64> {
        sqlx::query_scalar(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

fn to_mb(bytes: i64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

#[async_trait]
impl Maintenance for SqliteMaintenance {
    async fn vacuum(&self) -> Result<f64> {
        info!("Running VACUUM to optimize database...");

        let size_before = to_mb(self.get_db_size().await?);

        sqlx::query("VACUUM")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("VACUUM failed: {}", e)))?;

        let size_after = to_mb(self.get_db_size().await?);
        let reclaimed = (size_before - size_after).max(0.0);

        info!(
            size_before_mb = size_before,
            size_after_mb = size_after,
            reclaimed_mb = reclaimed,
            "VACUUM completed"
        );

        Ok(reclaimed)
    }

    async fn gc_dedup_entries(&self, retention_ms: i64) -> Result<u64> {
        let cutoff = self.time_provider.now_millis().saturating_sub(retention_ms);

        let evicted = self.dedup.evict_older_than(cutoff).await?;
        info!(retention_ms, cutoff, evicted, "Dedup entry GC completed");
        Ok(evicted)
    }

    async fn get_stats(&self) -> Result<MaintenanceStats> {
        let db_size_bytes = self.get_db_size().await?;

        Ok(MaintenanceStats {
            db_size_mb: to_mb(db_size_bytes),
            db_size_bytes,
            job_count: self.count("SELECT COUNT(*) FROM jobs").await?,
            dedup_entry_count: self.count("SELECT COUNT(*) FROM dedup_windows").await?,
            bookmark_count: self.count("SELECT COUNT(*) FROM bookmarks").await?,
            active_bookmark_count: self
                .count("SELECT COUNT(*) FROM bookmarks WHERE is_active = 1")
                .await?,
            application_count: self
                .count("SELECT COUNT(*) FROM job_applications WHERE is_active = 1")
                .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_job, setup_test_db};
    use crate::{SqliteBookmarkStore, SqliteDedupStore};
    use jobpulse_core::domain::{DedupKey, EventKind};
    use jobpulse_core::port::time_provider::ManualClock;
    use jobpulse_core::port::{BookmarkStore, DedupWindowStore, MaintenanceConfig};

    #[tokio::test]
    async fn test_maintenance_stats() {
        let pool = setup_test_db().await;
        insert_job(&pool, "job-1").await;
        SqliteBookmarkStore::new(pool.clone())
            .toggle("job-1", "alice", 0)
            .await
            .unwrap();

        let maintenance = SqliteMaintenance::new(pool, Arc::new(ManualClock::new(0)));
        let stats = maintenance.get_stats().await.unwrap();

        assert!(stats.db_size_mb > 0.0);
        assert_eq!(stats.job_count, 1);
        assert_eq!(stats.bookmark_count, 1);
        assert_eq!(stats.active_bookmark_count, 1);
        assert_eq!(stats.dedup_entry_count, 0);
    }

    #[tokio::test]
    async fn test_vacuum() {
        let pool = setup_test_db().await;
        let maintenance = SqliteMaintenance::new(pool, Arc::new(ManualClock::new(0)));

        let reclaimed = maintenance.vacuum().await.unwrap();
        assert!(reclaimed >= 0.0);
    }

    #[tokio::test]
    async fn test_gc_dedup_entries_keeps_live_windows() {
        let pool = setup_test_db().await;
        insert_job(&pool, "job-1").await;
        let dedup = SqliteDedupStore::new(pool.clone());
        let clock = Arc::new(ManualClock::new(100_000));
        let maintenance = SqliteMaintenance::new(pool, clock);

        dedup
            .should_accept(&DedupKey::new("job-1", EventKind::Click, "old"), 1_000, 10)
            .await
            .unwrap();
        dedup
            .should_accept(&DedupKey::new("job-1", EventKind::Click, "new"), 99_000, 10)
            .await
            .unwrap();

        assert_eq!(maintenance.gc_dedup_entries(50_000).await.unwrap(), 1);
        assert_eq!(maintenance.get_stats().await.unwrap().dedup_entry_count, 1);
    }

    #[tokio::test]
    async fn test_full_maintenance_runs_gc() {
        let pool = setup_test_db().await;
        insert_job(&pool, "job-1").await;
        SqliteDedupStore::new(pool.clone())
            .should_accept(&DedupKey::new("job-1", EventKind::View, "s"), 0, 10)
            .await
            .unwrap();

        let maintenance = SqliteMaintenance::new(pool, Arc::new(ManualClock::new(10_000_000)));
        let stats = maintenance
            .run_full_maintenance(&MaintenanceConfig::default())
            .await
            .unwrap();
        assert_eq!(stats.dedup_entry_count, 0);
    }
}
