// Store Maintenance port
use crate::error::Result;
use async_trait::async_trait;

/// Store maintenance statistics
#[derive(Debug, Clone, Default)]
pub struct MaintenanceStats {
    pub db_size_mb: f64,
    pub db_size_bytes: i64,
    pub job_count: i64,
    pub dedup_entry_count: i64,
    pub bookmark_count: i64,
    pub active_bookmark_count: i64,
    pub application_count: i64,
}

/// Maintenance configuration
#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    /// Dedup entries older than this can no longer suppress anything.
    /// Must be at least the largest configured dedup window.
    pub dedup_retention_ms: i64,

    /// DB size above which VACUUM runs (MB)
    pub max_db_size_mb: f64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            dedup_retention_ms: 75 * 60 * 1000, // view window, the largest default
            max_db_size_mb: 512.0,
        }
    }
}

/// Store maintenance operations
#[async_trait]
pub trait Maintenance: Send + Sync {
    /// Reclaim space and defragment
    ///
    /// # Returns
    /// Space reclaimed in MB
    async fn vacuum(&self) -> Result<f64>;

    /// Delete dedup entries last accepted more than `retention_ms` ago
    ///
    /// # Returns
    /// Number of entries deleted
    async fn gc_dedup_entries(&self, retention_ms: i64) -> Result<u64>;

    /// Get maintenance statistics
    async fn get_stats(&self) -> Result<MaintenanceStats>;

    /// Run full maintenance (dedup GC + VACUUM when oversized)
    async fn run_full_maintenance(&self, config: &MaintenanceConfig) -> Result<MaintenanceStats> {
        let stats_before = self.get_stats().await?;

        let evicted = self.gc_dedup_entries(config.dedup_retention_ms).await?;

        let reclaimed_mb = if stats_before.db_size_mb > config.max_db_size_mb {
            self.vacuum().await?
        } else {
            0.0
        };

        let stats_after = self.get_stats().await?;

        tracing::info!(
            evicted_dedup_entries = evicted,
            reclaimed_mb = reclaimed_mb,
            db_size_mb = stats_after.db_size_mb,
            "Maintenance completed"
        );

        Ok(stats_after)
    }
}
