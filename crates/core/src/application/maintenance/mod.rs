// Maintenance Service
// Periodic dedup eviction and VACUUM

use crate::application::shutdown::ShutdownToken;
use crate::error::Result;
use crate::port::{Maintenance, MaintenanceConfig, MaintenanceStats};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Maintenance scheduler
///
/// Runs full maintenance on a fixed interval until shutdown. Nothing here is
/// needed for correctness: expired dedup entries are already ignored at
/// check time.
pub struct MaintenanceScheduler {
    maintenance: Arc<dyn Maintenance>,
    config: MaintenanceConfig,
    every: Duration,
}

impl MaintenanceScheduler {
    /// Create a new maintenance scheduler
    ///
    /// # Arguments
    /// * `maintenance` - Maintenance implementation
    /// * `config` - Maintenance configuration
    /// * `every` - How often to run maintenance
    pub fn new(maintenance: Arc<dyn Maintenance>, config: MaintenanceConfig, every: Duration) -> Self {
        Self {
            maintenance,
            config,
            every,
        }
    }

    /// Run maintenance loop until the token fires.
    /// Should be spawned in tokio::spawn
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_secs = self.every.as_secs(),
            dedup_retention_ms = self.config.dedup_retention_ms,
            "Maintenance scheduler started"
        );

        let mut tick = interval(self.every);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Maintenance scheduler stopping");
                    return;
                }
                _ = tick.tick() => {}
            }

            match self.maintenance.run_full_maintenance(&self.config).await {
                Ok(stats) => {
                    info!(
                        db_size_mb = stats.db_size_mb,
                        job_count = stats.job_count,
                        dedup_entries = stats.dedup_entry_count,
                        "Scheduled maintenance completed successfully"
                    );
                }
                Err(e) => {
                    error!(error = ?e, "Scheduled maintenance failed");
                }
            }
        }
    }

    /// Run maintenance immediately (for manual trigger)
    pub async fn run_now(&self) -> Result<MaintenanceStats> {
        info!("Running manual maintenance...");
        self.maintenance.run_full_maintenance(&self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shutdown::shutdown_channel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct CountingMaintenance {
        gc_runs: AtomicU64,
        vacuums: AtomicU64,
        size_mb: f64,
    }

    #[async_trait]
    impl Maintenance for CountingMaintenance {
        async fn vacuum(&self) -> Result<f64> {
            self.vacuums.fetch_add(1, Ordering::SeqCst);
            Ok(0.0)
        }

        async fn gc_dedup_entries(&self, _retention_ms: i64) -> Result<u64> {
            self.gc_runs.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        async fn get_stats(&self) -> Result<MaintenanceStats> {
            Ok(MaintenanceStats {
                db_size_mb: self.size_mb,
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_run_now_skips_vacuum_below_threshold() {
        let maintenance = Arc::new(CountingMaintenance::default());
        let scheduler = MaintenanceScheduler::new(
            maintenance.clone(),
            MaintenanceConfig::default(),
            Duration::from_secs(3600),
        );

        scheduler.run_now().await.unwrap();
        assert_eq!(maintenance.gc_runs.load(Ordering::SeqCst), 1);
        assert_eq!(maintenance.vacuums.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_now_vacuums_oversized_store() {
        let maintenance = Arc::new(CountingMaintenance {
            size_mb: 2048.0,
            ..Default::default()
        });
        let scheduler = MaintenanceScheduler::new(
            maintenance.clone(),
            MaintenanceConfig::default(),
            Duration::from_secs(3600),
        );

        scheduler.run_now().await.unwrap();
        assert_eq!(maintenance.vacuums.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loop_stops_on_shutdown() {
        let maintenance = Arc::new(CountingMaintenance::default());
        let scheduler = MaintenanceScheduler::new(
            maintenance.clone(),
            MaintenanceConfig::default(),
            Duration::from_millis(10),
        );

        let (tx, token) = shutdown_channel();
        let handle = tokio::spawn(scheduler.run(token));

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.shutdown();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("scheduler should stop")
            .unwrap();
        assert!(maintenance.gc_runs.load(Ordering::SeqCst) >= 1);
    }
}
