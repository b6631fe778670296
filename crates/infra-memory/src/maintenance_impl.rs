// In-Process Maintenance Implementation
//
// There is no file to VACUUM; the closest equivalent is handing spare map
// capacity back to the allocator.

use crate::MemoryStore;
use async_trait::async_trait;
use jobpulse_core::error::Result;
use jobpulse_core::port::{DedupWindowStore, Maintenance, MaintenanceStats, TimeProvider};
use std::sync::Arc;
use tracing::info;

pub struct MemoryMaintenance {
    store: MemoryStore,
    time_provider: Arc<dyn TimeProvider>,
}

impl MemoryMaintenance {
    pub fn new(store: MemoryStore, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            store,
            time_provider,
        }
    }
}

#[async_trait]
impl Maintenance for MemoryMaintenance {
    async fn vacuum(&self) -> Result<f64> {
        let state = &self.store.state;
        state.dedup.shrink_to_fit();
        state.bookmarks.shrink_to_fit();
        state.applications.shrink_to_fit();
        info!("Shrunk in-memory maps");
        Ok(0.0)
    }

    async fn gc_dedup_entries(&self, retention_ms: i64) -> Result<u64> {
        let cutoff = self.time_provider.now_millis().saturating_sub(retention_ms);
        let evicted = self.store.evict_older_than(cutoff).await?;
        info!(retention_ms, cutoff, evicted, "Dedup entry GC completed");
        Ok(evicted)
    }

    async fn get_stats(&self) -> Result<MaintenanceStats> {
        let state = &self.store.state;
        Ok(MaintenanceStats {
            db_size_mb: 0.0,
            db_size_bytes: 0,
            job_count: state.jobs.len() as i64,
            dedup_entry_count: state.dedup.len() as i64,
            bookmark_count: state.bookmarks.len() as i64,
            active_bookmark_count: state.bookmarks.iter().filter(|b| b.active).count() as i64,
            application_count: state.applications.iter().filter(|a| a.active).count() as i64,
        })
    }
}
