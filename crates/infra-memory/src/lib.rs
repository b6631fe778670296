// JobPulse Infrastructure - In-Process Adapter
//
// Every port is served from one shared set of DashMaps. Lock order is
// always jobs -> (job_counters | dedup | bookmarks | applications), and
// no map guard is ever held across an await.

mod application_ledger;
mod bookmark_store;
mod counter_store;
mod dedup_store;
mod job_catalog;
mod maintenance_impl;
mod slug_registry;

pub use counter_store::CounterCells;
pub use maintenance_impl::MemoryMaintenance;

use dashmap::DashMap;
use jobpulse_core::application::EngagementStores;
use jobpulse_core::domain::{
    ApplicationId, ApplicationRecord, BookmarkRecord, DedupKey, JobId, JobRecord, UserId,
};
use jobpulse_core::error::{AppError, Result};
use std::sync::Arc;

#[derive(Default)]
struct State {
    jobs: DashMap<JobId, JobRecord>,
    job_slugs: DashMap<String, JobId>,
    counters: DashMap<JobId, Arc<CounterCells>>,
    dedup: DashMap<DedupKey, i64>,
    bookmarks: DashMap<(JobId, UserId), BookmarkRecord>,
    slugs: DashMap<String, i64>,
    applications: DashMap<ApplicationId, ApplicationRecord>,
}

/// In-process store implementing every engagement port.
///
/// Clones share state. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn job_exists(&self, job_id: &str) -> Result<dashmap::mapref::one::Ref<'_, JobId, JobRecord>> {
        self.state.jobs.get(job_id).ok_or_else(|| job_not_found(job_id))
    }
}

fn job_not_found(job_id: &str) -> AppError {
    AppError::NotFound(format!("Job {} not found", job_id))
}

/// Wire every engagement port to one shared in-process store
pub fn memory_stores(store: MemoryStore) -> EngagementStores {
    EngagementStores {
        catalog: Arc::new(store.clone()),
        counters: Arc::new(store.clone()),
        dedup: Arc::new(store.clone()),
        bookmarks: Arc::new(store.clone()),
        applications: Arc::new(store),
    }
}
