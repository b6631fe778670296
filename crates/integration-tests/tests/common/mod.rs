//! Shared harness: the same engine wired to either adapter family

#![allow(dead_code)]

use jobpulse_core::application::{
    EngagementEngine, EngagementPolicy, EngagementStores, JobService, SlugAllocator,
};
use jobpulse_core::domain::JobRecord;
use jobpulse_core::port::id_provider::SequentialIdProvider;
use jobpulse_core::port::time_provider::ManualClock;
use jobpulse_core::port::{Maintenance, SlugRegistry};
use jobpulse_infra_memory::{memory_stores, MemoryMaintenance, MemoryStore};
use jobpulse_infra_sqlite::{
    create_pool, run_migrations, sqlite_stores, SqliteMaintenance, SqliteSlugRegistry,
};
use std::sync::Arc;
use tempfile::TempDir;

pub const MINUTE: i64 = 60 * 1000;

pub struct Harness {
    pub name: &'static str,
    pub engine: EngagementEngine,
    pub jobs: JobService,
    pub stores: EngagementStores,
    pub maintenance: Arc<dyn Maintenance>,
    pub clock: Arc<ManualClock>,
    _dir: Option<TempDir>,
}

impl Harness {
    /// File-backed SQLite so every pooled connection sees the same database
    pub async fn sqlite() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engagement.db");
        let pool = create_pool(path.to_str().unwrap()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let clock = Arc::new(ManualClock::new(0));
        let slugs: Arc<dyn SlugRegistry> = Arc::new(SqliteSlugRegistry::new(pool.clone()));
        let maintenance = Arc::new(SqliteMaintenance::new(pool.clone(), clock.clone()));
        Self::assemble("sqlite", sqlite_stores(pool), slugs, maintenance, clock, Some(dir))
    }

    pub async fn memory() -> Self {
        let store = MemoryStore::new();
        let clock = Arc::new(ManualClock::new(0));
        let slugs: Arc<dyn SlugRegistry> = Arc::new(store.clone());
        let maintenance = Arc::new(MemoryMaintenance::new(store.clone(), clock.clone()));
        Self::assemble("memory", memory_stores(store), slugs, maintenance, clock, None)
    }

    /// One harness per backend
    pub async fn all() -> Vec<Self> {
        vec![Self::sqlite().await, Self::memory().await]
    }

    fn assemble(
        name: &'static str,
        stores: EngagementStores,
        slugs: Arc<dyn SlugRegistry>,
        maintenance: Arc<dyn Maintenance>,
        clock: Arc<ManualClock>,
        dir: Option<TempDir>,
    ) -> Self {
        let engine = EngagementEngine::new(
            stores.clone(),
            EngagementPolicy::default(),
            Arc::new(SequentialIdProvider::new("app")),
        );
        let jobs = JobService::new(
            stores.catalog.clone(),
            SlugAllocator::new(slugs),
            Arc::new(SequentialIdProvider::new("job")),
            clock.clone(),
        );
        Self {
            name,
            engine,
            jobs,
            stores,
            maintenance,
            clock,
            _dir: dir,
        }
    }

    pub async fn job(&self, title: &str) -> JobRecord {
        self.jobs.create_job(title).await.unwrap()
    }
}
