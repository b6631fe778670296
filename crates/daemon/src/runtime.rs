// DI wiring: one adapter family per process

use crate::config::{Backend, DaemonConfig};
use anyhow::{Context, Result};
use jobpulse_core::application::{EngagementEngine, JobService, SlugAllocator};
use jobpulse_core::port::id_provider::UuidProvider;
use jobpulse_core::port::time_provider::SystemTimeProvider;
use jobpulse_core::port::{Maintenance, SlugRegistry, TimeProvider};
use jobpulse_infra_memory::{memory_stores, MemoryMaintenance, MemoryStore};
use jobpulse_infra_sqlite::{
    create_pool, run_migrations, sqlite_stores, SqliteMaintenance, SqliteSlugRegistry,
};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Runtime {
    pub engine: EngagementEngine,
    pub jobs: JobService,
    pub maintenance: Arc<dyn Maintenance>,
    pub time_provider: Arc<dyn TimeProvider>,
    pool: Option<SqlitePool>,
}

impl Runtime {
    pub async fn build(config: &DaemonConfig) -> Result<Self> {
        let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
        let id_provider = Arc::new(UuidProvider);

        let (stores, slugs, maintenance, pool) = match config.backend {
            Backend::Sqlite => {
                info!(db_path = %config.db_path, "Initializing database...");
                if let Some(parent) = Path::new(&config.db_path).parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .with_context(|| format!("Cannot create {}", parent.display()))?;
                }

                let pool = create_pool(&config.db_path)
                    .await
                    .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
                run_migrations(&pool)
                    .await
                    .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

                let slugs: Arc<dyn SlugRegistry> = Arc::new(SqliteSlugRegistry::new(pool.clone()));
                let maintenance: Arc<dyn Maintenance> =
                    Arc::new(SqliteMaintenance::new(pool.clone(), time_provider.clone()));
                (sqlite_stores(pool.clone()), slugs, maintenance, Some(pool))
            }
            Backend::Memory => {
                warn!("Using in-memory backend: state is lost on exit");
                let store = MemoryStore::new();
                let slugs: Arc<dyn SlugRegistry> = Arc::new(store.clone());
                let maintenance: Arc<dyn Maintenance> =
                    Arc::new(MemoryMaintenance::new(store.clone(), time_provider.clone()));
                (memory_stores(store), slugs, maintenance, None)
            }
        };

        let engine = EngagementEngine::new(stores.clone(), config.policy.clone(), id_provider.clone());
        let jobs = JobService::new(
            stores.catalog,
            SlugAllocator::new(slugs),
            id_provider,
            time_provider.clone(),
        );

        Ok(Self {
            engine,
            jobs,
            maintenance,
            time_provider,
            pool,
        })
    }

    pub fn now(&self) -> i64 {
        self.time_provider.now_millis()
    }

    /// Wait for in-flight queries and close the pool
    pub async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}
