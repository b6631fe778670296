// JobPulse Infrastructure - SQLite Adapter
// Implements every engagement port plus Maintenance on one SqlitePool.

mod application_ledger;
mod bookmark_store;
mod connection;
mod counter_store;
mod dedup_store;
mod error;
mod job_catalog;
mod maintenance_impl;
mod migration;
mod slug_registry;

pub use application_ledger::SqliteApplicationLedger;
pub use bookmark_store::SqliteBookmarkStore;
pub use connection::create_pool;
pub use counter_store::SqliteCounterStore;
pub use dedup_store::SqliteDedupStore;
pub use job_catalog::SqliteJobCatalog;
pub use maintenance_impl::SqliteMaintenance;
pub use migration::run_migrations;
pub use slug_registry::SqliteSlugRegistry;

use jobpulse_core::application::EngagementStores;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Wire every engagement port to the same pool
pub fn sqlite_stores(pool: SqlitePool) -> EngagementStores {
    EngagementStores {
        catalog: Arc::new(SqliteJobCatalog::new(pool.clone())),
        counters: Arc::new(SqliteCounterStore::new(pool.clone())),
        dedup: Arc::new(SqliteDedupStore::new(pool.clone())),
        bookmarks: Arc::new(SqliteBookmarkStore::new(pool.clone())),
        applications: Arc::new(SqliteApplicationLedger::new(pool)),
    }
}
