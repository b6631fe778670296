// Port Layer - Interfaces for external dependencies

pub mod application_ledger;
pub mod bookmark_store;
pub mod counter_store;
pub mod dedup_store;
pub mod id_provider; // For deterministic testing
pub mod job_catalog;
pub mod maintenance;
pub mod slug_registry;
pub mod time_provider;

// Re-exports
pub use application_ledger::ApplicationLedger;
pub use bookmark_store::BookmarkStore;
pub use counter_store::CounterStore;
pub use dedup_store::DedupWindowStore;
pub use id_provider::IdProvider;
pub use job_catalog::JobCatalog;
pub use maintenance::{Maintenance, MaintenanceConfig, MaintenanceStats};
pub use slug_registry::SlugRegistry;
pub use time_provider::TimeProvider;
