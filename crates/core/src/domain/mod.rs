// Domain Layer - Pure business logic and entities

pub mod application;
pub mod bookmark;
pub mod engagement;
pub mod error;
pub mod job;
pub mod slug;

// Re-exports
pub use application::{ApplicationId, ApplicationRecord};
pub use bookmark::{BookmarkRecord, BookmarkToggle};
pub use engagement::{CounterName, DedupKey, EngagementCounters, EventKind};
pub use error::DomainError;
pub use job::{JobId, JobRecord, UserId};
pub use slug::{Slug, FALLBACK_SLUG_BASE, MAX_SLUG_LEN};
