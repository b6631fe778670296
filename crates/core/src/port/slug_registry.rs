// Slug Registry Port (Interface)

use crate::error::Result;
use async_trait::async_trait;

/// Global set of assigned slugs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlugRegistry: Send + Sync {
    /// Atomic insert-if-absent.
    ///
    /// Returns `true` if the caller now owns `slug`, `false` if it was
    /// already taken. Never check-then-insert in two steps.
    async fn try_reserve(&self, slug: &str, now_millis: i64) -> Result<bool>;

    /// Give a slug back (job deleted or creation aborted)
    async fn release(&self, slug: &str) -> Result<()>;

    /// Whether the slug is currently assigned
    async fn contains(&self, slug: &str) -> Result<bool>;
}
