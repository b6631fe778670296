// Bookmark Store Port (Interface)

use crate::domain::{BookmarkRecord, BookmarkToggle};
use crate::error::Result;
use async_trait::async_trait;

/// Per-user bookmark membership per job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Read-or-create the (job, user) record, flip it, and move the job's
    /// bookmark counter by +1/-1 as one unit.
    ///
    /// Toggles for the same (job, user) serialize; toggles by other users of
    /// the same job only contend on the counter itself.
    ///
    /// # Errors
    /// `AppError::NotFound` if the job does not exist.
    async fn toggle(&self, job_id: &str, user_id: &str, now_millis: i64)
        -> Result<BookmarkToggle>;

    /// Whether the user currently has an active bookmark on the job
    async fn is_bookmarked(&self, job_id: &str, user_id: &str) -> Result<bool>;

    /// Active bookmarks of a user, most recently created first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<BookmarkRecord>>;
}
