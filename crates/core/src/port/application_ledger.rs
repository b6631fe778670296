// Application Ledger Port (Interface)

use crate::domain::{ApplicationId, JobId};
use crate::error::Result;
use async_trait::async_trait;

/// Application rows, the authoritative source for a job's apply count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationLedger: Send + Sync {
    /// Record an active application
    ///
    /// # Errors
    /// `AppError::NotFound` if the job does not exist.
    async fn submit(
        &self,
        id: &str,
        job_id: &str,
        user_id: &str,
        now_millis: i64,
    ) -> Result<ApplicationId>;

    /// Deactivate an application.
    ///
    /// # Returns
    /// The job the application belongs to, or `None` if it was unknown or
    /// already inactive
    async fn withdraw(&self, id: &str) -> Result<Option<JobId>>;

    /// Number of active applications for the job
    async fn count_active(&self, job_id: &str) -> Result<i64>;
}
