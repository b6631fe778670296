// Job Catalog Port (Interface)

use crate::domain::JobRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Registry of jobs known to the engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobCatalog: Send + Sync {
    /// Insert the job together with a zeroed counters row.
    /// The slug must already be reserved in the `SlugRegistry`.
    async fn create(&self, job: &JobRecord) -> Result<()>;

    /// Find job by ID
    async fn find(&self, job_id: &str) -> Result<Option<JobRecord>>;

    /// Find job by slug
    async fn find_by_slug(&self, slug: &str) -> Result<Option<JobRecord>>;

    /// Delete the job and everything keyed by it: counters, dedup entries,
    /// bookmarks, applications. Its slug is released.
    ///
    /// # Returns
    /// `false` if the job did not exist
    async fn delete(&self, job_id: &str) -> Result<bool>;
}
