// Job registration use cases

use crate::application::slug::SlugAllocator;
use crate::domain::JobRecord;
use crate::error::Result;
use crate::port::{IdProvider, JobCatalog, TimeProvider};
use std::sync::Arc;
use tracing::{info, warn};

/// Creates and deletes the jobs the engine counts for
pub struct JobService {
    catalog: Arc<dyn JobCatalog>,
    slugs: SlugAllocator,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl JobService {
    pub fn new(
        catalog: Arc<dyn JobCatalog>,
        slugs: SlugAllocator,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            catalog,
            slugs,
            id_provider,
            time_provider,
        }
    }

    /// Register a job: reserve its slug, then create it with zeroed counters.
    ///
    /// If creation fails the slug is handed back.
    pub async fn create_job(&self, title: &str) -> Result<JobRecord> {
        let now = self.time_provider.now_millis();
        let slug = self.slugs.allocate(title, now).await?;
        let job = JobRecord::new(self.id_provider.generate_id(), slug, title, now);

        if let Err(e) = self.catalog.create(&job).await {
            if let Err(release_err) = self.slugs.release(&job.slug).await {
                warn!(slug = %job.slug, error = %release_err, "Failed to release slug");
            }
            return Err(e);
        }

        info!(job_id = %job.id, slug = %job.slug, "Job registered");
        Ok(job)
    }

    /// Delete a job with its counters, dedup entries, bookmarks and applications
    pub async fn delete_job(&self, job_id: &str) -> Result<bool> {
        let deleted = self.catalog.delete(job_id).await?;
        if deleted {
            info!(job_id = %job_id, "Job deleted");
        }
        Ok(deleted)
    }

    pub async fn find_job(&self, job_id: &str) -> Result<Option<JobRecord>> {
        self.catalog.find(job_id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<JobRecord>> {
        self.catalog.find_by_slug(slug).await
    }
}
