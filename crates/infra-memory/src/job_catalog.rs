// In-Process JobCatalog Implementation

use crate::{CounterCells, MemoryStore};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use jobpulse_core::domain::JobRecord;
use jobpulse_core::error::{AppError, Result};
use jobpulse_core::port::JobCatalog;
use std::sync::Arc;
use tracing::debug;

#[async_trait]
impl JobCatalog for MemoryStore {
    async fn create(&self, job: &JobRecord) -> Result<()> {
        let slug_entry = match self.state.job_slugs.entry(job.slug.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::Database(format!(
                    "Slug {} already belongs to a job",
                    job.slug
                )))
            }
            Entry::Vacant(entry) => entry,
        };

        match self.state.jobs.entry(job.id.clone()) {
            Entry::Occupied(_) => Err(AppError::Database(format!("Job {} already exists", job.id))),
            Entry::Vacant(entry) => {
                self.state
                    .counters
                    .insert(job.id.clone(), Arc::new(CounterCells::default()));
                entry.insert(job.clone());
                slug_entry.insert(job.id.clone());
                Ok(())
            }
        }
    }

    async fn find(&self, job_id: &str) -> Result<Option<JobRecord>> {
        Ok(self.state.jobs.get(job_id).map(|job| job.value().clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<JobRecord>> {
        let job_id = match self.state.job_slugs.get(slug) {
            Some(id) => id.value().clone(),
            None => return Ok(None),
        };
        self.find(&job_id).await
    }

    async fn delete(&self, job_id: &str) -> Result<bool> {
        let entry = match self.state.jobs.entry(job_id.to_string()) {
            Entry::Occupied(entry) => entry,
            Entry::Vacant(_) => return Ok(false),
        };

        // Writers hold a read guard on the job while they touch its rows, so
        // nothing new can attach to it while this entry is held.
        self.state.counters.remove(job_id);
        self.state.dedup.retain(|key, _| key.job_id != job_id);
        self.state.bookmarks.retain(|(job, _), _| job != job_id);
        self.state.applications.retain(|_, app| app.job_id != job_id);
        let (_, job) = entry.remove_entry();

        self.state.job_slugs.remove(&job.slug);
        self.state.slugs.remove(&job.slug);
        debug!(job_id = %job_id, slug = %job.slug, "Job rows removed");
        Ok(true)
    }
}
