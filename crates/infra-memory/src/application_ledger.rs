// In-Process ApplicationLedger Implementation

use crate::MemoryStore;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use jobpulse_core::domain::{ApplicationId, ApplicationRecord, JobId};
use jobpulse_core::error::{AppError, Result};
use jobpulse_core::port::ApplicationLedger;

#[async_trait]
impl ApplicationLedger for MemoryStore {
    async fn submit(
        &self,
        id: &str,
        job_id: &str,
        user_id: &str,
        now_millis: i64,
    ) -> Result<ApplicationId> {
        let _job = self.job_exists(job_id)?;

        match self.state.applications.entry(id.to_string()) {
            Entry::Occupied(_) => Err(AppError::Database(format!(
                "Application {} already exists",
                id
            ))),
            Entry::Vacant(entry) => {
                entry.insert(ApplicationRecord {
                    id: id.to_string(),
                    job_id: job_id.to_string(),
                    user_id: user_id.to_string(),
                    active: true,
                    created_at: now_millis,
                });
                Ok(id.to_string())
            }
        }
    }

    async fn withdraw(&self, id: &str) -> Result<Option<JobId>> {
        match self.state.applications.get_mut(id) {
            Some(mut app) if app.active => {
                app.active = false;
                Ok(Some(app.job_id.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn count_active(&self, job_id: &str) -> Result<i64> {
        Ok(self
            .state
            .applications
            .iter()
            .filter(|app| app.job_id == job_id && app.active)
            .count() as i64)
    }
}
