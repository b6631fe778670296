// Engagement Engine - counter and dedup bookkeeping for job postings
//
// Every operation runs on a detached task: a caller that abandons the
// request cannot tear the dedup check away from its counter update.

mod keyed_lock;
pub mod policy;

pub use policy::EngagementPolicy;

use crate::domain::{
    ApplicationId, BookmarkRecord, BookmarkToggle, CounterName, DedupKey, EngagementCounters,
    EventKind,
};
use crate::error::{AppError, Result};
use crate::port::{
    ApplicationLedger, BookmarkStore, CounterStore, DedupWindowStore, IdProvider, JobCatalog,
};
use keyed_lock::KeyedLocks;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Port bundle the engine runs against (one adapter family per deployment)
#[derive(Clone)]
pub struct EngagementStores {
    pub catalog: Arc<dyn JobCatalog>,
    pub counters: Arc<dyn CounterStore>,
    pub dedup: Arc<dyn DedupWindowStore>,
    pub bookmarks: Arc<dyn BookmarkStore>,
    pub applications: Arc<dyn ApplicationLedger>,
}

/// Result of a window-deduplicated event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    /// Whether the event passed its dedup window and was counted
    pub counted: bool,
    /// Counter value after the event
    pub count: i64,
}

/// Result of an application submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationReceipt {
    pub application_id: ApplicationId,
    /// `None` when the counter refresh failed; the application itself was stored
    pub apply_count: Option<i64>,
}

#[derive(Clone)]
pub struct EngagementEngine {
    stores: EngagementStores,
    policy: EngagementPolicy,
    id_provider: Arc<dyn IdProvider>,
    recount_locks: Arc<KeyedLocks>,
}

impl EngagementEngine {
    pub fn new(
        stores: EngagementStores,
        policy: EngagementPolicy,
        id_provider: Arc<dyn IdProvider>,
    ) -> Self {
        Self {
            stores,
            policy,
            id_provider,
            recount_locks: Arc::new(KeyedLocks::new()),
        }
    }

    pub fn policy(&self) -> &EngagementPolicy {
        &self.policy
    }

    /// Count an impression once per source IP per impression window
    pub async fn record_impression(
        &self,
        job_id: &str,
        source_ip: &str,
        now_millis: i64,
    ) -> Result<EventOutcome> {
        self.record_event(EventKind::Impression, job_id, source_ip, now_millis)
            .await
    }

    /// Count a view once per session identity per view window
    pub async fn record_view(
        &self,
        job_id: &str,
        session_identity: &str,
        now_millis: i64,
    ) -> Result<EventOutcome> {
        self.record_event(EventKind::View, job_id, session_identity, now_millis)
            .await
    }

    /// Count a click once per source IP per click window
    pub async fn record_click(
        &self,
        job_id: &str,
        source_ip: &str,
        now_millis: i64,
    ) -> Result<EventOutcome> {
        self.record_event(EventKind::Click, job_id, source_ip, now_millis)
            .await
    }

    /// Shared path of the three windowed event kinds.
    ///
    /// A suppressed duplicate is not an error: it returns `counted: false`
    /// with the current value.
    pub async fn record_event(
        &self,
        kind: EventKind,
        job_id: &str,
        source: &str,
        now_millis: i64,
    ) -> Result<EventOutcome> {
        let stores = self.stores.clone();
        let key = DedupKey::new(job_id, kind, source);
        let window_ms = self.policy.window_millis(kind)?;

        detached(async move {
            ensure_job(stores.catalog.as_ref(), &key.job_id).await?;

            match stores
                .dedup
                .accept_and_count(&key, now_millis, window_ms)
                .await?
            {
                Some(count) => {
                    debug!(job_id = %key.job_id, kind = %kind, count, "Event counted");
                    Ok(EventOutcome {
                        counted: true,
                        count,
                    })
                }
                None => {
                    let count = stores.counters.get(&key.job_id).await?.get(kind.counter());
                    debug!(job_id = %key.job_id, kind = %kind, "Duplicate event suppressed");
                    Ok(EventOutcome {
                        counted: false,
                        count,
                    })
                }
            }
        })
        .await
    }

    /// Flip the user's bookmark on the job.
    ///
    /// Calling twice in a row is a no-op on the bookmark count.
    pub async fn toggle_bookmark(
        &self,
        job_id: &str,
        user_id: &str,
        now_millis: i64,
    ) -> Result<BookmarkToggle> {
        let stores = self.stores.clone();
        let job_id = job_id.to_string();
        let user_id = user_id.to_string();

        detached(async move {
            ensure_job(stores.catalog.as_ref(), &job_id).await?;
            let toggle = stores.bookmarks.toggle(&job_id, &user_id, now_millis).await?;
            info!(
                job_id = %job_id,
                user_id = %user_id,
                added = toggle.added,
                bookmark_count = toggle.bookmark_count,
                "Bookmark toggled"
            );
            Ok(toggle)
        })
        .await
    }

    pub async fn is_bookmarked(&self, job_id: &str, user_id: &str) -> Result<bool> {
        self.stores.bookmarks.is_bookmarked(job_id, user_id).await
    }

    /// Active bookmarks of a user, newest first
    pub async fn user_bookmarks(&self, user_id: &str) -> Result<Vec<BookmarkRecord>> {
        self.stores.bookmarks.list_for_user(user_id).await
    }

    /// Re-derive `apply_count` from the active application rows.
    ///
    /// Recounts of the same job serialize so a stale count can never
    /// overwrite a newer one; other jobs are unaffected.
    pub async fn record_application(&self, job_id: &str) -> Result<i64> {
        let stores = self.stores.clone();
        let locks = Arc::clone(&self.recount_locks);
        let job_id = job_id.to_string();

        detached(async move {
            ensure_job(stores.catalog.as_ref(), &job_id).await?;
            let _guard = locks.lock(&job_id).await;

            let active = stores.applications.count_active(&job_id).await?;
            let count = stores
                .counters
                .set(&job_id, CounterName::Applications, active)
                .await?;
            debug!(job_id = %job_id, apply_count = count, "Apply count refreshed");
            Ok(count)
        })
        .await
    }

    /// Store an application, then refresh the job's apply count.
    ///
    /// A failed refresh does not fail the submission.
    pub async fn submit_application(
        &self,
        job_id: &str,
        user_id: &str,
        now_millis: i64,
    ) -> Result<ApplicationReceipt> {
        ensure_job(self.stores.catalog.as_ref(), job_id).await?;

        let id = self.id_provider.generate_id();
        let application_id = self
            .stores
            .applications
            .submit(&id, job_id, user_id, now_millis)
            .await?;
        info!(job_id = %job_id, application_id = %application_id, "Application submitted");

        let apply_count = self.refresh_best_effort(job_id).await;
        Ok(ApplicationReceipt {
            application_id,
            apply_count,
        })
    }

    /// Deactivate an application and refresh the apply count of the job it
    /// belongs to.
    ///
    /// # Returns
    /// `false` if the application was unknown or already withdrawn
    pub async fn withdraw_application(&self, application_id: &str) -> Result<bool> {
        match self.stores.applications.withdraw(application_id).await? {
            Some(job_id) => {
                info!(job_id = %job_id, application_id = %application_id, "Application withdrawn");
                self.refresh_best_effort(&job_id).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Current value of every counter of the job
    pub async fn counters(&self, job_id: &str) -> Result<EngagementCounters> {
        self.stores.counters.get(job_id).await
    }

    async fn refresh_best_effort(&self, job_id: &str) -> Option<i64> {
        match self.record_application(job_id).await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Apply count refresh failed");
                None
            }
        }
    }
}

async fn ensure_job(catalog: &dyn JobCatalog, job_id: &str) -> Result<()> {
    match catalog.find(job_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!("Job {} not found", job_id))),
    }
}

/// Run to completion even if the awaiting caller is dropped
async fn detached<T, F>(fut: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(fut)
        .await
        .map_err(|e| AppError::Internal(format!("Engagement task failed: {}", e)))?
}
