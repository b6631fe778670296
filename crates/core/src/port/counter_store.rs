// Counter Store Port (Interface)

use crate::domain::{CounterName, EngagementCounters};
use crate::error::Result;
use async_trait::async_trait;

/// Per-job engagement counters.
///
/// Implementations must make `adjust` and `set` single atomic
/// read-modify-write steps per (job, counter): concurrent calls on the same
/// counter serialize, calls on other counters or jobs never wait on them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Apply `delta` and return the post-adjustment value.
    ///
    /// Never goes below zero: a delta that would drive the value negative
    /// clamps it to 0 and returns 0.
    ///
    /// # Errors
    /// `AppError::NotFound` if the job has no counters row.
    async fn adjust(&self, job_id: &str, counter: CounterName, delta: i64) -> Result<i64>;

    /// Overwrite the counter with `value` (clamped at zero), returning the stored value
    async fn set(&self, job_id: &str, counter: CounterName, value: i64) -> Result<i64>;

    /// Read all counters of a job
    async fn get(&self, job_id: &str) -> Result<EngagementCounters>;
}
