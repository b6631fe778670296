// In-Process CounterStore Implementation

use crate::{job_not_found, MemoryStore};
use async_trait::async_trait;
use jobpulse_core::domain::{CounterName, EngagementCounters};
use jobpulse_core::error::Result;
use jobpulse_core::port::CounterStore;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// The five counters of one job, each updated lock-free
#[derive(Debug, Default)]
pub struct CounterCells {
    cells: [AtomicI64; 5],
}

impl CounterCells {
    /// Apply `delta` with a CAS loop, clamping at zero
    pub fn adjust(&self, counter: CounterName, delta: i64) -> i64 {
        let cell = &self.cells[counter.index()];
        let mut current = cell.load(Ordering::Acquire);
        loop {
            let next = current.saturating_add(delta).max(0);
            match cell.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return next,
                Err(actual) => current = actual, // Retry
            }
        }
    }

    pub fn set(&self, counter: CounterName, value: i64) -> i64 {
        let value = value.max(0);
        self.cells[counter.index()].store(value, Ordering::Release);
        value
    }

    pub fn snapshot(&self) -> EngagementCounters {
        CounterName::ALL
            .iter()
            .fold(EngagementCounters::default(), |acc, &counter| {
                acc.with(counter, self.cells[counter.index()].load(Ordering::Acquire))
            })
    }
}

impl MemoryStore {
    /// The DashMap shard lock is held only for the lookup, not the update.
    pub(crate) fn cells(&self, job_id: &str) -> Result<Arc<CounterCells>> {
        self.state
            .counters
            .get(job_id)
            .map(|cells| Arc::clone(cells.value()))
            .ok_or_else(|| job_not_found(job_id))
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn adjust(&self, job_id: &str, counter: CounterName, delta: i64) -> Result<i64> {
        Ok(self.cells(job_id)?.adjust(counter, delta))
    }

    async fn set(&self, job_id: &str, counter: CounterName, value: i64) -> Result<i64> {
        Ok(self.cells(job_id)?.set(counter, value))
    }

    async fn get(&self, job_id: &str) -> Result<EngagementCounters> {
        Ok(self.cells(job_id)?.snapshot())
    }
}
