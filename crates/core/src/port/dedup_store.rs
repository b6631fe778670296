// Dedup Window Store Port (Interface)

use crate::domain::DedupKey;
use crate::error::Result;
use async_trait::async_trait;

/// Remembers, per dedup key, when the last event was accepted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DedupWindowStore: Send + Sync {
    /// Atomic check-and-record.
    ///
    /// Returns `true` and stores `now_millis` as the key's last accepted time
    /// when no entry exists or the entry is older than `window_millis`
    /// (`now - last > window`). Otherwise returns `false` and leaves the stored
    /// timestamp untouched.
    async fn should_accept(&self, key: &DedupKey, now_millis: i64, window_millis: i64)
        -> Result<bool>;

    /// `should_accept` and the `+1` on the key's counter as one unit.
    ///
    /// Returns the post-increment value when accepted, `None` when the event
    /// is a duplicate. On error neither the timestamp nor the counter moves,
    /// so a retry inside the window is still counted.
    async fn accept_and_count(
        &self,
        key: &DedupKey,
        now_millis: i64,
        window_millis: i64,
    ) -> Result<Option<i64>>;

    /// Drop entries last accepted before `cutoff_millis`. Pure optimization:
    /// an evicted key behaves exactly like an expired one.
    ///
    /// # Returns
    /// Number of entries removed
    async fn evict_older_than(&self, cutoff_millis: i64) -> Result<u64>;
}
