// In-Process DedupWindowStore Implementation

use crate::MemoryStore;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use jobpulse_core::domain::DedupKey;
use jobpulse_core::error::Result;
use jobpulse_core::port::DedupWindowStore;

impl MemoryStore {
    /// Check-and-record under the key's entry guard. `on_accept` runs before
    /// the guard is released, so it commits together with the timestamp.
    fn accept_with<T>(
        &self,
        key: &DedupKey,
        now_millis: i64,
        window_millis: i64,
        on_accept: impl FnOnce() -> T,
    ) -> Option<T> {
        match self.state.dedup.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                if now_millis - *entry.get() > window_millis {
                    *entry.get_mut() = now_millis;
                    Some(on_accept())
                } else {
                    None
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now_millis);
                Some(on_accept())
            }
        }
    }
}

#[async_trait]
impl DedupWindowStore for MemoryStore {
    async fn should_accept(
        &self,
        key: &DedupKey,
        now_millis: i64,
        window_millis: i64,
    ) -> Result<bool> {
        let _job = self.job_exists(&key.job_id)?;
        Ok(self.accept_with(key, now_millis, window_millis, || ()).is_some())
    }

    async fn accept_and_count(
        &self,
        key: &DedupKey,
        now_millis: i64,
        window_millis: i64,
    ) -> Result<Option<i64>> {
        let _job = self.job_exists(&key.job_id)?;
        // Resolved before the entry is touched: the only fallible step
        let cells = self.cells(&key.job_id)?;
        let counter = key.kind.counter();

        Ok(self.accept_with(key, now_millis, window_millis, || cells.adjust(counter, 1)))
    }

    async fn evict_older_than(&self, cutoff_millis: i64) -> Result<u64> {
        let mut evicted = 0u64;
        self.state.dedup.retain(|_, last| {
            let keep = *last >= cutoff_millis;
            if !keep {
                evicted += 1;
            }
            keep
        });
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::store_with_job;
    use jobpulse_core::domain::EventKind;
    use jobpulse_core::error::AppError;
    use jobpulse_core::port::CounterStore;

    const WINDOW: i64 = 30 * 60 * 1000;

    #[tokio::test]
    async fn test_window_boundary_is_exclusive() {
        let store = store_with_job("job-1").await;
        let key = DedupKey::new("job-1", EventKind::Impression, "1.2.3.4");

        assert!(store.should_accept(&key, 0, WINDOW).await.unwrap());
        assert!(!store.should_accept(&key, WINDOW, WINDOW).await.unwrap());
        assert!(store.should_accept(&key, WINDOW + 1, WINDOW).await.unwrap());
    }

    #[tokio::test]
    async fn test_suppression_does_not_extend_window() {
        let store = store_with_job("job-1").await;
        let key = DedupKey::new("job-1", EventKind::Click, "ip");

        assert!(store.should_accept(&key, 0, 100).await.unwrap());
        assert!(!store.should_accept(&key, 90, 100).await.unwrap());
        assert!(store.should_accept(&key, 101, 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = store_with_job("job-1").await;

        assert!(store
            .should_accept(&DedupKey::new("job-1", EventKind::Click, "a"), 0, WINDOW)
            .await
            .unwrap());
        assert!(store
            .should_accept(&DedupKey::new("job-1", EventKind::Click, "b"), 0, WINDOW)
            .await
            .unwrap());
        assert!(store
            .should_accept(&DedupKey::new("job-1", EventKind::View, "a"), 0, WINDOW)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_evict_older_than() {
        let store = store_with_job("job-1").await;
        store
            .should_accept(&DedupKey::new("job-1", EventKind::View, "old"), 10, WINDOW)
            .await
            .unwrap();
        store
            .should_accept(&DedupKey::new("job-1", EventKind::View, "new"), 500, WINDOW)
            .await
            .unwrap();

        assert_eq!(store.evict_older_than(100).await.unwrap(), 1);
        assert!(store
            .should_accept(&DedupKey::new("job-1", EventKind::View, "old"), 600, WINDOW)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_accept_and_count_moves_counter_with_window() {
        let store = store_with_job("job-1").await;
        let key = DedupKey::new("job-1", EventKind::View, "session");

        assert_eq!(store.accept_and_count(&key, 0, 100).await.unwrap(), Some(1));
        assert_eq!(store.accept_and_count(&key, 50, 100).await.unwrap(), None);
        assert_eq!(store.accept_and_count(&key, 101, 100).await.unwrap(), Some(2));
        assert_eq!(store.get("job-1").await.unwrap().view_count, 2);
    }

    #[tokio::test]
    async fn test_missing_counters_leave_no_dedup_entry() {
        let store = store_with_job("job-1").await;
        let key = DedupKey::new("job-1", EventKind::Click, "ip");

        let cells = store.state.counters.remove("job-1").unwrap().1;
        assert!(matches!(
            store.accept_and_count(&key, 0, WINDOW).await,
            Err(AppError::NotFound(_))
        ));
        assert!(store.state.dedup.is_empty());

        store.state.counters.insert("job-1".to_string(), cells);
        assert_eq!(store.accept_and_count(&key, 1_000, WINDOW).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let store = store_with_job("job-1").await;
        let key = DedupKey::new("missing", EventKind::Click, "ip");
        assert!(matches!(
            store.should_accept(&key, 0, WINDOW).await,
            Err(AppError::NotFound(_))
        ));
    }
}
