// In-Process BookmarkStore Implementation

use crate::MemoryStore;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use jobpulse_core::domain::{BookmarkRecord, BookmarkToggle, CounterName};
use jobpulse_core::error::Result;
use jobpulse_core::port::BookmarkStore;

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn toggle(&self, job_id: &str, user_id: &str, now_millis: i64) -> Result<BookmarkToggle> {
        let _job = self.job_exists(job_id)?;
        let cells = self.cells(job_id)?;

        // The counter moves while the (job, user) entry is still held, so a
        // concurrent toggle by the same user sees the flag and count together.
        let key = (job_id.to_string(), user_id.to_string());
        let (added, bookmark_count) = match self.state.bookmarks.entry(key) {
            Entry::Vacant(entry) => {
                let _record = entry.insert(BookmarkRecord::new(job_id, user_id, now_millis));
                (true, cells.adjust(CounterName::Bookmarks, 1))
            }
            Entry::Occupied(mut entry) => {
                let delta = entry.get_mut().toggle(now_millis);
                (delta > 0, cells.adjust(CounterName::Bookmarks, delta))
            }
        };

        Ok(BookmarkToggle {
            added,
            bookmark_count,
        })
    }

    async fn is_bookmarked(&self, job_id: &str, user_id: &str) -> Result<bool> {
        let key = (job_id.to_string(), user_id.to_string());
        Ok(self
            .state
            .bookmarks
            .get(&key)
            .map(|record| record.active)
            .unwrap_or(false))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<BookmarkRecord>> {
        let mut records: Vec<BookmarkRecord> = self
            .state
            .bookmarks
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.active)
            .map(|entry| entry.value().clone())
            .collect();

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.job_id.cmp(&b.job_id))
        });
        Ok(records)
    }
}
