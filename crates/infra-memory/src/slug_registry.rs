// In-Process SlugRegistry Implementation

use crate::MemoryStore;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use jobpulse_core::error::Result;
use jobpulse_core::port::SlugRegistry;

#[async_trait]
impl SlugRegistry for MemoryStore {
    async fn try_reserve(&self, slug: &str, now_millis: i64) -> Result<bool> {
        match self.state.slugs.entry(slug.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(now_millis);
                Ok(true)
            }
        }
    }

    async fn release(&self, slug: &str) -> Result<()> {
        self.state.slugs.remove(slug);
        Ok(())
    }

    async fn contains(&self, slug: &str) -> Result<bool> {
        Ok(self.state.slugs.contains_key(slug))
    }
}
