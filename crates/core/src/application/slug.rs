// Slug Allocator - unique human-readable job identifiers

use crate::domain::Slug;
use crate::error::{AppError, Result};
use crate::port::SlugRegistry;
use std::sync::Arc;
use tracing::{debug, info};

/// Suffix attempts before giving up on a base
pub const DEFAULT_MAX_SUFFIX: u32 = 10_000;

/// Allocates slugs as `base`, `base-1`, `base-2`, ...
///
/// Each candidate is claimed with a single atomic `try_reserve`, so two
/// concurrent allocations for the same title can never both win a candidate.
pub struct SlugAllocator {
    registry: Arc<dyn SlugRegistry>,
    max_suffix: u32,
}

impl SlugAllocator {
    pub fn new(registry: Arc<dyn SlugRegistry>) -> Self {
        Self {
            registry,
            max_suffix: DEFAULT_MAX_SUFFIX,
        }
    }

    pub fn with_max_suffix(mut self, max_suffix: u32) -> Self {
        self.max_suffix = max_suffix;
        self
    }

    /// Reserve and return a unique, non-blank slug for `title`.
    ///
    /// Titles without any ASCII alphanumerics use the `listing` base.
    ///
    /// # Errors
    /// `AppError::Internal` if every suffix up to the limit is taken.
    pub async fn allocate(&self, title: &str, now_millis: i64) -> Result<String> {
        let base = match Slug::from_title(title) {
            Ok(base) => base,
            Err(e) => {
                debug!(error = %e, "Using fallback slug base");
                Slug::from_title_or_fallback(title)
            }
        };

        for attempt in 0..=self.max_suffix {
            let candidate = base.candidate(attempt);
            if self.registry.try_reserve(&candidate, now_millis).await? {
                info!(slug = %candidate, attempts = attempt + 1, "Slug allocated");
                return Ok(candidate);
            }
        }

        Err(AppError::Internal(format!(
            "No free slug for base '{}' after {} attempts",
            base,
            u64::from(self.max_suffix) + 1
        )))
    }

    /// Return a slug to the pool
    pub async fn release(&self, slug: &str) -> Result<()> {
        self.registry.release(slug).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::slug_registry::MockSlugRegistry;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn registry_with(taken: &[&str]) -> MockSlugRegistry {
        let taken: Arc<Mutex<HashSet<String>>> =
            Arc::new(Mutex::new(taken.iter().map(|s| s.to_string()).collect()));
        let mut registry = MockSlugRegistry::new();
        registry
            .expect_try_reserve()
            .returning(move |slug, _| Ok(taken.lock().unwrap().insert(slug.to_string())));
        registry
    }

    #[tokio::test]
    async fn test_second_allocation_gets_suffix() {
        let allocator = SlugAllocator::new(Arc::new(registry_with(&[])));
        assert_eq!(
            allocator.allocate("Senior Engineer", 0).await.unwrap(),
            "senior-engineer"
        );
        assert_eq!(
            allocator.allocate("Senior Engineer", 0).await.unwrap(),
            "senior-engineer-1"
        );
    }

    #[tokio::test]
    async fn test_first_free_suffix_wins() {
        let allocator = SlugAllocator::new(Arc::new(registry_with(&[
            "driver",
            "driver-1",
            "driver-3",
        ])));
        assert_eq!(allocator.allocate("Driver", 0).await.unwrap(), "driver-2");
        assert_eq!(allocator.allocate("Driver", 0).await.unwrap(), "driver-4");
    }

    #[tokio::test]
    async fn test_blank_title_uses_fallback() {
        let allocator = SlugAllocator::new(Arc::new(registry_with(&[])));
        assert_eq!(allocator.allocate("", 0).await.unwrap(), "listing");
        assert_eq!(allocator.allocate("???", 0).await.unwrap(), "listing-1");
    }

    #[tokio::test]
    async fn test_exhausted_suffixes_error() {
        let allocator = SlugAllocator::new(Arc::new(registry_with(&["ops", "ops-1", "ops-2"])))
            .with_max_suffix(2);
        let err = allocator.allocate("Ops", 0).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
