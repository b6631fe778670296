// Dedup window policy
use crate::domain::EventKind;
use crate::error::{AppError, Result};
use std::time::Duration;

/// Impressions from one IP count once per 30 minutes
pub const DEFAULT_IMPRESSION_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Clicks from one IP count once per 30 minutes
pub const DEFAULT_CLICK_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Views from one session count once per 75 minutes
pub const DEFAULT_VIEW_WINDOW: Duration = Duration::from_secs(75 * 60);

/// Per-kind dedup windows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementPolicy {
    pub impression_window: Duration,
    pub click_window: Duration,
    pub view_window: Duration,
}

impl Default for EngagementPolicy {
    fn default() -> Self {
        Self {
            impression_window: DEFAULT_IMPRESSION_WINDOW,
            click_window: DEFAULT_CLICK_WINDOW,
            view_window: DEFAULT_VIEW_WINDOW,
        }
    }
}

impl EngagementPolicy {
    pub fn window_for(&self, kind: EventKind) -> Duration {
        match kind {
            EventKind::Impression => self.impression_window,
            EventKind::Click => self.click_window,
            EventKind::View => self.view_window,
        }
    }

    /// Retention floor for dedup eviction
    pub fn largest_window(&self) -> Duration {
        self.impression_window
            .max(self.click_window)
            .max(self.view_window)
    }

    /// Window of `kind` in the milliseconds the dedup stores compare with
    pub fn window_millis(&self, kind: EventKind) -> Result<i64> {
        to_millis(self.window_for(kind))
            .ok_or_else(|| AppError::Config(format!("{} window is too large", kind)))
    }

    pub fn largest_window_millis(&self) -> Result<i64> {
        to_millis(self.largest_window())
            .ok_or_else(|| AppError::Config("dedup window is too large".to_string()))
    }

    /// Reject zero windows (they would disable dedup silently) and windows
    /// that do not fit in `i64` milliseconds
    pub fn validate(&self) -> Result<()> {
        for kind in [EventKind::Impression, EventKind::Click, EventKind::View] {
            if self.window_for(kind).is_zero() {
                return Err(AppError::Config(format!("{} window must be positive", kind)));
            }
            self.window_millis(kind)?;
        }
        Ok(())
    }
}

fn to_millis(window: Duration) -> Option<i64> {
    i64::try_from(window.as_millis()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = EngagementPolicy::default();
        assert_eq!(policy.window_for(EventKind::Impression), Duration::from_secs(1800));
        assert_eq!(policy.window_for(EventKind::Click), Duration::from_secs(1800));
        assert_eq!(policy.window_for(EventKind::View), Duration::from_secs(4500));
        assert_eq!(policy.largest_window(), Duration::from_secs(4500));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let policy = EngagementPolicy {
            click_window: Duration::ZERO,
            ..Default::default()
        };
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("click"));
    }

    #[test]
    fn test_window_millis() {
        let policy = EngagementPolicy::default();
        assert_eq!(policy.window_millis(EventKind::View).unwrap(), 75 * 60 * 1000);
        assert_eq!(policy.largest_window_millis().unwrap(), 75 * 60 * 1000);
    }

    #[test]
    fn test_oversized_window_rejected() {
        let policy = EngagementPolicy {
            view_window: Duration::MAX,
            ..Default::default()
        };
        assert!(matches!(
            policy.window_millis(EventKind::View),
            Err(AppError::Config(_))
        ));
        assert!(matches!(policy.largest_window_millis(), Err(AppError::Config(_))));
        assert!(policy.validate().unwrap_err().to_string().contains("view"));
    }
}
