// Engagement Domain Model (counters, event kinds, dedup keys)

use super::error::DomainError;
use super::job::JobId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the five per-job counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterName {
    Views,
    Clicks,
    Impressions,
    Applications,
    Bookmarks,
}

impl CounterName {
    pub const ALL: [CounterName; 5] = [
        CounterName::Views,
        CounterName::Clicks,
        CounterName::Impressions,
        CounterName::Applications,
        CounterName::Bookmarks,
    ];

    /// Storage column name. Static so adapters can splice it into SQL safely.
    pub fn column(&self) -> &'static str {
        match self {
            CounterName::Views => "view_count",
            CounterName::Clicks => "click_count",
            CounterName::Impressions => "impression_count",
            CounterName::Applications => "apply_count",
            CounterName::Bookmarks => "bookmark_count",
        }
    }

    /// Dense index, used by in-memory adapters for fixed-size counter arrays
    pub fn index(&self) -> usize {
        match self {
            CounterName::Views => 0,
            CounterName::Clicks => 1,
            CounterName::Impressions => 2,
            CounterName::Applications => 3,
            CounterName::Bookmarks => 4,
        }
    }
}

impl std::fmt::Display for CounterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for CounterName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CounterName::ALL
            .into_iter()
            .find(|c| c.column() == s)
            .ok_or_else(|| DomainError::UnknownCounter(s.to_string()))
    }
}

/// Deduplicated event kinds.
///
/// Bookmarks and applications are not window-deduplicated: they have their
/// own record-backed semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Impression,
    Click,
    View,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Impression => "impression",
            EventKind::Click => "click",
            EventKind::View => "view",
        }
    }

    /// Counter bumped when an event of this kind is accepted
    pub fn counter(&self) -> CounterName {
        match self {
            EventKind::Impression => CounterName::Impressions,
            EventKind::Click => CounterName::Clicks,
            EventKind::View => CounterName::Views,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "impression" => Ok(EventKind::Impression),
            "click" => Ok(EventKind::Click),
            "view" => Ok(EventKind::View),
            other => Err(DomainError::UnknownEventKind(other.to_string())),
        }
    }
}

/// (job, kind, source identity). Source is an IP for anonymous events and a
/// session/user identity for views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey {
    pub job_id: JobId,
    pub kind: EventKind,
    pub source: String,
}

impl DedupKey {
    pub fn new(job_id: impl Into<String>, kind: EventKind, source: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            kind,
            source: source.into(),
        }
    }
}

/// Snapshot of all counters of one job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounters {
    pub view_count: i64,
    pub click_count: i64,
    pub impression_count: i64,
    pub apply_count: i64,
    pub bookmark_count: i64,
}

impl EngagementCounters {
    pub fn get(&self, counter: CounterName) -> i64 {
        match counter {
            CounterName::Views => self.view_count,
            CounterName::Clicks => self.click_count,
            CounterName::Impressions => self.impression_count,
            CounterName::Applications => self.apply_count,
            CounterName::Bookmarks => self.bookmark_count,
        }
    }

    pub fn with(mut self, counter: CounterName, value: i64) -> Self {
        let slot = match counter {
            CounterName::Views => &mut self.view_count,
            CounterName::Clicks => &mut self.click_count,
            CounterName::Impressions => &mut self.impression_count,
            CounterName::Applications => &mut self.apply_count,
            CounterName::Bookmarks => &mut self.bookmark_count,
        };
        *slot = value;
        self
    }
}
