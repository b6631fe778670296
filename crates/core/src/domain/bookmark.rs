// Bookmark Domain Model

use super::job::{JobId, UserId};
use serde::{Deserialize, Serialize};

/// One row per (job, user). `active` alone decides whether it counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub job_id: JobId,
    pub user_id: UserId,
    pub active: bool,
    pub created_at: i64, // epoch ms, first bookmark
    pub updated_at: i64, // epoch ms, last toggle
}

impl BookmarkRecord {
    pub fn new(job_id: impl Into<String>, user_id: impl Into<String>, now_millis: i64) -> Self {
        Self {
            job_id: job_id.into(),
            user_id: user_id.into(),
            active: true,
            created_at: now_millis,
            updated_at: now_millis,
        }
    }

    /// Flip the active flag and return the counter delta it implies
    pub fn toggle(&mut self, now_millis: i64) -> i64 {
        self.active = !self.active;
        self.updated_at = now_millis;
        if self.active {
            1
        } else {
            -1
        }
    }
}

/// Result of a bookmark toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkToggle {
    pub added: bool,
    pub bookmark_count: i64,
}
