// Job Domain Model
//
// Jobs are owned by the listing platform. This core only knows their
// identity, their slug and the fact that they exist.

use serde::{Deserialize, Serialize};

/// Job ID (UUID v4 in production, injected via IdProvider)
pub type JobId = String;

/// Authenticated user identifier supplied by the request layer
pub type UserId = String;

/// Registered job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub slug: String,
    pub title: String,
    pub created_at: i64, // epoch ms
}

impl JobRecord {
    pub fn new(
        id: impl Into<String>,
        slug: impl Into<String>,
        title: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: title.into(),
            created_at,
        }
    }
}
