// Job Application Domain Model
//
// Application rows belong to the request layer's workflow; the engine only
// counts the active ones.

use super::job::{JobId, UserId};
use serde::{Deserialize, Serialize};

/// Application ID (UUID v4 in production)
pub type ApplicationId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub user_id: UserId,
    pub active: bool,
    pub created_at: i64, // epoch ms
}
