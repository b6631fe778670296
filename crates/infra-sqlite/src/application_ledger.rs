// SQLite ApplicationLedger Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobpulse_core::domain::{ApplicationId, JobId};
use jobpulse_core::error::Result;
use jobpulse_core::port::ApplicationLedger;
use sqlx::SqlitePool;

pub struct SqliteApplicationLedger {
    pool: SqlitePool,
}

impl SqliteApplicationLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationLedger for SqliteApplicationLedger {
    async fn submit(
        &self,
        id: &str,
        job_id: &str,
        user_id: &str,
        now_millis: i64,
    ) -> Result<ApplicationId> {
        sqlx::query(
            "INSERT INTO job_applications (id, job_id, user_id, is_active, created_at) VALUES (?, ?, ?, 1, ?)",
        )
        .bind(id)
        .bind(job_id)
        .bind(user_id)
        .bind(now_millis)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(id.to_string())
    }

    async fn withdraw(&self, id: &str) -> Result<Option<JobId>> {
        sqlx::query_scalar(
            "UPDATE job_applications SET is_active = 0 WHERE id = ? AND is_active = 1 RETURNING job_id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn count_active(&self, job_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM job_applications WHERE job_id = ? AND is_active = 1",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count)
    }
}
