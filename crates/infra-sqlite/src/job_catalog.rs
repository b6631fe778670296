// SQLite JobCatalog Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobpulse_core::domain::JobRecord;
use jobpulse_core::error::Result;
use jobpulse_core::port::JobCatalog;
use sqlx::SqlitePool;

pub struct SqliteJobCatalog {
    pool: SqlitePool,
}

impl SqliteJobCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobCatalog for SqliteJobCatalog {
    async fn create(&self, job: &JobRecord) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO jobs (id, slug, title, created_at) VALUES (?, ?, ?, ?)")
            .bind(&job.id)
            .bind(&job.slug)
            .bind(&job.title)
            .bind(job.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO job_counters (job_id) VALUES (?)")
            .bind(&job.id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn find(&self, job_id: &str) -> Result<Option<JobRecord>> {
        let row = sqlx::query_as::<_, JobRow>(
            "SELECT id, slug, title, created_at FROM jobs WHERE id = ?",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(JobRow::into_record))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<JobRecord>> {
        let row = sqlx::query_as::<_, JobRow>(
            "SELECT id, slug, title, created_at FROM jobs WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(JobRow::into_record))
    }

    async fn delete(&self, job_id: &str) -> Result<bool> {
        // Counters, dedup entries, bookmarks and applications go with the
        // job through ON DELETE CASCADE; the slug is freed in the same tx.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let slug: Option<String> = sqlx::query_scalar("DELETE FROM jobs WHERE id = ? RETURNING slug")
            .bind(job_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let Some(slug) = slug else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM slug_registry WHERE slug = ?")
            .bind(&slug)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(true)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: String,
    slug: String,
    title: String,
    created_at: i64,
}

impl JobRow {
    fn into_record(self) -> JobRecord {
        JobRecord {
            id: self.id,
            slug: self.slug,
            title: self.title,
            created_at: self.created_at,
        }
    }
}
