// SQLite SlugRegistry Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobpulse_core::error::Result;
use jobpulse_core::port::SlugRegistry;
use sqlx::SqlitePool;

pub struct SqliteSlugRegistry {
    pool: SqlitePool,
}

impl SqliteSlugRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlugRegistry for SqliteSlugRegistry {
    async fn try_reserve(&self, slug: &str, now_millis: i64) -> Result<bool> {
        // The primary key decides the race; no read-before-write.
        let result = sqlx::query(
            "INSERT INTO slug_registry (slug, reserved_at) VALUES (?, ?) ON CONFLICT (slug) DO NOTHING",
        )
        .bind(slug)
        .bind(now_millis)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, slug: &str) -> Result<()> {
        sqlx::query("DELETE FROM slug_registry WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn contains(&self, slug: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM slug_registry WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count > 0)
    }
}
