// SQLite BookmarkStore Implementation

use crate::counter_store::adjust_on;
use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobpulse_core::domain::{BookmarkRecord, BookmarkToggle, CounterName};
use jobpulse_core::error::Result;
use jobpulse_core::port::BookmarkStore;
use sqlx::SqlitePool;

pub struct SqliteBookmarkStore {
    pool: SqlitePool,
}

impl SqliteBookmarkStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookmarkStore for SqliteBookmarkStore {
    async fn toggle(&self, job_id: &str, user_id: &str, now_millis: i64) -> Result<BookmarkToggle> {
        // The first statement is a write, so the transaction takes the write
        // lock up front and never has to upgrade from a read snapshot.
        // Dropping `tx` (error or cancellation) rolls both steps back.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let active: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookmarks (job_id, user_id, is_active, created_at, updated_at)
            VALUES (?, ?, 1, ?, ?)
            ON CONFLICT (job_id, user_id) DO UPDATE
            SET is_active = 1 - bookmarks.is_active,
                updated_at = excluded.updated_at
            RETURNING is_active
            "#,
        )
        .bind(job_id)
        .bind(user_id)
        .bind(now_millis)
        .bind(now_millis)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let added = active != 0;
        let delta = if added { 1 } else { -1 };
        let bookmark_count = adjust_on(&mut tx, job_id, CounterName::Bookmarks, delta).await?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(BookmarkToggle {
            added,
            bookmark_count,
        })
    }

    async fn is_bookmarked(&self, job_id: &str, user_id: &str) -> Result<bool> {
        let active: Option<i64> =
            sqlx::query_scalar("SELECT is_active FROM bookmarks WHERE job_id = ? AND user_id = ?")
                .bind(job_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(active.unwrap_or(0) != 0)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<BookmarkRecord>> {
        let rows: Vec<BookmarkRow> = sqlx::query_as(
            r#"
            SELECT job_id, user_id, is_active, created_at, updated_at
            FROM bookmarks
            WHERE user_id = ? AND is_active = 1
            ORDER BY created_at DESC, job_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BookmarkRow::into_record).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookmarkRow {
    job_id: String,
    user_id: String,
    is_active: i64, // SQLite boolean as integer
    created_at: i64,
    updated_at: i64,
}

impl BookmarkRow {
    fn into_record(self) -> BookmarkRecord {
        BookmarkRecord {
            job_id: self.job_id,
            user_id: self.user_id,
            active: self.is_active != 0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
