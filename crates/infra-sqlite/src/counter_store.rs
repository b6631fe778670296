// SQLite CounterStore Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobpulse_core::domain::{CounterName, EngagementCounters};
use jobpulse_core::error::{AppError, Result};
use jobpulse_core::port::CounterStore;
use sqlx::{SqliteConnection, SqlitePool};

pub struct SqliteCounterStore {
    pool: SqlitePool,
}

impl SqliteCounterStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Clamped delta as one UPDATE ... RETURNING: the row write lock makes the
/// read-modify-write atomic. Shared with the bookmark toggle transaction.
pub(crate) async fn adjust_on(
    conn: &mut SqliteConnection,
    job_id: &str,
    counter: CounterName,
    delta: i64,
) -> Result<i64> {
    let column = counter.column();
    let sql = format!(
        "UPDATE job_counters SET {column} = MAX({column} + ?, 0) WHERE job_id = ? RETURNING {column}"
    );

    let value: Option<i64> = sqlx::query_scalar(&sql)
        .bind(delta)
        .bind(job_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    value.ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))
}

#[async_trait]
impl CounterStore for SqliteCounterStore {
    async fn adjust(&self, job_id: &str, counter: CounterName, delta: i64) -> Result<i64> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        adjust_on(&mut conn, job_id, counter, delta).await
    }

    async fn set(&self, job_id: &str, counter: CounterName, value: i64) -> Result<i64> {
        let column = counter.column();
        let sql = format!(
            "UPDATE job_counters SET {column} = MAX(?, 0) WHERE job_id = ? RETURNING {column}"
        );

        let stored: Option<i64> = sqlx::query_scalar(&sql)
            .bind(value)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        stored.ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))
    }

    async fn get(&self, job_id: &str) -> Result<EngagementCounters> {
        let row = sqlx::query_as::<_, CountersRow>(
            r#"
            SELECT view_count, click_count, impression_count, apply_count, bookmark_count
            FROM job_counters
            WHERE job_id = ?
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(CountersRow::into_counters)
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CountersRow {
    view_count: i64,
    click_count: i64,
    impression_count: i64,
    apply_count: i64,
    bookmark_count: i64,
}

impl CountersRow {
    fn into_counters(self) -> EngagementCounters {
        EngagementCounters {
            view_count: self.view_count,
            click_count: self.click_count,
            impression_count: self.impression_count,
            apply_count: self.apply_count,
            bookmark_count: self.bookmark_count,
        }
    }
}
