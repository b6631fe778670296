// SQLite DedupWindowStore Implementation

use crate::counter_store::adjust_on;
use crate::error::map_sqlx_error;
use async_trait::async_trait;
use jobpulse_core::domain::DedupKey;
use jobpulse_core::error::Result;
use jobpulse_core::port::DedupWindowStore;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

pub struct SqliteDedupStore {
    pool: SqlitePool,
}

impl SqliteDedupStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// One UPSERT: insert when absent, overwrite only when the stored timestamp
/// is older than the window. A suppressed event matches no row, so
/// rows_affected doubles as the decision.
async fn accept_on(
    conn: &mut SqliteConnection,
    key: &DedupKey,
    now_millis: i64,
    window_millis: i64,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO dedup_windows (job_id, kind, source, last_accepted_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (job_id, kind, source) DO UPDATE
        SET last_accepted_at = excluded.last_accepted_at
        WHERE excluded.last_accepted_at - dedup_windows.last_accepted_at > ?
        "#,
    )
    .bind(&key.job_id)
    .bind(key.kind.as_str())
    .bind(&key.source)
    .bind(now_millis)
    .bind(window_millis)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(result.rows_affected() == 1)
}

#[async_trait]
impl DedupWindowStore for SqliteDedupStore {
    async fn should_accept(
        &self,
        key: &DedupKey,
        now_millis: i64,
        window_millis: i64,
    ) -> Result<bool> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        accept_on(&mut conn, key, now_millis, window_millis).await
    }

    async fn accept_and_count(
        &self,
        key: &DedupKey,
        now_millis: i64,
        window_millis: i64,
    ) -> Result<Option<i64>> {
        // Same shape as the bookmark toggle: write first, counter second,
        // and any failure drops `tx` so the timestamp is never kept alone.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        if !accept_on(&mut tx, key, now_millis, window_millis).await? {
            return Ok(None);
        }
        let count = adjust_on(&mut tx, &key.job_id, key.kind.counter(), 1).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(Some(count))
    }

    async fn evict_older_than(&self, cutoff_millis: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM dedup_windows WHERE last_accepted_at < ?")
            .bind(cutoff_millis)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!(evicted = result.rows_affected(), cutoff_millis, "Dedup entries evicted");
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_job, setup_test_db};
    use jobpulse_core::domain::EventKind;
    use jobpulse_core::error::AppError;

    const WINDOW: i64 = 30 * 60 * 1000;

    #[tokio::test]
    async fn test_first_event_accepted_repeat_suppressed() {
        let pool = setup_test_db().await;
        insert_job(&pool, "job-1").await;
        let store = SqliteDedupStore::new(pool);
        let key = DedupKey::new("job-1", EventKind::Click, "1.2.3.4");

        assert!(store.should_accept(&key, 0, WINDOW).await.unwrap());
        assert!(!store.should_accept(&key, 10 * 60 * 1000, WINDOW).await.unwrap());
        // Exactly one window later is still inside: age must exceed the window
        assert!(!store.should_accept(&key, WINDOW, WINDOW).await.unwrap());
        assert!(store.should_accept(&key, WINDOW + 1, WINDOW).await.unwrap());
    }

    #[tokio::test]
    async fn test_suppressed_event_does_not_extend_window() {
        let pool = setup_test_db().await;
        insert_job(&pool, "job-1").await;
        let store = SqliteDedupStore::new(pool);
        let key = DedupKey::new("job-1", EventKind::Impression, "1.2.3.4");

        assert!(store.should_accept(&key, 0, WINDOW).await.unwrap());
        assert!(!store.should_accept(&key, WINDOW - 1, WINDOW).await.unwrap());
        // Measured from t=0, not from the suppressed attempt
        assert!(store.should_accept(&key, WINDOW + 1, WINDOW).await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let pool = setup_test_db().await;
        insert_job(&pool, "job-1").await;
        insert_job(&pool, "job-2").await;
        let store = SqliteDedupStore::new(pool);

        assert!(store
            .should_accept(&DedupKey::new("job-1", EventKind::Click, "a"), 0, WINDOW)
            .await
            .unwrap());
        assert!(store
            .should_accept(&DedupKey::new("job-1", EventKind::Click, "b"), 0, WINDOW)
            .await
            .unwrap());
        assert!(store
            .should_accept(&DedupKey::new("job-1", EventKind::Impression, "a"), 0, WINDOW)
            .await
            .unwrap());
        assert!(store
            .should_accept(&DedupKey::new("job-2", EventKind::Click, "a"), 0, WINDOW)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_eviction_matches_expiry() {
        let pool = setup_test_db().await;
        insert_job(&pool, "job-1").await;
        let store = SqliteDedupStore::new(pool);
        let key = DedupKey::new("job-1", EventKind::View, "session");

        assert!(store.should_accept(&key, 0, WINDOW).await.unwrap());
        assert_eq!(store.evict_older_than(1).await.unwrap(), 1);
        assert!(store.should_accept(&key, WINDOW + 1, WINDOW).await.unwrap());
        assert_eq!(store.evict_older_than(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_accept_and_count_bumps_counter_once_per_window() {
        let pool = setup_test_db().await;
        insert_job(&pool, "job-1").await;
        let store = SqliteDedupStore::new(pool.clone());
        let key = DedupKey::new("job-1", EventKind::Click, "1.2.3.4");

        assert_eq!(store.accept_and_count(&key, 0, WINDOW).await.unwrap(), Some(1));
        assert_eq!(store.accept_and_count(&key, 1_000, WINDOW).await.unwrap(), None);
        assert_eq!(
            store.accept_and_count(&key, WINDOW + 1, WINDOW).await.unwrap(),
            Some(2)
        );

        let clicks: i64 =
            sqlx::query_scalar("SELECT click_count FROM job_counters WHERE job_id = 'job-1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(clicks, 2);
    }

    #[tokio::test]
    async fn test_failed_count_keeps_window_open() {
        let pool = setup_test_db().await;
        insert_job(&pool, "job-1").await;
        let store = SqliteDedupStore::new(pool.clone());
        let key = DedupKey::new("job-1", EventKind::Click, "1.2.3.4");

        // Counter update fails after the dedup UPSERT has run
        sqlx::query("DELETE FROM job_counters WHERE job_id = 'job-1'")
            .execute(&pool)
            .await
            .unwrap();
        assert!(store.accept_and_count(&key, 0, WINDOW).await.is_err());

        let entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dedup_windows")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(entries, 0);

        sqlx::query("INSERT INTO job_counters (job_id) VALUES ('job-1')")
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(store.accept_and_count(&key, 1_000, WINDOW).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let pool = setup_test_db().await;
        let store = SqliteDedupStore::new(pool);
        let key = DedupKey::new("missing", EventKind::Click, "1.2.3.4");

        assert!(matches!(
            store.should_accept(&key, 0, WINDOW).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_accept_once() {
        // File-backed so the pool's connections contend for real.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dedup.db");
        let pool = crate::create_pool(path.to_str().unwrap()).await.unwrap();
        crate::run_migrations(&pool).await.unwrap();
        insert_job(&pool, "job-1").await;

        let store = std::sync::Arc::new(SqliteDedupStore::new(pool));
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..32 {
            let store = store.clone();
            tasks.spawn(async move {
                let key = DedupKey::new("job-1", EventKind::Impression, "1.2.3.4");
                store.should_accept(&key, 5, WINDOW).await.unwrap()
            });
        }

        let mut accepted = 0;
        while let Some(res) = tasks.join_next().await {
            if res.unwrap() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
    }
}
