// SQLite Connection Pool Setup

use jobpulse_core::error::AppError;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

/// Create SQLite connection pool with WAL mode, foreign keys and a busy timeout.
///
/// WAL with `synchronous = NORMAL` keeps each counter commit off the fsync path.
///
/// Foreign keys are set on the connect options so every pooled connection
/// enforces the cascades, not just the first one.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
        .map_err(|e| AppError::Unavailable(e.to_string()))?;

    Ok(pool)
}
