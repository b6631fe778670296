// sqlx::Error -> AppError mapping
//
// Orphan rules keep `From<sqlx::Error> for AppError` out of this crate, so
// every call site goes through `map_sqlx_error`.

use jobpulse_core::error::AppError;

// SQLite primary result codes: https://www.sqlite.org/rescode.html
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_FULL: i32 = 13;
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let code = db_err
                .code()
                .and_then(|c| c.parse::<i32>().ok())
                .unwrap_or(-1);

            match code {
                SQLITE_CONSTRAINT_FOREIGNKEY => {
                    AppError::NotFound(format!("Referenced job does not exist: {}", db_err.message()))
                }
                SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => AppError::Database(
                    format!("Unique constraint violation: {} ({})", db_err.message(), code),
                ),
                c if c & 0xff == SQLITE_BUSY || c & 0xff == SQLITE_LOCKED => {
                    AppError::Unavailable(format!("Database locked: {}", db_err.message()))
                }
                c if c & 0xff == SQLITE_FULL => {
                    AppError::Unavailable(format!("Database full: {}", db_err.message()))
                }
                _ => AppError::Database(format!(
                    "Database error [{}]: {}",
                    code,
                    db_err.message()
                )),
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
            AppError::Unavailable(err.to_string())
        }
        sqlx::Error::Io(_) => AppError::Unavailable(format!("Database I/O: {}", err)),
        sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            AppError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            AppError::Unavailable(_)
        ));
    }

    #[test]
    fn test_row_not_found_is_not_found() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
    }
}
