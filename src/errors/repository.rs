use sqlx::Error as SqlxError;
use thiserror::Error;

/// PostgreSQL SQLSTATE codes mapped to domain errors
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(SqlxError),

    /// Resource not found in the tenant scope
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Unique constraint violation, e.g. a short name written concurrently
    #[error("Conflict error: {0}")]
    Conflict(String),

    /// Stored data that cannot be mapped or violates constraints
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => Self::NotFound("Resource not found".to_string()),
            SqlxError::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned());
                match code.as_deref() {
                    Some(UNIQUE_VIOLATION) => Self::Conflict(
                        db_err
                            .constraint()
                            .map(|c| format!("Resource violates unique constraint '{}'", c))
                            .unwrap_or_else(|| "Resource already exists".to_string()),
                    ),
                    Some(CHECK_VIOLATION) => {
                        Self::InvalidData("Data violates constraints".to_string())
                    }
                    _ => Self::Database(SqlxError::Database(db_err)),
                }
            }
            SqlxError::ColumnDecode { index, source } => {
                Self::InvalidData(format!("Could not decode column {}: {}", index, source))
            }
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = RepositoryError::from(SqlxError::RowNotFound);
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[test]
    fn test_other_errors_map_to_database() {
        let err = RepositoryError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
