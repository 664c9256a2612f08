//! Database error types and handling
//!
//! Wraps sqlx errors into a small taxonomy the services can branch on. Unique
//! constraint collisions get their own variant because the ballot engine
//! treats them as duplicate votes rather than failures.

use thiserror::Error;

/// Custom database error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// UNIQUE constraint collision
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Other constraint violation (foreign key, not null, check)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Data type mismatch or conversion error
    #[error("Data type error: {0}")]
    TypeError(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationError(String),

    /// Pool error
    #[error("Connection pool error: {0}")]
    PoolError(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(String),
}

impl DatabaseError {
    /// Create a new NotFound error with context
    pub fn not_found(context: impl Into<String>) -> Self {
        DatabaseError::NotFound(context.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Check if this is a UNIQUE constraint collision
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation(_))
    }

    /// Check if this is any constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::UniqueViolation(_) | DatabaseError::ConstraintViolation(_)
        )
    }
}

/// Result type for database operations
pub type DbResult<T> = std::result::Result<T, DatabaseError>;

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                DatabaseError::NotFound("No matching row found in database".to_string())
            }
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    DatabaseError::UniqueViolation(db_err.message().to_string())
                } else if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                    DatabaseError::ConstraintViolation(db_err.message().to_string())
                } else {
                    DatabaseError::Other(db_err.message().to_string())
                }
            }
            sqlx::Error::ColumnNotFound(col) => {
                DatabaseError::TypeError(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DatabaseError::TypeError(format!("Error decoding column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                DatabaseError::TypeError(format!("Decode error: {}", source))
            }
            sqlx::Error::Configuration(msg) => {
                DatabaseError::ConnectionError(format!("Configuration error: {}", msg))
            }
            sqlx::Error::Io(err) => DatabaseError::ConnectionError(format!("IO error: {}", err)),
            sqlx::Error::PoolTimedOut => {
                DatabaseError::PoolError("Connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => {
                DatabaseError::PoolError("Connection pool is closed".to_string())
            }
            sqlx::Error::Migrate(err) => DatabaseError::MigrationError(err.to_string()),
            err => DatabaseError::Other(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = DatabaseError::not_found("vote_id=123");
        assert!(err.is_not_found());
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_unique_violation_is_a_constraint_violation() {
        let err = DatabaseError::UniqueViolation("UNIQUE constraint failed".to_string());
        assert!(err.is_unique_violation());
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_foreign_key_is_not_unique() {
        let err = DatabaseError::ConstraintViolation("FOREIGN KEY constraint failed".into());
        assert!(err.is_constraint_violation());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_sqlx_row_not_found_conversion() {
        let db_err: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(db_err.is_not_found());
    }

    #[test]
    fn test_pool_closed_conversion() {
        let db_err: DatabaseError = sqlx::Error::PoolClosed.into();
        assert!(matches!(db_err, DatabaseError::PoolError(_)));
    }
}
