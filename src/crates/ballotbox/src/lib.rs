//! Token voting server for a single meeting
//!
//! An administrator issues single-use voting tokens as QR-encoded URLs,
//! organizes ballot items under agendas, and opens and closes voting windows.
//! Token holders submit one choice per active item. The SQLite store is the
//! sole owner of persisted state and its `UNIQUE(token, vote_id)` constraint is
//! what keeps a token from voting twice on one item.
//!
//! Layers:
//! - [`db`]: connection pool, migrations, models and repositories
//! - [`services`]: token store, catalog, submission engine, tally, admin gate
//! - [`audit`] and [`credentials`]: CSV vote log and QR/ZIP credential bundles
//! - [`config`]: server configuration and the voter network guard
//! - [`api`]: axum router, handlers and error mapping

pub mod api;
pub mod audit;
pub mod config;
pub mod credentials;
pub mod db;
pub mod services;
pub mod version;

use thiserror::Error;

use crate::db::DatabaseError;

/// Errors produced by the voting services
#[derive(Debug, Error)]
pub enum BallotError {
    /// Input rejected before any state change
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Token does not exist
    #[error("Invalid token")]
    InvalidToken,

    /// Referenced agenda or ballot item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token already has a vote for the item
    #[error("Token already voted on item {vote_id}")]
    DuplicateVote { vote_id: String },

    /// Storage failure; the operation was aborted
    #[error("Storage error: {0}")]
    Storage(DatabaseError),

    /// QR, image or archive encoding failed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BallotError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        BallotError::Validation(message.into())
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        BallotError::NotFound(what.into())
    }
}

impl From<DatabaseError> for BallotError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => BallotError::NotFound(what),
            other => BallotError::Storage(other),
        }
    }
}

impl From<sqlx::Error> for BallotError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::from(err).into()
    }
}

/// Result type for voting operations
pub type Result<T> = std::result::Result<T, BallotError>;

/// Get the crate version
pub fn version() -> &'static str {
    version::VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_row_not_found_becomes_not_found() {
        let err: BallotError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, BallotError::NotFound(_)));
    }

    #[test]
    fn test_other_database_errors_become_storage() {
        let err: BallotError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, BallotError::Storage(_)));
    }

    #[test]
    fn test_error_display() {
        let err = BallotError::DuplicateVote {
            vote_id: "v1".to_string(),
        };
        assert_eq!(err.to_string(), "Token already voted on item v1");
        assert_eq!(
            BallotError::validation("count must be positive").to_string(),
            "Validation failed: count must be positive"
        );
    }
}
