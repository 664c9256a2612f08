//! Recorded vote model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One accepted choice for one ballot item by one token
///
/// At most one row exists per (token, vote_id); the table's UNIQUE constraint
/// enforces this under concurrent submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VoteRecord {
    /// Row id (autoincrement)
    pub id: i64,

    /// Ballot item the choice belongs to
    pub vote_id: String,

    /// Token that cast the choice
    pub token: String,

    /// Chosen option label
    pub choice: String,

    /// Time the vote was recorded
    pub timestamp: String,
}
