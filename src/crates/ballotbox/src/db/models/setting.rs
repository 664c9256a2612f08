//! Key/value setting model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Key of the meeting title shown on the dashboard and ballots
pub const MEETING_TITLE: &str = "meeting.title";

/// An overwrite-by-key setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
    /// Last write timestamp
    pub updated_at: String,
}
