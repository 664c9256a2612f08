//! Database models
//!
//! Row types for the voting store. Timestamps are fixed-width RFC 3339 UTC
//! strings (TEXT in SQLite) so that ORDER BY on them is chronological.

pub mod agenda;
pub mod setting;
pub mod token;
pub mod vote_item;
pub mod vote_record;

pub use agenda::Agenda;
pub use setting::Setting;
pub use token::Token;
pub use vote_item::VoteItem;
pub use vote_record::VoteRecord;

use chrono::{SecondsFormat, Utc};

/// Current time in the storage timestamp format
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
