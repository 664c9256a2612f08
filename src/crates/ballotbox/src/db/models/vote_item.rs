//! Ballot item model
//!
//! Option labels are stored as one comma-joined TEXT column. Parsing is the
//! only place labels are normalized, so stored values never contain commas,
//! blanks or duplicates.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Separator used when storing option labels
pub const OPTION_SEPARATOR: char = ',';

/// A single question put to the vote, belonging to one agenda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VoteItem {
    /// Item identifier (UUID v4)
    pub vote_id: String,

    /// Owning agenda
    pub agenda_id: String,

    /// Question shown on the ballot
    pub title: String,

    /// Comma-joined option labels, in display order
    pub options: String,

    /// Whether the item currently accepts votes
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: String,
}

impl VoteItem {
    /// Build a new inactive item from already-normalized option labels
    pub fn new(agenda_id: impl Into<String>, title: impl Into<String>, labels: &[String]) -> Self {
        Self {
            vote_id: Uuid::new_v4().to_string(),
            agenda_id: agenda_id.into(),
            title: title.into(),
            options: join_options(labels),
            is_active: false,
            created_at: super::timestamp_now(),
        }
    }

    /// Option labels in display order
    pub fn option_labels(&self) -> Vec<String> {
        self.options
            .split(OPTION_SEPARATOR)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether `choice` is one of this item's options
    pub fn has_option(&self, choice: &str) -> bool {
        self.options
            .split(OPTION_SEPARATOR)
            .any(|label| !label.is_empty() && label == choice)
    }
}

/// Normalize free-form option input
///
/// Splits on commas and newlines, trims each label, drops blanks and keeps
/// only the first occurrence of a repeated label.
pub fn parse_options(raw: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in raw.split(|c| c == OPTION_SEPARATOR || c == '\n' || c == '\r') {
        let label = label.trim();
        if label.is_empty() || labels.iter().any(|seen| seen == label) {
            continue;
        }
        labels.push(label.to_string());
    }
    labels
}

/// Join normalized labels into the stored representation
pub fn join_options(labels: &[String]) -> String {
    labels.join(",")
}
