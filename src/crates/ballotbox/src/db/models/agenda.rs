//! Agenda model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named group of ballot items voted on in one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Agenda {
    pub agenda_id: String,
    pub title: String,
    pub created_at: String,
}

impl Agenda {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            agenda_id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: super::timestamp_now(),
        }
    }
}
