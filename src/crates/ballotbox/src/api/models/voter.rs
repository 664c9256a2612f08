//! Voter query, form and ballot view

use serde::{Deserialize, Serialize};

/// Prefix of the form fields carrying one choice each
pub const CHOICE_FIELD_PREFIX: &str = "choice_";

/// GET /vote
#[derive(Debug, Clone, Deserialize)]
pub struct VoteQuery {
    pub token: Option<String>,
}

/// POST /submit_vote
///
/// Sent as `token=...&choice_<vote_id>=<label>&...`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitVoteForm {
    pub token: Option<String>,
    /// `(vote_id, choice)` in form order
    pub choices: Vec<(String, String)>,
}

impl SubmitVoteForm {
    /// Build from raw urlencoded fields; unrelated fields are ignored
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        let mut form = SubmitVoteForm::default();
        for (name, value) in fields {
            if name == "token" {
                form.token = Some(value.trim().to_string()).filter(|t| !t.is_empty());
            } else if let Some(vote_id) = name.strip_prefix(CHOICE_FIELD_PREFIX) {
                if !vote_id.is_empty() {
                    form.choices.push((vote_id.to_string(), value));
                }
            }
        }
        form
    }
}

/// One ballot item as shown to a voter
#[derive(Debug, Clone, Serialize)]
pub struct BallotEntry {
    pub vote_id: String,
    pub title: String,
    pub options: Vec<String>,
    /// The token already has a recorded choice for this item
    pub already_voted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BallotAgenda {
    pub agenda_id: String,
    pub title: String,
    pub items: Vec<BallotEntry>,
}

/// GET /vote
#[derive(Debug, Clone, Serialize)]
pub struct BallotView {
    pub meeting_title: Option<String>,
    pub token: String,
    pub agendas: Vec<BallotAgenda>,
}
