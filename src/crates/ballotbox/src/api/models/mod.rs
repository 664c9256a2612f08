//! API data transfer objects
//!
//! Form payloads accepted by the endpoints and the JSON views they return.

pub mod admin;
pub mod voter;

pub use admin::{
    CreateAgendaForm, CreateVoteForm, DashboardView, DeleteTokensForm, DeleteTokensScope,
    GenerateTokensForm, LoginForm, LoginView, SettingsForm, StatusQuery,
};
pub use voter::{BallotAgenda, BallotEntry, BallotView, SubmitVoteForm, VoteQuery};

/// System health response
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// Server name from configuration
    pub name: String,

    /// Server version
    pub version: String,

    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn new(
        status: impl Into<String>,
        database: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            database: database.into(),
            name: name.into(),
            version: crate::version::VERSION.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
