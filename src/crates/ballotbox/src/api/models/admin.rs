//! Admin forms and views

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::flash::Flash;
use crate::api::middleware::validation::{validate_not_empty, validate_string_length};
use crate::services::Dashboard;

/// Maximum length of agenda and ballot item titles
pub const MAX_TITLE_LENGTH: usize = 200;

/// POST /login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

/// GET /login
#[derive(Debug, Clone, Serialize)]
pub struct LoginView {
    pub authenticated: bool,
    pub flash: Option<Flash>,
}

/// POST /admin/generate_tokens
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateTokensForm {
    #[serde(default)]
    pub count: String,
}

/// POST /admin/create_agenda
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgendaForm {
    #[serde(default)]
    pub agenda_title: String,
}

impl CreateAgendaForm {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.agenda_title, "Agenda title")?;
        validate_string_length(self.agenda_title.trim(), "Agenda title", 1, MAX_TITLE_LENGTH)
    }
}

/// POST /admin/create_vote
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVoteForm {
    #[serde(default)]
    pub agenda_id: String,
    #[serde(default)]
    pub title: String,
    /// Option labels separated by commas or newlines
    #[serde(default)]
    pub options: String,
}

impl CreateVoteForm {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.agenda_id, "Agenda")?;
        validate_not_empty(&self.title, "Vote title")?;
        validate_string_length(self.title.trim(), "Vote title", 1, MAX_TITLE_LENGTH)?;
        validate_not_empty(&self.options, "Options")
    }
}

/// Which tokens POST /admin/delete_tokens removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteTokensScope {
    /// Only tokens that never voted
    #[default]
    Unused,
    /// Every token
    All,
}

/// POST /admin/delete_tokens
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteTokensForm {
    #[serde(default)]
    pub scope: DeleteTokensScope,
}

/// POST /admin/settings
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub meeting_title: String,
}

/// GET /admin/status
#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    pub vote_id: Option<String>,
    /// Number of recent records to include
    pub limit: Option<i64>,
}

/// GET /admin
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    /// Base URL printed into credential QR codes
    pub base_url: String,
    pub max_batch_size: u32,
    pub flash: Option<Flash>,
}
