//! Admin console handlers
//!
//! Views return JSON. Form endpoints redirect back to the dashboard with a
//! flash message; only storage and encoding failures escape as error
//! responses.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::Local;

use crate::api::{
    error::{ApiError, ApiResult},
    flash::{self, Flash},
    middleware::validation::{parse_count, validate_uuid},
    models::{
        CreateAgendaForm, CreateVoteForm, DashboardView, DeleteTokensForm, DeleteTokensScope,
        GenerateTokensForm, SettingsForm, StatusQuery,
    },
    response,
    routes::AppState,
};
use crate::config::ServerConfig;
use crate::credentials;
use crate::BallotError;

const DASHBOARD: &str = "/admin";
const DEFAULT_RECENT_LIMIT: i64 = 20;
const MAX_RECENT_LIMIT: i64 = 200;

/// Base URL for credential links
///
/// The configured `BASE_URL` wins; otherwise the scheme comes from
/// `X-Forwarded-Proto` (default `http`) and the authority from `Host`.
pub fn request_base_url(config: &ServerConfig, headers: &HeaderMap) -> String {
    if let Some(base_url) = config.base_url() {
        return base_url.to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", config.server.port));

    format!("{}://{}", scheme, host)
}

fn redirect_with(jar: SignedCookieJar, to: &str, flash: Flash) -> (SignedCookieJar, Redirect) {
    (flash::push(jar, flash), response::see_other(to))
}

/// Turn a service outcome into a flash redirect
///
/// Client-side failures become error flashes; anything else propagates.
fn conclude<T>(
    jar: SignedCookieJar,
    result: crate::Result<T>,
    on_success: impl FnOnce(T) -> String,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    let flash = match result {
        Ok(value) => Flash::success(on_success(value)),
        Err(err @ (BallotError::Validation(_) | BallotError::NotFound(_))) => {
            Flash::error(err.to_string())
        }
        Err(err) => return Err(err.into()),
    };
    Ok(redirect_with(jar, DASHBOARD, flash))
}

/// Unknown path under `/admin` for a logged-in admin
pub async fn admin_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("No admin page at {}", uri.path()))
}

/// Admin dashboard
///
/// GET /admin
pub async fn dashboard(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: SignedCookieJar,
) -> ApiResult<impl IntoResponse> {
    let (jar, flash) = flash::take(jar);
    let dashboard = app_state.tally.dashboard().await?;

    Ok((
        jar,
        response::ok(DashboardView {
            dashboard,
            base_url: request_base_url(&app_state.config, &headers),
            max_batch_size: app_state.tokens.max_batch_size(),
            flash,
        }),
    ))
}

/// Tally and recent records of one item
///
/// GET /admin/status?vote_id=
pub async fn item_status(
    State(app_state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<impl IntoResponse> {
    let vote_id = query
        .vote_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::ValidationError("Vote ID is required".to_string()))?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);

    let status = app_state.tally.item_status(vote_id.trim(), limit).await?;
    Ok(response::ok(status))
}

/// Issue a token batch and download it as QR codes
///
/// POST /admin/generate_tokens
pub async fn generate_tokens(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    jar: SignedCookieJar,
    Form(form): Form<GenerateTokensForm>,
) -> ApiResult<Response> {
    let count = match parse_count(&form.count) {
        Ok(count) => count,
        Err(e) => {
            return Ok(redirect_with(jar, DASHBOARD, Flash::error(e.to_string())).into_response())
        }
    };

    let tokens = match app_state.tokens.issue_batch(count).await {
        Ok(tokens) => tokens,
        Err(err @ BallotError::Validation(_)) => {
            return Ok(redirect_with(jar, DASHBOARD, Flash::error(err.to_string())).into_response())
        }
        Err(err) => return Err(err.into()),
    };

    let base_url = request_base_url(&app_state.config, &headers);
    let archive =
        tokio::task::spawn_blocking(move || credentials::encode_batch(&base_url, &tokens))
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))??;

    let file_name = format!("voting_tokens_{}.zip", Local::now().format("%Y%m%d_%H%M%S"));
    Ok(response::attachment(&file_name, "application/zip", archive).into_response())
}

/// POST /admin/create_agenda
pub async fn create_agenda(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<CreateAgendaForm>,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    if let Err(e) = form.validate() {
        return Ok(redirect_with(jar, DASHBOARD, Flash::error(e.to_string())));
    }

    let result = app_state.catalog.create_agenda(&form.agenda_title).await;
    conclude(jar, result, |agenda| {
        format!("Agenda '{}' created", agenda.title)
    })
}

/// POST /admin/create_vote
pub async fn create_vote(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<CreateVoteForm>,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    if let Err(e) = form.validate() {
        return Ok(redirect_with(jar, DASHBOARD, Flash::error(e.to_string())));
    }

    let result = app_state
        .catalog
        .create_ballot_item(form.agenda_id.trim(), &form.title, &form.options)
        .await;
    conclude(jar, result, |_| "Vote item created".to_string())
}

/// GET|POST /admin/start_vote/:id
pub async fn start_vote(
    State(app_state): State<AppState>,
    Path(vote_id): Path<String>,
    jar: SignedCookieJar,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    if let Err(e) = validate_uuid(&vote_id) {
        return Ok(redirect_with(jar, DASHBOARD, Flash::error(e.to_string())));
    }
    let result = app_state.catalog.activate(&vote_id).await;
    conclude(jar, result, |_| "Vote started".to_string())
}

/// GET|POST /admin/end_vote/:id
pub async fn end_vote(
    State(app_state): State<AppState>,
    Path(vote_id): Path<String>,
    jar: SignedCookieJar,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    if let Err(e) = validate_uuid(&vote_id) {
        return Ok(redirect_with(jar, DASHBOARD, Flash::error(e.to_string())));
    }
    let result = app_state.catalog.deactivate(&vote_id).await;
    conclude(jar, result, |_| "Vote ended".to_string())
}

/// Delete an item and its votes
///
/// GET /admin/cleanup_vote/:id
pub async fn cleanup_vote(
    State(app_state): State<AppState>,
    Path(vote_id): Path<String>,
    jar: SignedCookieJar,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    if let Err(e) = validate_uuid(&vote_id) {
        return Ok(redirect_with(jar, DASHBOARD, Flash::error(e.to_string())));
    }
    let result = app_state.catalog.delete_item(&vote_id).await;
    conclude(jar, result, |removed| {
        format!("Vote item deleted ({} votes removed)", removed.votes)
    })
}

/// Delete an agenda with its items and votes
///
/// GET /admin/delete_agenda/:id
pub async fn delete_agenda(
    State(app_state): State<AppState>,
    Path(agenda_id): Path<String>,
    jar: SignedCookieJar,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    if let Err(e) = validate_uuid(&agenda_id) {
        return Ok(redirect_with(jar, DASHBOARD, Flash::error(e.to_string())));
    }
    let result = app_state.catalog.delete_agenda(&agenda_id).await;
    conclude(jar, result, |removed| {
        format!(
            "Agenda deleted ({} items, {} votes removed)",
            removed.items, removed.votes
        )
    })
}

/// POST /admin/delete_tokens
pub async fn delete_tokens(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<DeleteTokensForm>,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    let result = match form.scope {
        DeleteTokensScope::Unused => app_state.tokens.delete_unused().await,
        DeleteTokensScope::All => app_state.tokens.delete_all().await,
    };
    conclude(jar, result, |removed| format!("{} tokens deleted", removed))
}

/// POST /admin/settings
pub async fn update_settings(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SettingsForm>,
) -> ApiResult<(SignedCookieJar, Redirect)> {
    let result = app_state
        .settings
        .set_meeting_title(&form.meeting_title)
        .await;
    conclude(jar, result, |_| "Settings saved".to_string())
}

/// Download the CSV vote logs
///
/// GET /admin/export_logs
pub async fn export_logs(State(app_state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let archive = app_state.audit.export_zip().await?;
    let file_name = format!("vote_logs_{}.zip", Local::now().format("%Y%m%d_%H%M%S"));
    Ok(response::attachment(&file_name, "application/zip", archive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_base_url_prefers_configuration() {
        let mut config = ServerConfig::default();
        config.voting.base_url = Some("https://vote.example.org/".to_string());
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("10.0.0.2:5000"));

        assert_eq!(request_base_url(&config, &headers), "https://vote.example.org");
    }

    #[test]
    fn test_base_url_from_headers() {
        let config = ServerConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("vote.local"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));

        assert_eq!(request_base_url(&config, &headers), "https://vote.local");
    }

    #[test]
    fn test_base_url_without_host() {
        let config = ServerConfig::default();
        assert_eq!(
            request_base_url(&config, &HeaderMap::new()),
            "http://localhost:5000"
        );
    }
}
