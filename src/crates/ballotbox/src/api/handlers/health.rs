//! Health check endpoint handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::api::{models::HealthResponse, routes::AppState};

/// Handler for GET /
///
/// Plain liveness probe.
pub async fn index() -> &'static str {
    "OK"
}

/// Handler for GET /health
///
/// Returns health status including database connectivity.
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let name = app_state.config.server.name.clone();
    match app_state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse::new("ok", "connected", name)),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new("error", "error", name)),
            )
        }
    }
}
