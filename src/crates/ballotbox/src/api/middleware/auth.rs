//! Admin session guard
//!
//! Every `/admin*` route runs behind [`require_admin`]. Anonymous requests are
//! redirected to the login page before the handler runs, so no mutation can
//! happen without a session.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::Utc;
use tracing::debug;

use crate::api::flash::{self, Flash};
use crate::api::response;
use crate::api::routes::AppState;
use crate::services::admin_gate::{AdminSession, SESSION_COOKIE};

/// Current admin session according to the signed cookie
pub fn session_from_jar(state: &AppState, jar: &SignedCookieJar) -> AdminSession {
    let value = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());
    state.gate.restore(value.as_deref(), Utc::now())
}

/// Redirect anonymous visitors to `/login`
pub async fn require_admin(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let session = session_from_jar(&state, &jar);
    if !session.is_authenticated() {
        debug!(path = %request.uri().path(), "Anonymous admin request redirected to login");
        let jar = flash::push(jar, Flash::error("Please log in first"));
        return (jar, response::see_other("/login")).into_response();
    }

    request.extensions_mut().insert(session);
    next.run(request).await
}
