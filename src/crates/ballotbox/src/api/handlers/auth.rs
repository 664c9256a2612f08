//! Admin login and logout handlers

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

use crate::api::{
    error::ApiResult,
    flash::{self, Flash},
    middleware::session_from_jar,
    models::{LoginForm, LoginView},
    response,
    routes::AppState,
};
use crate::services::admin_gate::SESSION_COOKIE;

/// Login view
///
/// GET /login
pub async fn login_page(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<impl IntoResponse> {
    let authenticated = session_from_jar(&app_state, &jar).is_authenticated();
    let (jar, flash) = flash::take(jar);
    Ok((
        jar,
        response::ok(LoginView {
            authenticated,
            flash,
        }),
    ))
}

/// Check the admin password and start a session
///
/// POST /login
pub async fn login(
    State(app_state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> (SignedCookieJar, Redirect) {
    let session = app_state.gate.login(&form.password);

    match session.cookie_value() {
        Some(value) => {
            tracing::info!("Admin logged in");
            let jar = jar.add(
                Cookie::build((SESSION_COOKIE, value))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax),
            );
            (
                flash::push(jar, Flash::success("Logged in")),
                response::see_other("/admin"),
            )
        }
        None => (
            flash::push(jar, Flash::error("Wrong password")),
            response::see_other("/login"),
        ),
    }
}

/// End the admin session
///
/// GET /logout
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    tracing::info!("Admin logged out");
    (
        flash::push(jar, Flash::success("Logged out")),
        response::see_other("/login"),
    )
}
