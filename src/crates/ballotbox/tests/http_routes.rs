mod common;

use axum::body::{to_bytes, Body};
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use std::io::Cursor;
use std::net::SocketAddr;
use tower::ServiceExt;

use ballotbox::api::{create_router, AppState};
use common::{setup_app_state, ADMIN_PASSWORD};

const FORM: &str = "application/x-www-form-urlencoded";

fn router(state: AppState, client: [u8; 4]) -> Router {
    create_router(state).layer(MockConnectInfo(SocketAddr::from((client, 40000))))
}

fn get(uri: &str, cookies: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookies)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, cookies: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, FORM)
        .header(header::COOKIE, cookies)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Cookies set (not removed) by a response, as a `Cookie` header value
fn cookies_from(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter(|pair| !pair.ends_with('='))
        .collect::<Vec<_>>()
        .join("; ")
}

async fn json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Log in and return the session cookie header
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post("/login", "", &format!("password={}", ADMIN_PASSWORD)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
    cookies_from(&response)
        .split("; ")
        .filter(|pair| pair.starts_with("ballotbox_admin="))
        .collect()
}

#[tokio::test]
async fn test_liveness_and_health() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let app = router(state, [127, 0, 0, 1]);

    let response = app.clone().oneshot(get("/", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"OK");

    let response = app.oneshot(get("/health", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_admin_requires_login_and_performs_no_mutation() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let catalog = state.catalog.clone();
    let app = router(state, [127, 0, 0, 1]);

    let response = app.clone().oneshot(get("/admin", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = app
        .clone()
        .oneshot(post("/admin/create_agenda", "", "agenda_title=Sneaky"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(catalog.list_agendas().await.unwrap().is_empty());

    let response = app
        .oneshot(post("/admin/generate_tokens", "", "count=5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_unknown_admin_paths_are_gated() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let app = router(state, [127, 0, 0, 1]);

    for uri in ["/admin/", "/admin/nope", "/admin/start_vote/"] {
        let response = app.clone().oneshot(get(uri, "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/login", "{}", uri);
    }

    let cookies = login(&app).await;
    let response = app.oneshot(get("/admin/nope", &cookies)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_password_redirects_to_login_with_flash() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let app = router(state, [127, 0, 0, 1]);

    let response = app
        .clone()
        .oneshot(post("/login", "", "password=guess"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cookies = cookies_from(&response);
    assert!(!cookies.contains("ballotbox_admin="));

    let response = app.oneshot(get("/login", &cookies)).await.unwrap();
    let body = json(response).await;
    assert_eq!(body["data"]["authenticated"], false);
    assert_eq!(body["data"]["flash"]["level"], "error");
    assert_eq!(body["data"]["flash"]["message"], "Wrong password");
}

#[tokio::test]
async fn test_admin_workflow_and_voting() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let catalog = state.catalog.clone();
    let tokens = state.tokens.clone();
    let app = router(state, [127, 0, 0, 1]);
    let session = login(&app).await;

    // Agenda and item through the admin forms
    let response = app
        .clone()
        .oneshot(post("/admin/create_agenda", &session, "agenda_title=AGM+2025"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
    let agenda = catalog.list_agendas().await.unwrap().remove(0);

    let body = format!(
        "agenda_id={}&title=Approve+budget&options=Yes%2CNo%0AAbstain",
        agenda.agenda_id
    );
    app.clone()
        .oneshot(post("/admin/create_vote", &session, &body))
        .await
        .unwrap();
    let item = catalog.list_items(&agenda.agenda_id).await.unwrap().remove(0);
    assert_eq!(item.option_labels(), vec!["Yes", "No", "Abstain"]);

    let response = app
        .clone()
        .oneshot(get(&format!("/admin/start_vote/{}", item.vote_id), &session))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(catalog.get_item(&item.vote_id).await.unwrap().is_active);

    // Credentials download
    let response = app
        .clone()
        .oneshot(post("/admin/generate_tokens", &session, "count=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
    let archive = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
    assert_eq!(archive.len(), 2);
    let token = tokens.list().await.unwrap().remove(0).token;

    // Ballot and submission
    let response = app
        .clone()
        .oneshot(get(&format!("/vote?token={}", token), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ballot = json(response).await;
    assert_eq!(ballot["data"]["agendas"][0]["items"][0]["vote_id"], item.vote_id.as_str());
    assert_eq!(ballot["data"]["agendas"][0]["items"][0]["already_voted"], false);

    let body = format!("token={}&choice_{}=Abstain", token, item.vote_id);
    let response = app
        .clone()
        .oneshot(post("/submit_vote", "", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = json(response).await;
    assert_eq!(report["data"]["submitted"], 1);
    assert_eq!(report["data"]["duplicates"], 0);

    let response = app
        .clone()
        .oneshot(post("/submit_vote", "", &body))
        .await
        .unwrap();
    let report = json(response).await;
    assert_eq!(report["data"]["submitted"], 0);
    assert_eq!(report["data"]["duplicates"], 1);

    // Status and dashboard
    let response = app
        .clone()
        .oneshot(get(&format!("/admin/status?vote_id={}", item.vote_id), &session))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = json(response).await;
    assert_eq!(status["data"]["tally"]["Abstain"], 1);
    assert_eq!(status["data"]["total_votes"], 1);

    let response = app.clone().oneshot(get("/admin", &session)).await.unwrap();
    let dashboard = json(response).await;
    assert_eq!(dashboard["data"]["total_votes"], 1);
    assert_eq!(dashboard["data"]["tokens"]["issued"], 2);
    assert_eq!(dashboard["data"]["tokens"]["consumed"], 1);

    // Log export
    let response = app
        .clone()
        .oneshot(get("/admin/export_logs", &session))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let archive = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
    assert_eq!(archive.len(), 1);
}

#[tokio::test]
async fn test_form_validation_becomes_flash() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let app = router(state, [127, 0, 0, 1]);
    let session = login(&app).await;

    let response = app
        .clone()
        .oneshot(post("/admin/generate_tokens", &session, "count=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
    let flash = cookies_from(&response);

    let cookies = format!("{}; {}", session, flash);
    let response = app.oneshot(get("/admin", &cookies)).await.unwrap();
    let dashboard = json(response).await;
    assert_eq!(dashboard["data"]["flash"]["level"], "error");
    assert_eq!(dashboard["data"]["tokens"]["issued"], 0);
}

#[tokio::test]
async fn test_unknown_item_becomes_flash() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let app = router(state, [127, 0, 0, 1]);
    let session = login(&app).await;

    let response = app
        .oneshot(get(
            "/admin/delete_agenda/00000000-0000-4000-8000-000000000000",
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn test_status_requires_vote_id() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let app = router(state, [127, 0, 0, 1]);
    let session = login(&app).await;

    let response = app
        .clone()
        .oneshot(get("/admin/status", &session))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .oneshot(get("/admin/status?vote_id=missing", &session))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_token_is_forbidden() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let app = router(state, [127, 0, 0, 1]);

    let response = app
        .clone()
        .oneshot(get("/vote?token=forged", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.clone().oneshot(get("/vote", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(post("/submit_vote", "", "token=forged&choice_x=Yes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_network_guard_blocks_outside_clients() {
    let (_dir, state) = setup_app_state(|config| {
        config.voting.allowed_network = Some("192.168.1.0/24".to_string());
    })
    .await;
    let token = state.tokens.issue_batch(1).await.unwrap().remove(0).token;

    let outside = router(state.clone(), [10, 0, 0, 7]);
    let response = outside
        .clone()
        .oneshot(get(&format!("/vote?token={}", token), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("10.0.0.7"));
    assert!(message.contains("192.168.1.0/24"));

    // Admin routes are not network restricted
    let response = outside.oneshot(get("/login", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let inside = router(state, [192, 168, 1, 20]);
    let response = inside
        .oneshot(get(&format!("/vote?token={}", token), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (_dir, state) = setup_app_state(|_| {}).await;
    let app = router(state, [127, 0, 0, 1]);
    let session = login(&app).await;

    let response = app.clone().oneshot(get("/logout", &session)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let removal = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with("ballotbox_admin=;") || v.starts_with("ballotbox_admin=\"\""));
    assert!(removal);

    let response = app.oneshot(get("/admin", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
