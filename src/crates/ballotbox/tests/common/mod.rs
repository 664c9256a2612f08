//! Shared setup for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use ballotbox::api::AppState;
use ballotbox::audit::AuditLog;
use ballotbox::config::ServerConfig;
use ballotbox::db::models::{Agenda, VoteItem};
use ballotbox::db::DatabaseConnection;
use ballotbox::services::{Catalog, SubmissionEngine, TokenStore};

pub const ADMIN_PASSWORD: &str = "test-password";

/// Fresh migrated database in a temporary directory
pub async fn setup_test_db() -> (TempDir, DatabaseConnection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = DatabaseConnection::open(dir.path().join("votes.db"))
        .await
        .expect("Failed to open test database");
    db.run_migrations()
        .await
        .expect("Failed to run migrations");
    (dir, db)
}

/// Valid configuration rooted in `dir`
pub fn test_config(dir: &Path) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.database.path = dir.join("votes.db").to_string_lossy().into_owned();
    config.security.admin_password = Some(ADMIN_PASSWORD.to_string());
    config.security.secret_key = Some("integration-test-secret".to_string());
    config.voting.log_dir = dir.join("log").to_string_lossy().into_owned();
    config.voting.max_batch_size = 50;
    config
}

/// Application state over a fresh database
pub async fn setup_app_state(configure: impl FnOnce(&mut ServerConfig)) -> (TempDir, AppState) {
    let (dir, db) = setup_test_db().await;
    let mut config = test_config(dir.path());
    configure(&mut config);
    let state = AppState::new(db, config).expect("Invalid test configuration");
    (dir, state)
}

/// Submission engine logging into `dir/log`
pub fn submission_engine(dir: &TempDir, db: &DatabaseConnection) -> SubmissionEngine {
    let audit = Arc::new(AuditLog::new(dir.path().join("log")));
    SubmissionEngine::new(db.pool().clone(), audit)
}

pub fn token_store(db: &DatabaseConnection) -> TokenStore {
    TokenStore::new(db.pool().clone(), 50)
}

/// One agenda with one active item offering the given options
pub async fn active_item(catalog: &Catalog, title: &str, options: &str) -> (Agenda, VoteItem) {
    let agenda = catalog
        .create_agenda(&format!("{} agenda", title))
        .await
        .expect("Failed to create agenda");
    let item = catalog
        .create_ballot_item(&agenda.agenda_id, title, options)
        .await
        .expect("Failed to create item");
    catalog
        .activate(&item.vote_id)
        .await
        .expect("Failed to activate item");
    (agenda, item)
}

pub fn pair(vote_id: &str, choice: &str) -> (String, String) {
    (vote_id.to_string(), choice.to_string())
}
