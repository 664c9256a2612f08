//! API route definitions
//!
//! Defines the shared application state and every route with its handler.

use axum::{
    extract::FromRef,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Key;
use rand::RngCore;
use sha2::{Digest, Sha512};
use std::sync::Arc;

use crate::api::{handlers, middleware};
use crate::audit::AuditLog;
use crate::config::{network_guard_middleware, NetworkGuard, ServerConfig, ServerConfigError};
use crate::db::DatabaseConnection;
use crate::services::{
    AdminGate, Catalog, SettingsStore, SubmissionEngine, TallyReporter, TokenStore,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<ServerConfig>,
    /// Signing key for the session and flash cookies
    pub key: Key,
    pub gate: Arc<AdminGate>,
    pub tokens: TokenStore,
    pub catalog: Catalog,
    pub submissions: SubmissionEngine,
    pub tally: TallyReporter,
    pub settings: SettingsStore,
    pub audit: Arc<AuditLog>,
    pub network: NetworkGuard,
}

impl AppState {
    /// Wire services for a validated configuration
    pub fn new(db: DatabaseConnection, config: ServerConfig) -> Result<Self, ServerConfigError> {
        config.validate()?;

        let password = config.admin_password().unwrap_or_default();
        let gate = AdminGate::new(password, config.security.session_ttl_minutes);
        let network = NetworkGuard::new(config.allowed_network()?);
        let key = signing_key(config.secret_key());
        let audit = Arc::new(AuditLog::new(&config.voting.log_dir));

        let pool = db.pool().clone();
        Ok(Self {
            tokens: TokenStore::new(pool.clone(), config.voting.max_batch_size),
            catalog: Catalog::new(pool.clone()),
            submissions: SubmissionEngine::new(pool.clone(), audit.clone()),
            tally: TallyReporter::new(pool.clone()),
            settings: SettingsStore::new(pool),
            gate: Arc::new(gate),
            config: Arc::new(config),
            audit,
            network,
            key,
            db,
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

/// Cookie signing key
///
/// Derived from the configured secret so sessions survive restarts; without
/// one a random key is used and sessions end with the process.
pub fn signing_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => {
            tracing::warn!("SECRET_KEY not set; admin sessions will not survive a restart");
            let mut bytes = [0u8; 64];
            rand::thread_rng().fill_bytes(&mut bytes);
            Key::from(&bytes[..])
        }
    }
}

/// Build the complete router
pub fn create_router(app_state: AppState) -> Router {
    let admin = Router::new()
        .route("/", get(handlers::dashboard))
        .route("/status", get(handlers::item_status))
        .route("/generate_tokens", post(handlers::generate_tokens))
        .route("/create_agenda", post(handlers::create_agenda))
        .route("/create_vote", post(handlers::create_vote))
        .route(
            "/start_vote/:id",
            get(handlers::start_vote).post(handlers::start_vote),
        )
        .route(
            "/end_vote/:id",
            get(handlers::end_vote).post(handlers::end_vote),
        )
        .route("/cleanup_vote/:id", get(handlers::cleanup_vote))
        .route("/delete_agenda/:id", get(handlers::delete_agenda))
        .route("/delete_tokens", post(handlers::delete_tokens))
        .route("/settings", post(handlers::update_settings))
        .route("/export_logs", get(handlers::export_logs))
        .fallback(handlers::admin_not_found)
        // `layer`, not `route_layer`: the fallback must sit behind the gate too.
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::require_admin,
        ));

    let voter = Router::new()
        .route("/vote", get(handlers::ballot))
        .route("/submit_vote", post(handlers::submit_vote))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.network.clone(),
            network_guard_middleware,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .nest("/admin", admin)
        .merge(voter)
        .layer(middleware::logging_layer())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_is_deterministic_for_secret() {
        let a = signing_key(Some("correct horse battery staple"));
        let b = signing_key(Some("correct horse battery staple"));
        let c = signing_key(Some("another secret"));
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    #[test]
    fn test_random_signing_keys_differ() {
        assert_ne!(signing_key(None).master(), signing_key(None).master());
    }
}
