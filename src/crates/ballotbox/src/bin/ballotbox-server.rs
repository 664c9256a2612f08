//! Ballotbox server binary
//!
//! Serves the admin console and the voter ballot for one meeting.

use anyhow::Context;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use ballotbox::api::{create_router, AppState};
use ballotbox::config::ServerConfig;
use ballotbox::db::DatabaseConnection;
use ballotbox::services::SettingsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(rust_log))
        .init();

    tracing::info!("Loading server configuration...");
    let config = ServerConfig::load().context("Invalid server configuration")?;

    tracing::info!("Server name: {}", config.server.name);
    tracing::info!("Database path: {}", config.database.path);
    tracing::info!("Vote log directory: {}", config.voting.log_dir);
    match config.allowed_network()? {
        Some(net) => tracing::info!("Voter network restricted to {}", net),
        None => tracing::info!("Voter network unrestricted"),
    }
    if let Some(base_url) = config.base_url() {
        tracing::info!("Credential base URL: {}", base_url);
    }

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.bind_address()))?;

    tracing::info!("Opening database");
    let db = DatabaseConnection::open(&config.database.path).await?;

    tracing::info!("Running database migrations");
    db.run_migrations().await?;

    tracing::info!("Performing database health check");
    db.health_check().await?;

    SettingsStore::new(db.pool().clone())
        .set("server.name", &config.server.name)
        .await?;

    let app_state = AppState::new(db.clone(), config)?;

    tracing::info!("Building API router");
    let app = create_router(app_state);

    tracing::info!("Starting ballotbox server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    db.close().await;
    tracing::info!("Ballotbox server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL-C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
