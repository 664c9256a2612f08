//! Database connection management
//!
//! Provides the SQLite connection pool, migrations and health checks.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::db::error::{DatabaseError, DbResult};

/// Type alias for the database connection pool
pub type DatabasePool = SqlitePool;

/// Default number of pooled connections
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database connection wrapper
#[derive(Clone, Debug)]
pub struct DatabaseConnection {
    pool: Arc<DatabasePool>,
}

impl DatabaseConnection {
    /// Open (creating if missing) the SQLite database at `database_path`
    ///
    /// The database runs in WAL mode with foreign keys enforced and a busy
    /// timeout, so concurrent writers queue instead of failing immediately.
    pub async fn open<P: AsRef<Path>>(database_path: P) -> DbResult<Self> {
        Self::with_max_connections(database_path, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Open the database with a custom pool size
    pub async fn with_max_connections<P: AsRef<Path>>(
        database_path: P,
        max_connections: u32,
    ) -> DbResult<Self> {
        let path = database_path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::ConnectionError(format!(
                        "Failed to create database directory: {}",
                        e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::debug!(path = %path.display(), "Database connection established");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Apply the embedded schema migrations
    pub async fn run_migrations(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))
    }

    /// Perform a health check by running a simple query
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(self) {
        self.pool.close().await;
    }
}
