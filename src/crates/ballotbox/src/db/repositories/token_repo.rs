//! Token repository for database operations

use sqlx::SqliteExecutor;

use crate::db::connection::DatabasePool;
use crate::db::models::Token;

/// Token repository for managing voting credentials
pub struct TokenRepository;

impl TokenRepository {
    /// Insert a token with the next free serial number and return that serial
    ///
    /// The serial is derived inside the INSERT, so the statement takes the
    /// write lock before it reads the current maximum.
    pub async fn insert_next<'e, E>(executor: E, token: &Token) -> Result<i64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_scalar(
            "INSERT INTO tokens (token, serial_number, created_at)
             SELECT ?, COALESCE(MAX(serial_number), 0) + 1, ? FROM tokens
             RETURNING serial_number",
        )
        .bind(&token.token)
        .bind(&token.created_at)
        .fetch_one(executor)
        .await
    }

    /// Get a token by its value
    pub async fn get(pool: &DatabasePool, token: &str) -> Result<Option<Token>, sqlx::Error> {
        sqlx::query_as::<_, Token>(
            "SELECT token, serial_number, created_at FROM tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    /// List all tokens ordered by serial
    pub async fn list(pool: &DatabasePool) -> Result<Vec<Token>, sqlx::Error> {
        sqlx::query_as::<_, Token>(
            "SELECT token, serial_number, created_at FROM tokens ORDER BY serial_number ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Number of issued tokens
    pub async fn count(pool: &DatabasePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tokens")
            .fetch_one(pool)
            .await
    }

    /// Number of issued tokens that have cast at least one vote
    pub async fn count_consumed(pool: &DatabasePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(DISTINCT v.token) FROM votes v INNER JOIN tokens t ON t.token = v.token",
        )
        .fetch_one(pool)
        .await
    }

    /// Delete tokens never referenced by a vote
    pub async fn delete_unused(pool: &DatabasePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM tokens WHERE NOT EXISTS (SELECT 1 FROM votes v WHERE v.token = tokens.token)",
        )
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete every token. Recorded votes are kept.
    pub async fn delete_all(pool: &DatabasePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tokens").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
