//! Setting repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::models::{timestamp_now, Setting};

/// Setting repository
pub struct SettingRepository;

impl SettingRepository {
    /// Create or overwrite a setting
    pub async fn set(pool: &DatabasePool, key: &str, value: &str) -> Result<Setting, sqlx::Error> {
        let now = timestamp_now();

        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(Setting {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: now,
        })
    }

    /// Get a setting by key
    pub async fn get(pool: &DatabasePool, key: &str) -> Result<Option<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>("SELECT key, value, updated_at FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// List all settings by key
    pub async fn list(pool: &DatabasePool) -> Result<Vec<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>("SELECT key, value, updated_at FROM settings ORDER BY key ASC")
            .fetch_all(pool)
            .await
    }
}
