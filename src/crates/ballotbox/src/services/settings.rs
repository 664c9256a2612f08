//! Key/value settings

use tracing::info;

use crate::db::models::setting::MEETING_TITLE;
use crate::db::models::Setting;
use crate::db::repositories::SettingRepository;
use crate::db::DatabasePool;
use crate::{BallotError, Result};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    pool: DatabasePool,
}

impl SettingsStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<Setting>> {
        Ok(SettingRepository::get(&self.pool, key).await?)
    }

    /// Create or overwrite a setting
    pub async fn set(&self, key: &str, value: &str) -> Result<Setting> {
        if key.trim().is_empty() {
            return Err(BallotError::validation("Setting key must not be empty"));
        }
        let setting = SettingRepository::set(&self.pool, key, value).await?;
        info!(key, "Setting updated");
        Ok(setting)
    }

    pub async fn list(&self) -> Result<Vec<Setting>> {
        Ok(SettingRepository::list(&self.pool).await?)
    }

    pub async fn meeting_title(&self) -> Result<Option<String>> {
        Ok(self.get(MEETING_TITLE).await?.map(|setting| setting.value))
    }

    pub async fn set_meeting_title(&self, title: &str) -> Result<Setting> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BallotError::validation("Meeting title must not be empty"));
        }
        self.set(MEETING_TITLE, title).await
    }
}
