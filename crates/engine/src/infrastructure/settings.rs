//! SQLite-backed settings storage.

use async_trait::async_trait;
use pawntalk_domain::TalkSettings;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, RepoError, SettingsRepo};

/// Settings live in a single row keyed by scope.
const SCOPE: &str = "global";

/// SQLite implementation for talk settings storage.
pub struct SqliteSettingsRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteSettingsRepo {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("settings", e))?;

        Self::from_pool(pool, clock).await
    }

    /// Use an existing pool, creating the table if needed.
    async fn from_pool(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS talk_settings (
                scope TEXT PRIMARY KEY NOT NULL,
                settings_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("settings", e))?;

        Ok(Self { pool, clock })
    }
}

#[async_trait]
impl SettingsRepo for SqliteSettingsRepo {
    async fn get(&self) -> Result<Option<TalkSettings>, RepoError> {
        let row = sqlx::query("SELECT settings_json FROM talk_settings WHERE scope = ?")
            .bind(SCOPE)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("settings", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("settings_json");
                let settings = serde_json::from_str(&json).map_err(RepoError::serialization)?;
                Ok(Some(settings))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, settings: &TalkSettings) -> Result<(), RepoError> {
        settings.validate()?;

        let json = serde_json::to_string(settings).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO talk_settings (scope, settings_json, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(scope) DO UPDATE SET
                settings_json = excluded.settings_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(SCOPE)
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("settings", e))?;

        tracing::debug!(model = %settings.model, "Talk settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use chrono::TimeZone;
    use pawntalk_domain::SecretToken;
    use tempfile::TempDir;

    async fn repo(dir: &TempDir) -> SqliteSettingsRepo {
        let path = dir.path().join("settings.db");
        let clock = Arc::new(FixedClock(
            chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        SqliteSettingsRepo::new(path.to_str().unwrap(), clock)
            .await
            .expect("open settings db")
    }

    #[tokio::test]
    async fn get_returns_none_before_first_save() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir).await;
        assert!(repo.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_get_round_trips_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir).await;

        let mut settings = TalkSettings {
            api_token: SecretToken::new("sk-first"),
            ..TalkSettings::default()
        };
        repo.save(&settings).await.unwrap();

        settings.api_token = SecretToken::new("sk-second");
        settings.model = "gpt-4o".into();
        repo.save(&settings).await.unwrap();

        let loaded = repo.get().await.unwrap().expect("stored");
        assert_eq!(loaded.api_token.reveal(), "sk-second");
        assert_eq!(loaded.model, "gpt-4o");
    }

    #[tokio::test]
    async fn settings_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let repo = repo(&dir).await;
            let settings = TalkSettings {
                api_token: SecretToken::new("sk-persist"),
                ..TalkSettings::default()
            };
            repo.save(&settings).await.unwrap();
        }

        let reopened = repo(&dir).await;
        let loaded = reopened.get().await.unwrap().expect("stored");
        assert_eq!(loaded.api_token.reveal(), "sk-persist");
    }

    #[tokio::test]
    async fn invalid_settings_are_rejected() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir).await;
        let settings = TalkSettings {
            model: "  ".into(),
            ..TalkSettings::default()
        };
        assert!(matches!(
            repo.save(&settings).await,
            Err(RepoError::Invalid(_))
        ));
        assert!(repo.get().await.unwrap().is_none());
    }
}
