//! SQLite-backed dialogue history, one row per save slot.

use async_trait::async_trait;
use pawntalk_domain::DialogueHistory;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, HistoryRepo, RepoError};

pub struct SqliteHistoryRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteHistoryRepo {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("history", e))?;

        Self::from_pool(pool, clock).await
    }

    async fn from_pool(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dialogue_history (
                save_slot TEXT PRIMARY KEY NOT NULL,
                entries_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("history", e))?;

        Ok(Self { pool, clock })
    }
}

#[async_trait]
impl HistoryRepo for SqliteHistoryRepo {
    async fn load(&self, save_slot: &str) -> Result<DialogueHistory, RepoError> {
        let row = sqlx::query("SELECT entries_json FROM dialogue_history WHERE save_slot = ?")
            .bind(save_slot)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("history_load", e))?;

        let Some(row) = row else {
            return Ok(DialogueHistory::new());
        };

        let json: String = row.get("entries_json");
        let history: DialogueHistory =
            serde_json::from_str(&json).map_err(RepoError::serialization)?;

        tracing::debug!(save_slot, entries = history.len(), "Dialogue history loaded");
        Ok(history)
    }

    async fn save(&self, save_slot: &str, history: &DialogueHistory) -> Result<(), RepoError> {
        let json = serde_json::to_string(history).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO dialogue_history (save_slot, entries_json, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(save_slot) DO UPDATE SET
                entries_json = excluded.entries_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(save_slot)
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("history_save", e))?;

        Ok(())
    }
}
