//! Settings use cases.
//!
//! Stored settings sit over process defaults taken from the environment; an
//! empty stored token falls back to the default one.

mod token_editor;

pub use token_editor::{TokenEditor, TOKEN_SAVED_NOTICE};

use std::sync::Arc;

use pawntalk_domain::TalkSettings;

use crate::infrastructure::ports::{RepoError, SettingsRepo};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Settings operations use case.
pub struct SettingsOps {
    repo: Arc<dyn SettingsRepo>,
    seed: TalkSettings,
}

impl SettingsOps {
    pub fn new(repo: Arc<dyn SettingsRepo>, seed: TalkSettings) -> Self {
        Self { repo, seed }
    }

    /// Effective settings. Returns the defaults if none have been saved.
    pub async fn get(&self) -> Result<TalkSettings, SettingsError> {
        Ok(match self.repo.get().await? {
            Some(stored) => stored.merged_over(&self.seed),
            None => self.seed.clone(),
        })
    }

    pub async fn update(&self, settings: TalkSettings) -> Result<TalkSettings, SettingsError> {
        self.repo.save(&settings).await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawntalk_domain::SecretToken;

    use crate::infrastructure::ports::MockSettingsRepo;

    fn seed() -> TalkSettings {
        TalkSettings {
            api_token: SecretToken::new("sk-env"),
            ..TalkSettings::default()
        }
    }

    #[tokio::test]
    async fn get_without_stored_settings_returns_seed() {
        let mut repo = MockSettingsRepo::new();
        repo.expect_get().returning(|| Ok(None));

        let ops = SettingsOps::new(Arc::new(repo), seed());
        assert_eq!(ops.get().await.unwrap(), seed());
    }

    #[tokio::test]
    async fn stored_model_wins_and_empty_token_falls_back() {
        let mut repo = MockSettingsRepo::new();
        repo.expect_get().returning(|| {
            Ok(Some(TalkSettings {
                model: "gpt-4o".into(),
                ..TalkSettings::default()
            }))
        });

        let ops = SettingsOps::new(Arc::new(repo), seed());
        let settings = ops.get().await.unwrap();
        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.api_token.reveal(), "sk-env");
    }

    #[tokio::test]
    async fn update_propagates_store_errors() {
        let mut repo = MockSettingsRepo::new();
        repo.expect_save()
            .returning(|_| Err(RepoError::database("settings", "disk full")));

        let ops = SettingsOps::new(Arc::new(repo), seed());
        assert!(matches!(
            ops.update(TalkSettings::default()).await,
            Err(SettingsError::Repo(RepoError::Database { .. }))
        ));
    }
}
