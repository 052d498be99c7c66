//! Process configuration read from the environment.

use std::path::PathBuf;

use pawntalk_domain::TalkSettings;

use crate::infrastructure::openai::DEFAULT_CHAT_URL;

/// Values the runner needs before any settings are loaded.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Chat-completion endpoint
    pub endpoint: String,
    /// SQLite file holding settings and dialogue history
    pub db_path: String,
    /// Host save-data folder; speech files go under it
    pub save_data_dir: PathBuf,
    /// Save slot the dialogue history is stored under
    pub save_slot: String,
    /// Settings used when nothing is stored yet
    pub seed_settings: TalkSettings,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: env_string("PAWNTALK_ENDPOINT", DEFAULT_CHAT_URL),
            db_path: env_string("PAWNTALK_DB", "pawntalk.db"),
            save_data_dir: PathBuf::from(env_string("PAWNTALK_SAVE_DATA_DIR", "SaveData")),
            save_slot: env_string("PAWNTALK_SAVE_SLOT", "default"),
            seed_settings: checked_seed(TalkSettings::from_env()),
        }
    }
}

/// Out-of-range environment values fall back to the defaults, keeping the token.
fn checked_seed(seed: TalkSettings) -> TalkSettings {
    match seed.validate() {
        Ok(()) => seed,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid talk settings in environment, using defaults");
            TalkSettings {
                api_token: seed.api_token,
                ..TalkSettings::default()
            }
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
