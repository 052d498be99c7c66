//! Talk settings value object
//!
//! Persisted by the settings store and edited from the host's mod-settings
//! surface. Every field has a serde default so settings written by older
//! versions keep loading.

use serde::{Deserialize, Serialize};

use super::secret_token::SecretToken;
use crate::error::DomainError;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default per-call timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default prompt character budget.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 900;

/// All configurable talk settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TalkSettings {
    /// Bearer token for the chat-completion endpoint
    #[serde(default)]
    pub api_token: SecretToken,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout applied to each completion call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Prompt length cap; longer prompts are cut and end with an ellipsis
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    /// Write each reply to `<save data>/ColonistPrompts/<Name>_say.txt`
    #[serde(default = "default_write_speech_files")]
    pub write_speech_files: bool,
}

fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_temperature() -> f32 { DEFAULT_TEMPERATURE }
fn default_timeout_ms() -> u64 { DEFAULT_TIMEOUT_MS }
fn default_max_prompt_chars() -> usize { DEFAULT_MAX_PROMPT_CHARS }
fn default_write_speech_files() -> bool { true }

impl Default for TalkSettings {
    fn default() -> Self {
        Self {
            api_token: SecretToken::default(),
            model: default_model(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            write_speech_files: true,
        }
    }
}

impl TalkSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_token: std::env::var("OPENAI_API_KEY")
                .map(SecretToken::new)
                .unwrap_or_default(),
            model: std::env::var("PAWNTALK_MODEL").unwrap_or(defaults.model),
            temperature: env_or("PAWNTALK_TEMPERATURE", defaults.temperature),
            timeout_ms: env_or("PAWNTALK_TIMEOUT_MS", defaults.timeout_ms),
            max_prompt_chars: env_or("PAWNTALK_MAX_PROMPT_CHARS", defaults.max_prompt_chars),
            write_speech_files: env_or("PAWNTALK_WRITE_SPEECH_FILES", defaults.write_speech_files),
        }
    }

    /// Reject values the completion endpoint or prompt assembler cannot use.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.model.trim().is_empty() {
            return Err(DomainError::validation("model must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::validation(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.timeout_ms == 0 {
            return Err(DomainError::validation("timeout_ms must be positive"));
        }
        if self.max_prompt_chars == 0 {
            return Err(DomainError::validation("max_prompt_chars must be positive"));
        }
        Ok(())
    }

    /// Stored settings win, except an empty stored token falls back to `seed`'s.
    pub fn merged_over(mut self, seed: &TalkSettings) -> Self {
        if self.api_token.is_empty() {
            self.api_token = seed.api_token.clone();
        }
        self
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
