//! Headless state of the API token field on the settings screen.
//!
//! The field behaves like a password field: masked until revealed, and
//! editable either way.

use std::sync::Arc;

use pawntalk_domain::{SecretToken, TalkSettings};

use super::{SettingsError, SettingsOps};
use crate::infrastructure::ports::{NoticeKind, Notifier};

/// Notice shown after the token is stored.
pub const TOKEN_SAVED_NOTICE: &str = "API token saved.";

pub struct TokenEditor {
    ops: Arc<SettingsOps>,
    notifier: Arc<dyn Notifier>,
    settings: TalkSettings,
    buffer: SecretToken,
    revealed: bool,
}

impl TokenEditor {
    /// Open the editor on the current effective settings.
    pub async fn open(
        ops: Arc<SettingsOps>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, SettingsError> {
        let settings = ops.get().await?;
        Ok(Self {
            ops,
            notifier,
            buffer: settings.api_token.clone(),
            settings,
            revealed: false,
        })
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn toggle_visibility(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Label of the show/hide button.
    pub fn toggle_label(&self) -> &'static str {
        if self.revealed {
            "Hide"
        } else {
            "Show"
        }
    }

    /// Field contents: the token when revealed, its mask otherwise.
    pub fn display_text(&self) -> String {
        if self.revealed {
            self.buffer.reveal().to_string()
        } else {
            self.buffer.masked()
        }
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = SecretToken::new(text);
    }

    /// Plain token for the host clipboard.
    pub fn copy_text(&self) -> &str {
        self.buffer.reveal()
    }

    /// Persist the buffer as the API token.
    pub async fn save(&mut self) -> Result<(), SettingsError> {
        let mut updated = self.settings.clone();
        updated.api_token = SecretToken::new(self.buffer.reveal().trim());

        self.settings = self.ops.update(updated).await?;
        self.buffer = self.settings.api_token.clone();
        self.notifier.notify(TOKEN_SAVED_NOTICE, NoticeKind::Positive);
        tracing::info!(token = %self.buffer, "API token updated");
        Ok(())
    }
}
