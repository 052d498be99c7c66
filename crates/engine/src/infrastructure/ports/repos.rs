//! Repository port traits for persisted state.

use async_trait::async_trait;
use pawntalk_domain::{DialogueHistory, TalkSettings};

use super::error::RepoError;

// =============================================================================
// Settings Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn get(&self) -> Result<Option<TalkSettings>, RepoError>;
    async fn save(&self, settings: &TalkSettings) -> Result<(), RepoError>;
}

// =============================================================================
// Dialogue History Storage (one history per save slot)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepo: Send + Sync {
    /// Empty history when the slot has never been saved.
    async fn load(&self, save_slot: &str) -> Result<DialogueHistory, RepoError>;
    async fn save(&self, save_slot: &str, history: &DialogueHistory) -> Result<(), RepoError>;
}
