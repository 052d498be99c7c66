//! Host application ports.
//!
//! The talk feature never reaches into host internals; the host (or an
//! adapter for it) implements these traits instead.

use std::sync::Arc;

use async_trait::async_trait;
use pawntalk_domain::{GameTick, SubjectId, SubjectView};

use super::error::HostError;

/// Kind of a transient on-screen message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Positive,
    Reject,
}

/// Transient user-facing messages.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NoticeKind);
}

/// Where generated speech ends up on the host side.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechSink: Send + Sync {
    /// Floating speech text above the character.
    fn show_speech(&self, subject: &SubjectId, text: &str) -> Result<(), HostError>;

    /// Line in the host's play log, visible on the character's log tab.
    fn add_play_log(&self, subject: &SubjectId, line: &str) -> Result<(), HostError>;
}

/// Current simulation tick.
#[cfg_attr(test, mockall::automock)]
pub trait GameClock: Send + Sync {
    fn current_tick(&self) -> GameTick;
}

/// Player-controlled colonists that can be asked to talk.
pub trait ColonistRoster: Send + Sync {
    fn free_colonists(&self) -> Result<Vec<Arc<dyn SubjectView>>, HostError>;
}

// =============================================================================
// Chat relay contract
// =============================================================================

/// A chat message forwarded by a third-party chat relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingChatMessage {
    pub user: String,
    pub message: String,
}

impl IncomingChatMessage {
    pub fn new(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
        }
    }
}

/// Contract a chat-relay integration implements to feed chat commands in.
#[async_trait]
pub trait ChatRelay: Send {
    /// Next message, or `None` once the relay has shut down.
    async fn recv(&mut self) -> Option<IncomingChatMessage>;
}
