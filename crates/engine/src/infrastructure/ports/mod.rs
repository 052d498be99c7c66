//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The chat-completion endpoint (could swap OpenAI -> any compatible API)
//! - Persistence (settings, per-save dialogue history)
//! - The host simulation (speech display, notices, roster, ticks, chat relay)
//! - Clock/Random (for testing)

mod error;
mod external;
mod host;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{HistoryRepo, SettingsRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{CompletionPort, CompletionReply, ExtractionSource};

// =============================================================================
// Host Ports
// =============================================================================
pub use host::{
    ChatRelay, ColonistRoster, GameClock, IncomingChatMessage, NoticeKind, Notifier, SpeechSink,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::MockCompletionPort;
#[cfg(test)]
pub use host::{MockGameClock, MockNotifier, MockSpeechSink};
#[cfg(test)]
pub use repos::{MockHistoryRepo, MockSettingsRepo};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{HostError, LlmError, RepoError};
