//! Use cases - User story orchestration.
//!
//! Each module contains use cases for one feature area.

pub mod chat_command;
pub mod prompt;
pub mod settings;
pub mod talk;
pub mod talk_log;

pub use chat_command::{ChannelRelay, ChatCommandListener};
pub use prompt::PromptAssembler;
pub use settings::{SettingsOps, TokenEditor};
pub use talk::{TalkOutcome, TalkService};
pub use talk_log::TalkLog;
