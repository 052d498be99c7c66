//! External service port traits (chat completion).

use std::time::Duration;

use async_trait::async_trait;

use super::error::LlmError;

// =============================================================================
// Completion Types
// =============================================================================

/// Which extraction path produced a reply's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// `choices[0].message.content` from a parsed response
    Structured,
    /// Degraded path: first quoted `content` value found in the raw body
    Heuristic,
}

/// Outcome of one completion round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionReply {
    Text {
        text: String,
        source: ExtractionSource,
    },
    /// The response carried no extractable text
    Empty,
    /// Non-2xx response (`status` set) or transport failure (`status` unset)
    Failed { status: Option<u16>, body: String },
}

impl CompletionReply {
    /// Display text when no reply text could be extracted.
    pub const NO_CONTENT: &'static str = "(no content)";

    /// Prefix marking a failed completion in display text.
    pub const ERROR_PREFIX: &'static str = "Error: ";

    /// Text shown to the user, including the failure sentinels.
    pub fn display_text(&self) -> String {
        match self {
            CompletionReply::Text { text, .. } => text.clone(),
            CompletionReply::Empty => Self::NO_CONTENT.to_string(),
            CompletionReply::Failed {
                status: Some(status),
                body,
            } => format!("{}{}\n{}", Self::ERROR_PREFIX, status, body),
            CompletionReply::Failed { status: None, body } => {
                format!("{}{}", Self::ERROR_PREFIX, body)
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            CompletionReply::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CompletionReply::Failed { .. })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionPort: Send + Sync {
    /// Perform exactly one POST of `body`.
    ///
    /// Returns `Err(LlmError::MissingToken)` without any I/O when `token` is blank.
    async fn post_completion(
        &self,
        token: &str,
        body: String,
        timeout: Duration,
    ) -> Result<CompletionReply, LlmError>;
}
