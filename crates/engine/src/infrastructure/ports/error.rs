//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored value failed validation.
    #[error("Invalid value: {0}")]
    Invalid(String),
}

impl RepoError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

impl From<pawntalk_domain::DomainError> for RepoError {
    fn from(err: pawntalk_domain::DomainError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Local failures of the completion client.
///
/// HTTP and transport failures are not errors here: they come back as
/// [`super::CompletionReply::Failed`] so the display layer can show them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("Missing API token")]
    MissingToken,
}

/// A host-side display or lookup call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Host call failed: {0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
