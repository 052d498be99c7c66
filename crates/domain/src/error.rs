//! Error types for the domain layer.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// A single character attribute could not be read from the host.
///
/// Raised by [`crate::SubjectView`] implementations. Prompt assembly treats it
/// as "omit this clause", never as a failure of the whole prompt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to read {attribute}: {message}")]
pub struct AttributeError {
    pub attribute: &'static str,
    pub message: String,
}

impl AttributeError {
    pub fn new(attribute: &'static str, message: impl Into<String>) -> Self {
        Self {
            attribute,
            message: message.into(),
        }
    }
}
