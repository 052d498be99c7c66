use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask glyph used when the token is hidden.
pub const MASK_CHAR: char = '•';

/// Longest mask ever rendered, whatever the token length.
pub const MAX_MASK_LEN: usize = 64;

/// API token that never prints itself.
///
/// `Debug` and `Display` render the mask; call [`SecretToken::reveal`] for
/// the real value.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn reveal(&self) -> &str {
        &self.0
    }

    /// True when the token is empty or whitespace only.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn masked(&self) -> String {
        std::iter::repeat(MASK_CHAR)
            .take(self.0.chars().count().min(MAX_MASK_LEN))
            .collect()
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretToken({})", self.masked())
    }
}

impl fmt::Display for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}
