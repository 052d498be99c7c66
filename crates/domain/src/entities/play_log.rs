//! The host's narrative play log.

use serde::{Deserialize, Serialize};

use crate::error::AttributeError;
use crate::ids::SubjectId;

/// One play-log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayLogEntry {
    /// Characters this entry concerns
    #[serde(default)]
    pub concerns: Vec<SubjectId>,
    /// Text from the concerned character's point of view; `None` if the host
    /// could not render it
    #[serde(default)]
    pub text: Option<String>,
}

impl PlayLogEntry {
    pub fn new(concerns: Vec<SubjectId>, text: impl Into<String>) -> Self {
        Self {
            concerns,
            text: Some(text.into()),
        }
    }

    pub fn concerns(&self, subject: &SubjectId) -> bool {
        self.concerns.iter().any(|c| c == subject)
    }
}

/// Read access to the play log, oldest entry first.
pub trait PlayLog: Send + Sync {
    fn entries(&self) -> Result<Vec<PlayLogEntry>, AttributeError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayLogSnapshot(pub Vec<PlayLogEntry>);

impl PlayLog for PlayLogSnapshot {
    fn entries(&self) -> Result<Vec<PlayLogEntry>, AttributeError> {
        Ok(self.0.clone())
    }
}
