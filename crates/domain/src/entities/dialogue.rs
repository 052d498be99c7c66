use serde::{Deserialize, Serialize};

use crate::game_time::GameTick;
use crate::ids::SubjectId;

/// One generated line of speech, attributed to a subject.
///
/// Created once per successful completion and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub subject_id: SubjectId,
    pub text: String,
    pub tick: GameTick,
}

impl DialogueEntry {
    pub fn new(subject_id: SubjectId, text: impl Into<String>, tick: GameTick) -> Self {
        Self {
            subject_id,
            text: text.into(),
            tick,
        }
    }
}
