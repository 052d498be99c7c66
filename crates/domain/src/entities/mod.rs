//! Domain entities

mod character;
mod dialogue;
mod play_log;

pub use character::{
    AppearanceSnapshot, Backstories, CharacterSnapshot, CharacterTrait, HealthCondition,
    HealthState, MoodMemory, MoodState, Passion, SkillRecord, SubjectView,
};
pub use dialogue::DialogueEntry;
pub use play_log::{PlayLog, PlayLogEntry, PlayLogSnapshot};
