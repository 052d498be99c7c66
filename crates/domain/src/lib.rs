extern crate self as pawntalk_domain;

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod game_time;
pub mod ids;
pub mod value_objects;

pub use aggregates::DialogueHistory;

pub use entities::{
    AppearanceSnapshot, Backstories, CharacterSnapshot, CharacterTrait, DialogueEntry,
    HealthCondition, HealthState, MoodMemory, MoodState, Passion, PlayLog, PlayLogEntry,
    PlayLogSnapshot, SkillRecord, SubjectView,
};

pub use error::{AttributeError, DomainError};

pub use game_time::{GameTick, TICKS_PER_DAY, TICKS_PER_HOUR};

pub use ids::{SubjectId, TalkRequestId};

pub use value_objects::{
    HungerCategory, MoodBand, RestCategory, SecretToken, TalkSettings, DEFAULT_MAX_PROMPT_CHARS,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_MS,
};
