//! Character attributes as seen by the talk feature.
//!
//! [`SubjectView`] is the read contract the host implements over its live
//! character objects. Every attribute read is fallible on its own so a broken
//! attribute costs one prompt clause, not the whole prompt.
//! [`CharacterSnapshot`] is a plain, serializable implementation used by the
//! runner and by tests.

use serde::{Deserialize, Serialize};

use crate::error::AttributeError;
use crate::ids::SubjectId;
use crate::value_objects::{HungerCategory, RestCategory};

/// Passion for a skill. Ordering follows strength.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Passion {
    #[default]
    None,
    Minor,
    Major,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backstories {
    #[serde(default)]
    pub childhood: Option<String>,
    #[serde(default)]
    pub adulthood: Option<String>,
}

/// Personality trait. `degree` is signed; its magnitude is the strength.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterTrait {
    pub label: String,
    #[serde(default)]
    pub degree: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub label: String,
    pub level: u32,
    #[serde(default)]
    pub passion: Passion,
}

/// A health condition (injury, disease, implant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCondition {
    pub label: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub bleeding: bool,
    #[serde(default)]
    pub implant: bool,
}

fn default_true() -> bool {
    true
}

impl HealthCondition {
    /// Worth mentioning: visible and either lasting, bleeding, or an implant.
    pub fn is_notable(&self) -> bool {
        self.visible && (self.permanent || self.bleeding || self.implant)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthState {
    /// Total pain in `0.0..=1.0`
    #[serde(default)]
    pub pain: f32,
    #[serde(default)]
    pub bleed_rate: f32,
    #[serde(default)]
    pub conditions: Vec<HealthCondition>,
    #[serde(default)]
    pub rest: Option<RestCategory>,
    #[serde(default)]
    pub food: Option<HungerCategory>,
}

/// A remembered event that shifts mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodMemory {
    pub label: String,
    pub mood_offset: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodState {
    /// Instant mood level in `0.0..=1.0`
    pub level: f32,
    #[serde(default)]
    pub memories: Vec<MoodMemory>,
}

/// Read access to one character of the host simulation.
pub trait SubjectView: Send + Sync {
    fn id(&self) -> SubjectId;

    /// Short capitalised display name.
    fn label(&self) -> String;

    fn full_name(&self) -> Option<String> {
        None
    }

    fn faction(&self) -> Result<Option<String>, AttributeError>;

    fn backstories(&self) -> Result<Backstories, AttributeError>;

    fn traits(&self) -> Result<Vec<CharacterTrait>, AttributeError>;

    /// `None` when the character has no skill tracker at all.
    fn skills(&self) -> Result<Option<Vec<SkillRecord>>, AttributeError>;

    /// `None` when the character has no health tracker.
    fn health(&self) -> Result<Option<HealthState>, AttributeError>;

    /// `None` when the character has no mood need.
    fn mood(&self) -> Result<Option<MoodState>, AttributeError>;
}

/// Detached copy of a character's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: SubjectId,
    pub label: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub backstories: Backstories,
    #[serde(default)]
    pub traits: Vec<CharacterTrait>,
    #[serde(default)]
    pub skills: Option<Vec<SkillRecord>>,
    #[serde(default)]
    pub health: Option<HealthState>,
    #[serde(default)]
    pub mood: Option<MoodState>,
}

impl CharacterSnapshot {
    /// Snapshot with a name and nothing else.
    pub fn named(id: impl Into<SubjectId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            full_name: None,
            faction: None,
            backstories: Backstories::default(),
            traits: Vec::new(),
            skills: None,
            health: None,
            mood: None,
        }
    }
}

impl SubjectView for CharacterSnapshot {
    fn id(&self) -> SubjectId {
        self.id.clone()
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn full_name(&self) -> Option<String> {
        self.full_name.clone()
    }

    fn faction(&self) -> Result<Option<String>, AttributeError> {
        Ok(self.faction.clone())
    }

    fn backstories(&self) -> Result<Backstories, AttributeError> {
        Ok(self.backstories.clone())
    }

    fn traits(&self) -> Result<Vec<CharacterTrait>, AttributeError> {
        Ok(self.traits.clone())
    }

    fn skills(&self) -> Result<Option<Vec<SkillRecord>>, AttributeError> {
        Ok(self.skills.clone())
    }

    fn health(&self) -> Result<Option<HealthState>, AttributeError> {
        Ok(self.health.clone())
    }

    fn mood(&self) -> Result<Option<MoodState>, AttributeError> {
        Ok(self.mood.clone())
    }
}

/// Visual attributes used for image-generation descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceSnapshot {
    pub gender: String,
    pub skin_color: String,
    pub hair: String,
    #[serde(default)]
    pub apparel: Vec<String>,
    #[serde(default)]
    pub implants: Vec<String>,
}
