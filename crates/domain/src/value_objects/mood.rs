//! Mood and needs value objects
//!
//! - MoodBand: qualitative band derived from the host's 0..1 mood level
//! - RestCategory / HungerCategory: coarse need states read from the host

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative mood band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodBand {
    Excellent,
    Good,
    Neutral,
    Low,
    Terrible,
}

impl MoodBand {
    /// Band for a mood level in `0.0..=1.0`. Lower bounds are inclusive.
    pub fn from_level(level: f32) -> Self {
        if level >= 0.8 {
            MoodBand::Excellent
        } else if level >= 0.6 {
            MoodBand::Good
        } else if level >= 0.4 {
            MoodBand::Neutral
        } else if level >= 0.2 {
            MoodBand::Low
        } else {
            MoodBand::Terrible
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodBand::Excellent => "excellent",
            MoodBand::Good => "good",
            MoodBand::Neutral => "neutral",
            MoodBand::Low => "low",
            MoodBand::Terrible => "terrible",
        }
    }
}

impl fmt::Display for MoodBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestCategory {
    #[default]
    Rested,
    Tired,
    VeryTired,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HungerCategory {
    #[default]
    Fed,
    Hungry,
    UrgentlyHungry,
    Starving,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_are_inclusive() {
        assert_eq!(MoodBand::from_level(1.0), MoodBand::Excellent);
        assert_eq!(MoodBand::from_level(0.8), MoodBand::Excellent);
        assert_eq!(MoodBand::from_level(0.79), MoodBand::Good);
        assert_eq!(MoodBand::from_level(0.6), MoodBand::Good);
        assert_eq!(MoodBand::from_level(0.4), MoodBand::Neutral);
        assert_eq!(MoodBand::from_level(0.2), MoodBand::Low);
        assert_eq!(MoodBand::from_level(0.19), MoodBand::Terrible);
        assert_eq!(MoodBand::from_level(0.0), MoodBand::Terrible);
    }
}
