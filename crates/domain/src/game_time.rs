use serde::{Deserialize, Serialize};

/// Simulation ticks in one in-game day.
pub const TICKS_PER_DAY: u64 = 60_000;

/// Simulation ticks in one in-game hour.
pub const TICKS_PER_HOUR: u64 = 2_500;

/// Monotonic simulation tick as reported by the host's tick manager.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameTick(u64);

impl GameTick {
    pub const ZERO: GameTick = GameTick(0);

    pub fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    pub fn ticks(&self) -> u64 {
        self.0
    }

    /// 1-based in-game day.
    pub fn day(&self) -> u64 {
        self.0 / TICKS_PER_DAY + 1
    }

    /// Hour within the current day (0..24).
    pub fn hour(&self) -> u64 {
        (self.0 % TICKS_PER_DAY) / TICKS_PER_HOUR
    }
}

impl std::fmt::Display for GameTick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Day {}, {:02}:00", self.day(), self.hour())
    }
}
