//! Headless host adapters used by the `pawntalk` runner.
//!
//! Speech and notices go to the log; the roster and clock are fixed
//! snapshots loaded from disk.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pawntalk_domain::{CharacterSnapshot, GameTick, SubjectId, SubjectView};

use crate::infrastructure::ports::{
    ColonistRoster, GameClock, HostError, NoticeKind, Notifier, SpeechSink,
};

pub struct LogSpeechSink;

impl SpeechSink for LogSpeechSink {
    fn show_speech(&self, subject: &SubjectId, text: &str) -> Result<(), HostError> {
        tracing::info!(subject = %subject, text, "Speech bubble");
        Ok(())
    }

    fn add_play_log(&self, subject: &SubjectId, line: &str) -> Result<(), HostError> {
        tracing::info!(subject = %subject, line, "Play log");
        Ok(())
    }
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Positive => tracing::info!(message, "Notice"),
            NoticeKind::Reject => tracing::warn!(message, "Notice"),
        }
    }
}

/// Clock pinned to a tick; `advance` moves it forward.
pub struct ManualGameClock {
    tick: AtomicU64,
}

impl ManualGameClock {
    pub fn new(tick: GameTick) -> Self {
        Self {
            tick: AtomicU64::new(tick.ticks()),
        }
    }

    pub fn advance(&self, ticks: u64) {
        self.tick.fetch_add(ticks, Ordering::Relaxed);
    }
}

impl GameClock for ManualGameClock {
    fn current_tick(&self) -> GameTick {
        GameTick::new(self.tick.load(Ordering::Relaxed))
    }
}

/// Roster over a fixed list of character snapshots.
pub struct SnapshotRoster {
    colonists: Vec<Arc<dyn SubjectView>>,
}

impl SnapshotRoster {
    pub fn new(snapshots: Vec<CharacterSnapshot>) -> Self {
        Self {
            colonists: snapshots
                .into_iter()
                .map(|s| Arc::new(s) as Arc<dyn SubjectView>)
                .collect(),
        }
    }
}

impl ColonistRoster for SnapshotRoster {
    fn free_colonists(&self) -> Result<Vec<Arc<dyn SubjectView>>, HostError> {
        Ok(self.colonists.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualGameClock::new(GameTick::new(100));
        clock.advance(2_500);
        assert_eq!(clock.current_tick(), GameTick::new(2_600));
    }

    #[test]
    fn roster_lists_all_snapshots() {
        let roster = SnapshotRoster::new(vec![
            CharacterSnapshot::named("1", "Tynan"),
            CharacterSnapshot::named("2", "Cassandra"),
        ]);
        let labels: Vec<String> = roster
            .free_colonists()
            .unwrap()
            .iter()
            .map(|c| c.label())
            .collect();
        assert_eq!(labels, vec!["Tynan", "Cassandra"]);
    }
}
