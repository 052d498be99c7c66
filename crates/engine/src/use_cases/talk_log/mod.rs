//! Per-character talk log over the save-scoped dialogue history.

use std::sync::Arc;

use pawntalk_domain::{DialogueEntry, DialogueHistory, SubjectId};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{HistoryRepo, RepoError};

pub struct TalkLog {
    history: Arc<RwLock<DialogueHistory>>,
    repo: Arc<dyn HistoryRepo>,
}

impl TalkLog {
    pub fn new(history: Arc<RwLock<DialogueHistory>>, repo: Arc<dyn HistoryRepo>) -> Self {
        Self { history, repo }
    }

    /// Replace the in-memory history with the one stored for `save_slot`.
    pub async fn load(&self, save_slot: &str) -> Result<usize, RepoError> {
        let loaded = self.repo.load(save_slot).await?;
        let count = loaded.len();
        *self.history.write().await = loaded;
        tracing::info!(save_slot, entries = count, "Talk log loaded");
        Ok(count)
    }

    pub async fn save(&self, save_slot: &str) -> Result<(), RepoError> {
        let snapshot = self.history.read().await.clone();
        self.repo.save(save_slot, &snapshot).await?;
        tracing::debug!(save_slot, entries = snapshot.len(), "Talk log saved");
        Ok(())
    }

    /// Newest `last` lines of `subject_id`, oldest first.
    pub async fn for_subject(&self, subject_id: &SubjectId, last: usize) -> Vec<DialogueEntry> {
        self.history
            .read()
            .await
            .for_subject(subject_id, last)
            .into_iter()
            .cloned()
            .collect()
    }

    /// "Copy all" text of a subject's log.
    pub async fn transcript(&self, subject_id: &SubjectId, last: usize) -> String {
        render_transcript(&self.for_subject(subject_id, last).await)
    }
}

/// Dialog heading for a subject's log.
pub fn log_title(name: &str) -> String {
    format!("{name} – AI Talk Log")
}

/// One `[Day d, hh:00] text` line per entry.
pub fn render_transcript(entries: &[DialogueEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("[{}] {}", e.tick, e.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawntalk_domain::{GameTick, TICKS_PER_DAY, TICKS_PER_HOUR};

    use crate::infrastructure::ports::MockHistoryRepo;

    fn entry(subject: &str, text: &str, tick: u64) -> DialogueEntry {
        DialogueEntry::new(SubjectId::new(subject), text, GameTick::new(tick))
    }

    fn history_of(entries: Vec<DialogueEntry>) -> Arc<RwLock<DialogueHistory>> {
        Arc::new(RwLock::new(DialogueHistory::from(entries)))
    }

    #[tokio::test]
    async fn for_subject_keeps_newest_in_chronological_order() {
        let history = history_of(vec![
            entry("a", "one", 10),
            entry("b", "other", 15),
            entry("a", "two", 20),
            entry("a", "three", 30),
        ]);
        let log = TalkLog::new(history, Arc::new(MockHistoryRepo::new()));

        let texts: Vec<String> = log
            .for_subject(&SubjectId::new("a"), 2)
            .await
            .into_iter()
            .map(|e| e.text)
            .collect();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn transcript_prefixes_game_date() {
        let history = history_of(vec![
            entry("a", "Morning.", TICKS_PER_HOUR * 6),
            entry("a", "Next day.", TICKS_PER_DAY + TICKS_PER_HOUR * 14),
        ]);
        let log = TalkLog::new(history, Arc::new(MockHistoryRepo::new()));

        assert_eq!(
            log.transcript(&SubjectId::new("a"), 50).await,
            "[Day 1, 06:00] Morning.\n[Day 2, 14:00] Next day."
        );
        assert_eq!(log.transcript(&SubjectId::new("nobody"), 50).await, "");
    }

    #[tokio::test]
    async fn load_replaces_and_save_persists_current_history() {
        let stored = DialogueHistory::from(vec![entry("a", "from disk", 5)]);

        let mut repo = MockHistoryRepo::new();
        let returned = stored.clone();
        repo.expect_load()
            .withf(|slot| slot == "colony")
            .times(1)
            .returning(move |_| Ok(returned.clone()));
        repo.expect_save()
            .withf(|slot, history| slot == "colony" && history.len() == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let history = history_of(vec![entry("z", "stale", 1)]);
        let log = TalkLog::new(history.clone(), Arc::new(repo));

        assert_eq!(log.load("colony").await.unwrap(), 1);
        assert_eq!(*history.read().await, stored);

        history.write().await.push(entry("a", "new line", 9));
        log.save("colony").await.unwrap();
    }

    #[test]
    fn title_names_subject() {
        assert_eq!(log_title("Emmie"), "Emmie – AI Talk Log");
    }
}
