//! Save-scoped dialogue history aggregate
//!
//! Insertion-ordered and bounded: once [`DialogueHistory::MAX_ENTRIES`] is
//! exceeded the oldest entries are evicted first. The serialized form is a
//! plain JSON array of entries; the cap is re-applied when loading.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::entities::DialogueEntry;
use crate::ids::SubjectId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DialogueEntry>", into = "Vec<DialogueEntry>")]
pub struct DialogueHistory {
    entries: VecDeque<DialogueEntry>,
}

impl DialogueHistory {
    /// Entries kept per save.
    pub const MAX_ENTRIES: usize = 2000;

    /// Entries shown in a subject's talk log by default.
    pub const DEFAULT_LOG_LEN: usize = 50;

    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest ones past the cap.
    ///
    /// Entries with blank text are ignored; returns whether the entry was kept.
    pub fn push(&mut self, entry: DialogueEntry) -> bool {
        if entry.text.trim().is_empty() {
            return false;
        }
        self.entries.push_back(entry);
        self.enforce_cap();
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DialogueEntry> {
        self.entries.iter()
    }

    /// The newest `last` entries of one subject, in chronological order.
    pub fn for_subject(&self, subject_id: &SubjectId, last: usize) -> Vec<&DialogueEntry> {
        let mut matching: Vec<&DialogueEntry> = self
            .entries
            .iter()
            .filter(|e| &e.subject_id == subject_id)
            .collect();
        matching.sort_by_key(|e| e.tick);
        let skip = matching.len().saturating_sub(last);
        matching.into_iter().skip(skip).collect()
    }

    fn enforce_cap(&mut self) {
        while self.entries.len() > Self::MAX_ENTRIES {
            self.entries.pop_front();
        }
    }
}

impl From<Vec<DialogueEntry>> for DialogueHistory {
    fn from(entries: Vec<DialogueEntry>) -> Self {
        let mut history = Self {
            entries: entries.into(),
        };
        history.enforce_cap();
        history
    }
}

impl From<DialogueHistory> for Vec<DialogueEntry> {
    fn from(history: DialogueHistory) -> Self {
        history.entries.into()
    }
}
