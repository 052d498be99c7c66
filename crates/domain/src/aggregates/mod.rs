//! Aggregates

mod dialogue_history;

pub use dialogue_history::DialogueHistory;
