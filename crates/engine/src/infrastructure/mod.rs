//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod console;
pub mod history;
pub mod openai;
pub mod ports;
pub mod settings;
pub mod speech_file;
