//! PawnTalk engine library.
//!
//! Generates short speech lines for host-simulation characters through a
//! chat-completion endpoint.
//!
//! ## Structure
//!
//! - `use_cases/` - Prompt assembly, talk flow, chat command, talk log, settings
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::{App, HostPorts};
