//! Duelbot Engine library.
//!
//! This crate contains everything around the pure combat rules: storage,
//! notifications, concurrency control and the command surface.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration across ports
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `stores/` - In-process state shared between use cases (per-match locks)
//! - `command` - Parsing of participant commands and choice tokens
//! - `api/` - Dispatch of commands to use cases
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod command;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Test fixtures module for integration testing.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
