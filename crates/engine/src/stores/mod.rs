//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in the database:
//! - `MatchLocks` - per-match serialization of action resolution

pub mod match_locks;

// Re-export store types
pub use match_locks::MatchLocks;
