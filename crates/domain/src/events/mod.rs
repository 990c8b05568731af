//! Domain Events
//!
//! Return types from aggregate mutations, communicating what happened when
//! match state was modified.

pub mod combat_events;

pub use combat_events::*;
