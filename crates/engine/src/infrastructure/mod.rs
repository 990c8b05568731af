//! Infrastructure implementations.
//!
//! Contains port trait implementations for storage and the host platform.

pub mod clock;
pub mod config;
pub mod memory;
pub mod notifier;
pub mod ports;
pub mod sqlite;
