//! API layer - the command entry point front ends call into.

pub mod dispatch;
pub mod error_sanitizer;

pub use dispatch::Dispatcher;
