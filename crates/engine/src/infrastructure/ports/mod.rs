//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Storage of matches, challenges and profiles (SQLite or in-memory)
//! - The host platform's ledger, inventory and messaging
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::*;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::*;

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::*;

// =============================================================================
// Errors
// =============================================================================
pub use error::{InventoryError, LedgerError, NotifyError, RepoError};
