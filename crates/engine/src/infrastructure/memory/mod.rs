//! In-memory adapters for every storage and platform port.
//!
//! Nothing here persists. Used by tests and by the binary when
//! `DUELBOT_DB=:memory:`.

mod challenges;
mod matches;
mod notifier;
mod users;

pub use challenges::InMemoryChallengeRepo;
pub use matches::InMemoryMatchRepo;
pub use notifier::InMemoryNotifier;
pub use users::InMemoryUserStore;
