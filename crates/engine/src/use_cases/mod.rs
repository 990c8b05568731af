//! Use cases - User story orchestration.
//!
//! Each module contains use cases for one part of a duel's life: the
//! challenge handshake, the match itself, turn resolution, and payout.

pub mod arena_match;
pub mod bot_duel;
pub mod challenge;
pub mod combat;
pub mod notices;
mod retry;
pub mod settlement;

// Re-export main types
pub use arena_match::MatchUseCases;
pub use bot_duel::BotDuel;
pub use challenge::ChallengeUseCases;
pub use combat::CombatUseCases;
pub use notices::MatchNotices;
pub use settlement::SettleRewards;
