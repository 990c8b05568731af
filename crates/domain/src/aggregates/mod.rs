//! Aggregate roots. All state changes to matches and challenges go through these.

pub mod arena_match;
pub mod challenge;

pub use arena_match::{Match, MatchKind, MatchParts, MatchStatus, Side};
pub use challenge::{Challenge, ChallengeDecision, ChallengeStatus};
