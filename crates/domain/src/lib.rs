pub mod aggregates;
pub mod combat;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    Challenge, ChallengeDecision, ChallengeStatus, Match, MatchKind, MatchParts, MatchStatus, Side,
};

pub use error::DomainError;

pub use events::{ActionEffect, MatchResult, NoEffectReason, TurnOutcome};

// Re-export ID types
pub use ids::{ChallengeId, ItemId, MatchId, ParticipantId};

// Re-export value objects
pub use value_objects::{
    Attributes, CombatAction, CombatantSnapshot, ItemCategory, ItemHandle, LetterRank, Profile,
    Rank,
};
