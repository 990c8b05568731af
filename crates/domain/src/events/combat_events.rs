//! Combat-related domain events
//!
//! These enums communicate what an action did and where the match stands
//! afterwards, allowing callers to react appropriately.

use serde::{Deserialize, Serialize};

use crate::ids::ParticipantId;

/// Why an action resolved without touching HP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoEffectReason {
    /// UseItem with an empty inventory. Nothing consumed.
    NoItem,
    /// UseRevival without a revival item. Nothing consumed.
    NoRevivalItem,
    /// An item was consumed but its category has no combat effect.
    ItemHasNoEffect,
}

/// HP mutation computed for one action, before it is applied to a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionEffect {
    /// Damage dealt to the actor's opponent. Unclamped below zero.
    Damage { amount: i32 },
    /// Heal applied to the actor, clamped to the actor's max HP.
    Heal { amount: i32 },
    /// Raise the actor's HP to at least half of their max HP.
    Revive,
    Nothing { reason: NoEffectReason },
}

/// Final result of a combat-resolved match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: ParticipantId,
    pub loser: ParticipantId,
}

/// Where a match stands after an action has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    Continue { next_turn: ParticipantId },
    Finished(MatchResult),
}
