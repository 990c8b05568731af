//! Match aggregate - one bounded combat session between two participants
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: HP, turn ownership, and outcome only change through methods
//! - **Valid by construction**: `new()` and `from_parts()` reject broken invariants
//! - **Revisioned**: every mutation bumps `version`, which repositories use as an
//!   optimistic concurrency token

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combat::{max_hp_for_level, revival_floor};
use crate::error::DomainError;
use crate::events::{ActionEffect, MatchResult, TurnOutcome};
use crate::ids::{MatchId, ParticipantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    PlayerVsPlayer,
    /// Resolved in one step and never persisted as a match row.
    PlayerVsBot,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlayerVsPlayer => "player",
            Self::PlayerVsBot => "bot",
        }
    }
}

impl FromStr for MatchKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(Self::PlayerVsPlayer),
            "bot" => Ok(Self::PlayerVsBot),
            other => Err(DomainError::parse(format!("Unknown match kind: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Active,
    Ended,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "ended" => Ok(Self::Ended),
            other => Err(DomainError::parse(format!("Unknown match status: {}", other))),
        }
    }
}

/// Which seat a participant occupies. `A` is the challenger and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Flat representation of a match, used by repositories to store and restore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchParts {
    pub id: MatchId,
    pub kind: MatchKind,
    pub participant_a: ParticipantId,
    pub participant_b: ParticipantId,
    pub max_hp_a: i32,
    pub max_hp_b: i32,
    pub hp_a: i32,
    pub hp_b: i32,
    pub turn_holder: ParticipantId,
    pub status: MatchStatus,
    pub winner: Option<ParticipantId>,
    pub loser: Option<ParticipantId>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// A player-vs-player match.
///
/// # Invariants
///
/// - `participant_a != participant_b`
/// - `turn_holder` is always one of the two participants
/// - `result` is `None` while active; after the match ends it is `Some` for a
///   combat win and `None` for a forfeit
/// - once `Ended`, nothing changes again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    id: MatchId,
    kind: MatchKind,
    participant_a: ParticipantId,
    participant_b: ParticipantId,
    max_hp_a: i32,
    max_hp_b: i32,
    hp_a: i32,
    hp_b: i32,
    turn_holder: ParticipantId,
    status: MatchStatus,
    result: Option<MatchResult>,
    version: u64,
    created_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl Match {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Start a player-vs-player match at full HP with `participant_a` to move.
    pub fn new(
        participant_a: ParticipantId,
        level_a: u32,
        participant_b: ParticipantId,
        level_b: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if participant_a == participant_b {
            return Err(DomainError::validation(
                "a match needs two distinct participants",
            ));
        }
        let max_hp_a = max_hp_for_level(level_a);
        let max_hp_b = max_hp_for_level(level_b);
        Ok(Self {
            id: MatchId::new(),
            kind: MatchKind::PlayerVsPlayer,
            participant_a,
            participant_b,
            max_hp_a,
            max_hp_b,
            hp_a: max_hp_a,
            hp_b: max_hp_b,
            turn_holder: participant_a,
            status: MatchStatus::Active,
            result: None,
            version: 0,
            created_at: now,
            ended_at: None,
        })
    }

    /// Restore a stored match, re-checking every invariant.
    pub fn from_parts(parts: MatchParts) -> Result<Self, DomainError> {
        if parts.participant_a == parts.participant_b {
            return Err(DomainError::validation("stored match has one participant twice"));
        }
        if parts.turn_holder != parts.participant_a && parts.turn_holder != parts.participant_b {
            return Err(DomainError::validation(
                "stored turn holder is not a participant",
            ));
        }
        let result = match (parts.winner, parts.loser) {
            (None, None) => None,
            (Some(winner), Some(loser)) => Some(MatchResult { winner, loser }),
            _ => {
                return Err(DomainError::validation(
                    "stored match has a winner without a loser or vice versa",
                ))
            }
        };
        if parts.status == MatchStatus::Active && result.is_some() {
            return Err(DomainError::validation("active match already has a result"));
        }
        Ok(Self {
            id: parts.id,
            kind: parts.kind,
            participant_a: parts.participant_a,
            participant_b: parts.participant_b,
            max_hp_a: parts.max_hp_a,
            max_hp_b: parts.max_hp_b,
            hp_a: parts.hp_a,
            hp_b: parts.hp_b,
            turn_holder: parts.turn_holder,
            status: parts.status,
            result,
            version: parts.version,
            created_at: parts.created_at,
            ended_at: parts.ended_at,
        })
    }

    pub fn to_parts(&self) -> MatchParts {
        MatchParts {
            id: self.id,
            kind: self.kind,
            participant_a: self.participant_a,
            participant_b: self.participant_b,
            max_hp_a: self.max_hp_a,
            max_hp_b: self.max_hp_b,
            hp_a: self.hp_a,
            hp_b: self.hp_b,
            turn_holder: self.turn_holder,
            status: self.status,
            winner: self.winner(),
            loser: self.loser(),
            version: self.version,
            created_at: self.created_at,
            ended_at: self.ended_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> MatchId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    #[inline]
    pub fn participant_a(&self) -> ParticipantId {
        self.participant_a
    }

    #[inline]
    pub fn participant_b(&self) -> ParticipantId {
        self.participant_b
    }

    #[inline]
    pub fn turn_holder(&self) -> ParticipantId {
        self.turn_holder
    }

    #[inline]
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == MatchStatus::Active
    }

    #[inline]
    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    pub fn winner(&self) -> Option<ParticipantId> {
        self.result.map(|r| r.winner)
    }

    pub fn loser(&self) -> Option<ParticipantId> {
        self.result.map(|r| r.loser)
    }

    /// Revision counter. Bumped by every mutation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The revision a repository must still hold for a save of this match to win.
    pub fn previous_version(&self) -> u64 {
        self.version.saturating_sub(1)
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn hp(&self, side: Side) -> i32 {
        match side {
            Side::A => self.hp_a,
            Side::B => self.hp_b,
        }
    }

    pub fn max_hp(&self, side: Side) -> i32 {
        match side {
            Side::A => self.max_hp_a,
            Side::B => self.max_hp_b,
        }
    }

    pub fn participant(&self, side: Side) -> ParticipantId {
        match side {
            Side::A => self.participant_a,
            Side::B => self.participant_b,
        }
    }

    pub fn side_of(&self, participant: ParticipantId) -> Option<Side> {
        if participant == self.participant_a {
            Some(Side::A)
        } else if participant == self.participant_b {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn is_participant(&self, participant: ParticipantId) -> bool {
        self.side_of(participant).is_some()
    }

    pub fn opponent_of(&self, participant: ParticipantId) -> Option<ParticipantId> {
        self.side_of(participant).map(|side| self.participant(side.other()))
    }

    /// Whether this match is between `x` and `y`, in either seat order.
    pub fn involves_pair(&self, x: ParticipantId, y: ParticipantId) -> bool {
        (self.participant_a == x && self.participant_b == y)
            || (self.participant_a == y && self.participant_b == x)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Apply one resolved action of the turn holder.
    ///
    /// Damage lands on the opponent, heals and revives on the actor. Afterwards
    /// side A's death is checked before side B's, the turn passes to the other
    /// participant, and the match ends if either side is at or below zero HP.
    pub fn apply_action(
        &mut self,
        actor: ParticipantId,
        effect: ActionEffect,
        now: DateTime<Utc>,
    ) -> Result<TurnOutcome, DomainError> {
        if !self.is_active() {
            return Err(DomainError::invalid_state_transition(format!(
                "match {} has already ended",
                self.id
            )));
        }
        if actor != self.turn_holder {
            return Err(DomainError::invalid_state_transition(format!(
                "participant {} does not hold the turn in match {}",
                actor, self.id
            )));
        }
        let side = self.side_of(actor).ok_or_else(|| {
            DomainError::validation(format!("{} is not in match {}", actor, self.id))
        })?;

        match effect {
            ActionEffect::Damage { amount } => {
                let target = self.hp_mut(side.other());
                *target = target.saturating_sub(amount);
            }
            ActionEffect::Heal { amount } => {
                let max = self.max_hp(side);
                let own = self.hp_mut(side);
                *own = own.saturating_add(amount).min(max);
            }
            ActionEffect::Revive => {
                let floor = revival_floor(self.max_hp(side));
                let own = self.hp_mut(side);
                *own = (*own).max(floor);
            }
            ActionEffect::Nothing { .. } => {}
        }

        let result = if self.hp_a <= 0 {
            Some(MatchResult {
                winner: self.participant_b,
                loser: self.participant_a,
            })
        } else if self.hp_b <= 0 {
            Some(MatchResult {
                winner: self.participant_a,
                loser: self.participant_b,
            })
        } else {
            None
        };

        self.turn_holder = self.participant(side.other());
        self.version += 1;

        match result {
            Some(result) => {
                self.status = MatchStatus::Ended;
                self.result = Some(result);
                self.ended_at = Some(now);
                Ok(TurnOutcome::Finished(result))
            }
            None => Ok(TurnOutcome::Continue {
                next_turn: self.turn_holder,
            }),
        }
    }

    /// End the match without a winner. No rewards follow a forfeit.
    pub fn forfeit(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::invalid_state_transition(format!(
                "match {} has already ended",
                self.id
            )));
        }
        self.status = MatchStatus::Ended;
        self.result = None;
        self.ended_at = Some(now);
        self.version += 1;
        Ok(())
    }

    fn hp_mut(&mut self, side: Side) -> &mut i32 {
        match side {
            Side::A => &mut self.hp_a,
            Side::B => &mut self.hp_b,
        }
    }
}
