//! Combat resolution errors.

use crate::infrastructure::ports::{InventoryError, RepoError};
use duelbot_domain::{DomainError, MatchId, ParticipantId};

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("Match {0} not found or already ended")]
    MatchNotFound(MatchId),
    #[error("Not your turn in match {match_id}")]
    NotYourTurn {
        match_id: MatchId,
        actor: ParticipantId,
    },
    #[error("Participant {actor} is not in match {match_id}")]
    NotAParticipant {
        match_id: MatchId,
        actor: ParticipantId,
    },
    #[error("Participant {0} has no profile")]
    ParticipantMissing(ParticipantId),
    #[error("Match {0} kept changing underneath the action, giving up")]
    Contention(MatchId),
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

impl CombatError {
    /// Expected refusals that say nothing about system health.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            Self::MatchNotFound(_) | Self::NotYourTurn { .. } | Self::NotAParticipant { .. }
        )
    }
}
