//! Challenge negotiation errors.

use crate::infrastructure::ports::RepoError;
use crate::use_cases::arena_match::MatchError;
use duelbot_domain::{DomainError, ParticipantId};

#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("You cannot challenge yourself")]
    InvalidTarget,
    #[error("Participant {0} is not registered")]
    UnknownParticipant(ParticipantId),
    #[error("No pending challenge from {challenger} to {challenged}")]
    ChallengeNotFound {
        challenger: ParticipantId,
        challenged: ParticipantId,
    },
    #[error("The challenge from {challenger} to {challenged} has expired")]
    ChallengeExpired {
        challenger: ParticipantId,
        challenged: ParticipantId,
    },
    #[error("Match error: {0}")]
    Match(#[from] MatchError),
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
