//! Match lifecycle errors.

use crate::infrastructure::ports::RepoError;
use duelbot_domain::{DomainError, MatchId, ParticipantId};

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("An active match already exists between {a} and {b}")]
    DuplicateActiveMatch { a: ParticipantId, b: ParticipantId },
    #[error("Participant {0} is not registered")]
    UnknownParticipant(ParticipantId),
    #[error("Match {0} kept changing underneath the forfeit, giving up")]
    Contention(MatchId),
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
