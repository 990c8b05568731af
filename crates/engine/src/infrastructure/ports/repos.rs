//! Repository port traits for match, challenge and profile storage.

use async_trait::async_trait;
use duelbot_domain::{Challenge, ChallengeId, Match, MatchId, ParticipantId, Profile};

use super::error::RepoError;

// =============================================================================
// Match Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRepo: Send + Sync {
    /// Insert a new match. Fails with `ConstraintViolation` when an active
    /// match already exists for the same unordered pair; the check and the
    /// insert are atomic.
    async fn create(&self, arena_match: &Match) -> Result<(), RepoError>;
    async fn get(&self, id: MatchId) -> Result<Option<Match>, RepoError>;
    async fn find_active_by_pair(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<Option<Match>, RepoError>;
    /// Compare-and-swap write. The stored version must equal
    /// `arena_match.previous_version()`, otherwise `Conflict`.
    async fn save(&self, arena_match: &Match) -> Result<(), RepoError>;
    async fn list_active_containing(
        &self,
        participant: ParticipantId,
    ) -> Result<Vec<Match>, RepoError>;
}

// =============================================================================
// Challenge Storage
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChallengeRepo: Send + Sync {
    async fn create(&self, challenge: &Challenge) -> Result<(), RepoError>;
    async fn get(&self, id: ChallengeId) -> Result<Option<Challenge>, RepoError>;
    /// Most recent pending challenge from `challenger` to `challenged`.
    async fn find_pending(
        &self,
        challenger: ParticipantId,
        challenged: ParticipantId,
    ) -> Result<Option<Challenge>, RepoError>;
    /// Record an answer. Only a stored challenge that is still pending
    /// may change; a terminal one yields `Conflict`.
    async fn save(&self, challenge: &Challenge) -> Result<(), RepoError>;
}

// =============================================================================
// Profiles
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get(&self, participant: ParticipantId) -> Result<Option<Profile>, RepoError>;
}

/// Registration for front ends that create users on first contact.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Returns `true` when a new user was created.
    async fn register_if_missing(
        &self,
        participant: ParticipantId,
        display_name: &str,
    ) -> Result<bool, RepoError>;
}
