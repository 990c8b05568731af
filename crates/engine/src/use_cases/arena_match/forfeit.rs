//! Forfeit use case.

use std::sync::Arc;

use duelbot_domain::{Match, ParticipantId};

use super::error::MatchError;
use crate::infrastructure::ports::{ClockPort, MatchRepo};
use crate::stores::MatchLocks;
use crate::use_cases::notices::MatchNotices;

/// Ends every active match the participant is in, with no winner and no
/// rewards. Opponents are told.
pub struct ForfeitMatches {
    matches: Arc<dyn MatchRepo>,
    locks: Arc<MatchLocks>,
    notices: Arc<MatchNotices>,
    clock: Arc<dyn ClockPort>,
    max_attempts: u32,
}

impl ForfeitMatches {
    pub fn new(
        matches: Arc<dyn MatchRepo>,
        locks: Arc<MatchLocks>,
        notices: Arc<MatchNotices>,
        clock: Arc<dyn ClockPort>,
        max_attempts: u32,
    ) -> Self {
        Self {
            matches,
            locks,
            notices,
            clock,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Returns how many matches were ended.
    ///
    /// A match that keeps losing version races does not stop the others from
    /// ending, but the call then fails with `Contention`.
    pub async fn execute(&self, participant: ParticipantId) -> Result<usize, MatchError> {
        let active = self.matches.list_active_containing(participant).await?;
        let mut ended = 0;
        let mut contended = None;

        for candidate in active {
            match self.end_one(candidate, participant).await {
                Ok(Some(arena_match)) => {
                    self.locks.forget(arena_match.id());
                    self.notices.forfeited(&arena_match, participant).await;
                    ended += 1;
                }
                Ok(None) => {}
                Err(MatchError::Contention(id)) => {
                    contended.get_or_insert(id);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(participant = %participant, ended, "Participant forfeited active matches");
        match contended {
            Some(id) => Err(MatchError::Contention(id)),
            None => Ok(ended),
        }
    }

    /// End one match, reloading on version conflicts. `None` when the match
    /// finished some other way in the meantime.
    async fn end_one(
        &self,
        candidate: Match,
        participant: ParticipantId,
    ) -> Result<Option<Match>, MatchError> {
        let id = candidate.id();
        let _guard = self.locks.acquire(id).await;

        for attempt in 1..=self.max_attempts {
            let Some(mut arena_match) = self.matches.get(id).await? else {
                return Ok(None);
            };
            if !arena_match.is_active() || !arena_match.is_participant(participant) {
                return Ok(None);
            }

            arena_match.forfeit(self.clock.now())?;
            match self.matches.save(&arena_match).await {
                Ok(()) => {
                    tracing::info!(match_id = %id, participant = %participant, "Match forfeited");
                    return Ok(Some(arena_match));
                }
                Err(e) if e.is_conflict() => {
                    tracing::debug!(match_id = %id, attempt, "Forfeit lost a version race, reloading");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(match_id = %id, participant = %participant, "Forfeit gave up after repeated conflicts");
        Err(MatchError::Contention(id))
    }
}
