//! Respond to challenge use case.

use std::sync::Arc;

use duelbot_domain::{Challenge, ChallengeDecision, Match, ParticipantId};

use super::error::ChallengeError;
use crate::infrastructure::ports::{ChallengeRepo, ClockPort, ProfileRepo};
use crate::use_cases::arena_match::CreateMatch;
use crate::use_cases::notices::MatchNotices;

#[derive(Debug, Clone)]
pub enum ChallengeResponse {
    Declined,
    Accepted(Match),
}

pub struct RespondToChallenge {
    challenges: Arc<dyn ChallengeRepo>,
    profiles: Arc<dyn ProfileRepo>,
    create_match: Arc<CreateMatch>,
    notices: Arc<MatchNotices>,
    clock: Arc<dyn ClockPort>,
    ttl: Option<chrono::Duration>,
}

impl RespondToChallenge {
    pub fn new(
        challenges: Arc<dyn ChallengeRepo>,
        profiles: Arc<dyn ProfileRepo>,
        create_match: Arc<CreateMatch>,
        notices: Arc<MatchNotices>,
        clock: Arc<dyn ClockPort>,
        ttl: Option<chrono::Duration>,
    ) -> Self {
        Self {
            challenges,
            profiles,
            create_match,
            notices,
            clock,
            ttl,
        }
    }

    /// Answer the pending challenge `challenger` sent to `challenged`.
    ///
    /// Accepting starts a match with the challenger as side A, so the
    /// challenger moves first.
    pub async fn execute(
        &self,
        challenged: ParticipantId,
        challenger: ParticipantId,
        decision: ChallengeDecision,
    ) -> Result<ChallengeResponse, ChallengeError> {
        let mut challenge = self
            .challenges
            .find_pending(challenger, challenged)
            .await?
            .ok_or(ChallengeError::ChallengeNotFound {
                challenger,
                challenged,
            })?;

        if let Some(ttl) = self.ttl {
            if challenge.is_stale(self.clock.now(), ttl) {
                challenge.expire()?;
                self.claim(&challenge, challenger, challenged).await?;
                tracing::info!(challenge_id = %challenge.id(), "Challenge expired before an answer");
                return Err(ChallengeError::ChallengeExpired {
                    challenger,
                    challenged,
                });
            }
        }

        let challenged_name = self
            .profiles
            .get(challenged)
            .await?
            .map(|p| p.display_name)
            .unwrap_or_else(|| challenged.to_string());

        match decision {
            ChallengeDecision::Decline => {
                challenge.decline()?;
                self.claim(&challenge, challenger, challenged).await?;
                self.notices
                    .challenge_declined(challenger, &challenged_name)
                    .await;
                tracing::info!(challenge_id = %challenge.id(), "Challenge declined");
                Ok(ChallengeResponse::Declined)
            }
            ChallengeDecision::Accept => {
                challenge.accept()?;
                self.claim(&challenge, challenger, challenged).await?;
                let arena_match = self.create_match.execute(challenger, challenged).await?;

                self.notices
                    .match_started(challenger, &challenged_name)
                    .await;
                self.notices.turn_prompt(&arena_match).await;

                tracing::info!(
                    challenge_id = %challenge.id(),
                    match_id = %arena_match.id(),
                    "Challenge accepted"
                );
                Ok(ChallengeResponse::Accepted(arena_match))
            }
        }
    }

    /// Persist the answer only if the stored challenge is still pending.
    /// Losing that race means someone else already answered it.
    async fn claim(
        &self,
        challenge: &Challenge,
        challenger: ParticipantId,
        challenged: ParticipantId,
    ) -> Result<(), ChallengeError> {
        match self.challenges.save(challenge).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_conflict() => {
                tracing::debug!(challenge_id = %challenge.id(), "Challenge already answered");
                Err(ChallengeError::ChallengeNotFound {
                    challenger,
                    challenged,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
