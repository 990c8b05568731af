//! Issue challenge use case.

use std::sync::Arc;

use duelbot_domain::{Challenge, ParticipantId};

use super::error::ChallengeError;
use crate::infrastructure::ports::{ChallengeRepo, ClockPort, ProfileRepo};
use crate::use_cases::notices::MatchNotices;

/// A stored challenge and whether the challenged side was reached.
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    pub challenge: Challenge,
    pub delivered: bool,
}

pub struct IssueChallenge {
    challenges: Arc<dyn ChallengeRepo>,
    profiles: Arc<dyn ProfileRepo>,
    notices: Arc<MatchNotices>,
    clock: Arc<dyn ClockPort>,
}

impl IssueChallenge {
    pub fn new(
        challenges: Arc<dyn ChallengeRepo>,
        profiles: Arc<dyn ProfileRepo>,
        notices: Arc<MatchNotices>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            challenges,
            profiles,
            notices,
            clock,
        }
    }

    /// Store a pending challenge and prompt `challenged` with accept/decline
    /// choices.
    pub async fn execute(
        &self,
        challenger: ParticipantId,
        challenged: ParticipantId,
    ) -> Result<IssuedChallenge, ChallengeError> {
        if challenger == challenged {
            return Err(ChallengeError::InvalidTarget);
        }

        let challenger_profile = self
            .profiles
            .get(challenger)
            .await?
            .ok_or(ChallengeError::UnknownParticipant(challenger))?;
        if self.profiles.get(challenged).await?.is_none() {
            return Err(ChallengeError::UnknownParticipant(challenged));
        }

        let challenge = Challenge::new(challenger, challenged, self.clock.now())?;
        self.challenges.create(&challenge).await?;

        let delivered = self
            .notices
            .challenge_prompt(challenged, &challenger_profile)
            .await;

        tracing::info!(
            challenge_id = %challenge.id(),
            challenger = %challenger,
            challenged = %challenged,
            delivered,
            "Challenge issued"
        );

        Ok(IssuedChallenge {
            challenge,
            delivered,
        })
    }
}
