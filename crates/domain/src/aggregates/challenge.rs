//! Challenge aggregate - the pending handshake that precedes a match

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ChallengeId, ParticipantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl ChallengeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Expired => "expired",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for ChallengeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "expired" => Ok(Self::Expired),
            other => Err(DomainError::parse(format!(
                "Unknown challenge status: {}",
                other
            ))),
        }
    }
}

/// The challenged participant's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeDecision {
    Accept,
    Decline,
}

/// A challenge issued by one participant to another.
///
/// # Invariants
///
/// - `challenger != challenged`
/// - only `Pending` challenges transition; terminal statuses are final
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    id: ChallengeId,
    challenger: ParticipantId,
    challenged: ParticipantId,
    created_at: DateTime<Utc>,
    status: ChallengeStatus,
}

impl Challenge {
    pub fn new(
        challenger: ParticipantId,
        challenged: ParticipantId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if challenger == challenged {
            return Err(DomainError::validation("You cannot challenge yourself."));
        }
        Ok(Self {
            id: ChallengeId::new(),
            challenger,
            challenged,
            created_at: now,
            status: ChallengeStatus::Pending,
        })
    }

    /// Rebuild a stored challenge.
    pub fn restore(
        id: ChallengeId,
        challenger: ParticipantId,
        challenged: ParticipantId,
        created_at: DateTime<Utc>,
        status: ChallengeStatus,
    ) -> Self {
        Self {
            id,
            challenger,
            challenged,
            created_at,
            status,
        }
    }

    pub fn id(&self) -> ChallengeId {
        self.id
    }

    pub fn challenger(&self) -> ParticipantId {
        self.challenger
    }

    pub fn challenged(&self) -> ParticipantId {
        self.challenged
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> ChallengeStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == ChallengeStatus::Pending
    }

    /// Whether a pending challenge has outlived `ttl` at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.is_pending() && now - self.created_at > ttl
    }

    pub fn accept(&mut self) -> Result<(), DomainError> {
        self.transition(ChallengeStatus::Accepted)
    }

    pub fn decline(&mut self) -> Result<(), DomainError> {
        self.transition(ChallengeStatus::Declined)
    }

    pub fn expire(&mut self) -> Result<(), DomainError> {
        self.transition(ChallengeStatus::Expired)
    }

    fn transition(&mut self, to: ChallengeStatus) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state_transition(format!(
                "challenge {} is already {}",
                self.id,
                self.status.as_str()
            )));
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: ParticipantId = ParticipantId::new(1);
    const BOB: ParticipantId = ParticipantId::new(2);

    #[test]
    fn self_challenge_is_rejected() {
        let err = Challenge::new(ALICE, ALICE, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn terminal_status_is_final() {
        let mut challenge = Challenge::new(ALICE, BOB, Utc::now()).expect("valid");
        challenge.decline().expect("pending challenge");
        assert_eq!(challenge.status(), ChallengeStatus::Declined);
        assert!(challenge.accept().is_err());
        assert_eq!(challenge.status(), ChallengeStatus::Declined);
    }

    #[test]
    fn staleness_respects_ttl() {
        let issued = Utc::now();
        let challenge = Challenge::new(ALICE, BOB, issued).expect("valid");
        assert!(!challenge.is_stale(issued + Duration::seconds(30), Duration::minutes(1)));
        assert!(challenge.is_stale(issued + Duration::minutes(2), Duration::minutes(1)));
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            ChallengeStatus::Pending,
            ChallengeStatus::Accepted,
            ChallengeStatus::Declined,
            ChallengeStatus::Expired,
        ] {
            assert_eq!(status.as_str().parse::<ChallengeStatus>(), Ok(status));
        }
    }
}
