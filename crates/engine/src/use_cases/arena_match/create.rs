//! Create match use case.

use std::sync::Arc;

use duelbot_domain::{Match, ParticipantId};

use super::error::MatchError;
use crate::infrastructure::ports::{ClockPort, MatchRepo, ProfileRepo};

/// Starts a player-vs-player match between two registered participants.
///
/// HP comes from the participants' current levels, `a` moves first.
pub struct CreateMatch {
    matches: Arc<dyn MatchRepo>,
    profiles: Arc<dyn ProfileRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CreateMatch {
    pub fn new(
        matches: Arc<dyn MatchRepo>,
        profiles: Arc<dyn ProfileRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            matches,
            profiles,
            clock,
        }
    }

    pub async fn execute(&self, a: ParticipantId, b: ParticipantId) -> Result<Match, MatchError> {
        if self.matches.find_active_by_pair(a, b).await?.is_some() {
            return Err(MatchError::DuplicateActiveMatch { a, b });
        }

        let profile_a = self
            .profiles
            .get(a)
            .await?
            .ok_or(MatchError::UnknownParticipant(a))?;
        let profile_b = self
            .profiles
            .get(b)
            .await?
            .ok_or(MatchError::UnknownParticipant(b))?;

        let arena_match = Match::new(a, profile_a.level, b, profile_b.level, self.clock.now())?;

        // The repository re-checks the pair atomically with the insert.
        self.matches.create(&arena_match).await.map_err(|e| {
            if e.is_constraint() {
                MatchError::DuplicateActiveMatch { a, b }
            } else {
                MatchError::Repo(e)
            }
        })?;

        tracing::info!(
            match_id = %arena_match.id(),
            participant_a = %a,
            participant_b = %b,
            "Match created"
        );

        Ok(arena_match)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockMatchRepo, MockProfileRepo, RepoError};
    use chrono::Utc;
    use duelbot_domain::{Profile, Side};

    const ALICE: ParticipantId = ParticipantId::new(1);
    const BOB: ParticipantId = ParticipantId::new(2);

    fn profiles_with_levels(level_a: u32, level_b: u32) -> MockProfileRepo {
        let mut profiles = MockProfileRepo::new();
        profiles.expect_get().returning(move |id| {
            let level = if id == ALICE { level_a } else { level_b };
            Ok(Some(Profile::new(id, "someone").with_level(level)))
        });
        profiles
    }

    #[tokio::test]
    async fn when_pair_is_free_creates_match_with_level_based_hp() {
        let mut matches = MockMatchRepo::new();
        matches
            .expect_find_active_by_pair()
            .returning(|_, _| Ok(None));
        matches.expect_create().times(1).returning(|_| Ok(()));

        let use_case = CreateMatch::new(
            Arc::new(matches),
            Arc::new(profiles_with_levels(3, 0)),
            Arc::new(FixedClock(Utc::now())),
        );
        let created = use_case.execute(ALICE, BOB).await.unwrap();

        assert_eq!(created.max_hp(Side::A), 130);
        assert_eq!(created.max_hp(Side::B), 100);
        assert_eq!(created.turn_holder(), ALICE);
        assert!(created.is_active());
    }

    #[tokio::test]
    async fn when_active_match_exists_returns_duplicate() {
        let existing = Match::new(BOB, 1, ALICE, 1, Utc::now()).unwrap();
        let mut matches = MockMatchRepo::new();
        matches
            .expect_find_active_by_pair()
            .returning(move |_, _| Ok(Some(existing.clone())));
        matches.expect_create().never();

        let use_case = CreateMatch::new(
            Arc::new(matches),
            Arc::new(MockProfileRepo::new()),
            Arc::new(FixedClock(Utc::now())),
        );
        let result = use_case.execute(ALICE, BOB).await;

        assert!(matches!(result, Err(MatchError::DuplicateActiveMatch { .. })));
    }

    #[tokio::test]
    async fn when_insert_races_and_loses_returns_duplicate() {
        let mut matches = MockMatchRepo::new();
        matches
            .expect_find_active_by_pair()
            .returning(|_, _| Ok(None));
        matches
            .expect_create()
            .returning(|_| Err(RepoError::constraint("active pair")));

        let use_case = CreateMatch::new(
            Arc::new(matches),
            Arc::new(profiles_with_levels(1, 1)),
            Arc::new(FixedClock(Utc::now())),
        );
        let result = use_case.execute(ALICE, BOB).await;

        assert!(matches!(result, Err(MatchError::DuplicateActiveMatch { .. })));
    }

    #[tokio::test]
    async fn when_profile_missing_returns_unknown_participant() {
        let mut matches = MockMatchRepo::new();
        matches
            .expect_find_active_by_pair()
            .returning(|_, _| Ok(None));
        let mut profiles = MockProfileRepo::new();
        profiles.expect_get().returning(|id| {
            Ok((id == ALICE).then(|| Profile::new(id, "alice")))
        });

        let use_case = CreateMatch::new(
            Arc::new(matches),
            Arc::new(profiles),
            Arc::new(FixedClock(Utc::now())),
        );
        let result = use_case.execute(ALICE, BOB).await;

        assert!(matches!(result, Err(MatchError::UnknownParticipant(id)) if id == BOB));
    }
}
