//! In-memory match storage with versioned saves.

use std::collections::HashMap;

use async_trait::async_trait;
use duelbot_domain::{Match, MatchId, ParticipantId};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{MatchRepo, RepoError};

#[derive(Default)]
pub struct InMemoryMatchRepo {
    matches: RwLock<HashMap<MatchId, Match>>,
}

impl InMemoryMatchRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchRepo for InMemoryMatchRepo {
    async fn create(&self, arena_match: &Match) -> Result<(), RepoError> {
        let mut matches = self.matches.write().await;
        let a = arena_match.participant_a();
        let b = arena_match.participant_b();
        if matches
            .values()
            .any(|m| m.is_active() && m.involves_pair(a, b))
        {
            return Err(RepoError::constraint(format!(
                "active match already exists between {} and {}",
                a, b
            )));
        }
        if matches.contains_key(&arena_match.id()) {
            return Err(RepoError::constraint(format!(
                "match {} already exists",
                arena_match.id()
            )));
        }
        matches.insert(arena_match.id(), arena_match.clone());
        Ok(())
    }

    async fn get(&self, id: MatchId) -> Result<Option<Match>, RepoError> {
        Ok(self.matches.read().await.get(&id).cloned())
    }

    async fn find_active_by_pair(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<Option<Match>, RepoError> {
        Ok(self
            .matches
            .read()
            .await
            .values()
            .find(|m| m.is_active() && m.involves_pair(a, b))
            .cloned())
    }

    async fn save(&self, arena_match: &Match) -> Result<(), RepoError> {
        let mut matches = self.matches.write().await;
        let stored = matches
            .get(&arena_match.id())
            .ok_or_else(|| RepoError::not_found("Match", arena_match.id()))?;
        if stored.version() != arena_match.previous_version() {
            return Err(RepoError::conflict(
                "Match",
                arena_match.id(),
                arena_match.previous_version(),
            ));
        }
        matches.insert(arena_match.id(), arena_match.clone());
        Ok(())
    }

    async fn list_active_containing(
        &self,
        participant: ParticipantId,
    ) -> Result<Vec<Match>, RepoError> {
        let mut active: Vec<Match> = self
            .matches
            .read()
            .await
            .values()
            .filter(|m| m.is_active() && m.is_participant(participant))
            .cloned()
            .collect();
        active.sort_by_key(|m| m.created_at());
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use duelbot_domain::ActionEffect;

    const ALICE: ParticipantId = ParticipantId::new(1);
    const BOB: ParticipantId = ParticipantId::new(2);
    const CAROL: ParticipantId = ParticipantId::new(3);

    #[tokio::test]
    async fn second_active_match_for_same_pair_is_rejected_in_either_order() {
        let repo = InMemoryMatchRepo::new();
        let first = Match::new(ALICE, 1, BOB, 1, Utc::now()).unwrap();
        repo.create(&first).await.unwrap();

        let reversed = Match::new(BOB, 1, ALICE, 1, Utc::now()).unwrap();
        let err = repo.create(&reversed).await.unwrap_err();
        assert!(err.is_constraint());

        let other_pair = Match::new(ALICE, 1, CAROL, 1, Utc::now()).unwrap();
        repo.create(&other_pair).await.unwrap();
    }

    #[tokio::test]
    async fn stale_save_conflicts() {
        let repo = InMemoryMatchRepo::new();
        let created = Match::new(ALICE, 1, BOB, 1, Utc::now()).unwrap();
        repo.create(&created).await.unwrap();

        let mut first = created.clone();
        let mut second = created.clone();
        first
            .apply_action(ALICE, ActionEffect::Damage { amount: 5 }, Utc::now())
            .unwrap();
        second
            .apply_action(ALICE, ActionEffect::Damage { amount: 7 }, Utc::now())
            .unwrap();

        repo.save(&first).await.unwrap();
        let err = repo.save(&second).await.unwrap_err();
        assert!(err.is_conflict());

        let stored = repo.get(created.id()).await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn ended_matches_drop_out_of_active_queries() {
        let repo = InMemoryMatchRepo::new();
        let mut created = Match::new(ALICE, 1, BOB, 1, Utc::now()).unwrap();
        repo.create(&created).await.unwrap();
        created.forfeit(Utc::now()).unwrap();
        repo.save(&created).await.unwrap();

        assert!(repo.find_active_by_pair(ALICE, BOB).await.unwrap().is_none());
        assert!(repo.list_active_containing(BOB).await.unwrap().is_empty());

        let rematch = Match::new(BOB, 1, ALICE, 1, Utc::now()).unwrap();
        repo.create(&rematch).await.unwrap();
    }
}
