//! In-memory challenge storage.

use std::collections::HashMap;

use async_trait::async_trait;
use duelbot_domain::{Challenge, ChallengeId, ParticipantId};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{ChallengeRepo, RepoError};

#[derive(Default)]
pub struct InMemoryChallengeRepo {
    challenges: RwLock<HashMap<ChallengeId, Challenge>>,
}

impl InMemoryChallengeRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChallengeRepo for InMemoryChallengeRepo {
    async fn create(&self, challenge: &Challenge) -> Result<(), RepoError> {
        let mut challenges = self.challenges.write().await;
        if challenges.contains_key(&challenge.id()) {
            return Err(RepoError::constraint(format!(
                "challenge {} already exists",
                challenge.id()
            )));
        }
        challenges.insert(challenge.id(), challenge.clone());
        Ok(())
    }

    async fn get(&self, id: ChallengeId) -> Result<Option<Challenge>, RepoError> {
        Ok(self.challenges.read().await.get(&id).cloned())
    }

    async fn find_pending(
        &self,
        challenger: ParticipantId,
        challenged: ParticipantId,
    ) -> Result<Option<Challenge>, RepoError> {
        Ok(self
            .challenges
            .read()
            .await
            .values()
            .filter(|c| {
                c.is_pending() && c.challenger() == challenger && c.challenged() == challenged
            })
            .max_by_key(|c| c.created_at())
            .cloned())
    }

    async fn save(&self, challenge: &Challenge) -> Result<(), RepoError> {
        let mut challenges = self.challenges.write().await;
        let stored = challenges
            .get_mut(&challenge.id())
            .ok_or_else(|| RepoError::not_found("Challenge", challenge.id()))?;
        if !stored.is_pending() {
            return Err(RepoError::conflict("Challenge", challenge.id(), 0));
        }
        *stored = challenge.clone();
        Ok(())
    }
}
