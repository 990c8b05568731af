//! Recording notifier.

use std::collections::HashSet;

use async_trait::async_trait;
use duelbot_domain::ParticipantId;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{Notification, NotifierPort, NotifyError};

/// Keeps every delivered notification in order. Participants marked
/// unreachable get `NotifyError::Undeliverable` instead.
#[derive(Default)]
pub struct InMemoryNotifier {
    outbox: RwLock<Vec<(ParticipantId, Notification)>>,
    unreachable: RwLock<HashSet<ParticipantId>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_unreachable(&self, participant: ParticipantId) {
        self.unreachable.write().await.insert(participant);
    }

    pub async fn sent(&self) -> Vec<(ParticipantId, Notification)> {
        self.outbox.read().await.clone()
    }

    pub async fn sent_to(&self, participant: ParticipantId) -> Vec<Notification> {
        self.outbox
            .read()
            .await
            .iter()
            .filter(|(to, _)| *to == participant)
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub async fn clear(&self) {
        self.outbox.write().await.clear();
    }
}

#[async_trait]
impl NotifierPort for InMemoryNotifier {
    async fn notify(
        &self,
        participant: ParticipantId,
        notification: &Notification,
    ) -> Result<(), NotifyError> {
        if self.unreachable.read().await.contains(&participant) {
            return Err(NotifyError::Undeliverable {
                participant,
                reason: "participant is unreachable".to_string(),
            });
        }
        self.outbox
            .write()
            .await
            .push((participant, notification.clone()));
        Ok(())
    }
}
