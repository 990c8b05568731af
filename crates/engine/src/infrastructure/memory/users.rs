//! In-memory user store: profiles, ledger counters and inventory stacks.

use std::collections::HashMap;

use async_trait::async_trait;
use duelbot_domain::{ItemCategory, ItemHandle, ItemId, ParticipantId, Profile};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{
    InventoryError, InventoryPort, LedgerError, LedgerPort, LedgerRecord, ProfileRepo, RepoError,
    UserRegistry,
};

struct UserEntry {
    profile: Profile,
    ledger: LedgerRecord,
}

struct ItemStack {
    handle: ItemHandle,
    quantity: u32,
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<ParticipantId, UserEntry>>,
    // Insertion order is inventory order.
    items: RwLock<Vec<ItemStack>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile, keeping any ledger counters.
    pub async fn upsert_profile(&self, profile: Profile) {
        let mut users = self.users.write().await;
        match users.get_mut(&profile.id) {
            Some(entry) => entry.profile = profile,
            None => {
                users.insert(
                    profile.id,
                    UserEntry {
                        profile,
                        ledger: LedgerRecord::default(),
                    },
                );
            }
        }
    }

    pub async fn give_item(
        &self,
        owner: ParticipantId,
        category: ItemCategory,
        name: impl Into<String>,
        quantity: u32,
    ) -> ItemHandle {
        let handle = ItemHandle {
            id: ItemId::new(),
            owner,
            category,
            name: name.into(),
        };
        self.items.write().await.push(ItemStack {
            handle: handle.clone(),
            quantity,
        });
        handle
    }

    pub async fn ledger(&self, participant: ParticipantId) -> Option<LedgerRecord> {
        self.users
            .read()
            .await
            .get(&participant)
            .map(|entry| entry.ledger)
    }

    pub async fn item_quantity(&self, id: ItemId) -> u32 {
        self.items
            .read()
            .await
            .iter()
            .find(|stack| stack.handle.id == id)
            .map_or(0, |stack| stack.quantity)
    }

    async fn update_ledger(
        &self,
        participant: ParticipantId,
        apply: impl FnOnce(&mut LedgerRecord) -> Result<(), LedgerError>,
    ) -> Result<(), LedgerError> {
        let mut users = self.users.write().await;
        let entry = users
            .get_mut(&participant)
            .ok_or(LedgerError::UnknownParticipant(participant))?;
        apply(&mut entry.ledger)
    }
}

#[async_trait]
impl ProfileRepo for InMemoryUserStore {
    async fn get(&self, participant: ParticipantId) -> Result<Option<Profile>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .get(&participant)
            .map(|entry| entry.profile.clone()))
    }
}

#[async_trait]
impl UserRegistry for InMemoryUserStore {
    async fn register_if_missing(
        &self,
        participant: ParticipantId,
        display_name: &str,
    ) -> Result<bool, RepoError> {
        let mut users = self.users.write().await;
        if users.contains_key(&participant) {
            return Ok(false);
        }
        users.insert(
            participant,
            UserEntry {
                profile: Profile::new(participant, display_name),
                ledger: LedgerRecord::default(),
            },
        );
        Ok(true)
    }
}

#[async_trait]
impl LedgerPort for InMemoryUserStore {
    async fn credit_currency(
        &self,
        participant: ParticipantId,
        amount: i64,
    ) -> Result<(), LedgerError> {
        self.update_ledger(participant, |ledger| {
            ledger.currency += amount;
            Ok(())
        })
        .await
    }

    async fn debit_currency(
        &self,
        participant: ParticipantId,
        amount: i64,
    ) -> Result<(), LedgerError> {
        self.update_ledger(participant, |ledger| {
            if ledger.currency < amount {
                return Err(LedgerError::InsufficientFunds {
                    requested: amount,
                    available: ledger.currency,
                });
            }
            ledger.currency -= amount;
            Ok(())
        })
        .await
    }

    async fn increment_wins(&self, participant: ParticipantId) -> Result<(), LedgerError> {
        self.update_ledger(participant, |ledger| {
            ledger.wins += 1;
            Ok(())
        })
        .await
    }

    async fn increment_losses(&self, participant: ParticipantId) -> Result<(), LedgerError> {
        self.update_ledger(participant, |ledger| {
            ledger.losses += 1;
            Ok(())
        })
        .await
    }

    async fn increment_ranking_points(
        &self,
        participant: ParticipantId,
        amount: i64,
    ) -> Result<(), LedgerError> {
        self.update_ledger(participant, |ledger| {
            ledger.ranking_points += amount;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl InventoryPort for InMemoryUserStore {
    async fn peek_first_usable(
        &self,
        participant: ParticipantId,
        category: Option<ItemCategory>,
    ) -> Result<Option<ItemHandle>, InventoryError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|stack| stack.handle.owner == participant && stack.quantity > 0)
            .find(|stack| {
                category
                    .as_ref()
                    .map_or(true, |wanted| &stack.handle.category == wanted)
            })
            .map(|stack| stack.handle.clone()))
    }

    async fn consume_one(&self, item: &ItemHandle) -> Result<(), InventoryError> {
        let mut items = self.items.write().await;
        let stack = items
            .iter_mut()
            .find(|stack| stack.handle.id == item.id && stack.quantity > 0)
            .ok_or_else(|| InventoryError::Exhausted(item.id.to_string()))?;
        stack.quantity -= 1;
        Ok(())
    }
}
