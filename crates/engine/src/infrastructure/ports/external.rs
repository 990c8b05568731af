//! External service port traits (ledger, inventory, notifications).

use async_trait::async_trait;
use duelbot_domain::{ItemCategory, ItemHandle, ParticipantId};
use serde::{Deserialize, Serialize};

use super::error::{InventoryError, LedgerError, NotifyError};

// =============================================================================
// Ledger
// =============================================================================

/// Ledger counters held for one participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub currency: i64,
    pub wins: i64,
    pub losses: i64,
    pub ranking_points: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerPort: Send + Sync {
    async fn credit_currency(&self, participant: ParticipantId, amount: i64)
        -> Result<(), LedgerError>;
    /// Fails with `InsufficientFunds` and leaves the balance untouched.
    async fn debit_currency(&self, participant: ParticipantId, amount: i64)
        -> Result<(), LedgerError>;
    async fn increment_wins(&self, participant: ParticipantId) -> Result<(), LedgerError>;
    async fn increment_losses(&self, participant: ParticipantId) -> Result<(), LedgerError>;
    async fn increment_ranking_points(
        &self,
        participant: ParticipantId,
        amount: i64,
    ) -> Result<(), LedgerError>;
}

// =============================================================================
// Inventory
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryPort: Send + Sync {
    /// First item unit the participant holds, in inventory order, optionally
    /// restricted to one category.
    async fn peek_first_usable(
        &self,
        participant: ParticipantId,
        category: Option<ItemCategory>,
    ) -> Result<Option<ItemHandle>, InventoryError>;
    async fn consume_one(&self, item: &ItemHandle) -> Result<(), InventoryError>;
}

// =============================================================================
// Notifications
// =============================================================================

/// One selectable answer attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub token: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub choices: Vec<Choice>,
}

impl Notification {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn notify(
        &self,
        participant: ParticipantId,
        notification: &Notification,
    ) -> Result<(), NotifyError>;
}
