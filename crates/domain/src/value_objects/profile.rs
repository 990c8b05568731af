//! Read-only participant records handed to the core by the profile store.

use serde::{Deserialize, Serialize};

use super::Rank;
use crate::ids::ParticipantId;

/// The five hunter attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u32,
    pub agility: u32,
    pub intelligence: u32,
    pub vitality: u32,
    pub sense: u32,
}

impl Attributes {
    pub fn uniform(value: u32) -> Self {
        Self {
            strength: value,
            agility: value,
            intelligence: value,
            vitality: value,
            sense: value,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.strength)
            + u64::from(self.agility)
            + u64::from(self.intelligence)
            + u64::from(self.vitality)
            + u64::from(self.sense)
    }
}

impl Default for Attributes {
    /// New hunters start with 10 in every attribute.
    fn default() -> Self {
        Self::uniform(10)
    }
}

/// A participant's profile as owned by the external user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ParticipantId,
    pub display_name: String,
    pub level: u32,
    pub rank: Rank,
    pub attributes: Attributes,
}

impl Profile {
    /// A freshly registered hunter: level 0, rank E, all attributes at 10.
    pub fn new(id: ParticipantId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            level: 0,
            rank: Rank::default(),
            attributes: Attributes::default(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// The combat-relevant slice of this profile.
    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            participant: self.id,
            level: self.level,
            strength: self.attributes.strength,
        }
    }
}

/// Immutable view of a combatant taken at turn-resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatantSnapshot {
    pub participant: ParticipantId,
    pub level: u32,
    pub strength: u32,
}
