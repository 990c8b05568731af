//! Inventory item categories and handles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, ParticipantId};

/// Item category as far as combat cares.
///
/// Shop catalogs carry more categories (poison, special, ...); those parse into
/// `Other` and have no mechanical effect in a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemCategory {
    Consumable,
    Weapon,
    Revival,
    Other(String),
}

impl ItemCategory {
    /// Case-insensitive parse. `sword` is accepted as an alias for `weapon`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "consumable" => Self::Consumable,
            "weapon" | "sword" => Self::Weapon,
            "revival" => Self::Revival,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Consumable => "consumable",
            Self::Weapon => "weapon",
            Self::Revival => "revival",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ItemCategory {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ItemCategory> for String {
    fn from(value: ItemCategory) -> Self {
        value.as_str().to_string()
    }
}

/// One stack of items owned by a participant, as returned by an inventory peek.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemHandle {
    pub id: ItemId,
    pub owner: ParticipantId,
    pub category: ItemCategory,
    pub name: String,
}
