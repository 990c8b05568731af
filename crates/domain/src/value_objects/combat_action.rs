use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The four actions a turn holder may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatAction {
    Attack,
    Defend,
    UseItem,
    UseRevival,
}

impl CombatAction {
    pub const ALL: [CombatAction; 4] = [
        CombatAction::Attack,
        CombatAction::Defend,
        CombatAction::UseItem,
        CombatAction::UseRevival,
    ];

    /// Short token used inside choice callbacks.
    pub fn token(self) -> &'static str {
        match self {
            Self::Attack => "fight",
            Self::Defend => "defend",
            Self::UseItem => "item",
            Self::UseRevival => "revival",
        }
    }

    /// Button label shown to players.
    pub fn label(self) -> &'static str {
        match self {
            Self::Attack => "Fight",
            Self::Defend => "Defend",
            Self::UseItem => "Use Item",
            Self::UseRevival => "Revival",
        }
    }
}

impl fmt::Display for CombatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for CombatAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fight" | "attack" => Ok(Self::Attack),
            "defend" => Ok(Self::Defend),
            "item" => Ok(Self::UseItem),
            "revival" | "revive" => Ok(Self::UseRevival),
            other => Err(DomainError::parse(format!("Unknown combat action: {}", other))),
        }
    }
}
