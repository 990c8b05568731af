//! Value objects: small immutable types parsed and validated at the boundary.

mod combat_action;
mod item;
mod profile;
mod rank;

pub use combat_action::CombatAction;
pub use item::{ItemCategory, ItemHandle};
pub use profile::{Attributes, CombatantSnapshot, Profile};
pub use rank::{LetterRank, Rank};
