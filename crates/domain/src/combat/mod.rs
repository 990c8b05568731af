//! Combat rules: damage, power rating, and reward formulas.
//!
//! Everything here is pure. Randomness enters as already-sampled values
//! (`DamageRoll`, a unit draw for bot duels) so the engine decides where the
//! numbers come from.

mod damage;
mod power;
mod rewards;

pub use damage::{base_damage, resolve_effect, DamageRoll};
pub use power::{power_rating, BotOdds, BOT_HOUSE_EDGE};
pub use rewards::{bot_loss_reward, bot_win_reward, pvp_reward, Reward};

/// HP restored by a consumable item.
pub const CONSUMABLE_HEAL: i32 = 40;
/// Flat damage dealt by a weapon item.
pub const WEAPON_DAMAGE: i32 = 80;

/// Max HP of a combatant at `level`: `100 + level * 10`.
pub fn max_hp_for_level(level: u32) -> i32 {
    let bonus = i64::from(level) * 10;
    i32::try_from(100 + bonus).unwrap_or(i32::MAX)
}

/// HP floor granted by a revival item.
pub fn revival_floor(max_hp: i32) -> i32 {
    max_hp / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_hp_grows_ten_per_level() {
        assert_eq!(max_hp_for_level(0), 100);
        assert_eq!(max_hp_for_level(1), 110);
        assert_eq!(max_hp_for_level(25), 350);
    }

    #[test]
    fn revival_floor_rounds_down() {
        assert_eq!(revival_floor(110), 55);
        assert_eq!(revival_floor(115), 57);
    }
}
