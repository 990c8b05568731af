use serde::{Deserialize, Serialize};

use super::{CONSUMABLE_HEAL, WEAPON_DAMAGE};
use crate::error::DomainError;
use crate::events::{ActionEffect, NoEffectReason};
use crate::value_objects::{CombatAction, CombatantSnapshot, ItemCategory};

/// Strength multiplier drawn uniformly from `[0.8, 1.2]`, once per action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRoll(f64);

impl DamageRoll {
    pub const MIN: f64 = 0.8;
    pub const MAX: f64 = 1.2;

    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::validation(format!(
                "damage roll {} outside [{}, {}]",
                value,
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// `floor(level * 2 + strength * roll)`.
pub fn base_damage(attacker: &CombatantSnapshot, roll: DamageRoll) -> i32 {
    let raw = f64::from(attacker.level) * 2.0 + f64::from(attacker.strength) * roll.value();
    raw.floor() as i32
}

/// Compute what `action` does, given the actor's stats and the item the
/// inventory offered for it (if any).
///
/// For `UseItem` the item is the first unit of any category; for `UseRevival`
/// it is the first revival unit. Whatever item is passed in gets consumed by the
/// caller, even when the effect is `Nothing`.
pub fn resolve_effect(
    action: CombatAction,
    actor: &CombatantSnapshot,
    item: Option<&ItemCategory>,
    roll: DamageRoll,
) -> ActionEffect {
    match action {
        CombatAction::Attack => ActionEffect::Damage {
            amount: base_damage(actor, roll),
        },
        CombatAction::Defend => ActionEffect::Damage {
            amount: base_damage(actor, roll) / 2,
        },
        CombatAction::UseItem => match item {
            None => ActionEffect::Nothing {
                reason: NoEffectReason::NoItem,
            },
            Some(ItemCategory::Consumable) => ActionEffect::Heal {
                amount: CONSUMABLE_HEAL,
            },
            Some(ItemCategory::Weapon) => ActionEffect::Damage {
                amount: WEAPON_DAMAGE,
            },
            Some(ItemCategory::Revival) | Some(ItemCategory::Other(_)) => ActionEffect::Nothing {
                reason: NoEffectReason::ItemHasNoEffect,
            },
        },
        CombatAction::UseRevival => match item {
            Some(_) => ActionEffect::Revive,
            None => ActionEffect::Nothing {
                reason: NoEffectReason::NoRevivalItem,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ParticipantId;

    fn fighter(level: u32, strength: u32) -> CombatantSnapshot {
        CombatantSnapshot {
            participant: ParticipantId::new(1),
            level,
            strength,
        }
    }

    fn roll(value: f64) -> DamageRoll {
        DamageRoll::new(value).expect("roll in range")
    }

    #[test]
    fn damage_range_for_level_one_strength_ten() {
        let f = fighter(1, 10);
        assert_eq!(base_damage(&f, roll(0.8)), 10);
        assert_eq!(base_damage(&f, roll(1.0)), 12);
        assert_eq!(base_damage(&f, roll(1.2)), 14);
    }

    #[test]
    fn damage_is_floored() {
        // 0 * 2 + 7 * 1.1 = 7.7
        assert_eq!(base_damage(&fighter(0, 7), roll(1.1)), 7);
    }

    #[test]
    fn roll_outside_range_is_rejected() {
        assert!(DamageRoll::new(0.79).is_err());
        assert!(DamageRoll::new(1.21).is_err());
        assert!(DamageRoll::new(f64::NAN).is_err());
    }

    #[test]
    fn defend_deals_half_damage_rounded_down() {
        let effect = resolve_effect(CombatAction::Defend, &fighter(3, 11), None, roll(1.0));
        // 3 * 2 + 11 = 17 -> 8
        assert_eq!(effect, ActionEffect::Damage { amount: 8 });
    }

    #[test]
    fn item_effects_follow_category() {
        let f = fighter(1, 10);
        let r = roll(1.0);
        assert_eq!(
            resolve_effect(CombatAction::UseItem, &f, Some(&ItemCategory::Consumable), r),
            ActionEffect::Heal { amount: 40 }
        );
        assert_eq!(
            resolve_effect(CombatAction::UseItem, &f, Some(&ItemCategory::Weapon), r),
            ActionEffect::Damage { amount: 80 }
        );
        assert_eq!(
            resolve_effect(
                CombatAction::UseItem,
                &f,
                Some(&ItemCategory::Other("poison".into())),
                r
            ),
            ActionEffect::Nothing {
                reason: NoEffectReason::ItemHasNoEffect
            }
        );
        assert_eq!(
            resolve_effect(CombatAction::UseItem, &f, None, r),
            ActionEffect::Nothing {
                reason: NoEffectReason::NoItem
            }
        );
    }

    #[test]
    fn revival_without_item_does_nothing() {
        let effect = resolve_effect(CombatAction::UseRevival, &fighter(1, 10), None, roll(1.0));
        assert_eq!(
            effect,
            ActionEffect::Nothing {
                reason: NoEffectReason::NoRevivalItem
            }
        );
    }
}
