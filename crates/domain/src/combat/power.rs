use serde::{Deserialize, Serialize};

use crate::value_objects::Profile;

/// The training bot is always this much stronger than its opponent.
pub const BOT_HOUSE_EDGE: f64 = 1.02;

/// Scalar power rating: `rank + level * 1.5 + attribute_total / 10`.
///
/// Only used to set the odds of a bot duel; player-vs-player combat never
/// looks at it.
pub fn power_rating(profile: &Profile) -> f64 {
    profile.rank.value() as f64
        + f64::from(profile.level) * 1.5
        + profile.attributes.total() as f64 / 10.0
}

/// Odds of a single bot duel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotOdds {
    pub power_user: f64,
    pub power_bot: f64,
    pub win_probability: f64,
}

impl BotOdds {
    pub fn against(profile: &Profile) -> Self {
        Self::for_power(power_rating(profile))
    }

    pub fn for_power(power_user: f64) -> Self {
        let power_bot = power_user * BOT_HOUSE_EDGE;
        let total = power_user + power_bot;
        let win_probability = if total == 0.0 {
            1.0 / (1.0 + BOT_HOUSE_EDGE)
        } else {
            power_user / total
        };
        Self {
            power_user,
            power_bot,
            win_probability,
        }
    }

    /// `draw` is a uniform sample from `[0, 1)`.
    pub fn user_wins(&self, draw: f64) -> bool {
        draw < self.win_probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ParticipantId;
    use crate::value_objects::{Attributes, Rank};

    fn hunter(rank: &str, level: u32, stat: u32) -> Profile {
        Profile::new(ParticipantId::new(7), "hunter")
            .with_rank(Rank::parse(rank))
            .with_level(level)
            .with_attributes(Attributes::uniform(stat))
    }

    #[test]
    fn s3_level_ten_hunter_has_power_35() {
        let power = power_rating(&hunter("S3", 10, 10));
        assert!((power - 35.0).abs() < 1e-9);
    }

    #[test]
    fn fresh_hunter_power() {
        // E rank (1) + 0 levels + 50 / 10
        let power = power_rating(&Profile::new(ParticipantId::new(1), "new"));
        assert!((power - 6.0).abs() < 1e-9);
    }

    #[test]
    fn bot_is_slightly_favoured() {
        let odds = BotOdds::against(&hunter("A", 4, 12));
        assert!((odds.power_bot - odds.power_user * 1.02).abs() < 1e-9);
        assert!(odds.win_probability < 0.5);
        assert!((odds.win_probability - 1.0 / 2.02).abs() < 1e-9);
    }

    #[test]
    fn zero_power_does_not_divide_by_zero() {
        let odds = BotOdds::for_power(0.0);
        assert!(odds.win_probability.is_finite());
    }

    #[test]
    fn draw_below_probability_is_a_win() {
        let odds = BotOdds::for_power(10.0);
        assert!(odds.user_wins(0.0));
        assert!(!odds.user_wins(0.99));
    }
}
