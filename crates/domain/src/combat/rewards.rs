use serde::{Deserialize, Serialize};

/// Currency and ranking points paid out for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub currency: i64,
    pub ranking_points: i64,
}

const PVP_BASE_CURRENCY: i64 = 50;
const PVP_MIN_CURRENCY: i64 = 20;
const PVP_CURRENCY_PER_LEVEL: i64 = 5;
const PVP_RANKING_POINTS: i64 = 10;

const BOT_LOSS_CURRENCY: i64 = 5;

/// Winner payout of a player-vs-player match.
///
/// Beating a higher-level opponent pays more; the bounty never drops below 20.
pub fn pvp_reward(winner_level: u32, loser_level: u32) -> Reward {
    let diff = i64::from(winner_level) - i64::from(loser_level);
    Reward {
        currency: (PVP_BASE_CURRENCY + diff * PVP_CURRENCY_PER_LEVEL).max(PVP_MIN_CURRENCY),
        ranking_points: PVP_RANKING_POINTS,
    }
}

/// Payout for beating the training bot.
pub fn bot_win_reward(level: u32) -> Reward {
    let points = (10 + i64::from(level) / 2).max(1);
    Reward {
        currency: (20 + points * 2).max(10),
        ranking_points: points,
    }
}

/// Consolation for losing to the training bot.
pub fn bot_loss_reward() -> Reward {
    Reward {
        currency: BOT_LOSS_CURRENCY,
        ranking_points: 0,
    }
}
