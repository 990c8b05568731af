//! Reward settlement for finished player-vs-player matches.
//!
//! Runs once per match, after the save that ended it. Levels come from the
//! caller, so the only I/O left is the ledger. Each ledger call is retried on
//! its own; a side that still fails is logged as degraded.

use std::sync::Arc;

use duelbot_domain::combat::{pvp_reward, Reward};
use duelbot_domain::{MatchId, MatchResult};

use super::retry::with_retries;
use crate::infrastructure::ports::LedgerPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementReport {
    pub reward: Reward,
    /// Currency, win and ranking points all reached the winner's ledger.
    pub winner_paid: bool,
    /// The loss reached the loser's ledger.
    pub loser_recorded: bool,
}

impl SettlementReport {
    pub fn is_complete(&self) -> bool {
        self.winner_paid && self.loser_recorded
    }
}

/// Levels of both sides as they stood when the match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementLevels {
    pub winner: u32,
    pub loser: u32,
}

pub struct SettleRewards {
    ledger: Arc<dyn LedgerPort>,
    max_attempts: u32,
}

impl SettleRewards {
    pub fn new(ledger: Arc<dyn LedgerPort>, max_attempts: u32) -> Self {
        Self {
            ledger,
            max_attempts: max_attempts.max(1),
        }
    }

    #[tracing::instrument(skip_all, fields(match_id = %match_id))]
    pub async fn execute(
        &self,
        match_id: MatchId,
        result: MatchResult,
        levels: SettlementLevels,
    ) -> SettlementReport {
        let MatchResult { winner, loser } = result;
        let reward = pvp_reward(levels.winner, levels.loser);
        let ledger = &self.ledger;

        let credited = with_retries(self.max_attempts, "credit_currency", winner, || {
            ledger.credit_currency(winner, reward.currency)
        })
        .await
        .is_ok();
        let won = with_retries(self.max_attempts, "increment_wins", winner, || {
            ledger.increment_wins(winner)
        })
        .await
        .is_ok();
        let ranked = with_retries(self.max_attempts, "increment_ranking_points", winner, || {
            ledger.increment_ranking_points(winner, reward.ranking_points)
        })
        .await
        .is_ok();
        let loser_recorded = with_retries(self.max_attempts, "increment_losses", loser, || {
            ledger.increment_losses(loser)
        })
        .await
        .is_ok();

        let report = SettlementReport {
            reward,
            winner_paid: credited && won && ranked,
            loser_recorded,
        };

        if report.is_complete() {
            tracing::info!(
                winner = %winner,
                loser = %loser,
                currency = reward.currency,
                ranking_points = reward.ranking_points,
                "Match rewards settled"
            );
        } else {
            tracing::error!(
                winner = %winner,
                loser = %loser,
                winner_paid = report.winner_paid,
                loser_recorded = report.loser_recorded,
                "Degraded settlement: ledger calls still failing after retries"
            );
        }

        report
    }
}
