//! Duel against the training bot.
//!
//! One uniform draw against the participant's power rating decides it. No
//! HP, no turns, nothing stored besides the ledger changes. Ledger calls are
//! retried one by one, the same way match settlement does it.

use std::sync::Arc;

use duelbot_domain::combat::{bot_loss_reward, bot_win_reward, BotOdds, Reward};
use duelbot_domain::ParticipantId;

use super::retry::with_retries;
use crate::infrastructure::ports::{LedgerPort, ProfileRepo, RandomPort, RepoError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotDuelReport {
    pub won: bool,
    pub odds: BotOdds,
    pub reward: Reward,
    /// Every ledger change for this duel went through.
    pub paid: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BotDuelError {
    #[error("Participant {0} is not registered")]
    UnknownParticipant(ParticipantId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

pub struct BotDuel {
    profiles: Arc<dyn ProfileRepo>,
    ledger: Arc<dyn LedgerPort>,
    random: Arc<dyn RandomPort>,
    max_attempts: u32,
}

impl BotDuel {
    pub fn new(
        profiles: Arc<dyn ProfileRepo>,
        ledger: Arc<dyn LedgerPort>,
        random: Arc<dyn RandomPort>,
        max_attempts: u32,
    ) -> Self {
        Self {
            profiles,
            ledger,
            random,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn execute(&self, participant: ParticipantId) -> Result<BotDuelReport, BotDuelError> {
        let profile = self
            .profiles
            .get(participant)
            .await?
            .ok_or(BotDuelError::UnknownParticipant(participant))?;

        let odds = BotOdds::against(&profile);
        let won = odds.user_wins(self.random.gen_unit());
        let reward = if won {
            bot_win_reward(profile.level)
        } else {
            bot_loss_reward()
        };

        let ledger = &self.ledger;
        let credited = with_retries(self.max_attempts, "credit_currency", participant, || {
            ledger.credit_currency(participant, reward.currency)
        })
        .await
        .is_ok();
        let recorded = if won {
            let ranked =
                with_retries(self.max_attempts, "increment_ranking_points", participant, || {
                    ledger.increment_ranking_points(participant, reward.ranking_points)
                })
                .await
                .is_ok();
            let counted = with_retries(self.max_attempts, "increment_wins", participant, || {
                ledger.increment_wins(participant)
            })
            .await
            .is_ok();
            ranked && counted
        } else {
            with_retries(self.max_attempts, "increment_losses", participant, || {
                ledger.increment_losses(participant)
            })
            .await
            .is_ok()
        };
        let paid = credited && recorded;

        if paid {
            tracing::info!(
                participant = %participant,
                won,
                win_probability = odds.win_probability,
                currency = reward.currency,
                ranking_points = reward.ranking_points,
                "Bot duel resolved"
            );
        } else {
            tracing::error!(
                participant = %participant,
                won,
                currency = reward.currency,
                ranking_points = reward.ranking_points,
                "Degraded bot duel payout: ledger calls still failing after retries"
            );
        }

        Ok(BotDuelReport {
            won,
            odds,
            reward,
            paid,
        })
    }
}
