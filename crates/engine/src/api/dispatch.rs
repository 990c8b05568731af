//! Command dispatch: routes a parsed command to its use case and renders the
//! reply for the participant who sent it.
//!
//! Expected refusals (wrong turn, unknown match, bad input) become short
//! replies and are logged at debug. Everything else is logged at error and
//! answered with a generic message.

use std::sync::Arc;

use duelbot_domain::{
    ActionEffect, ChallengeDecision, CombatAction, MatchId, NoEffectReason, ParticipantId,
    TurnOutcome,
};

use super::error_sanitizer::{messages, refusal, sanitize_error};
use crate::app::App;
use crate::command::Command;
use crate::use_cases::arena_match::MatchError;
use crate::use_cases::bot_duel::BotDuelError;
use crate::use_cases::challenge::{ChallengeError, ChallengeResponse};
use crate::use_cases::combat::{ActionReport, CombatError};

pub struct Dispatcher {
    app: Arc<App>,
}

impl Dispatcher {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    /// Parse `input` and run it on behalf of `actor`.
    pub async fn dispatch(&self, actor: ParticipantId, input: &str) -> String {
        match Command::parse(input) {
            Ok(command) => self.handle(actor, command).await,
            Err(e) => refusal(&e, messages::UNKNOWN_COMMAND),
        }
    }

    pub async fn handle(&self, actor: ParticipantId, command: Command) -> String {
        tracing::debug!(actor = %actor, command = %command, "Dispatching command");
        match command {
            Command::Challenge { target } => self.challenge(actor, target).await,
            Command::Respond {
                challenger,
                decision,
            } => self.respond(actor, challenger, decision).await,
            Command::Act { match_id, action } => self.act(actor, match_id, action).await,
            Command::Forfeit => self.forfeit(actor).await,
            Command::BotDuel => self.bot_duel(actor).await,
        }
    }

    async fn challenge(&self, challenger: ParticipantId, target: ParticipantId) -> String {
        match self
            .app
            .use_cases
            .challenge
            .issue
            .execute(challenger, target)
            .await
        {
            Ok(issued) if issued.delivered => {
                format!(
                    "You challenged {}. Waiting for response...",
                    self.display_name(target).await
                )
            }
            Ok(_) => {
                "Could not send challenge to the target (maybe their privacy settings).".to_string()
            }
            Err(e @ ChallengeError::InvalidTarget) => refusal(&e, "You cannot challenge yourself."),
            Err(e @ ChallengeError::UnknownParticipant(_)) => {
                if matches!(e, ChallengeError::UnknownParticipant(p) if p == target) {
                    refusal(&e, "The target is not registered in the bot.")
                } else {
                    refusal(&e, messages::NOT_REGISTERED)
                }
            }
            Err(e) => sanitize_error(&e, "sending the challenge"),
        }
    }

    async fn respond(
        &self,
        challenged: ParticipantId,
        challenger: ParticipantId,
        decision: ChallengeDecision,
    ) -> String {
        match self
            .app
            .use_cases
            .challenge
            .respond
            .execute(challenged, challenger, decision)
            .await
        {
            Ok(ChallengeResponse::Declined) => "You declined the challenge.".to_string(),
            Ok(ChallengeResponse::Accepted(_)) => {
                "You accepted the PvP challenge! Battle started. Attacker moves first.".to_string()
            }
            Err(e @ ChallengeError::ChallengeNotFound { .. }) => {
                refusal(&e, "There is no pending challenge from that player.")
            }
            Err(e @ ChallengeError::ChallengeExpired { .. }) => {
                refusal(&e, "That challenge has expired.")
            }
            Err(e @ ChallengeError::Match(MatchError::DuplicateActiveMatch { .. })) => {
                refusal(&e, "You already have an active battle with that player.")
            }
            Err(e @ ChallengeError::UnknownParticipant(_))
            | Err(e @ ChallengeError::Match(MatchError::UnknownParticipant(_))) => {
                refusal(&e, messages::USER_DATA_MISSING)
            }
            Err(e) => sanitize_error(&e, "starting the match"),
        }
    }

    async fn act(&self, actor: ParticipantId, match_id: MatchId, action: CombatAction) -> String {
        match self
            .app
            .use_cases
            .combat
            .resolve
            .execute(match_id, actor, action)
            .await
        {
            Ok(report) => render_action(&report),
            Err(e @ CombatError::MatchNotFound(_)) => refusal(&e, messages::MATCH_NOT_FOUND),
            Err(e @ CombatError::NotYourTurn { .. }) => refusal(&e, messages::NOT_YOUR_TURN),
            Err(e @ CombatError::NotAParticipant { .. }) => {
                refusal(&e, messages::NOT_A_PARTICIPANT)
            }
            Err(e @ CombatError::ParticipantMissing(_)) => {
                refusal(&e, messages::USER_DATA_MISSING)
            }
            Err(e) => sanitize_error(&e, "resolving the action"),
        }
    }

    async fn forfeit(&self, actor: ParticipantId) -> String {
        match self.app.use_cases.arena_match.forfeit.execute(actor).await {
            Ok(ended) => format!("Ended {} active battle(s) you were in (if any).", ended),
            Err(e) => sanitize_error(&e, "ending your battles"),
        }
    }

    async fn bot_duel(&self, actor: ParticipantId) -> String {
        match self.app.use_cases.bot_duel.execute(actor).await {
            Ok(report) if report.won => format!(
                "You defeated the Training Bot! +{} PvP points and +{} currency added to your balance.",
                report.reward.ranking_points, report.reward.currency
            ),
            Ok(report) => format!(
                "You lost to the Training Bot. Consolation: +{} currency added to your balance.",
                report.reward.currency
            ),
            Err(e @ BotDuelError::UnknownParticipant(_)) => refusal(&e, messages::NOT_REGISTERED),
            Err(e) => sanitize_error(&e, "fighting the Training Bot"),
        }
    }

    async fn display_name(&self, participant: ParticipantId) -> String {
        match self.app.repositories.profiles.get(participant).await {
            Ok(Some(profile)) => profile.display_name,
            _ => participant.to_string(),
        }
    }
}

/// Reply text for a resolved action.
fn render_action(report: &ActionReport) -> String {
    let item_name = report
        .item_used
        .as_ref()
        .map_or("item", |item| item.name.as_str());

    let headline = match (report.action, report.effect) {
        (CombatAction::Attack, ActionEffect::Damage { amount }) => {
            format!("Attack dealt {} damage.", amount)
        }
        (CombatAction::Defend, ActionEffect::Damage { amount }) => {
            format!("You defended and then countered: {} damage dealt.", amount)
        }
        (_, ActionEffect::Heal { amount }) => format!("Used {}. Restored {} HP.", item_name, amount),
        (_, ActionEffect::Damage { amount }) => format!("Used {}. Dealt {} damage.", item_name, amount),
        (_, ActionEffect::Revive) => "Revival item used. HP restored.".to_string(),
        (_, ActionEffect::Nothing { reason }) => match reason {
            NoEffectReason::NoItem => "No items in inventory.".to_string(),
            NoEffectReason::NoRevivalItem => "No revival items available.".to_string(),
            NoEffectReason::ItemHasNoEffect => "Used item, but effect is minimal.".to_string(),
        },
    };

    let status = match report.outcome {
        TurnOutcome::Continue { .. } => format!(
            "Your HP: {} | Opponent HP: {}",
            report.actor_hp, report.opponent_hp
        ),
        TurnOutcome::Finished(result) if result.winner == report.actor => {
            "The battle is over. You won!".to_string()
        }
        TurnOutcome::Finished(_) => "The battle is over.".to_string(),
    };

    format!("{}\n{}", headline, status)
}
