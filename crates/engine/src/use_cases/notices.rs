//! Participant-facing messages sent while negotiating and playing a match.
//!
//! Delivery is best effort: a failed send is logged and reported back as
//! `false`, never as an error.

use std::sync::Arc;

use duelbot_domain::{
    combat::Reward, ChallengeDecision, CombatAction, Match, MatchResult, ParticipantId, Profile,
    Side,
};

use crate::command::Command;
use crate::infrastructure::ports::{Choice, Notification, NotifierPort};

pub struct MatchNotices {
    notifier: Arc<dyn NotifierPort>,
}

impl MatchNotices {
    pub fn new(notifier: Arc<dyn NotifierPort>) -> Self {
        Self { notifier }
    }

    /// Send one notification. Returns whether it was delivered.
    pub async fn send(&self, to: ParticipantId, notification: Notification) -> bool {
        match self.notifier.notify(to, &notification).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(participant = %to, error = %e, "Notification not delivered");
                false
            }
        }
    }

    /// Ask `challenged` to accept or decline.
    pub async fn challenge_prompt(&self, challenged: ParticipantId, challenger: &Profile) -> bool {
        let choices = [ChallengeDecision::Accept, ChallengeDecision::Decline]
            .into_iter()
            .map(|decision| {
                let label = match decision {
                    ChallengeDecision::Accept => "Accept",
                    ChallengeDecision::Decline => "Decline",
                };
                Choice::new(
                    label,
                    Command::Respond {
                        challenger: challenger.id,
                        decision,
                    }
                    .token(),
                )
            })
            .collect();

        self.send(
            challenged,
            Notification::text(format!(
                "You have been challenged to a PvP by {}. Accept?",
                challenger.display_name
            ))
            .with_choices(choices),
        )
        .await
    }

    pub async fn challenge_declined(&self, challenger: ParticipantId, challenged_name: &str) {
        self.send(
            challenger,
            Notification::text(format!(
                "Your PvP challenge to {} was declined.",
                challenged_name
            )),
        )
        .await;
    }

    pub async fn match_started(&self, challenger: ParticipantId, challenged_name: &str) {
        self.send(
            challenger,
            Notification::text(format!(
                "{} accepted. PvP started. Your turn.",
                challenged_name
            )),
        )
        .await;
    }

    /// Offer the four actions to the turn holder. If that fails, tell both
    /// participants whose turn it is instead.
    pub async fn turn_prompt(&self, arena_match: &Match) {
        let holder = arena_match.turn_holder();
        let choices = CombatAction::ALL
            .into_iter()
            .map(|action| {
                Choice::new(
                    action.label(),
                    Command::Act {
                        match_id: arena_match.id(),
                        action,
                    }
                    .token(),
                )
            })
            .collect();
        let prompt = Notification::text(format!(
            "Your turn in PvP (Match #{}). {}\nChoose an action:",
            arena_match.id(),
            hp_line(arena_match)
        ))
        .with_choices(choices);

        if self.send(holder, prompt).await {
            return;
        }

        let fallback = Notification::text(format!(
            "PvP Match #{} update. Turn: {}",
            arena_match.id(),
            holder
        ));
        for side in [Side::A, Side::B] {
            self.send(arena_match.participant(side), fallback.clone())
                .await;
        }
    }

    pub async fn hp_update(&self, arena_match: &Match) {
        let update = Notification::text(format!(
            "Match {} update - {}",
            arena_match.id(),
            hp_line(arena_match)
        ));
        for side in [Side::A, Side::B] {
            self.send(arena_match.participant(side), update.clone())
                .await;
        }
    }

    /// Tell winner and loser how the match ended. `reward` is `None` when
    /// settlement could not work out the amounts.
    pub async fn outcome(&self, result: MatchResult, reward: Option<Reward>) {
        let victory = match reward {
            Some(reward) => format!(
                "Victory! You won {} currency and {} PvP points.",
                reward.currency, reward.ranking_points
            ),
            None => "Victory! Your rewards are being processed.".to_string(),
        };
        self.send(result.winner, Notification::text(victory)).await;
        self.send(
            result.loser,
            Notification::text("You lost this PvP. Better luck next time."),
        )
        .await;
    }

    pub async fn forfeited(&self, arena_match: &Match, by: ParticipantId) {
        let Some(opponent) = arena_match.opponent_of(by) else {
            return;
        };
        self.send(
            opponent,
            Notification::text(format!(
                "{} ended PvP Match #{}. No rewards were given.",
                by,
                arena_match.id()
            )),
        )
        .await;
    }
}

fn hp_line(arena_match: &Match) -> String {
    format!(
        "Challenger HP: {}/{} | Defender HP: {}/{}",
        arena_match.hp(Side::A),
        arena_match.max_hp(Side::A),
        arena_match.hp(Side::B),
        arena_match.max_hp(Side::B)
    )
}
