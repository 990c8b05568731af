//! The command surface: every request a participant can make, parsed from
//! transport tokens and CLI verbs before it reaches a use case.
//!
//! Choice tokens attached to notifications are produced here too, so a
//! button press parses back into exactly the command that built it.

use std::fmt;
use std::str::FromStr;

use duelbot_domain::{ChallengeDecision, CombatAction, DomainError, MatchId, ParticipantId};

const ACCEPT_PREFIX: &str = "pvp_accept:";
const DECLINE_PREFIX: &str = "pvp_decline:";
const ACTION_PREFIX: &str = "battle_action:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `pvp <participant-id>`
    Challenge { target: ParticipantId },
    /// `pvp_accept:<challenger>` / `pvp_decline:<challenger>`
    Respond {
        challenger: ParticipantId,
        decision: ChallengeDecision,
    },
    /// `battle_action:<fight|defend|item|revival>:<match-id>`
    Act {
        match_id: MatchId,
        action: CombatAction,
    },
    /// `endbattle`
    Forfeit,
    /// `pvpbot`
    BotDuel,
}

impl Command {
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DomainError::parse("empty command"));
        }

        if let Some(rest) = input.strip_prefix(ACCEPT_PREFIX) {
            return Ok(Self::Respond {
                challenger: parse_participant(rest)?,
                decision: ChallengeDecision::Accept,
            });
        }
        if let Some(rest) = input.strip_prefix(DECLINE_PREFIX) {
            return Ok(Self::Respond {
                challenger: parse_participant(rest)?,
                decision: ChallengeDecision::Decline,
            });
        }
        if let Some(rest) = input.strip_prefix(ACTION_PREFIX) {
            let (action, match_id) = rest.split_once(':').ok_or_else(|| {
                DomainError::parse(format!("battle action needs an action and a match: {}", input))
            })?;
            return Ok(Self::Act {
                match_id: match_id.trim().parse()?,
                action: action.parse()?,
            });
        }

        let mut words = input.split_whitespace();
        let verb = words
            .next()
            .map(|w| w.trim_start_matches('/').to_ascii_lowercase())
            .unwrap_or_default();
        let argument = words.next();
        if words.next().is_some() {
            return Err(DomainError::parse(format!("too many arguments: {}", input)));
        }

        match (verb.as_str(), argument) {
            ("pvp", Some(target)) => Ok(Self::Challenge {
                target: parse_participant(target)?,
            }),
            ("pvp", None) => Err(DomainError::parse("usage: pvp <participant-id>")),
            ("pvpbot", None) => Ok(Self::BotDuel),
            ("endbattle" | "endbettle", None) => Ok(Self::Forfeit),
            _ => Err(DomainError::parse(format!("unknown command: {}", input))),
        }
    }

    /// Token that parses back into this command.
    pub fn token(&self) -> String {
        match self {
            Self::Challenge { target } => format!("pvp {}", target),
            Self::Respond {
                challenger,
                decision: ChallengeDecision::Accept,
            } => format!("{}{}", ACCEPT_PREFIX, challenger),
            Self::Respond {
                challenger,
                decision: ChallengeDecision::Decline,
            } => format!("{}{}", DECLINE_PREFIX, challenger),
            Self::Act { match_id, action } => {
                format!("{}{}:{}", ACTION_PREFIX, action.token(), match_id)
            }
            Self::Forfeit => "endbattle".to_string(),
            Self::BotDuel => "pvpbot".to_string(),
        }
    }
}

fn parse_participant(raw: &str) -> Result<ParticipantId, DomainError> {
    raw.trim().parse()
}

impl FromStr for Command {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}
