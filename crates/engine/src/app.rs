//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    config::AppConfig,
    ports::{
        ChallengeRepo, ClockPort, InventoryPort, LedgerPort, MatchRepo, NotifierPort, ProfileRepo,
        RandomPort, UserRegistry,
    },
};
use crate::stores::MatchLocks;
use crate::use_cases;
use crate::use_cases::arena_match::{CreateMatch, ForfeitMatches};
use crate::use_cases::challenge::{IssueChallenge, RespondToChallenge};
use crate::use_cases::combat::ResolveAction;

/// Main application state.
///
/// Holds the port handles and the use cases built on them. Front ends
/// dispatch commands against it.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub locks: Arc<MatchLocks>,
}

/// Every port the engine talks to. Adapters are injected directly as
/// `Arc<dyn PortTrait>`.
#[derive(Clone)]
pub struct Repositories {
    pub matches: Arc<dyn MatchRepo>,
    pub challenges: Arc<dyn ChallengeRepo>,
    pub profiles: Arc<dyn ProfileRepo>,
    pub registry: Arc<dyn UserRegistry>,
    pub ledger: Arc<dyn LedgerPort>,
    pub inventory: Arc<dyn InventoryPort>,
    pub notifier: Arc<dyn NotifierPort>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub challenge: use_cases::ChallengeUseCases,
    pub arena_match: use_cases::MatchUseCases,
    pub combat: use_cases::CombatUseCases,
    pub bot_duel: Arc<use_cases::BotDuel>,
    pub settlement: Arc<use_cases::SettleRewards>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repositories: Repositories, config: &AppConfig) -> Self {
        let repos = &repositories;
        let locks = Arc::new(MatchLocks::new());
        let notices = Arc::new(use_cases::MatchNotices::new(repos.notifier.clone()));

        let settlement = Arc::new(use_cases::SettleRewards::new(
            repos.ledger.clone(),
            config.settlement_attempts,
        ));

        let create_match = Arc::new(CreateMatch::new(
            repos.matches.clone(),
            repos.profiles.clone(),
            repos.clock.clone(),
        ));
        let forfeit = Arc::new(ForfeitMatches::new(
            repos.matches.clone(),
            locks.clone(),
            notices.clone(),
            repos.clock.clone(),
            config.resolve_attempts,
        ));
        let arena_match = use_cases::MatchUseCases::new(create_match.clone(), forfeit);

        let challenge = use_cases::ChallengeUseCases::new(
            Arc::new(IssueChallenge::new(
                repos.challenges.clone(),
                repos.profiles.clone(),
                notices.clone(),
                repos.clock.clone(),
            )),
            Arc::new(RespondToChallenge::new(
                repos.challenges.clone(),
                repos.profiles.clone(),
                create_match,
                notices.clone(),
                repos.clock.clone(),
                config.challenge_ttl,
            )),
        );

        let combat = use_cases::CombatUseCases::new(Arc::new(ResolveAction::new(
            repos.matches.clone(),
            repos.profiles.clone(),
            repos.inventory.clone(),
            repos.random.clone(),
            repos.clock.clone(),
            locks.clone(),
            notices,
            settlement.clone(),
            config.resolve_attempts,
        )));

        let bot_duel = Arc::new(use_cases::BotDuel::new(
            repos.profiles.clone(),
            repos.ledger.clone(),
            repos.random.clone(),
            config.settlement_attempts,
        ));

        let use_cases = UseCases {
            challenge,
            arena_match,
            combat,
            bot_duel,
            settlement,
        };

        Self {
            repositories,
            use_cases,
            locks,
        }
    }
}
