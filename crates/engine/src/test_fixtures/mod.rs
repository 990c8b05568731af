//! Test fixtures: an in-memory world with every port wired up.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::TestWorld;
//!
//! #[tokio::test]
//! async fn test_duel() {
//!     let world = TestWorld::new();
//!     world.register(ALICE, "alice", 1, 10).await;
//!     world.register(BOB, "bob", 1, 10).await;
//!     let arena_match = world.start_match(ALICE, BOB).await;
//!     // ... test logic
//! }
//! ```

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use duelbot_domain::{Attributes, Match, ParticipantId, Profile};

use crate::app::{App, Repositories};
use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::memory::{
    InMemoryChallengeRepo, InMemoryMatchRepo, InMemoryNotifier, InMemoryUserStore,
};
use crate::infrastructure::ports::MatchRepo;
use crate::stores::MatchLocks;
use crate::use_cases::combat::ResolveAction;
use crate::use_cases::{MatchNotices, SettleRewards};

/// A fully in-memory world. Damage rolls and bot draws are fixed.
pub struct TestWorld {
    pub matches: Arc<InMemoryMatchRepo>,
    pub challenges: Arc<InMemoryChallengeRepo>,
    pub users: Arc<InMemoryUserStore>,
    pub notifier: Arc<InMemoryNotifier>,
    pub clock: Arc<FixedClock>,
    pub random: Arc<FixedRandom>,
}

impl TestWorld {
    /// Rolls of exactly 1.0 and a bot draw of 0.5.
    pub fn new() -> Self {
        Self::with_random(1.0, 0.5)
    }

    pub fn with_roll(roll: f64) -> Self {
        Self::with_random(roll, 0.5)
    }

    pub fn with_random(roll: f64, unit: f64) -> Self {
        let epoch = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            matches: Arc::new(InMemoryMatchRepo::new()),
            challenges: Arc::new(InMemoryChallengeRepo::new()),
            users: Arc::new(InMemoryUserStore::new()),
            notifier: Arc::new(InMemoryNotifier::new()),
            clock: Arc::new(FixedClock(epoch)),
            random: Arc::new(FixedRandom { roll, unit }),
        }
    }

    /// Store a profile with every attribute at 10 except strength.
    pub async fn register(
        &self,
        id: ParticipantId,
        name: &str,
        level: u32,
        strength: u32,
    ) -> Profile {
        let profile = Profile::new(id, name)
            .with_level(level)
            .with_attributes(Attributes {
                strength,
                ..Attributes::default()
            });
        self.users.upsert_profile(profile.clone()).await;
        profile
    }

    /// Insert an active match between two registered participants, `a` to move.
    pub async fn start_match(&self, a: ParticipantId, b: ParticipantId) -> Match {
        let level_of = |profile: Option<Profile>| profile.map_or(0, |p| p.level);
        let level_a = level_of(self.profile(a).await);
        let level_b = level_of(self.profile(b).await);
        let arena_match =
            Match::new(a, level_a, b, level_b, self.clock.0).expect("distinct participants");
        self.matches
            .create(&arena_match)
            .await
            .expect("no active match for this pair yet");
        arena_match
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            matches: self.matches.clone(),
            challenges: self.challenges.clone(),
            profiles: self.users.clone(),
            registry: self.users.clone(),
            ledger: self.users.clone(),
            inventory: self.users.clone(),
            notifier: self.notifier.clone(),
            clock: self.clock.clone(),
            random: self.random.clone(),
        }
    }

    pub fn app(&self) -> App {
        self.app_with(&AppConfig::default())
    }

    pub fn app_with(&self, config: &AppConfig) -> App {
        App::new(self.repositories(), config)
    }

    /// A standalone resolver with its own lock store.
    pub fn resolve_action(&self) -> ResolveAction {
        let settlement = Arc::new(SettleRewards::new(self.users.clone(), 3));
        ResolveAction::new(
            self.matches.clone(),
            self.users.clone(),
            self.users.clone(),
            self.random.clone(),
            self.clock.clone(),
            Arc::new(MatchLocks::new()),
            Arc::new(MatchNotices::new(self.notifier.clone())),
            settlement,
            3,
        )
    }

    async fn profile(&self, id: ParticipantId) -> Option<Profile> {
        use crate::infrastructure::ports::ProfileRepo;
        self.users.get(id).await.ok().flatten()
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}
