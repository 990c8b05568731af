//! Resolve one combat action in a player-vs-player match.
//!
//! The per-match lock covers load, validate, compute and save. Item
//! consumption, settlement and notifications only run for the save that won.

use std::sync::Arc;

use duelbot_domain::combat::{resolve_effect, DamageRoll};
use duelbot_domain::{
    ActionEffect, CombatAction, ItemCategory, ItemHandle, Match, MatchId, ParticipantId, Side,
    TurnOutcome,
};

use super::error::CombatError;
use crate::infrastructure::ports::{ClockPort, InventoryPort, MatchRepo, ProfileRepo, RandomPort};
use crate::stores::MatchLocks;
use crate::use_cases::notices::MatchNotices;
use crate::use_cases::retry::with_retries;
use crate::use_cases::settlement::{SettleRewards, SettlementLevels, SettlementReport};

/// What one resolved action did.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub match_id: MatchId,
    pub actor: ParticipantId,
    pub action: CombatAction,
    pub effect: ActionEffect,
    /// The item the action used up, if any.
    pub item_used: Option<ItemHandle>,
    pub actor_hp: i32,
    pub opponent_hp: i32,
    pub outcome: TurnOutcome,
    /// Present when this action ended the match and settlement ran.
    pub settlement: Option<SettlementReport>,
}

/// State carried out of the locked section.
struct Committed {
    arena_match: Match,
    effect: ActionEffect,
    item: Option<ItemHandle>,
    outcome: TurnOutcome,
    actor_level: u32,
    opponent_level: u32,
}

pub struct ResolveAction {
    matches: Arc<dyn MatchRepo>,
    profiles: Arc<dyn ProfileRepo>,
    inventory: Arc<dyn InventoryPort>,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
    locks: Arc<MatchLocks>,
    notices: Arc<MatchNotices>,
    settlement: Arc<SettleRewards>,
    max_attempts: u32,
}

impl ResolveAction {
    pub fn new(
        matches: Arc<dyn MatchRepo>,
        profiles: Arc<dyn ProfileRepo>,
        inventory: Arc<dyn InventoryPort>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
        locks: Arc<MatchLocks>,
        notices: Arc<MatchNotices>,
        settlement: Arc<SettleRewards>,
        max_attempts: u32,
    ) -> Self {
        Self {
            matches,
            profiles,
            inventory,
            random,
            clock,
            locks,
            notices,
            settlement,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn execute(
        &self,
        match_id: MatchId,
        actor: ParticipantId,
        action: CombatAction,
    ) -> Result<ActionReport, CombatError> {
        let committed = self.commit_with_retries(match_id, actor, action).await?;
        let Committed {
            arena_match,
            effect,
            item,
            outcome,
            actor_level,
            opponent_level,
        } = committed;

        let settlement = match outcome {
            TurnOutcome::Finished(result) => {
                self.locks.forget(match_id);
                let levels = if result.winner == actor {
                    SettlementLevels {
                        winner: actor_level,
                        loser: opponent_level,
                    }
                } else {
                    SettlementLevels {
                        winner: opponent_level,
                        loser: actor_level,
                    }
                };
                Some(self.settlement.execute(match_id, result, levels).await)
            }
            TurnOutcome::Continue { .. } => None,
        };

        self.notices.hp_update(&arena_match).await;
        match outcome {
            TurnOutcome::Finished(result) => {
                self.notices
                    .outcome(result, settlement.map(|report| report.reward))
                    .await;
            }
            TurnOutcome::Continue { .. } => self.notices.turn_prompt(&arena_match).await,
        }

        let side = arena_match
            .side_of(actor)
            .ok_or(CombatError::NotAParticipant { match_id, actor })?;
        Ok(ActionReport {
            match_id,
            actor,
            action,
            effect,
            item_used: item,
            actor_hp: arena_match.hp(side),
            opponent_hp: arena_match.hp(side.other()),
            outcome,
            settlement,
        })
    }

    async fn commit_with_retries(
        &self,
        match_id: MatchId,
        actor: ParticipantId,
        action: CombatAction,
    ) -> Result<Committed, CombatError> {
        for attempt in 1..=self.max_attempts {
            match self.commit(match_id, actor, action).await {
                Err(CombatError::Repo(e)) if e.is_conflict() => {
                    tracing::debug!(
                        match_id = %match_id,
                        attempt,
                        "Action lost a version race, reloading"
                    );
                }
                other => return other,
            }
        }

        tracing::warn!(match_id = %match_id, actor = %actor, "Action gave up after repeated conflicts");
        Err(CombatError::Contention(match_id))
    }

    /// Load, validate, compute and persist under the match lock. Returns the
    /// saved match once this writer has won the version check.
    async fn commit(
        &self,
        match_id: MatchId,
        actor: ParticipantId,
        action: CombatAction,
    ) -> Result<Committed, CombatError> {
        let guard = self.locks.acquire(match_id).await;

        let mut arena_match = self
            .matches
            .get(match_id)
            .await?
            .filter(Match::is_active)
            .ok_or(CombatError::MatchNotFound(match_id))?;
        if arena_match.turn_holder() != actor {
            return Err(CombatError::NotYourTurn { match_id, actor });
        }
        let opponent = arena_match
            .opponent_of(actor)
            .ok_or(CombatError::NotAParticipant { match_id, actor })?;

        let profile = self
            .profiles
            .get(actor)
            .await?
            .ok_or(CombatError::ParticipantMissing(actor))?;
        let opponent_level = self
            .profiles
            .get(opponent)
            .await?
            .ok_or(CombatError::ParticipantMissing(opponent))?
            .level;

        let item = match action {
            CombatAction::UseItem => self.inventory.peek_first_usable(actor, None).await?,
            CombatAction::UseRevival => {
                self.inventory
                    .peek_first_usable(actor, Some(ItemCategory::Revival))
                    .await?
            }
            CombatAction::Attack | CombatAction::Defend => None,
        };

        let roll = DamageRoll::new(self.random.gen_range(DamageRoll::MIN, DamageRoll::MAX))?;
        let effect = resolve_effect(
            action,
            &profile.snapshot(),
            item.as_ref().map(|handle| &handle.category),
            roll,
        );
        let outcome = arena_match.apply_action(actor, effect, self.clock.now())?;
        self.matches.save(&arena_match).await?;

        if let Some(handle) = &item {
            let inventory = &self.inventory;
            let consumed = with_retries(self.max_attempts, "consume_one", actor, || {
                inventory.consume_one(handle)
            })
            .await;
            if let Err(e) = consumed {
                tracing::error!(
                    match_id = %match_id,
                    owner = %handle.owner,
                    item_id = %handle.id,
                    item = %handle.name,
                    error = %e,
                    "Item applied but could not be consumed"
                );
            }
        }
        drop(guard);

        tracing::info!(
            match_id = %match_id,
            actor = %actor,
            action = %action,
            roll = roll.value(),
            hp_a = arena_match.hp(Side::A),
            hp_b = arena_match.hp(Side::B),
            finished = matches!(outcome, TurnOutcome::Finished(_)),
            "Combat action resolved"
        );

        Ok(Committed {
            arena_match,
            effect,
            item,
            outcome,
            actor_level: profile.level,
            opponent_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::memory::InMemoryNotifier;
    use crate::infrastructure::ports::{
        InventoryError, MockInventoryPort, MockLedgerPort, MockMatchRepo, MockProfileRepo,
        RepoError,
    };
    use crate::test_fixtures::TestWorld;
    use chrono::Utc;
    use duelbot_domain::{MatchStatus, NoEffectReason, Profile};

    const ALICE: ParticipantId = ParticipantId::new(1);
    const BOB: ParticipantId = ParticipantId::new(2);
    const CAROL: ParticipantId = ParticipantId::new(3);

    async fn duel(world: &TestWorld) -> Match {
        world.register(ALICE, "alice", 1, 10).await;
        world.register(BOB, "bob", 1, 10).await;
        world.start_match(ALICE, BOB).await
    }

    #[tokio::test]
    async fn attack_deals_level_and_strength_damage_and_passes_the_turn() {
        let world = TestWorld::new();
        let arena_match = duel(&world).await;

        let report = world
            .resolve_action()
            .execute(arena_match.id(), ALICE, CombatAction::Attack)
            .await
            .unwrap();

        // floor(1 * 2 + 10 * 1.0)
        assert_eq!(report.effect, ActionEffect::Damage { amount: 12 });
        assert_eq!(report.opponent_hp, 110 - 12);
        assert_eq!(report.actor_hp, 110);
        assert_eq!(report.outcome, TurnOutcome::Continue { next_turn: BOB });

        let stored = world.matches.get(arena_match.id()).await.unwrap().unwrap();
        assert_eq!(stored.turn_holder(), BOB);
        assert_eq!(stored.version(), 1);
        assert_eq!(stored.hp(Side::B), 98);
    }

    #[tokio::test]
    async fn defend_deals_half_damage() {
        let world = TestWorld::with_roll(1.2);
        let arena_match = duel(&world).await;

        let report = world
            .resolve_action()
            .execute(arena_match.id(), ALICE, CombatAction::Defend)
            .await
            .unwrap();

        // floor(2 + 12.0) / 2
        assert_eq!(report.effect, ActionEffect::Damage { amount: 7 });
        assert_eq!(report.opponent_hp, 103);
    }

    #[tokio::test]
    async fn acting_out_of_turn_changes_nothing() {
        let world = TestWorld::new();
        let arena_match = duel(&world).await;

        let err = world
            .resolve_action()
            .execute(arena_match.id(), BOB, CombatAction::Attack)
            .await
            .unwrap_err();

        assert!(matches!(err, CombatError::NotYourTurn { actor: BOB, .. }));
        assert!(err.is_benign());
        let stored = world.matches.get(arena_match.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), 0);
        assert_eq!(stored.hp(Side::A), 110);
        assert!(world.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn outsiders_and_unknown_matches_are_refused() {
        let world = TestWorld::new();
        let arena_match = duel(&world).await;
        world.register(CAROL, "carol", 1, 10).await;

        let outsider = world
            .resolve_action()
            .execute(arena_match.id(), CAROL, CombatAction::Attack)
            .await
            .unwrap_err();
        // The turn check comes first, so an outsider never gets further.
        assert!(matches!(outsider, CombatError::NotYourTurn { actor: CAROL, .. }));

        let missing = world
            .resolve_action()
            .execute(MatchId::new(), ALICE, CombatAction::Attack)
            .await
            .unwrap_err();
        assert!(matches!(missing, CombatError::MatchNotFound(_)));
    }

    #[tokio::test]
    async fn missing_opponent_profile_is_reported() {
        let world = TestWorld::new();
        world.register(ALICE, "alice", 1, 10).await;
        let arena_match = world.start_match(ALICE, BOB).await;

        let err = world
            .resolve_action()
            .execute(arena_match.id(), ALICE, CombatAction::Attack)
            .await
            .unwrap_err();

        assert!(matches!(err, CombatError::ParticipantMissing(p) if p == BOB));
        let stored = world.matches.get(arena_match.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), 0);
    }

    #[tokio::test]
    async fn consumable_heals_up_to_max_and_is_used_up() {
        let world = TestWorld::new();
        let arena_match = duel(&world).await;
        let potion = world
            .users
            .give_item(ALICE, ItemCategory::Consumable, "Potion", 2)
            .await;
        let resolve = world.resolve_action();

        resolve
            .execute(arena_match.id(), ALICE, CombatAction::Attack)
            .await
            .unwrap();
        resolve
            .execute(arena_match.id(), BOB, CombatAction::Attack)
            .await
            .unwrap();
        let report = resolve
            .execute(arena_match.id(), ALICE, CombatAction::UseItem)
            .await
            .unwrap();

        assert_eq!(report.effect, ActionEffect::Heal { amount: 40 });
        // 98 + 40 clamps to 110
        assert_eq!(report.actor_hp, 110);
        assert_eq!(report.item_used.map(|item| item.id), Some(potion.id));
        assert_eq!(world.users.item_quantity(potion.id).await, 1);
    }

    #[tokio::test]
    async fn weapon_deals_flat_damage() {
        let world = TestWorld::new();
        let arena_match = duel(&world).await;
        let sword = world
            .users
            .give_item(ALICE, ItemCategory::Weapon, "Sword", 1)
            .await;

        let report = world
            .resolve_action()
            .execute(arena_match.id(), ALICE, CombatAction::UseItem)
            .await
            .unwrap();

        assert_eq!(report.effect, ActionEffect::Damage { amount: 80 });
        assert_eq!(report.opponent_hp, 30);
        assert_eq!(world.users.item_quantity(sword.id).await, 0);
    }

    #[tokio::test]
    async fn item_without_effect_is_still_consumed() {
        let world = TestWorld::new();
        let arena_match = duel(&world).await;
        let trinket = world
            .users
            .give_item(ALICE, ItemCategory::parse("trinket"), "Lucky Coin", 1)
            .await;

        let report = world
            .resolve_action()
            .execute(arena_match.id(), ALICE, CombatAction::UseItem)
            .await
            .unwrap();

        assert_eq!(
            report.effect,
            ActionEffect::Nothing {
                reason: NoEffectReason::ItemHasNoEffect
            }
        );
        assert_eq!(world.users.item_quantity(trinket.id).await, 0);
        // The turn still passes.
        assert_eq!(report.outcome, TurnOutcome::Continue { next_turn: BOB });
    }

    #[tokio::test]
    async fn empty_inventory_uses_the_turn_without_consuming() {
        let world = TestWorld::new();
        let arena_match = duel(&world).await;

        let report = world
            .resolve_action()
            .execute(arena_match.id(), ALICE, CombatAction::UseRevival)
            .await
            .unwrap();

        assert_eq!(
            report.effect,
            ActionEffect::Nothing {
                reason: NoEffectReason::NoRevivalItem
            }
        );
        assert!(report.item_used.is_none());
        assert_eq!(report.outcome, TurnOutcome::Continue { next_turn: BOB });
    }

    #[tokio::test]
    async fn revival_lifts_hp_to_half_max() {
        let world = TestWorld::new();
        world.register(ALICE, "alice", 1, 10).await;
        world.register(BOB, "bob", 10, 40).await;
        let arena_match = world.start_match(ALICE, BOB).await;
        let feather = world
            .users
            .give_item(ALICE, ItemCategory::Revival, "Phoenix Feather", 1)
            .await;
        let resolve = world.resolve_action();

        resolve
            .execute(arena_match.id(), ALICE, CombatAction::Defend)
            .await
            .unwrap();
        // floor(20 + 40) = 60 leaves alice at 50
        resolve
            .execute(arena_match.id(), BOB, CombatAction::Attack)
            .await
            .unwrap();
        let report = resolve
            .execute(arena_match.id(), ALICE, CombatAction::UseRevival)
            .await
            .unwrap();

        assert_eq!(report.effect, ActionEffect::Revive);
        assert_eq!(report.actor_hp, 55);
        assert_eq!(world.users.item_quantity(feather.id).await, 0);
    }

    #[tokio::test]
    async fn lethal_hit_ends_the_match_and_settles_once() {
        let world = TestWorld::new();
        world.register(ALICE, "alice", 1, 200).await;
        world.register(BOB, "bob", 1, 10).await;
        let arena_match = world.start_match(ALICE, BOB).await;

        let report = world
            .resolve_action()
            .execute(arena_match.id(), ALICE, CombatAction::Attack)
            .await
            .unwrap();

        let result = match report.outcome {
            TurnOutcome::Finished(result) => result,
            other => panic!("expected a finished match, got {:?}", other),
        };
        assert_eq!(result.winner, ALICE);
        assert_eq!(result.loser, BOB);
        assert!(report.opponent_hp <= 0);
        let settlement = report.settlement.unwrap();
        assert!(settlement.is_complete());
        assert_eq!(settlement.reward.currency, 50);

        let alice = world.users.ledger(ALICE).await.unwrap();
        assert_eq!((alice.currency, alice.wins, alice.ranking_points), (50, 1, 10));
        assert_eq!(world.users.ledger(BOB).await.unwrap().losses, 1);

        let stored = world.matches.get(arena_match.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), MatchStatus::Ended);

        let late = world
            .resolve_action()
            .execute(arena_match.id(), BOB, CombatAction::Attack)
            .await
            .unwrap_err();
        assert!(matches!(late, CombatError::MatchNotFound(_)));
        assert_eq!(world.users.ledger(ALICE).await.unwrap().wins, 1);
    }

    #[tokio::test]
    async fn trading_attacks_always_ends_the_match() {
        let world = TestWorld::with_roll(0.8);
        let arena_match = duel(&world).await;
        let resolve = world.resolve_action();

        let mut turns = 0;
        let mut actor = ALICE;
        loop {
            turns += 1;
            let report = resolve
                .execute(arena_match.id(), actor, CombatAction::Attack)
                .await
                .unwrap();
            match report.outcome {
                TurnOutcome::Continue { next_turn } => actor = next_turn,
                TurnOutcome::Finished(result) => {
                    // Side A strikes first and 110 / 10 rounds up to 11 hits.
                    assert_eq!(result.winner, ALICE);
                    break;
                }
            }
            assert!(turns < 100, "match never ended");
        }
        assert_eq!(turns, 21);
    }

    #[tokio::test]
    async fn concurrent_lethal_actions_pay_out_once() {
        let world = TestWorld::new();
        world.register(ALICE, "alice", 1, 200).await;
        world.register(BOB, "bob", 1, 10).await;
        let arena_match = world.start_match(ALICE, BOB).await;
        let resolve = Arc::new(world.resolve_action());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let resolve = resolve.clone();
            let id = arena_match.id();
            handles.push(tokio::spawn(async move {
                resolve.execute(id, ALICE, CombatAction::Attack).await
            }));
        }

        let mut finished = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(report) => {
                    assert!(matches!(report.outcome, TurnOutcome::Finished(_)));
                    finished += 1;
                }
                Err(e) => assert!(e.is_benign(), "unexpected error: {e}"),
            }
        }

        assert_eq!(finished, 1);
        let alice = world.users.ledger(ALICE).await.unwrap();
        assert_eq!((alice.currency, alice.wins), (50, 1));
        assert_eq!(world.users.ledger(BOB).await.unwrap().losses, 1);
    }

    #[tokio::test]
    async fn losing_a_version_race_reloads_and_does_not_consume() {
        let stale = Match::new(ALICE, 1, BOB, 1, Utc::now()).unwrap();
        let mut advanced = stale.clone();
        advanced
            .apply_action(ALICE, ActionEffect::Damage { amount: 1 }, Utc::now())
            .unwrap();

        let mut matches = MockMatchRepo::new();
        let mut reads = vec![advanced, stale.clone()];
        matches
            .expect_get()
            .times(2)
            .returning(move |_| Ok(reads.pop()));
        let id = stale.id();
        matches
            .expect_save()
            .times(1)
            .returning(move |_| Err(RepoError::conflict("Match", id, 0)));

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get()
            .returning(|p| Ok(Some(Profile::new(p, "alice").with_level(1))));

        let mut inventory = MockInventoryPort::new();
        inventory.expect_peek_first_usable().returning(|p, _| {
            Ok(Some(ItemHandle {
                id: duelbot_domain::ItemId::new(),
                owner: p,
                category: ItemCategory::Weapon,
                name: "Sword".to_string(),
            }))
        });
        inventory.expect_consume_one().never();

        let resolve = ResolveAction::new(
            Arc::new(matches),
            Arc::new(profiles),
            Arc::new(inventory),
            Arc::new(FixedRandom {
                roll: 1.0,
                unit: 0.5,
            }),
            Arc::new(FixedClock(Utc::now())),
            Arc::new(MatchLocks::new()),
            Arc::new(MatchNotices::new(Arc::new(InMemoryNotifier::new()))),
            Arc::new(SettleRewards::new(Arc::new(MockLedgerPort::new()), 1)),
            3,
        );

        let err = resolve
            .execute(id, ALICE, CombatAction::UseItem)
            .await
            .unwrap_err();
        assert!(matches!(err, CombatError::NotYourTurn { .. }));
    }

    #[tokio::test]
    async fn persistent_conflicts_surface_as_contention() {
        let arena_match = Match::new(ALICE, 1, BOB, 1, Utc::now()).unwrap();
        let id = arena_match.id();

        let mut matches = MockMatchRepo::new();
        matches
            .expect_get()
            .times(2)
            .returning(move |_| Ok(Some(arena_match.clone())));
        matches
            .expect_save()
            .times(2)
            .returning(move |_| Err(RepoError::conflict("Match", id, 0)));

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get()
            .returning(|p| Ok(Some(Profile::new(p, "alice"))));

        let resolve = ResolveAction::new(
            Arc::new(matches),
            Arc::new(profiles),
            Arc::new(MockInventoryPort::new()),
            Arc::new(FixedRandom {
                roll: 1.0,
                unit: 0.5,
            }),
            Arc::new(FixedClock(Utc::now())),
            Arc::new(MatchLocks::new()),
            Arc::new(MatchNotices::new(Arc::new(InMemoryNotifier::new()))),
            Arc::new(SettleRewards::new(Arc::new(MockLedgerPort::new()), 1)),
            2,
        );

        let err = resolve
            .execute(id, ALICE, CombatAction::Attack)
            .await
            .unwrap_err();
        assert!(matches!(err, CombatError::Contention(m) if m == id));
        assert!(!err.is_benign());
    }

    fn resolver_over(
        world: &TestWorld,
        profiles: Arc<dyn ProfileRepo>,
        inventory: Arc<dyn InventoryPort>,
    ) -> ResolveAction {
        ResolveAction::new(
            world.matches.clone(),
            profiles,
            inventory,
            world.random.clone(),
            world.clock.clone(),
            Arc::new(MatchLocks::new()),
            Arc::new(MatchNotices::new(world.notifier.clone())),
            Arc::new(SettleRewards::new(world.users.clone(), 3)),
            3,
        )
    }

    fn sword(owner: ParticipantId) -> ItemHandle {
        ItemHandle {
            id: duelbot_domain::ItemId::new(),
            owner,
            category: ItemCategory::Weapon,
            name: "Sword".to_string(),
        }
    }

    #[tokio::test]
    async fn profile_outage_after_the_lethal_save_still_pays_out() {
        let world = TestWorld::new();
        let alice = world.register(ALICE, "alice", 4, 200).await;
        let bob = world.register(BOB, "bob", 1, 10).await;
        let arena_match = world.start_match(ALICE, BOB).await;

        // Only the two reads before the save succeed.
        let mut profiles = MockProfileRepo::new();
        let mut reads = 0;
        profiles.expect_get().returning(move |p| {
            reads += 1;
            match (reads, p) {
                (1 | 2, p) if p == ALICE => Ok(Some(alice.clone())),
                (1 | 2, _) => Ok(Some(bob.clone())),
                _ => Err(RepoError::database("get_profile", "connection reset")),
            }
        });
        let resolve = resolver_over(&world, Arc::new(profiles), world.users.clone());

        let report = resolve
            .execute(arena_match.id(), ALICE, CombatAction::Attack)
            .await
            .unwrap();

        assert!(matches!(report.outcome, TurnOutcome::Finished(_)));
        let settlement = report.settlement.unwrap();
        assert!(settlement.is_complete());
        // max(20, 50 + (4 - 1) * 5)
        assert_eq!(settlement.reward.currency, 65);
        let alice = world.users.ledger(ALICE).await.unwrap();
        assert_eq!((alice.currency, alice.wins, alice.ranking_points), (65, 1, 10));
        assert_eq!(world.users.ledger(BOB).await.unwrap().losses, 1);
    }

    #[tokio::test]
    async fn item_consumption_is_retried_after_a_transient_failure() {
        let world = TestWorld::new();
        let arena_match = duel(&world).await;

        let mut inventory = MockInventoryPort::new();
        inventory
            .expect_peek_first_usable()
            .returning(|p, _| Ok(Some(sword(p))));
        let mut consume_calls = 0;
        inventory.expect_consume_one().times(2).returning(move |_| {
            consume_calls += 1;
            if consume_calls == 1 {
                Err(InventoryError::Backend("timeout".into()))
            } else {
                Ok(())
            }
        });
        let resolve = resolver_over(&world, world.users.clone(), Arc::new(inventory));

        let report = resolve
            .execute(arena_match.id(), ALICE, CombatAction::UseItem)
            .await
            .unwrap();

        assert_eq!(report.effect, ActionEffect::Damage { amount: 80 });
        assert!(report.item_used.is_some());
    }

    #[tokio::test]
    async fn unconsumable_item_does_not_undo_the_action() {
        let world = TestWorld::new();
        let arena_match = duel(&world).await;

        let mut inventory = MockInventoryPort::new();
        inventory
            .expect_peek_first_usable()
            .returning(|p, _| Ok(Some(sword(p))));
        inventory
            .expect_consume_one()
            .times(3)
            .returning(|_| Err(InventoryError::Backend("down".into())));
        let resolve = resolver_over(&world, world.users.clone(), Arc::new(inventory));

        let report = resolve
            .execute(arena_match.id(), ALICE, CombatAction::UseItem)
            .await
            .unwrap();

        assert_eq!(report.opponent_hp, 30);
        let stored = world.matches.get(arena_match.id()).await.unwrap().unwrap();
        assert_eq!(stored.turn_holder(), BOB);
    }
}
