//! Concurrency tests.
//!
//! Hit callbacks, animation callbacks and the frame tick call into the engine
//! from different threads. These tests hammer the shared structures from a
//! rayon pool while a writer mutates them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use rayon::prelude::*;

use crate::actor::{ActorId, AttackContext, SkillValues};
use crate::bookkeeping::{CostLedger, CostSettlement};
use crate::settings::Settings;
use crate::timing::{ParryWindow, TimerState, TimingRegistry};

use super::helpers::{attacker_with, dagger, defender_with, even_duel, sword, Duel};

#[test]
fn readers_never_observe_a_partial_timer() {
    let registry = TimingRegistry::new(ParryWindow { start: 0.0, end: 0.3 });
    let actor = ActorId::new(1);
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..2_000 {
                registry.start(actor);
                registry.advance(0.05, |_| true);
                registry.finish(actor);
            }
            done.store(true, Ordering::Release);
        });

        while !done.load(Ordering::Acquire) {
            (0..256).into_par_iter().for_each(|_| {
                if let TimerState::Active { elapsed } = registry.state(actor) {
                    assert!(elapsed.is_finite());
                    assert!((0.0..=0.3).contains(&elapsed));
                }
                let _ = registry.in_window(actor);
            });
        }
    });

    assert!(registry.len() <= 1);
}

#[test]
fn concurrent_starts_on_distinct_actors_all_land() {
    let registry = TimingRegistry::default();
    (0..1_000u64)
        .into_par_iter()
        .for_each(|id| registry.start(ActorId::new(id)));

    assert_eq!(registry.len(), 1_000);
    assert!(registry.is_armed());
    assert!((0..1_000u64).all(|id| registry.in_window(ActorId::new(id))));
}

#[test]
fn concurrent_restarts_never_duplicate() {
    let registry = TimingRegistry::default();
    let actor = ActorId::new(7);
    (0..1_000).into_par_iter().for_each(|_| registry.start(actor));
    assert_eq!(registry.len(), 1);
}

#[test]
fn cost_ledger_settles_each_actor_exactly_once() {
    let ledger = CostLedger::new();
    (0..500u64).into_par_iter().for_each(|id| {
        let actor = ActorId::new(id);
        ledger.cache(actor, 10.0);
        if id % 2 == 0 {
            ledger.negate(actor);
        }
    });

    let settlements: Vec<_> = (0..500u64)
        .into_par_iter()
        .map(|id| ledger.settle(ActorId::new(id)))
        .collect();

    let debited = settlements
        .iter()
        .filter(|s| matches!(s, CostSettlement::Debit(_)))
        .count();
    let waived = settlements
        .iter()
        .filter(|s| matches!(s, CostSettlement::Waived(_)))
        .count();
    assert_eq!(debited, 250);
    assert_eq!(waived, 250);
    assert!(ledger.is_empty());
}

#[test]
fn engine_handles_callbacks_from_many_threads() {
    let duel = Duel::with_settings(
        attacker_with(dagger(), SkillValues::default(), AttackContext::default()),
        defender_with(sword(), SkillValues::melee(50.0, 0.0)),
        Settings::default(),
    );
    duel.engine.start_timing(duel.defender);

    let parried = (0..200)
        .into_par_iter()
        .filter(|_| {
            duel.engine.tick(0.0);
            duel.engine.process_melee_parry(duel.attacker, duel.defender)
        })
        .count();

    // Zero-length ticks never close the window.
    assert_eq!(parried, 200);
    assert_eq!(duel.events.event_count(), 200);
}

#[test]
fn queries_proceed_while_a_tick_waits_on_the_world() {
    let duel = even_duel();
    duel.engine.start_timing(duel.defender);
    let world = duel.world.write().unwrap();

    thread::scope(|scope| {
        let ticker = scope.spawn(|| duel.engine.tick(0.01));
        // The tick is parked on the world lock and must not hold the timers.
        for _ in 0..100 {
            assert!(duel.engine.is_in_parry_window(duel.defender));
            thread::yield_now();
        }
        drop(world);
        assert_eq!(ticker.join().unwrap().advanced, 1);
    });
}
