//! Outcome resolution: the parry engine.
//!
//! [`ParryEngine`] is the service object hosts construct once and call from
//! their hit, animation and frame-tick callbacks. It owns the timing registry
//! and both bookkeeping ledgers, reads the world through
//! [`crate::host::CombatWorld`] and delegates every consequence to the host's
//! collaborators.
//!
//! # Entry points
//!
//! - Timing: [`ParryEngine::start_timing`], [`ParryEngine::finish_timing`],
//!   [`ParryEngine::tick`]
//! - Melee: [`ParryEngine::can_parry_melee`], [`ParryEngine::process_melee_parry`]
//! - Ranged: [`ParryEngine::can_parry_projectile`],
//!   [`ParryEngine::process_projectile_parry`]
//! - Guard bash: [`ParryEngine::process_guard_bash`]
//! - Costs: [`ParryEngine::cache_parry_cost`], [`ParryEngine::negate_parry_cost`],
//!   [`ParryEngine::apply_parry_cost`]
//! - Host callbacks: [`ParryEngine::pre_hit`], [`ParryEngine::on_animation_event`]
//!
//! # Failure behaviour
//!
//! No entry point returns an error. A missing timer, cost or riposte entry
//! reads as "nothing pending". An actor or projectile the world no longer
//! knows fails closed: the attack proceeds normally.
//!
//! All methods take `&self`, so one engine can be shared across callback
//! threads behind an `Arc`.

mod bash;
mod effects;
mod melee;
mod projectile;

pub use effects::{
    SCREEN_SHAKE_DURATION, SCREEN_SHAKE_STRENGTH, SLOW_TIME_DURATION, SLOW_TIME_PERCENTAGE,
};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::{ActorId, ActorSnapshot};
use crate::arbiter::ContextArbiter;
use crate::bookkeeping::{CostLedger, CostSettlement, RiposteLedger};
use crate::geometry;
use crate::host::Host;
use crate::settings::Settings;
use crate::timing::{AdvanceReport, TimingRegistry};

/// Animation event tag that settles the holder's pending parry cost.
pub const BASH_STOP_EVENT: &str = "bashStop";

/// A hit reported by the host's hit detection before damage is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitData {
    /// The actor delivering the hit.
    pub attacker: ActorId,
    /// The actor being hit; `None` when the target is not an actor.
    pub target: Option<ActorId>,
}

/// The engine's answer to a [`HitData`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreHitVerdict {
    /// The hit was parried and must not deal damage.
    pub ignore_hit: bool,
}

/// Combat arbitration service.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, RwLock};
/// use riposte_core::actor::{ActorFlags, ActorSnapshot};
/// use riposte_core::arena::Arena;
/// use riposte_core::host::{EventLog, Host};
/// use riposte_core::resolver::ParryEngine;
/// use riposte_core::settings::Settings;
/// # use riposte_core::actor::{ActorId, ProjectileId, Skill};
/// # use riposte_core::host::{EffectsTrigger, ProjectileControl, SoundCue};
/// # struct Quiet;
/// # impl EffectsTrigger for Quiet {
/// #     fn stagger(&self, _: ActorId, _: ActorId, _: f64) {}
/// #     fn play_sound(&self, _: ActorId, _: SoundCue) {}
/// #     fn block_spark(&self, _: ActorId) {}
/// #     fn slow_time(&self, _: f32, _: f32) {}
/// #     fn shake_camera(&self, _: f32, _: glam::Vec3, _: f32) {}
/// #     fn grant_experience(&self, _: Skill, _: f32) {}
/// #     fn damage_stamina(&self, _: ActorId, _: f32) {}
/// # }
/// # impl ProjectileControl for Quiet {
/// #     fn reset_owner(&self, _: ProjectileId, _: ActorId) {}
/// #     fn retarget(&self, _: ProjectileId, _: ActorId) {}
/// #     fn reflect(&self, _: ProjectileId) {}
/// # }
/// use glam::Vec3;
///
/// let mut arena = Arena::new();
/// // Defender at the origin facing +X, shield up.
/// let defender = arena.spawn_actor(
///     ActorSnapshot::at_position(Vec3::ZERO, 0.0).with_flags(ActorFlags::SHIELD_EQUIPPED),
/// );
/// let attacker = arena.spawn_actor(ActorSnapshot::at_position(Vec3::new(80.0, 0.0, 0.0), 0.0));
///
/// let events = Arc::new(EventLog::new());
/// let host = Host {
///     world: Arc::new(RwLock::new(arena)),
///     effects: Arc::new(Quiet),
///     projectiles: Arc::new(Quiet),
///     events: events.clone(),
/// };
/// let engine = ParryEngine::new(Settings::default(), host);
///
/// assert!(!engine.process_melee_parry(attacker, defender));
/// engine.start_timing(defender);
/// assert!(engine.process_melee_parry(attacker, defender));
/// assert_eq!(events.event_count(), 1);
/// ```
#[derive(Debug)]
pub struct ParryEngine {
    settings: Settings,
    host: Host,
    /// Facing-cone half-angle in degrees, resolved once at construction.
    parry_angle: f32,
    timing: TimingRegistry,
    costs: CostLedger,
    riposte: RiposteLedger,
}

impl ParryEngine {
    /// Creates an engine over `host` with validated `settings`.
    ///
    /// The parry angle is the configured override, or the world's combat hit
    /// cone angle when none is set.
    #[must_use]
    pub fn new(settings: Settings, host: Host) -> Self {
        let settings = settings.validate();
        let parry_angle = settings.parry_angle(host.world.combat_hit_cone_angle());
        let window = settings.parry_window();
        tracing::info!(
            window_start = window.start,
            window_end = window.end,
            parry_angle,
            score_system = settings.core.use_score_system,
            "parry engine ready"
        );
        Self {
            timing: TimingRegistry::new(window),
            settings,
            host,
            parry_angle,
            costs: CostLedger::new(),
            riposte: RiposteLedger::new(),
        }
    }

    /// The engine's settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The facing-cone half-angle in degrees.
    #[must_use]
    pub const fn parry_angle(&self) -> f32 {
        self.parry_angle
    }

    /// The timing registry.
    #[must_use]
    pub const fn timing(&self) -> &TimingRegistry {
        &self.timing
    }

    /// Pending parry costs.
    #[must_use]
    pub const fn costs(&self) -> &CostLedger {
        &self.costs
    }

    /// Cached riposte scores.
    #[must_use]
    pub const fn riposte(&self) -> &RiposteLedger {
        &self.riposte
    }

    fn arbiter(&self) -> ContextArbiter<'_> {
        ContextArbiter::new(&self.settings, &self.riposte)
    }

    /// Looks up `id`, logging when the reference is no longer valid.
    fn resolve_actor(&self, id: ActorId, role: &'static str) -> Option<ActorSnapshot> {
        let snapshot = self.host.world.actor(id);
        if snapshot.is_none() {
            tracing::warn!(actor = %id, role, "invalid actor reference, failing closed");
        }
        snapshot
    }

    /// Returns true if `target` lies within `subject`'s parry cone.
    fn in_block_angle(&self, subject: &ActorSnapshot, target: Vec3) -> bool {
        geometry::within_facing_cone(subject.heading, subject.position, target, self.parry_angle)
    }

    /// Returns false for non-player parriers when NPC parries are disabled.
    fn may_parry(&self, parrier: &ActorSnapshot) -> bool {
        parrier.is_player() || self.settings.general.enable_npc_parry
    }

    // -------------------------------------------------------------------------
    // Timing
    // -------------------------------------------------------------------------

    /// Begins a parry attempt for `actor`, restarting any attempt in progress.
    pub fn start_timing(&self, actor: ActorId) {
        self.timing.start(actor);
    }

    /// Ends `actor`'s parry attempt. Returns true if one was in progress.
    pub fn finish_timing(&self, actor: ActorId) -> bool {
        self.timing.finish(actor)
    }

    /// Advances every parry attempt by `delta` seconds.
    ///
    /// Attempts whose actor the world no longer knows are dropped. A negative
    /// or non-finite `delta` advances nothing. The world is queried without
    /// the timing lock held.
    pub fn tick(&self, delta: f32) -> AdvanceReport {
        let world = &self.host.world;
        let report = self.timing.advance(delta, |actor| world.contains_actor(actor));
        if report.expired > 0 || report.invalidated > 0 {
            tracing::trace!(
                advanced = report.advanced,
                expired = report.expired,
                invalidated = report.invalidated,
                "parry timers pruned"
            );
        }
        report
    }

    /// Returns true if `actor` is timing a parry and has reached the window.
    #[must_use]
    pub fn is_in_parry_window(&self, actor: ActorId) -> bool {
        self.timing.in_window(actor)
    }

    // -------------------------------------------------------------------------
    // Costs and ripostes
    // -------------------------------------------------------------------------

    /// Records the stamina price of `actor`'s in-flight parry attempt.
    pub fn cache_parry_cost(&self, actor: ActorId, cost: f32) {
        self.costs.cache(actor, cost);
    }

    /// Marks `actor`'s pending parry cost as waived.
    pub fn negate_parry_cost(&self, actor: ActorId) {
        self.costs.negate(actor);
    }

    /// Settles `actor`'s pending parry cost.
    ///
    /// An unwaived cost is debited from the actor's stamina. The pending cost
    /// and the waiver mark are both cleared.
    pub fn apply_parry_cost(&self, actor: ActorId) -> CostSettlement {
        let settlement = self.costs.settle(actor);
        match settlement {
            CostSettlement::Debit(cost) => {
                tracing::debug!(%actor, cost, "parry cost debited");
                self.host.effects.damage_stamina(actor, cost);
            }
            CostSettlement::Waived(cost) => {
                tracing::debug!(%actor, cost, "parry cost waived");
            }
            CostSettlement::Nothing => {}
        }
        settlement
    }

    /// Caches `score` as `actor`'s pending riposte score.
    pub fn cache_riposte_score(&self, actor: ActorId, score: f64) {
        self.riposte.cache(actor, score);
    }

    /// Consumes `actor`'s pending riposte score, or `0.0` if none is cached.
    pub fn apply_riposte_score(&self, actor: ActorId) -> f64 {
        self.riposte.take(actor).unwrap_or_else(|| {
            tracing::debug!(%actor, "no riposte score cached");
            0.0
        })
    }

    // -------------------------------------------------------------------------
    // Host callbacks
    // -------------------------------------------------------------------------

    /// Pre-hit admission: a parried hit must be ignored by the host.
    ///
    /// Hits on non-actor targets pass through untouched.
    pub fn pre_hit(&self, hit: &HitData) -> PreHitVerdict {
        let Some(target) = hit.target else {
            return PreHitVerdict::default();
        };
        PreHitVerdict {
            ignore_hit: self.process_melee_parry(hit.attacker, target),
        }
    }

    /// Animation event hook. `bashStop` settles the holder's parry cost.
    pub fn on_animation_event(&self, tag: &str, holder: Option<ActorId>) {
        if tag != BASH_STOP_EVENT {
            return;
        }
        if let Some(holder) = holder {
            self.apply_parry_cost(holder);
        }
    }
}
