//! Collaborator contracts between the engine and its host.
//!
//! The engine owns no world state. It asks the host for snapshots through
//! [`CombatWorld`] and hands every consequence of a decision back through
//! [`EffectsTrigger`], [`ProjectileControl`] and [`EventBus`]. All calls are
//! fire-and-forget: the engine never consumes a return value from them.
//!
//! Collaborators are called from whichever context invoked the engine (hit
//! callback, animation callback, frame tick), so they must be `Send + Sync`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actor::{ActorId, ActorSnapshot, ProjectileId, ProjectileSnapshot, Skill};

/// Read access to combatants and projectiles.
pub trait CombatWorld: Send + Sync {
    /// Returns a snapshot of `id`, or `None` if the reference is no longer valid.
    fn actor(&self, id: ActorId) -> Option<ActorSnapshot>;

    /// Returns a snapshot of `id`, or `None` if the projectile is gone.
    fn projectile(&self, id: ProjectileId) -> Option<ProjectileSnapshot>;

    /// Returns true if `id` still refers to a live actor.
    fn contains_actor(&self, id: ActorId) -> bool {
        self.actor(id).is_some()
    }

    /// The host's combat hit cone half-angle in degrees.
    fn combat_hit_cone_angle(&self) -> f32;
}

/// Sound cue played on a successful parry or guard bash.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Parry with a shield, and guard bashes.
    ShieldParry,
    /// Parry with a weapon.
    WeaponParry,
}

/// Cosmetic and gameplay side effects applied by the host.
pub trait EffectsTrigger: Send + Sync {
    /// Staggers `victim` away from `source`. `riposte_score` is the cached
    /// score differential that scales the stagger.
    fn stagger(&self, source: ActorId, victim: ActorId, riposte_score: f64);

    /// Applies parry stun damage. Hosts without a stun system leave this as
    /// the default no-op.
    fn stun_damage(&self, _parrier: ActorId, _attacker: ActorId) {}

    /// Plays `cue` at `at`'s location.
    fn play_sound(&self, at: ActorId, cue: SoundCue);

    /// Plays a block spark on `at`.
    fn block_spark(&self, at: ActorId);

    /// Slows time to `percentage` for `duration` seconds.
    fn slow_time(&self, duration: f32, percentage: f32);

    /// Shakes the camera.
    fn shake_camera(&self, strength: f32, position: Vec3, duration: f32);

    /// Grants the player `amount` experience in `skill`.
    fn grant_experience(&self, skill: Skill, amount: f32);

    /// Debits `amount` stamina from `actor`.
    fn damage_stamina(&self, actor: ActorId, amount: f32);
}

/// Steering for deflected projectiles.
pub trait ProjectileControl: Send + Sync {
    /// Transfers ownership of `projectile` to `owner`.
    fn reset_owner(&self, projectile: ProjectileId, owner: ActorId);

    /// Sends `projectile` back toward `target`.
    fn retarget(&self, projectile: ProjectileId, target: ActorId);

    /// Reverses `projectile` along its path.
    fn reflect(&self, projectile: ProjectileId);
}

/// Notification broadcast to other mods after a parry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParryEvent {
    /// A melee attack by `attacker` was parried.
    MeleeParry {
        /// The attacker whose swing was parried.
        attacker: ActorId,
    },
    /// A projectile was deflected.
    RangedParry,
}

impl ParryEvent {
    /// The event name other mods subscribe to.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MeleeParry { .. } => "EP_MeleeParryEvent",
            Self::RangedParry => "EP_RangedParryEvent",
        }
    }

    /// The actor reference carried as payload, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<ActorId> {
        match self {
            Self::MeleeParry { attacker } => Some(*attacker),
            Self::RangedParry => None,
        }
    }
}

impl fmt::Display for ParryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outbound notifications; no acknowledgement.
pub trait EventBus: Send + Sync {
    /// Sends `event`.
    fn send(&self, event: ParryEvent);
}

/// The set of collaborators an engine is built with.
#[derive(Clone)]
pub struct Host {
    /// Actor and projectile queries.
    pub world: Arc<dyn CombatWorld>,
    /// Side effects.
    pub effects: Arc<dyn EffectsTrigger>,
    /// Projectile steering.
    pub projectiles: Arc<dyn ProjectileControl>,
    /// Outbound notifications.
    pub events: Arc<dyn EventBus>,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

// =============================================================================
// Event log
// =============================================================================

/// An [`EventBus`] that records every event it is sent.
///
/// Events can be drained with [`EventLog::take_events`], e.g. once per frame
/// by a host that forwards them to its own event system.
///
/// # Example
///
/// ```
/// use riposte_core::actor::ActorId;
/// use riposte_core::host::{EventBus, EventLog, ParryEvent};
///
/// let log = EventLog::new();
/// log.send(ParryEvent::MeleeParry { attacker: ActorId::new(3) });
///
/// let events = log.take_events();
/// assert_eq!(events[0].name(), "EP_MeleeParryEvent");
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<ParryEvent>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ParryEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drains and returns all recorded events in send order.
    pub fn take_events(&self) -> Vec<ParryEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been recorded since the last drain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discards all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl EventBus for EventLog {
    fn send(&self, event: ParryEvent) {
        tracing::debug!(event = event.name(), payload = ?event.payload(), "parry event");
        self.lock().push(event);
    }
}
