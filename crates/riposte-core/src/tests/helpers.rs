//! Test doubles and fixtures for driving the engine end to end.
//!
//! - [`Recorder`]: an `EffectsTrigger` + `ProjectileControl` that logs calls
//! - [`Duel`]: an engine over an arena with one attacker and one defender

use std::f32::consts::PI;
use std::sync::{Arc, Mutex, RwLock};

use glam::Vec3;

use crate::actor::{
    ActorId, ActorSnapshot, AttackContext, ProjectileId, ProjectileKind, ProjectileSnapshot, Skill,
    SkillValues, WeaponProfile,
};
use crate::arena::Arena;
use crate::host::{EffectsTrigger, EventLog, Host, ProjectileControl, SoundCue};
use crate::resolver::ParryEngine;
use crate::settings::Settings;

/// Installs a test subscriber so `RUST_LOG` works under `cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Recorder
// =============================================================================

/// A collaborator call captured by [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Stagger {
        source: ActorId,
        victim: ActorId,
        riposte: f64,
    },
    StunDamage {
        parrier: ActorId,
        attacker: ActorId,
    },
    Sound {
        at: ActorId,
        cue: SoundCue,
    },
    Spark(ActorId),
    SlowTime {
        duration: f32,
        percentage: f32,
    },
    ShakeCamera {
        strength: f32,
        duration: f32,
    },
    Experience {
        skill: Skill,
        amount: f32,
    },
    Stamina {
        actor: ActorId,
        amount: f32,
    },
    ResetOwner {
        projectile: ProjectileId,
        owner: ActorId,
    },
    Retarget {
        projectile: ProjectileId,
        target: ActorId,
    },
    Reflect(ProjectileId),
}

/// Records every effect and projectile call in order.
#[derive(Debug, Default)]
pub struct Recorder {
    calls: Mutex<Vec<Recorded>>,
}

impl Recorder {
    fn push(&self, call: Recorded) {
        self.calls.lock().unwrap().push(call);
    }

    /// All calls so far.
    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Returns true if any recorded call matches `predicate`.
    pub fn any(&self, predicate: impl Fn(&Recorded) -> bool) -> bool {
        self.calls.lock().unwrap().iter().any(predicate)
    }
}

impl EffectsTrigger for Recorder {
    fn stagger(&self, source: ActorId, victim: ActorId, riposte_score: f64) {
        self.push(Recorded::Stagger {
            source,
            victim,
            riposte: riposte_score,
        });
    }

    fn stun_damage(&self, parrier: ActorId, attacker: ActorId) {
        self.push(Recorded::StunDamage { parrier, attacker });
    }

    fn play_sound(&self, at: ActorId, cue: SoundCue) {
        self.push(Recorded::Sound { at, cue });
    }

    fn block_spark(&self, at: ActorId) {
        self.push(Recorded::Spark(at));
    }

    fn slow_time(&self, duration: f32, percentage: f32) {
        self.push(Recorded::SlowTime {
            duration,
            percentage,
        });
    }

    fn shake_camera(&self, strength: f32, _position: Vec3, duration: f32) {
        self.push(Recorded::ShakeCamera { strength, duration });
    }

    fn grant_experience(&self, skill: Skill, amount: f32) {
        self.push(Recorded::Experience { skill, amount });
    }

    fn damage_stamina(&self, actor: ActorId, amount: f32) {
        self.push(Recorded::Stamina { actor, amount });
    }
}

impl ProjectileControl for Recorder {
    fn reset_owner(&self, projectile: ProjectileId, owner: ActorId) {
        self.push(Recorded::ResetOwner { projectile, owner });
    }

    fn retarget(&self, projectile: ProjectileId, target: ActorId) {
        self.push(Recorded::Retarget { projectile, target });
    }

    fn reflect(&self, projectile: ProjectileId) {
        self.push(Recorded::Reflect(projectile));
    }
}

// =============================================================================
// Combatant factories
// =============================================================================

/// A one-handed sword.
pub fn sword() -> WeaponProfile {
    WeaponProfile::new(Skill::OneHanded, ["WeapTypeSword"])
}

/// A dagger.
pub fn dagger() -> WeaponProfile {
    WeaponProfile::new(Skill::OneHanded, ["WeapTypeDagger"])
}

/// A two-handed warhammer.
pub fn warhammer() -> WeaponProfile {
    WeaponProfile::new(Skill::TwoHanded, ["WeapTypeWarhammer"])
}

/// Defender at the origin facing +X, swinging `weapon` with `skills`.
pub fn defender_with(weapon: WeaponProfile, skills: SkillValues) -> ActorSnapshot {
    ActorSnapshot::at_position(Vec3::ZERO, 0.0)
        .with_skills(skills)
        .with_right_hand(weapon)
        .with_attack(AttackContext::default())
}

/// Attacker 80 units down +X facing the origin.
pub fn attacker_with(
    weapon: WeaponProfile,
    skills: SkillValues,
    attack: AttackContext,
) -> ActorSnapshot {
    ActorSnapshot::at_position(Vec3::new(80.0, 0.0, 0.0), PI)
        .with_skills(skills)
        .with_right_hand(weapon)
        .with_attack(attack)
}

/// An arrow at `position` fired by `shooter`.
pub fn arrow(position: Vec3, shooter: Option<ActorId>) -> ProjectileSnapshot {
    ProjectileSnapshot::new(position, ProjectileKind::Arrow, shooter)
}

// =============================================================================
// Duel fixture
// =============================================================================

/// An engine wired to recording collaborators over a two-actor arena.
pub struct Duel {
    pub world: Arc<RwLock<Arena>>,
    pub recorder: Arc<Recorder>,
    pub events: Arc<EventLog>,
    pub engine: ParryEngine,
    pub attacker: ActorId,
    pub defender: ActorId,
}

impl Duel {
    /// Builds a duel with default settings.
    pub fn new(attacker: ActorSnapshot, defender: ActorSnapshot) -> Self {
        Self::with_settings(attacker, defender, Settings::default())
    }

    /// Builds a duel with `settings`.
    pub fn with_settings(
        attacker: ActorSnapshot,
        defender: ActorSnapshot,
        settings: Settings,
    ) -> Self {
        init_tracing();

        let mut arena = Arena::new();
        let attacker = arena.spawn_actor(attacker);
        let defender = arena.spawn_actor(defender);

        let world = Arc::new(RwLock::new(arena));
        let recorder = Arc::new(Recorder::default());
        let events = Arc::new(EventLog::new());
        let host = Host {
            world: world.clone(),
            effects: recorder.clone(),
            projectiles: recorder.clone(),
            events: events.clone(),
        };

        Self {
            engine: ParryEngine::new(settings, host),
            world,
            recorder,
            events,
            attacker,
            defender,
        }
    }

    /// Spawns a projectile into the duel's world.
    pub fn spawn_projectile(&self, projectile: ProjectileSnapshot) -> ProjectileId {
        self.world.write().unwrap().spawn_projectile(projectile)
    }

    /// Edits an actor in place.
    pub fn edit_actor(&self, id: ActorId, edit: impl FnOnce(&mut ActorSnapshot)) {
        let mut world = self.world.write().unwrap();
        edit(world.get_actor_mut(id).unwrap());
    }

    /// Removes an actor from the world.
    pub fn despawn(&self, id: ActorId) {
        self.world.write().unwrap().despawn_actor(id);
    }

    /// Removes a projectile from the world.
    pub fn despawn_projectile(&self, id: ProjectileId) {
        self.world.write().unwrap().despawn_projectile(id);
    }
}

/// Defender: sword, one-handed 50 (score 70). Attacker: dagger, one-handed 30
/// (score 30).
pub fn even_duel() -> Duel {
    Duel::new(
        attacker_with(dagger(), SkillValues::melee(30.0, 0.0), AttackContext::default()),
        defender_with(sword(), SkillValues::melee(50.0, 0.0)),
    )
}

/// Same defender against a skill-80 warhammer power attack (score 155).
pub fn overpowering_duel_with(settings: Settings) -> Duel {
    Duel::with_settings(
        attacker_with(warhammer(), SkillValues::melee(0.0, 80.0), AttackContext::power()),
        defender_with(sword(), SkillValues::melee(50.0, 0.0)),
        settings,
    )
}
