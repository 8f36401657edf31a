//! Actor module: identifiers and read-only snapshots of combatants.
//!
//! This module provides the data the arbitration engine reads about the world:
//! - [`ActorId`] / [`ProjectileId`]: Stable identifiers used as registry keys
//! - [`ActorFlags`]: Boolean traits and transient states of a combatant
//! - [`ActorSnapshot`]: Everything the engine needs to know about one actor
//!
//! Snapshots are produced by the host (see [`crate::host::CombatWorld`]) on
//! demand. The engine never holds on to them beyond a single decision, so a
//! host is free to build them from whatever native representation it has.
//!
//! # Example
//!
//! ```
//! use riposte_core::actor::{ActorFlags, ActorId, ActorSnapshot};
//! use glam::Vec3;
//!
//! let snapshot = ActorSnapshot::at_position(Vec3::new(0.0, 0.0, 0.0), 0.0)
//!     .with_flags(ActorFlags::PLAYER);
//!
//! assert!(snapshot.is_player());
//! assert_eq!(ActorId::new(7).as_u64(), 7);
//! ```

pub mod components;

use std::fmt;

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use components::{
    AttackContext, AttackFlags, ProjectileKind, ProjectileSnapshot, Skill, SkillValues,
    WeaponProfile, WeaponQuery,
};

/// Unique identifier for a combatant.
///
/// `ActorId` is a newtype wrapper around `u64`. Ids are handed out by the host
/// (or by [`crate::arena::Arena`]) and must stay stable for the combatant's
/// lifetime. Once an actor is gone its id is never reused, which is what lets
/// the timing registry detect stale keys.
///
/// # Example
///
/// ```
/// use riposte_core::actor::ActorId;
///
/// let a = ActorId::new(1);
/// let b = ActorId::new(2);
///
/// assert!(a < b);
/// assert_eq!(u64::from(b), 2);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates a new `ActorId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<ActorId> for u64 {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

/// Unique identifier for an in-flight projectile.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Creates a new `ProjectileId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectileId({})", self.0)
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProjectileId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

bitflags! {
    /// Boolean traits and transient states of a combatant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ActorFlags: u8 {
        /// The player-controlled combatant.
        const PLAYER = 1 << 0;
        /// The actor's base template is flagged female.
        const FEMALE = 1 << 1;
        /// Currently holding block.
        const BLOCKING = 1 << 2;
        /// Currently in the bash attack state.
        const BASHING = 1 << 3;
        /// A shield is equipped in the off hand.
        const SHIELD_EQUIPPED = 1 << 4;
        /// The actor's 3D is loaded in the world.
        const LOADED = 1 << 5;
    }
}

/// Read-only view of a combatant at the moment of a decision.
///
/// # Heading convention
///
/// `heading` is in radians, counter-clockwise from +X on the horizontal
/// plane. The vertical component of `position` is ignored by facing checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// World position.
    pub position: Vec3,
    /// Facing direction in radians (CCW from +X).
    pub heading: f32,
    /// Race identity as the host's form id.
    pub race_form: u32,
    /// Weapon skill levels.
    pub skills: SkillValues,
    /// Traits and states.
    pub flags: ActorFlags,
    /// Weapon equipped in the left (off) hand.
    pub left_hand: Option<WeaponProfile>,
    /// Weapon equipped in the right (main) hand.
    pub right_hand: Option<WeaponProfile>,
    /// The attack currently being performed, if any.
    pub attack: Option<AttackContext>,
}

impl Default for ActorSnapshot {
    fn default() -> Self {
        Self::at_position(Vec3::ZERO, 0.0)
    }
}

impl ActorSnapshot {
    /// Creates an unarmed, loaded actor at `position` facing `heading`.
    #[must_use]
    pub fn at_position(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            heading,
            race_form: 0,
            skills: SkillValues::default(),
            flags: ActorFlags::LOADED,
            left_hand: None,
            right_hand: None,
            attack: None,
        }
    }

    /// Adds `flags` to the snapshot.
    #[must_use]
    pub fn with_flags(mut self, flags: ActorFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    /// Sets the race form id.
    #[must_use]
    pub fn with_race(mut self, race_form: u32) -> Self {
        self.race_form = race_form;
        self
    }

    /// Sets the skill levels.
    #[must_use]
    pub fn with_skills(mut self, skills: SkillValues) -> Self {
        self.skills = skills;
        self
    }

    /// Equips `weapon` in the right hand.
    #[must_use]
    pub fn with_right_hand(mut self, weapon: WeaponProfile) -> Self {
        self.right_hand = Some(weapon);
        self
    }

    /// Equips `weapon` in the left hand.
    #[must_use]
    pub fn with_left_hand(mut self, weapon: WeaponProfile) -> Self {
        self.left_hand = Some(weapon);
        self
    }

    /// Puts the actor mid-attack.
    #[must_use]
    pub fn with_attack(mut self, attack: AttackContext) -> Self {
        self.attack = Some(attack);
        self
    }

    /// Returns true if this is the player-controlled combatant.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.flags.contains(ActorFlags::PLAYER)
    }

    /// Returns true if a shield is equipped.
    #[must_use]
    pub fn has_shield(&self) -> bool {
        self.flags.contains(ActorFlags::SHIELD_EQUIPPED)
    }

    /// Returns true if the actor is holding block.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.flags.contains(ActorFlags::BLOCKING)
    }

    /// Returns true if the actor is in the bash attack state.
    #[must_use]
    pub fn is_bashing(&self) -> bool {
        self.flags.contains(ActorFlags::BASHING)
    }

    /// Returns true if the actor's 3D is loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.flags.contains(ActorFlags::LOADED)
    }

    /// Returns true if the current attack is flagged as a power attack.
    #[must_use]
    pub fn is_power_attacking(&self) -> bool {
        self.attack
            .is_some_and(|attack| attack.flags.contains(AttackFlags::POWER_ATTACK))
    }

    /// Returns the weapon used by the current attack.
    ///
    /// `None` when the actor is not attacking, when the attack is a bash, or
    /// when the initiating hand is empty. The hand is picked by the attack's
    /// [`AttackFlags::LEFT_HAND`] flag.
    #[must_use]
    pub fn attack_weapon(&self) -> Option<&WeaponProfile> {
        let attack = self.attack?;
        if attack.flags.contains(AttackFlags::BASH_ATTACK) {
            return None;
        }
        if attack.flags.contains(AttackFlags::LEFT_HAND) {
            self.left_hand.as_ref()
        } else {
            self.right_hand.as_ref()
        }
    }
}
