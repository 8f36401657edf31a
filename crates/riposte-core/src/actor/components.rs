//! Equipment, attack and projectile data carried by snapshots.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ActorId;

/// Actor skills the engine knows about.
///
/// Only [`Skill::OneHanded`] and [`Skill::TwoHanded`] contribute to scores;
/// the rest exist so weapons and experience grants can name them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    /// One-handed melee weapons.
    OneHanded,
    /// Two-handed melee weapons.
    TwoHanded,
    /// Bows and crossbows.
    Archery,
    /// Blocking and parrying.
    Block,
    /// Anything else (staves, spells, unarmed).
    Other,
}

/// Skill levels of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillValues {
    /// One-handed skill level.
    pub one_handed: f32,
    /// Two-handed skill level.
    pub two_handed: f32,
    /// Archery skill level.
    pub archery: f32,
    /// Block skill level.
    pub block: f32,
}

impl SkillValues {
    /// Creates skill values with only the melee skills set.
    #[must_use]
    pub const fn melee(one_handed: f32, two_handed: f32) -> Self {
        Self {
            one_handed,
            two_handed,
            archery: 0.0,
            block: 0.0,
        }
    }

    /// Returns the level of `skill`, or zero for [`Skill::Other`].
    #[must_use]
    pub const fn get(&self, skill: Skill) -> f32 {
        match skill {
            Skill::OneHanded => self.one_handed,
            Skill::TwoHanded => self.two_handed,
            Skill::Archery => self.archery,
            Skill::Block => self.block,
            Skill::Other => 0.0,
        }
    }
}

/// Keyword membership and skill lookup for a weapon.
pub trait WeaponQuery {
    /// Returns true if the weapon carries `keyword`.
    fn has_keyword(&self, keyword: &str) -> bool;

    /// Returns the skill that governs this weapon.
    fn skill(&self) -> Skill;
}

/// A weapon as seen by the score model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Governing skill.
    pub skill: Skill,
    /// Type keywords (e.g. `WeapTypeSword`). A weapon may carry several.
    pub keywords: Vec<String>,
}

impl WeaponProfile {
    /// Creates a weapon with the given skill and keywords.
    ///
    /// # Example
    ///
    /// ```
    /// use riposte_core::actor::{Skill, WeaponProfile, WeaponQuery};
    ///
    /// let katana = WeaponProfile::new(Skill::OneHanded, ["WeapTypeKatana", "WeapTypeSword"]);
    /// assert!(katana.has_keyword("WeapTypeSword"));
    /// ```
    pub fn new<I, S>(skill: Skill, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skill,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

impl WeaponQuery for WeaponProfile {
    fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    fn skill(&self) -> Skill {
        self.skill
    }
}

bitflags! {
    /// Flags of the attack currently being performed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AttackFlags: u8 {
        /// Power attack.
        const POWER_ATTACK = 1 << 0;
        /// Shield or weapon bash.
        const BASH_ATTACK = 1 << 1;
        /// Initiated by the left hand.
        const LEFT_HAND = 1 << 2;
    }
}

/// Attack data for an actor that is mid-swing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackContext {
    /// Attack flags.
    pub flags: AttackFlags,
}

impl AttackContext {
    /// Creates an attack with the given flags.
    #[must_use]
    pub const fn new(flags: AttackFlags) -> Self {
        Self { flags }
    }

    /// A right-hand power attack.
    #[must_use]
    pub const fn power() -> Self {
        Self::new(AttackFlags::POWER_ATTACK)
    }
}

/// Kind of projectile, used by the deflection toggles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Arrows and bolts.
    Arrow,
    /// Spell projectiles.
    Magic,
}

/// Read-only view of an in-flight projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// World position.
    pub position: Vec3,
    /// Projectile kind.
    pub kind: ProjectileKind,
    /// Actor that launched it, if known.
    pub shooter: Option<ActorId>,
}

impl ProjectileSnapshot {
    /// Creates a projectile at `position`.
    #[must_use]
    pub const fn new(position: Vec3, kind: ProjectileKind, shooter: Option<ActorId>) -> Self {
        Self {
            position,
            kind,
            shooter,
        }
    }
}
