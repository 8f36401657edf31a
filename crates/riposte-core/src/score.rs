//! Score model for parry arbitration.
//!
//! A combatant's score is a plain additive sum of independent bonuses:
//!
//! | Contribution  | Source                                                      |
//! |---------------|-------------------------------------------------------------|
//! | Category      | First matching [`WeaponCategory`] in priority order         |
//! | Skill         | `weapon_skill_weight * level` for one- or two-handed skill  |
//! | Race          | [`Race`] identified from the actor's race form id           |
//! | Gender        | Actor flagged [`ActorFlags::FEMALE`]                        |
//! | Power attack  | Current attack flagged [`AttackFlags::POWER_ATTACK`]        |
//! | Player        | Actor flagged [`ActorFlags::PLAYER`]                        |
//!
//! There are no multiplicative terms, so the result does not depend on the
//! order contributions are evaluated in.
//!
//! [`ActorFlags::FEMALE`]: crate::actor::ActorFlags::FEMALE
//! [`ActorFlags::PLAYER`]: crate::actor::ActorFlags::PLAYER
//! [`AttackFlags::POWER_ATTACK`]: crate::actor::AttackFlags::POWER_ATTACK

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::{ActorFlags, ActorSnapshot, AttackContext, AttackFlags, Skill, WeaponQuery};

// =============================================================================
// Weapon categories
// =============================================================================

/// Weapon category recognised by keyword.
///
/// Specialty categories (quarterstaff, halberd, pike, katana, rapier, claw,
/// whip) come before the vanilla ones because specialty weapons also carry a
/// vanilla type keyword. Classification walks [`WeaponCategory::PRIORITY`] and
/// stops at the first hit, so at most one category bonus is ever applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponCategory {
    /// Two-handed quarterstaff.
    Quarterstaff,
    /// Two-handed halberd.
    Halberd,
    /// Two-handed pike.
    Pike,
    /// One-handed katana.
    Katana,
    /// One-handed rapier.
    Rapier,
    /// One-handed claws.
    Claw,
    /// One-handed whip.
    Whip,
    /// Two-handed warhammer.
    Warhammer,
    /// Two-handed battleaxe.
    Battleaxe,
    /// Two-handed greatsword.
    Greatsword,
    /// One-handed mace.
    Mace,
    /// One-handed war axe.
    WarAxe,
    /// One-handed sword.
    Sword,
    /// Dagger.
    Dagger,
}

impl WeaponCategory {
    /// Number of categories.
    pub const COUNT: usize = 14;

    /// Categories in classification priority order.
    pub const PRIORITY: [Self; Self::COUNT] = [
        Self::Quarterstaff,
        Self::Halberd,
        Self::Pike,
        Self::Katana,
        Self::Rapier,
        Self::Claw,
        Self::Whip,
        Self::Warhammer,
        Self::Battleaxe,
        Self::Greatsword,
        Self::Mace,
        Self::WarAxe,
        Self::Sword,
        Self::Dagger,
    ];

    /// Keyword that marks a weapon as belonging to this category.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Quarterstaff => "WeapTypeQtrStaff",
            Self::Halberd => "WeapTypeHalberd",
            Self::Pike => "WeapTypePike",
            Self::Katana => "WeapTypeKatana",
            Self::Rapier => "WeapTypeRapier",
            Self::Claw => "WeapTypeClaw",
            Self::Whip => "WeapTypeWhip",
            Self::Warhammer => "WeapTypeWarhammer",
            Self::Battleaxe => "WeapTypeBattleaxe",
            Self::Greatsword => "WeapTypeGreatsword",
            Self::Mace => "WeapTypeMace",
            Self::WarAxe => "WeapTypeWarAxe",
            Self::Sword => "WeapTypeSword",
            Self::Dagger => "WeapTypeDagger",
        }
    }

    /// Configuration key of this category's bonus in the `Scores` section.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Quarterstaff => "TwoHandQuarterstaffScore",
            Self::Halberd => "TwoHandHalberdScore",
            Self::Pike => "TwoHandPikeScore",
            Self::Katana => "OneHandKatanaScore",
            Self::Rapier => "OneHandRapierScore",
            Self::Claw => "OneHandClawsScore",
            Self::Whip => "OneHandWhipScore",
            Self::Warhammer => "TwoHandWarhammerScore",
            Self::Battleaxe => "TwoHandAxeScore",
            Self::Greatsword => "TwoHandSwordScore",
            Self::Mace => "OneHandMaceScore",
            Self::WarAxe => "OneHandAxeScore",
            Self::Sword => "OneHandSwordScore",
            Self::Dagger => "OneHandDaggerScore",
        }
    }

    /// Default bonus for this category.
    #[must_use]
    pub const fn default_bonus(self) -> f64 {
        match self {
            Self::Quarterstaff | Self::Warhammer | Self::Battleaxe => 50.0,
            Self::Halberd => 45.0,
            Self::Greatsword => 40.0,
            Self::Pike | Self::Katana => 30.0,
            Self::Mace | Self::WarAxe => 25.0,
            Self::Sword => 20.0,
            Self::Rapier => 15.0,
            Self::Claw => 10.0,
            Self::Whip => -100.0,
            Self::Dagger => 0.0,
        }
    }

    /// Returns the first category in priority order that `weapon` carries.
    ///
    /// # Example
    ///
    /// ```
    /// use riposte_core::actor::{Skill, WeaponProfile};
    /// use riposte_core::score::WeaponCategory;
    ///
    /// // Specialty weapons also carry the vanilla keyword; the specialty wins.
    /// let katana = WeaponProfile::new(Skill::OneHanded, ["WeapTypeSword", "WeapTypeKatana"]);
    /// assert_eq!(WeaponCategory::classify(&katana), Some(WeaponCategory::Katana));
    /// ```
    pub fn classify<W: WeaponQuery + ?Sized>(weapon: &W) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|category| weapon.has_keyword(category.keyword()))
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WeaponCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

// =============================================================================
// Races
// =============================================================================

/// Playable race recognised by form id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    /// High elf.
    Altmer,
    /// Argonian.
    Argonian,
    /// Wood elf.
    Bosmer,
    /// Breton.
    Breton,
    /// Dark elf.
    Dunmer,
    /// Imperial.
    Imperial,
    /// Khajiit.
    Khajiit,
    /// Nord.
    Nord,
    /// Orc.
    Orc,
    /// Redguard.
    Redguard,
}

impl Race {
    /// Number of races.
    pub const COUNT: usize = 10;

    /// All races.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Altmer,
        Self::Argonian,
        Self::Bosmer,
        Self::Breton,
        Self::Dunmer,
        Self::Imperial,
        Self::Khajiit,
        Self::Nord,
        Self::Orc,
        Self::Redguard,
    ];

    /// The two form ids that identify this race (playable and vampire variant).
    #[must_use]
    pub const fn form_ids(self) -> [u32; 2] {
        match self {
            Self::Altmer => [0x13743, 0x88840],
            Self::Argonian => [0x13740, 0x8883A],
            Self::Bosmer => [0x13749, 0x88884],
            Self::Breton => [0x13741, 0x8883C],
            Self::Dunmer => [0x13742, 0x8883D],
            Self::Imperial => [0x13744, 0x88844],
            Self::Khajiit => [0x13745, 0x88845],
            Self::Nord => [0x13746, 0x88794],
            Self::Orc => [0x13747, 0xA82B9],
            Self::Redguard => [0x13748, 0x88846],
        }
    }

    /// Identifies a race from a form id.
    ///
    /// # Example
    ///
    /// ```
    /// use riposte_core::score::Race;
    ///
    /// assert_eq!(Race::from_form_id(0x13746), Some(Race::Nord));
    /// assert_eq!(Race::from_form_id(0x88794), Some(Race::Nord));
    /// assert_eq!(Race::from_form_id(0xDEAD), None);
    /// ```
    #[must_use]
    pub fn from_form_id(form_id: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|race| race.form_ids().contains(&form_id))
    }

    /// Configuration key of this race's bonus in the `Scores` section.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Altmer => "AltmerScore",
            Self::Argonian => "ArgonianScore",
            Self::Bosmer => "BosmerScore",
            Self::Breton => "BretonScore",
            Self::Dunmer => "DunmerScore",
            Self::Imperial => "ImperialScore",
            Self::Khajiit => "KhajiitScore",
            Self::Nord => "NordScore",
            Self::Orc => "OrcScore",
            Self::Redguard => "RedguardScore",
        }
    }

    /// Default bonus for this race.
    #[must_use]
    pub const fn default_bonus(self) -> f64 {
        match self {
            Self::Altmer => -15.0,
            Self::Bosmer | Self::Breton => -10.0,
            Self::Dunmer => -5.0,
            Self::Argonian | Self::Imperial => 0.0,
            Self::Khajiit => 5.0,
            Self::Nord | Self::Redguard => 10.0,
            Self::Orc => 20.0,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// Weights
// =============================================================================

/// Immutable per-session weights of the score model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Attacker must out-score the defender by at least this much to override.
    pub score_diff_threshold: f64,
    /// Multiplier applied to the governing weapon skill.
    pub weapon_skill_weight: f64,
    /// Bonus for female actors.
    pub female: f64,
    /// Bonus for power attacks.
    pub power_attack: f64,
    /// Bonus for the player.
    pub player: f64,
    categories: [f64; WeaponCategory::COUNT],
    races: [f64; Race::COUNT],
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            score_diff_threshold: 20.0,
            weapon_skill_weight: 1.0,
            female: -10.0,
            power_attack: 25.0,
            player: 0.0,
            // PRIORITY is declared in discriminant order, so this fills slot by slot.
            categories: WeaponCategory::PRIORITY.map(WeaponCategory::default_bonus),
            races: Race::ALL.map(Race::default_bonus),
        }
    }
}

impl ScoreWeights {
    /// Returns the bonus for `category`.
    #[must_use]
    pub const fn category_bonus(&self, category: WeaponCategory) -> f64 {
        self.categories[category.index()]
    }

    /// Sets the bonus for `category`.
    pub fn set_category_bonus(&mut self, category: WeaponCategory, bonus: f64) {
        self.categories[category.index()] = bonus;
    }

    /// Returns the bonus for `race`.
    #[must_use]
    pub const fn race_bonus(&self, race: Race) -> f64 {
        self.races[race.index()]
    }

    /// Sets the bonus for `race`.
    pub fn set_race_bonus(&mut self, race: Race, bonus: f64) {
        self.races[race.index()] = bonus;
    }

    /// The ordered `(category, bonus)` table classification walks.
    pub fn category_table(&self) -> impl Iterator<Item = (WeaponCategory, f64)> + '_ {
        WeaponCategory::PRIORITY
            .into_iter()
            .map(|category| (category, self.category_bonus(category)))
    }
}

// =============================================================================
// Scoring
// =============================================================================

/// Per-contribution breakdown of a score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    /// Matched category and its bonus.
    pub category: Option<(WeaponCategory, f64)>,
    /// Weighted skill contribution.
    pub skill: f64,
    /// Race bonus (zero if unrecognised).
    pub race: f64,
    /// Gender bonus.
    pub gender: f64,
    /// Power-attack bonus.
    pub power_attack: f64,
    /// Player bonus.
    pub player: f64,
}

impl ScoreBreakdown {
    /// Sum of all contributions.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.category.map_or(0.0, |(_, bonus)| bonus)
            + self.skill
            + self.race
            + self.gender
            + self.power_attack
            + self.player
    }
}

/// Computes each contribution to an actor's score.
///
/// A missing weapon contributes neither a category nor a skill bonus.
#[must_use]
pub fn breakdown<W: WeaponQuery + ?Sized>(
    actor: &ActorSnapshot,
    weapon: Option<&W>,
    attack: Option<&AttackContext>,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let category = weapon
        .and_then(|w| WeaponCategory::classify(w))
        .map(|category| (category, weights.category_bonus(category)));

    let skill = match weapon.map(|w| w.skill()) {
        Some(skill @ (Skill::OneHanded | Skill::TwoHanded)) => {
            weights.weapon_skill_weight * f64::from(actor.skills.get(skill))
        }
        _ => 0.0,
    };

    let race = Race::from_form_id(actor.race_form).map_or(0.0, |race| weights.race_bonus(race));

    let gender = if actor.flags.contains(ActorFlags::FEMALE) {
        weights.female
    } else {
        0.0
    };

    let power_attack = if attack.is_some_and(|a| a.flags.contains(AttackFlags::POWER_ATTACK)) {
        weights.power_attack
    } else {
        0.0
    };

    let player = if actor.flags.contains(ActorFlags::PLAYER) {
        weights.player
    } else {
        0.0
    };

    ScoreBreakdown {
        category,
        skill,
        race,
        gender,
        power_attack,
        player,
    }
}

/// Computes an actor's arbitration score.
///
/// # Example
///
/// ```
/// use riposte_core::actor::{ActorSnapshot, Skill, SkillValues, WeaponProfile};
/// use riposte_core::score::{score, ScoreWeights};
///
/// let sword = WeaponProfile::new(Skill::OneHanded, ["WeapTypeSword"]);
/// let actor = ActorSnapshot::default().with_skills(SkillValues::melee(50.0, 0.0));
///
/// // 20 (sword) + 1.0 * 50 (one-handed skill)
/// assert_eq!(score(&actor, Some(&sword), None, &ScoreWeights::default()), 70.0);
/// ```
#[must_use]
pub fn score<W: WeaponQuery + ?Sized>(
    actor: &ActorSnapshot,
    weapon: Option<&W>,
    attack: Option<&AttackContext>,
    weights: &ScoreWeights,
) -> f64 {
    breakdown(actor, weapon, attack, weights).total()
}
