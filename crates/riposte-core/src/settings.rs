//! Engine settings and the configuration provider seam.
//!
//! Settings are grouped into the same sections the mod's INI files use
//! (`General`, `Effects`, `ProjectileParry`, `GuardBash`, `Experience`, `Core`,
//! `Scores`). Every key has a compiled-in default; [`Settings::from_provider`]
//! substitutes the default for any key the provider does not resolve.
//!
//! # Example
//!
//! ```
//! use riposte_core::settings::{Settings, TomlConfig};
//!
//! let config = TomlConfig::parse(r#"
//!     [General]
//!     fParryWindow_End = 0.25
//!
//!     [Scores]
//!     ScoreDiffThreshold = 30.0
//! "#).unwrap();
//!
//! let settings = Settings::from_provider(&config);
//! assert_eq!(settings.general.parry_window_end, 0.25);
//! assert_eq!(settings.scores.score_diff_threshold, 30.0);
//! // Unresolved keys keep their defaults.
//! assert!(settings.general.enable_weapon_parry);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::{Race, ScoreWeights, WeaponCategory};
use crate::timing::ParryWindow;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while reading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid TOML.
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// =============================================================================
// Provider
// =============================================================================

/// A raw configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// A boolean.
    Bool(bool),
    /// Any number; integers are widened.
    Number(f64),
    /// A string.
    Text(String),
    /// Anything else (tables, arrays, dates).
    Other,
}

/// Source of named settings, addressed by section and key.
pub trait ConfigProvider {
    /// Looks up a raw value. `None` if the key is absent.
    fn value(&self, section: &str, key: &str) -> Option<ConfigValue>;

    /// Looks up a boolean, falling back to `default` when absent or mistyped.
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.value(section, key) {
            None => default,
            Some(ConfigValue::Bool(value)) => value,
            Some(other) => {
                tracing::warn!(section, key, ?other, default, "expected a boolean, using default");
                default
            }
        }
    }

    /// Looks up a finite number, falling back to `default` when absent,
    /// mistyped or not finite.
    fn get_f64(&self, section: &str, key: &str, default: f64) -> f64 {
        match self.value(section, key) {
            None => default,
            Some(ConfigValue::Number(value)) if value.is_finite() => value,
            Some(other) => {
                tracing::warn!(
                    section,
                    key,
                    ?other,
                    default,
                    "expected a finite number, using default"
                );
                default
            }
        }
    }

    /// Like [`ConfigProvider::get_f64`], narrowed to `f32`.
    #[allow(clippy::cast_possible_truncation)]
    fn get_f32(&self, section: &str, key: &str, default: f32) -> f32 {
        self.get_f64(section, key, f64::from(default)) as f32
    }

    /// Looks up an optional finite number. Mistyped values read as absent.
    #[allow(clippy::cast_possible_truncation)]
    fn get_opt_f32(&self, section: &str, key: &str) -> Option<f32> {
        match self.value(section, key)? {
            ConfigValue::Number(value) if value.is_finite() => Some(value as f32),
            other => {
                tracing::warn!(section, key, ?other, "expected a finite number, ignoring");
                None
            }
        }
    }
}

/// A provider that resolves nothing; every setting takes its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Defaults;

impl ConfigProvider for Defaults {
    fn value(&self, _section: &str, _key: &str) -> Option<ConfigValue> {
        None
    }
}

/// A [`ConfigProvider`] over a parsed TOML document.
///
/// Sections are TOML tables; keys inside them keep their INI spelling.
#[derive(Debug, Clone, Default)]
pub struct TomlConfig {
    table: toml::Table,
}

impl TomlConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `text` is not valid TOML.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            table: text.parse::<toml::Table>()?,
        })
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        tracing::info!(path = %path.display(), "loaded parry settings");
        Ok(config)
    }
}

impl ConfigProvider for TomlConfig {
    #[allow(clippy::cast_precision_loss)]
    fn value(&self, section: &str, key: &str) -> Option<ConfigValue> {
        let value = self.table.get(section)?.as_table()?.get(key)?;
        Some(match value {
            toml::Value::Boolean(b) => ConfigValue::Bool(*b),
            toml::Value::Integer(i) => ConfigValue::Number(*i as f64),
            toml::Value::Float(f) => ConfigValue::Number(*f),
            toml::Value::String(s) => ConfigValue::Text(s.clone()),
            _ => ConfigValue::Other,
        })
    }
}

// =============================================================================
// Settings
// =============================================================================

/// `General` section: parry toggles and the timing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Seconds after a parry attempt begins before it can parry.
    pub parry_window_start: f32,
    /// Seconds after which the attempt is pruned.
    pub parry_window_end: f32,
    /// Allow parrying with weapons.
    pub enable_weapon_parry: bool,
    /// Allow parrying with shields.
    pub enable_shield_parry: bool,
    /// Allow non-player actors to parry.
    pub enable_npc_parry: bool,
    /// Waive the stamina cost of a successful parry.
    pub successful_parry_no_cost: bool,
    /// Facing-cone half-angle in degrees. `None` uses the host's combat hit
    /// cone angle.
    pub parry_angle: Option<f32>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            parry_window_start: 0.0,
            parry_window_end: 0.3,
            enable_weapon_parry: true,
            enable_shield_parry: true,
            enable_npc_parry: true,
            successful_parry_no_cost: true,
            parry_angle: None,
        }
    }
}

/// `Effects` section: cosmetic feedback toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct EffectSettings {
    /// Slow time briefly when the player parries.
    pub slow_time: bool,
    /// Shake the camera when the player parries.
    pub screen_shake: bool,
    /// Play a block spark.
    pub parry_spark: bool,
    /// Play the parry sound.
    pub parry_sound: bool,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            slow_time: false,
            screen_shake: true,
            parry_spark: true,
            parry_sound: true,
        }
    }
}

/// `ProjectileParry` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSettings {
    /// Allow deflecting arrows and bolts.
    pub deflect_arrows: bool,
    /// Allow deflecting spell projectiles.
    pub deflect_magic: bool,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            deflect_arrows: true,
            deflect_magic: true,
        }
    }
}

/// `GuardBash` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardBashSettings {
    /// Allow guard bashes against shield blockers.
    pub enable_shield: bool,
    /// Allow guard bashes against weapon blockers.
    pub enable_weapon: bool,
}

impl Default for GuardBashSettings {
    fn default() -> Self {
        Self {
            enable_shield: true,
            enable_weapon: true,
        }
    }
}

/// `Experience` section: block skill experience per action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSettings {
    /// Experience for deflecting a projectile.
    pub projectile_parry: f32,
    /// Experience for a melee parry.
    pub melee_parry: f32,
    /// Experience for a guard bash.
    pub guard_bash: f32,
}

impl Default for ExperienceSettings {
    fn default() -> Self {
        Self {
            projectile_parry: 20.0,
            melee_parry: 10.0,
            guard_bash: 10.0,
        }
    }
}

/// `Core` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreSettings {
    /// Let sufficiently strong attacks override a valid parry.
    pub use_score_system: bool,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            use_score_system: true,
        }
    }
}

/// All engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Parry toggles and timing window.
    pub general: GeneralSettings,
    /// Cosmetic feedback.
    pub effects: EffectSettings,
    /// Projectile deflection toggles.
    pub projectile: ProjectileSettings,
    /// Guard bash toggles.
    pub guard_bash: GuardBashSettings,
    /// Experience grants.
    pub experience: ExperienceSettings,
    /// Score system toggle.
    pub core: CoreSettings,
    /// Score model weights.
    pub scores: ScoreWeights,
}

impl Settings {
    /// Resolves every setting from `provider`, keeping defaults for the rest.
    ///
    /// The result is passed through [`Settings::validate`].
    #[must_use]
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Self {
        let d = Self::default();

        let general = GeneralSettings {
            enable_weapon_parry: provider.get_bool(
                "General",
                "bEnableWeaponParry",
                d.general.enable_weapon_parry,
            ),
            enable_shield_parry: provider.get_bool(
                "General",
                "bEnableShieldParry",
                d.general.enable_shield_parry,
            ),
            enable_npc_parry: provider.get_bool(
                "General",
                "bEnableNPCParry",
                d.general.enable_npc_parry,
            ),
            successful_parry_no_cost: provider.get_bool(
                "General",
                "bSuccessfulParryNoCost",
                d.general.successful_parry_no_cost,
            ),
            parry_window_start: provider.get_f32(
                "General",
                "fParryWindow_Start",
                d.general.parry_window_start,
            ),
            parry_window_end: provider.get_f32(
                "General",
                "fParryWindow_End",
                d.general.parry_window_end,
            ),
            parry_angle: provider.get_opt_f32("General", "fParryAngle"),
        };

        let effects = EffectSettings {
            slow_time: provider.get_bool("Effects", "bEnableSlowTimeEffect", d.effects.slow_time),
            screen_shake: provider.get_bool(
                "Effects",
                "bEnableScreenShakeEffect",
                d.effects.screen_shake,
            ),
            parry_spark: provider.get_bool(
                "Effects",
                "bEnableParrySparkEffect",
                d.effects.parry_spark,
            ),
            parry_sound: provider.get_bool(
                "Effects",
                "bEnableParrySoundEffect",
                d.effects.parry_sound,
            ),
        };

        let projectile = ProjectileSettings {
            deflect_arrows: provider.get_bool(
                "ProjectileParry",
                "bEnableArrowProjectileDeflection",
                d.projectile.deflect_arrows,
            ),
            deflect_magic: provider.get_bool(
                "ProjectileParry",
                "bEnableMagicProjectileDeflection",
                d.projectile.deflect_magic,
            ),
        };

        let guard_bash = GuardBashSettings {
            enable_shield: provider.get_bool(
                "GuardBash",
                "bEnableShieldGuardBash",
                d.guard_bash.enable_shield,
            ),
            enable_weapon: provider.get_bool(
                "GuardBash",
                "bEnableWeaponGuardBash",
                d.guard_bash.enable_weapon,
            ),
        };

        let experience = ExperienceSettings {
            projectile_parry: provider.get_f32(
                "Experience",
                "fProjectileParryExp",
                d.experience.projectile_parry,
            ),
            melee_parry: provider.get_f32("Experience", "fMeleeParryExp", d.experience.melee_parry),
            guard_bash: provider.get_f32("Experience", "fGuardBashExp", d.experience.guard_bash),
        };

        let core = CoreSettings {
            use_score_system: provider.get_bool("Core", "UseScoreSystem", d.core.use_score_system),
        };

        let mut scores = d.scores.clone();
        scores.score_diff_threshold =
            provider.get_f64("Scores", "ScoreDiffThreshold", scores.score_diff_threshold);
        scores.weapon_skill_weight =
            provider.get_f64("Scores", "WeaponSkillWeight", scores.weapon_skill_weight);
        for category in WeaponCategory::PRIORITY {
            let bonus = provider.get_f64(
                "Scores",
                category.config_key(),
                scores.category_bonus(category),
            );
            scores.set_category_bonus(category, bonus);
        }
        for race in Race::ALL {
            let bonus = provider.get_f64("Scores", race.config_key(), scores.race_bonus(race));
            scores.set_race_bonus(race, bonus);
        }
        scores.female = provider.get_f64("Scores", "FemaleScore", scores.female);
        scores.power_attack = provider.get_f64("Scores", "PowerAttackScore", scores.power_attack);
        scores.player = provider.get_f64("Scores", "PlayerScore", scores.player);

        Self {
            general,
            effects,
            projectile,
            guard_bash,
            experience,
            core,
            scores,
        }
        .validate()
    }

    /// Normalises values that would make the engine misbehave.
    ///
    /// - An inverted parry window is swapped.
    /// - A negative parry window start is clamped to zero.
    /// - An end still below the clamped start is raised to it.
    /// - A negative parry angle override is discarded.
    #[must_use]
    pub fn validate(mut self) -> Self {
        let general = &mut self.general;
        if general.parry_window_end < general.parry_window_start {
            tracing::warn!(
                start = general.parry_window_start,
                end = general.parry_window_end,
                "parry window end precedes start, swapping"
            );
            std::mem::swap(&mut general.parry_window_start, &mut general.parry_window_end);
        }
        if general.parry_window_start < 0.0 {
            tracing::warn!(
                start = general.parry_window_start,
                "negative parry window start, clamping to 0"
            );
            general.parry_window_start = 0.0;
        }
        if general.parry_window_end < general.parry_window_start {
            tracing::warn!(
                end = general.parry_window_end,
                "parry window end below start, raising to start"
            );
            general.parry_window_end = general.parry_window_start;
        }
        if let Some(angle) = general.parry_angle.filter(|angle| *angle < 0.0) {
            tracing::warn!(angle, "negative parry angle override ignored");
            general.parry_angle = None;
        }
        self
    }

    /// The configured parry window.
    #[must_use]
    pub fn parry_window(&self) -> ParryWindow {
        ParryWindow {
            start: self.general.parry_window_start,
            end: self.general.parry_window_end,
        }
    }

    /// The facing-cone half-angle, falling back to the host's hit cone angle.
    #[must_use]
    pub fn parry_angle(&self, hit_cone_angle: f32) -> f32 {
        self.general.parry_angle.unwrap_or(hit_cone_angle)
    }
}
