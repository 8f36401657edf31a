//! # Riposte Core
//!
//! Combat arbitration engine for timed parries.
//!
//! Given a defender's timing state, facing and equipment, and an attacker's
//! weapon and attributes, the engine decides whether an incoming melee or
//! ranged attack is deflected. It also keeps the bookkeeping a deflection
//! triggers: the stamina-cost waiver and the riposte score.
//!
//! ## Architecture
//!
//! - **Score model** ([`score`]): pure weighted score of a combatant
//! - **Timing registry** ([`timing`]): per-actor parry windows advanced by a tick
//! - **Geometry** ([`geometry`]): facing-cone checks
//! - **Context arbiter** ([`arbiter`]): shield/weapon parry rules and score overrides
//! - **Outcome resolver** ([`resolver`]): the [`ParryEngine`] tying it together
//!
//! The engine reads the world and triggers side effects only through the
//! collaborator traits in [`host`]. [`arena::Arena`] is an in-memory world
//! for hosts and tests that keep state in Rust.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use riposte_core::{ParryEngine, Settings, TomlConfig};
//!
//! let config = TomlConfig::load("riposte.toml")?;
//! let engine = ParryEngine::new(Settings::from_provider(&config), host);
//!
//! engine.start_timing(defender);
//! engine.tick(delta);
//! let parried = engine.process_melee_parry(attacker, defender);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod actor;
pub mod arbiter;
pub mod arena;
pub mod bookkeeping;
pub mod geometry;
pub mod host;
pub mod resolver;
pub mod score;
pub mod settings;
pub mod timing;

#[cfg(test)]
mod tests;

pub use actor::{ActorFlags, ActorId, ActorSnapshot, ProjectileId, WeaponProfile};
pub use arena::Arena;
pub use bookkeeping::CostSettlement;
pub use host::{
    CombatWorld, EffectsTrigger, EventBus, EventLog, Host, ParryEvent, ProjectileControl,
};
pub use resolver::{HitData, ParryEngine, PreHitVerdict};
pub use score::{ScoreWeights, WeaponCategory};
pub use settings::{ConfigError, ConfigProvider, Settings, TomlConfig};
pub use timing::ParryWindow;
