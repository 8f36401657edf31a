//! In-memory combat world.
//!
//! The Arena stores actor and projectile snapshots keyed by monotonically
//! allocated ids. It lets the engine run against a concrete world in tests,
//! benchmarks and hosts that keep their own state in Rust.
//!
//! # Id allocation
//!
//! Actors and projectiles draw from one counter. Ids are never reused, so an
//! `ActorId` that outlives its actor is detectably invalid: lookups return
//! `None` and the engine fails closed.
//!
//! # Sharing
//!
//! `RwLock<Arena>` implements [`CombatWorld`]. Wrap the arena in an
//! `Arc<RwLock<_>>`, hand one clone to the engine's [`crate::host::Host`] and
//! keep another to move actors between decisions.
//!
//! # Example
//!
//! ```
//! use std::sync::RwLock;
//! use riposte_core::arena::Arena;
//! use riposte_core::actor::ActorSnapshot;
//! use riposte_core::host::CombatWorld;
//! use glam::Vec3;
//!
//! let mut arena = Arena::new();
//! let id = arena.spawn_actor(ActorSnapshot::at_position(Vec3::new(100.0, 200.0, 0.0), 0.0));
//!
//! let world = RwLock::new(arena);
//! assert!(world.contains_actor(id));
//!
//! world.write().unwrap().despawn_actor(id);
//! assert!(world.actor(id).is_none());
//! ```

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::actor::{ActorId, ActorSnapshot, ProjectileId, ProjectileSnapshot};
use crate::host::CombatWorld;

/// Default combat hit cone half-angle, in degrees.
pub const DEFAULT_HIT_CONE_ANGLE: f32 = 35.0;

/// Container for every combatant and projectile in a fight.
///
/// Iteration is in id order (`BTreeMap`), so spawn order is preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Next id to hand out; shared by actors and projectiles.
    next_id: u64,
    actors: BTreeMap<ActorId, ActorSnapshot>,
    projectiles: BTreeMap<ProjectileId, ProjectileSnapshot>,
    hit_cone_angle: f32,
}

impl Arena {
    /// Creates an empty arena with the default hit cone angle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            actors: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            hit_cone_angle: DEFAULT_HIT_CONE_ANGLE,
        }
    }

    /// Sets the combat hit cone half-angle reported to the engine.
    #[must_use]
    pub fn with_hit_cone_angle(mut self, degrees: f32) -> Self {
        self.hit_cone_angle = degrees;
        self
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds an actor and returns its id.
    pub fn spawn_actor(&mut self, snapshot: ActorSnapshot) -> ActorId {
        let id = ActorId::new(self.allocate());
        self.actors.insert(id, snapshot);
        id
    }

    /// Adds a projectile and returns its id.
    pub fn spawn_projectile(&mut self, snapshot: ProjectileSnapshot) -> ProjectileId {
        let id = ProjectileId::new(self.allocate());
        self.projectiles.insert(id, snapshot);
        id
    }

    /// Removes an actor, returning its last snapshot.
    pub fn despawn_actor(&mut self, id: ActorId) -> Option<ActorSnapshot> {
        self.actors.remove(&id)
    }

    /// Removes a projectile, returning its last snapshot.
    pub fn despawn_projectile(&mut self, id: ProjectileId) -> Option<ProjectileSnapshot> {
        self.projectiles.remove(&id)
    }

    /// Returns an actor by id.
    #[must_use]
    pub fn get_actor(&self, id: ActorId) -> Option<&ActorSnapshot> {
        self.actors.get(&id)
    }

    /// Returns a mutable actor by id.
    #[must_use]
    pub fn get_actor_mut(&mut self, id: ActorId) -> Option<&mut ActorSnapshot> {
        self.actors.get_mut(&id)
    }

    /// Returns a projectile by id.
    #[must_use]
    pub fn get_projectile(&self, id: ProjectileId) -> Option<&ProjectileSnapshot> {
        self.projectiles.get(&id)
    }

    /// Returns a mutable projectile by id.
    #[must_use]
    pub fn get_projectile_mut(&mut self, id: ProjectileId) -> Option<&mut ProjectileSnapshot> {
        self.projectiles.get_mut(&id)
    }

    /// Actor ids in spawn order.
    pub fn actor_ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.keys().copied()
    }

    /// Number of live actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Returns true if the arena holds neither actors nor projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty() && self.projectiles.is_empty()
    }

    /// The combat hit cone half-angle, in degrees.
    #[must_use]
    pub const fn hit_cone_angle(&self) -> f32 {
        self.hit_cone_angle
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatWorld for RwLock<Arena> {
    fn actor(&self, id: ActorId) -> Option<ActorSnapshot> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_actor(id)
            .cloned()
    }

    fn projectile(&self, id: ProjectileId) -> Option<ProjectileSnapshot> {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_projectile(id)
            .cloned()
    }

    fn contains_actor(&self, id: ActorId) -> bool {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .actors
            .contains_key(&id)
    }

    fn combat_hit_cone_angle(&self) -> f32 {
        self.read()
            .unwrap_or_else(PoisonError::into_inner)
            .hit_cone_angle
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorFlags, ProjectileKind};
    use glam::Vec3;

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn new_arena_is_empty() {
            let arena = Arena::new();
            assert!(arena.is_empty());
            assert_eq!(arena.hit_cone_angle(), DEFAULT_HIT_CONE_ANGLE);
        }

        #[test]
        fn spawn_assigns_increasing_ids() {
            let mut arena = Arena::new();
            let a = arena.spawn_actor(ActorSnapshot::default());
            let p = arena.spawn_projectile(ProjectileSnapshot::new(
                Vec3::ZERO,
                ProjectileKind::Arrow,
                Some(a),
            ));
            let b = arena.spawn_actor(ActorSnapshot::default());

            assert!(a < b);
            assert!(p.as_u64() > a.as_u64() && p.as_u64() < b.as_u64());
            assert_eq!(arena.actor_ids().collect::<Vec<_>>(), vec![a, b]);
        }

        #[test]
        fn despawned_ids_are_not_reused() {
            let mut arena = Arena::new();
            let a = arena.spawn_actor(ActorSnapshot::default());
            assert!(arena.despawn_actor(a).is_some());
            let b = arena.spawn_actor(ActorSnapshot::default());
            assert_ne!(a, b);
            assert!(arena.get_actor(a).is_none());
        }

        #[test]
        fn get_mut_edits_in_place() {
            let mut arena = Arena::new();
            let a = arena.spawn_actor(ActorSnapshot::default());
            if let Some(actor) = arena.get_actor_mut(a) {
                actor.flags.insert(ActorFlags::BLOCKING);
            }
            assert!(arena.get_actor(a).unwrap().is_blocking());
        }

        #[test]
        fn projectile_lifecycle() {
            let mut arena = Arena::new();
            let p = arena.spawn_projectile(ProjectileSnapshot::new(
                Vec3::ONE,
                ProjectileKind::Magic,
                None,
            ));
            assert_eq!(arena.projectile_count(), 1);
            if let Some(projectile) = arena.get_projectile_mut(p) {
                projectile.position = Vec3::ZERO;
            }
            assert_eq!(arena.get_projectile(p).unwrap().position, Vec3::ZERO);
            assert!(arena.despawn_projectile(p).is_some());
            assert!(arena.is_empty());
        }
    }

    mod world_tests {
        use super::*;

        #[test]
        fn locked_arena_answers_queries() {
            let mut arena = Arena::new().with_hit_cone_angle(50.0);
            let a = arena.spawn_actor(ActorSnapshot::default().with_flags(ActorFlags::PLAYER));
            let world = RwLock::new(arena);

            assert!(world.contains_actor(a));
            assert!(world.actor(a).unwrap().is_player());
            assert_eq!(world.combat_hit_cone_angle(), 50.0);
            assert!(world.projectile(ProjectileId::new(99)).is_none());
        }
    }

    #[test]
    fn arena_serializes() {
        let mut arena = Arena::new();
        arena.spawn_actor(ActorSnapshot::default());
        let json = serde_json::to_string(&arena).unwrap();
        let back: Arena = serde_json::from_str(&json).unwrap();
        assert_eq!(back.actor_count(), 1);
    }
}
