//! Projectile deflection.
//!
//! Projectiles are never scored: timing and facing alone decide, subject to
//! the per-kind deflection toggles.

use crate::actor::{ActorId, ActorSnapshot, ProjectileId, ProjectileKind, ProjectileSnapshot, Skill};
use crate::host::ParryEvent;

use super::ParryEngine;

impl ParryEngine {
    fn deflects(&self, kind: ProjectileKind) -> bool {
        match kind {
            ProjectileKind::Arrow => self.settings.projectile.deflect_arrows,
            ProjectileKind::Magic => self.settings.projectile.deflect_magic,
        }
    }

    fn admit_projectile(
        &self,
        defender: ActorId,
        projectile: ProjectileId,
    ) -> Option<(ActorSnapshot, ProjectileSnapshot)> {
        let parrier = self.resolve_actor(defender, "defender")?;
        let Some(incoming) = self.host.world.projectile(projectile) else {
            tracing::warn!(%projectile, "invalid projectile reference, failing closed");
            return None;
        };

        let admitted = self.may_parry(&parrier)
            && self.deflects(incoming.kind)
            && self.is_in_parry_window(defender)
            && self.in_block_angle(&parrier, incoming.position);

        admitted.then_some((parrier, incoming))
    }

    /// Returns true if `defender` can deflect `projectile`.
    #[must_use]
    pub fn can_parry_projectile(&self, defender: ActorId, projectile: ProjectileId) -> bool {
        self.admit_projectile(defender, projectile).is_some()
    }

    /// Resolves `projectile` reaching `defender`.
    ///
    /// On success the projectile is handed to the defender and sent back at
    /// its shooter when the shooter is loaded, or reflected otherwise. Parry
    /// effects, block experience for the player, the cost waiver when enabled
    /// and an `EP_RangedParryEvent` follow. Returns true.
    pub fn process_projectile_parry(&self, defender: ActorId, projectile: ProjectileId) -> bool {
        let Some((parrier, incoming)) = self.admit_projectile(defender, projectile) else {
            return false;
        };

        let control = &self.host.projectiles;
        control.reset_owner(projectile, defender);
        let loaded_shooter = incoming.shooter.filter(|&shooter| {
            self.host
                .world
                .actor(shooter)
                .is_some_and(|snapshot| snapshot.is_loaded())
        });
        match loaded_shooter {
            Some(shooter) => control.retarget(projectile, shooter),
            None => control.reflect(projectile),
        }

        self.play_parry_effects(defender, &parrier);
        if parrier.is_player() {
            self.host
                .effects
                .grant_experience(Skill::Block, self.settings.experience.projectile_parry);
        }
        if self.settings.general.successful_parry_no_cost {
            self.negate_parry_cost(defender);
        }
        self.host.events.send(ParryEvent::RangedParry);

        tracing::debug!(
            %defender,
            %projectile,
            retargeted = loaded_shooter.is_some(),
            "projectile deflected"
        );
        true
    }
}
