//! Guard bashes against actively blocking opponents.

use crate::actor::{ActorId, Skill};

use super::ParryEngine;

impl ParryEngine {
    /// Resolves `basher` bashing into `blocker`.
    ///
    /// Requires the blocker to be blocking, facing the basher, and not itself
    /// mid-bash. Bashes delivered with a shield and with a weapon are gated
    /// by separate toggles, chosen by what the basher holds.
    /// Staggers the blocker using the basher's riposte score, plays the
    /// guard-bash effects and grants block experience when the basher is the
    /// player.
    pub fn process_guard_bash(&self, basher: ActorId, blocker: ActorId) {
        let Some(basher_snapshot) = self.resolve_actor(basher, "basher") else {
            return;
        };
        let Some(blocker_snapshot) = self.resolve_actor(blocker, "blocker") else {
            return;
        };

        if !blocker_snapshot.is_blocking()
            || !self.in_block_angle(&blocker_snapshot, basher_snapshot.position)
            || blocker_snapshot.is_bashing()
        {
            return;
        }

        let toggles = &self.settings.guard_bash;
        let enabled = if basher_snapshot.has_shield() {
            toggles.enable_shield
        } else {
            toggles.enable_weapon
        };
        if !enabled {
            tracing::debug!(%basher, %blocker, "guard bash disabled for this equipment");
            return;
        }

        let effects = &self.host.effects;
        effects.stagger(basher, blocker, self.apply_riposte_score(basher));
        self.play_guard_bash_effects(basher, &basher_snapshot);
        if basher_snapshot.is_player() {
            effects.grant_experience(Skill::Block, self.settings.experience.guard_bash);
        }

        tracing::debug!(%basher, %blocker, "guard bash landed");
    }
}
