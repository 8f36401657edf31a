//! Melee parries.
//!
//! A melee attack is parried when the defender is inside its parry window,
//! the attack is parryable in context (shield, or a weapon parry the attacker
//! does not out-score), and the attacker stands inside the defender's cone.

use crate::actor::{ActorId, ActorSnapshot, Skill};
use crate::arbiter::{Arbitration, Combatant};
use crate::host::ParryEvent;

use super::ParryEngine;

impl ParryEngine {
    /// Runs the melee checks through arbitration and the facing cone.
    ///
    /// Returns `None` when an actor is invalid, the defender may not parry or
    /// is outside its window. Otherwise returns the defender's snapshot and
    /// the arbitration, with `parryable` also covering the cone.
    fn arbitrate_melee(
        &self,
        defender: ActorId,
        attacker: ActorId,
    ) -> Option<(ActorSnapshot, Arbitration)> {
        let defender_snapshot = self.resolve_actor(defender, "defender")?;
        let attacker_snapshot = self.resolve_actor(attacker, "attacker")?;

        if !self.may_parry(&defender_snapshot) || !self.is_in_parry_window(defender) {
            return None;
        }

        let outcome = self.arbiter().arbitrate(
            Combatant::new(attacker, &attacker_snapshot),
            Combatant::new(defender, &defender_snapshot),
        );
        let parryable =
            outcome.parryable && self.in_block_angle(&defender_snapshot, attacker_snapshot.position);

        Some((defender_snapshot, Arbitration { parryable, ..outcome }))
    }

    /// Returns true if `defender` can parry `attacker`'s current attack.
    ///
    /// When the context is scored, the defender's riposte score is cached as
    /// a side effect.
    #[must_use]
    pub fn can_parry_melee(&self, defender: ActorId, attacker: ActorId) -> bool {
        let Some((_, outcome)) = self.arbitrate_melee(defender, attacker) else {
            return false;
        };
        if let Some(reprisal) = outcome.reprisal {
            self.riposte.cache(defender, reprisal);
        }
        outcome.parryable
    }

    /// Resolves a melee hit of `attacker` on `defender`.
    ///
    /// On success: parry effects, a stagger of the attacker scaled by the
    /// riposte score, stun damage, block experience for the player, the cost
    /// waiver when enabled, and an `EP_MeleeParryEvent`. Returns true.
    ///
    /// A scored parry staggers with the reprisal computed by this call, never
    /// one read back from the riposte ledger, so concurrent resolutions
    /// against the same defender cannot swap scores. Any ledger entry for the
    /// defender is dropped. An unscored parry consumes the ledger entry
    /// instead.
    ///
    /// On failure nothing is triggered, the defender's ledger entry is
    /// dropped, and false is returned.
    pub fn process_melee_parry(&self, attacker: ActorId, defender: ActorId) -> bool {
        let Some((parrier, outcome)) = self
            .arbitrate_melee(defender, attacker)
            .filter(|(_, outcome)| outcome.parryable)
        else {
            self.riposte.discard(defender);
            return false;
        };

        let riposte = match outcome.reprisal {
            Some(reprisal) => {
                self.riposte.discard(defender);
                reprisal
            }
            None => self.apply_riposte_score(defender),
        };

        let effects = &self.host.effects;
        self.play_parry_effects(defender, &parrier);
        effects.stagger(defender, attacker, riposte);
        effects.stun_damage(defender, attacker);
        if parrier.is_player() {
            effects.grant_experience(Skill::Block, self.settings.experience.melee_parry);
        }
        if self.settings.general.successful_parry_no_cost {
            self.negate_parry_cost(defender);
        }
        self.host.events.send(ParryEvent::MeleeParry { attacker });

        tracing::debug!(%attacker, %defender, "melee attack parried");
        true
    }
}
