//! Context arbitration: whether an attack can be parried at all.
//!
//! A shield blocks anything when shield parries are enabled. Otherwise a
//! weapon parry holds unless the score system lets a sufficiently stronger
//! attacker override it. A scored decision yields the defender's reprisal
//! (`defender - attacker`) for the riposte that may follow. The `decide_*`
//! entry points cache it in the riposte ledger; [`ContextArbiter::arbitrate`]
//! only returns it.

use crate::actor::{ActorId, ActorSnapshot, WeaponProfile};
use crate::bookkeeping::RiposteLedger;
use crate::score;
use crate::settings::Settings;

/// An actor id paired with its snapshot for one decision.
#[derive(Debug, Clone, Copy)]
pub struct Combatant<'a> {
    /// The actor's id.
    pub id: ActorId,
    /// The actor's state at decision time.
    pub snapshot: &'a ActorSnapshot,
}

impl<'a> Combatant<'a> {
    /// Pairs `id` with `snapshot`.
    #[must_use]
    pub const fn new(id: ActorId, snapshot: &'a ActorSnapshot) -> Self {
        Self { id, snapshot }
    }
}

/// Outcome of one parry-context decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arbitration {
    /// Whether the victim can parry the attack.
    pub parryable: bool,
    /// `victim - aggressor`, when the decision was scored.
    pub reprisal: Option<f64>,
}

impl Arbitration {
    const fn unscored(parryable: bool) -> Self {
        Self {
            parryable,
            reprisal: None,
        }
    }
}

/// Decides parryability and score overrides.
#[derive(Debug, Clone, Copy)]
pub struct ContextArbiter<'a> {
    settings: &'a Settings,
    riposte: &'a RiposteLedger,
}

impl<'a> ContextArbiter<'a> {
    /// Creates an arbiter that caches reprisals into `riposte`.
    #[must_use]
    pub const fn new(settings: &'a Settings, riposte: &'a RiposteLedger) -> Self {
        Self { settings, riposte }
    }

    /// Scores both sides. Returns whether the attack overrides the parry and
    /// the defender's reprisal, or `None` when scoring is disabled.
    fn weigh(
        &self,
        attacker: Combatant<'_>,
        defender: Combatant<'_>,
        attacker_weapon: Option<&WeaponProfile>,
        defender_weapon: Option<&WeaponProfile>,
    ) -> Option<(bool, f64)> {
        if !self.settings.core.use_score_system {
            return None;
        }

        let weights = &self.settings.scores;
        let attacker_score = score::score(
            attacker.snapshot,
            attacker_weapon,
            attacker.snapshot.attack.as_ref(),
            weights,
        );
        let defender_score = score::score(
            defender.snapshot,
            defender_weapon,
            defender.snapshot.attack.as_ref(),
            weights,
        );

        let overridden = attacker_score - defender_score >= weights.score_diff_threshold;
        tracing::debug!(
            attacker = %attacker.id,
            defender = %defender.id,
            attacker_score,
            defender_score,
            threshold = weights.score_diff_threshold,
            overridden,
            "scored parry arbitration"
        );
        Some((overridden, defender_score - attacker_score))
    }

    /// Returns true if the attack beats the parry.
    ///
    /// Always false when the score system is disabled. Otherwise both scores
    /// are computed, `defender - attacker` is cached as the defender's riposte
    /// score, and the override holds when `attacker - defender` reaches the
    /// configured threshold.
    #[must_use]
    pub fn decide_override(
        &self,
        attacker: Combatant<'_>,
        defender: Combatant<'_>,
        attacker_weapon: Option<&WeaponProfile>,
        defender_weapon: Option<&WeaponProfile>,
    ) -> bool {
        let Some((overridden, reprisal)) =
            self.weigh(attacker, defender, attacker_weapon, defender_weapon)
        else {
            return false;
        };
        self.riposte.cache(defender.id, reprisal);
        overridden
    }

    /// Decides whether `victim` can parry `aggressor`'s attack without
    /// touching the riposte ledger.
    #[must_use]
    pub fn arbitrate(&self, aggressor: Combatant<'_>, victim: Combatant<'_>) -> Arbitration {
        let general = &self.settings.general;
        if victim.snapshot.has_shield() && general.enable_shield_parry {
            return Arbitration::unscored(true);
        }
        if !general.enable_weapon_parry {
            return Arbitration::unscored(false);
        }
        match self.weigh(
            aggressor,
            victim,
            aggressor.snapshot.attack_weapon(),
            victim.snapshot.attack_weapon(),
        ) {
            Some((overridden, reprisal)) => Arbitration {
                parryable: !overridden,
                reprisal: Some(reprisal),
            },
            None => Arbitration::unscored(true),
        }
    }

    /// Returns true if `victim` can parry `aggressor`'s attack at all.
    ///
    /// A scored decision caches the victim's reprisal.
    #[must_use]
    pub fn decide_parry_context(&self, aggressor: Combatant<'_>, victim: Combatant<'_>) -> bool {
        let outcome = self.arbitrate(aggressor, victim);
        if let Some(reprisal) = outcome.reprisal {
            self.riposte.cache(victim.id, reprisal);
        }
        outcome.parryable
    }
}
