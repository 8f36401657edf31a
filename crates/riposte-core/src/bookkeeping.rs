//! Single-use bookkeeping triggered by parries.
//!
//! - [`CostLedger`]: pending stamina costs and the success marks that waive them
//! - [`RiposteLedger`]: score differentials awaiting the next riposte
//!
//! Every entry here is consumed at most once. The pending cost and the success
//! mark of an actor always change together, so they live in one structure
//! under one lock; the riposte ledger has its own lock.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::actor::ActorId;

/// Outcome of settling an actor's pending parry cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostSettlement {
    /// The cost must be debited from the actor's stamina.
    Debit(f32),
    /// The parry succeeded; the cost is dropped.
    Waived(f32),
    /// No cost was pending.
    Nothing,
}

#[derive(Debug, Default)]
struct CostState {
    pending: HashMap<ActorId, f32>,
    waived: HashSet<ActorId>,
}

/// Pending parry costs and the success marks that waive them.
///
/// # Example
///
/// ```
/// use riposte_core::actor::ActorId;
/// use riposte_core::bookkeeping::{CostLedger, CostSettlement};
///
/// let ledger = CostLedger::new();
/// let actor = ActorId::new(1);
///
/// ledger.cache(actor, 10.0);
/// ledger.negate(actor);
/// assert_eq!(ledger.settle(actor), CostSettlement::Waived(10.0));
/// assert!(ledger.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CostLedger {
    state: Mutex<CostState>,
}

impl CostLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the stamina price of `actor`'s in-flight attempt.
    ///
    /// Replaces any earlier pending cost.
    pub fn cache(&self, actor: ActorId, cost: f32) {
        self.lock().pending.insert(actor, cost);
    }

    /// Marks `actor`'s pending cost as waived.
    pub fn negate(&self, actor: ActorId) {
        self.lock().waived.insert(actor);
    }

    /// Consumes `actor`'s pending cost and success mark.
    ///
    /// Both are removed whether or not they existed.
    pub fn settle(&self, actor: ActorId) -> CostSettlement {
        let mut state = self.lock();
        let waived = state.waived.remove(&actor);
        match state.pending.remove(&actor) {
            Some(cost) if waived => CostSettlement::Waived(cost),
            Some(cost) => CostSettlement::Debit(cost),
            None => CostSettlement::Nothing,
        }
    }

    /// Returns the pending cost of `actor`, if any.
    #[must_use]
    pub fn pending(&self, actor: ActorId) -> Option<f32> {
        self.lock().pending.get(&actor).copied()
    }

    /// Returns true if `actor` carries a success mark.
    #[must_use]
    pub fn is_waived(&self, actor: ActorId) -> bool {
        self.lock().waived.contains(&actor)
    }

    /// Returns true if no costs or marks are outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let state = self.lock();
        state.pending.is_empty() && state.waived.is_empty()
    }
}

/// Score differentials cached for the next riposte.
#[derive(Debug, Default)]
pub struct RiposteLedger {
    scores: Mutex<HashMap<ActorId, f64>>,
}

impl RiposteLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ActorId, f64>> {
        self.scores.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Caches `score` for `actor`, replacing any earlier value.
    pub fn cache(&self, actor: ActorId, score: f64) {
        self.lock().insert(actor, score);
    }

    /// Removes and returns `actor`'s cached score.
    pub fn take(&self, actor: ActorId) -> Option<f64> {
        self.lock().remove(&actor)
    }

    /// Drops `actor`'s cached score without using it.
    pub fn discard(&self, actor: ActorId) {
        self.lock().remove(&actor);
    }

    /// Returns `actor`'s cached score without consuming it.
    #[must_use]
    pub fn peek(&self, actor: ActorId) -> Option<f64> {
        self.lock().get(&actor).copied()
    }

    /// Number of cached scores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
