//! Timing registry for parry windows.
//!
//! Each actor is either [`TimerState::Idle`] or [`TimerState::Active`] with an
//! elapsed time since its parry attempt began. The registry is advanced by an
//! external tick with an explicit delta, so tests can drive time without a
//! clock.
//!
//! # Locking
//!
//! One `RwLock` guards the timer map. [`TimingRegistry::in_window`] and the
//! other queries take the read lock and can run concurrently. `start`,
//! `finish` and `advance` take the write lock. An insert is a single map
//! operation under the write lock, so readers never observe a partial entry.
//! The liveness callback passed to `advance` runs outside both locks.
//!
//! # Expiry
//!
//! The window's upper bound is enforced only by pruning during
//! [`TimingRegistry::advance`]. An entry whose elapsed time passed
//! `window.end` on the last advance still reads as "in window" until the next
//! advance prunes it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

/// Elapsed-time bounds of a parry window, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParryWindow {
    /// Earliest elapsed time at which an attempt can parry.
    pub start: f32,
    /// Elapsed time past which the attempt is pruned.
    pub end: f32,
}

impl Default for ParryWindow {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.3,
        }
    }
}

/// Per-actor timing state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerState {
    /// No parry attempt in progress.
    Idle,
    /// A parry attempt began `elapsed` seconds ago.
    Active {
        /// Seconds since the attempt began.
        elapsed: f32,
    },
}

/// Result of one [`TimingRegistry::advance`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Timers advanced by the delta.
    pub advanced: usize,
    /// Timers removed for passing the window end.
    pub expired: usize,
    /// Timers removed because their actor is no longer valid.
    pub invalidated: usize,
}

/// Concurrent map of actor to elapsed parry time.
///
/// # Example
///
/// ```
/// use riposte_core::actor::ActorId;
/// use riposte_core::timing::{ParryWindow, TimingRegistry};
///
/// let registry = TimingRegistry::new(ParryWindow { start: 0.1, end: 0.3 });
/// let actor = ActorId::new(1);
///
/// registry.start(actor);
/// assert!(!registry.in_window(actor));
///
/// registry.advance(0.15, |_| true);
/// assert!(registry.in_window(actor));
///
/// registry.finish(actor);
/// assert!(!registry.in_window(actor));
/// ```
#[derive(Debug)]
pub struct TimingRegistry {
    window: ParryWindow,
    timers: RwLock<HashMap<ActorId, f32>>,
    /// Cleared by `advance` when the map is found empty, set by `start`.
    /// Only written while the write lock is held.
    armed: AtomicBool,
}

impl Default for TimingRegistry {
    fn default() -> Self {
        Self::new(ParryWindow::default())
    }
}

impl TimingRegistry {
    /// Creates an empty, disarmed registry.
    #[must_use]
    pub fn new(window: ParryWindow) -> Self {
        Self {
            window,
            timers: RwLock::new(HashMap::new()),
            armed: AtomicBool::new(false),
        }
    }

    /// Returns the configured window.
    #[must_use]
    pub const fn window(&self) -> ParryWindow {
        self.window
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ActorId, f32>> {
        self.timers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ActorId, f32>> {
        self.timers.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Begins (or restarts) a parry attempt for `actor` at elapsed zero.
    pub fn start(&self, actor: ActorId) {
        let mut timers = self.write();
        if let Some(previous) = timers.insert(actor, 0.0) {
            tracing::trace!(%actor, previous, "parry timer restarted");
        } else {
            tracing::trace!(%actor, "parry timer started");
        }
        self.armed.store(true, Ordering::Release);
    }

    /// Ends the parry attempt for `actor`. Returns true if one was active.
    pub fn finish(&self, actor: ActorId) -> bool {
        let removed = self.write().remove(&actor).is_some();
        if removed {
            tracing::trace!(%actor, "parry timer finished");
        }
        removed
    }

    /// Advances every active timer by `delta` seconds.
    ///
    /// Each entry is checked before it is advanced: entries whose actor fails
    /// `is_live` are dropped, entries already past `window.end` are dropped,
    /// and the rest get `delta` added. When the registry is disarmed this
    /// returns immediately without taking the lock; an empty registry disarms
    /// itself.
    ///
    /// A negative or non-finite `delta` is treated as zero, so pruning still
    /// runs but no timer moves.
    ///
    /// `is_live` is called with no registry lock held. It may read the
    /// registry, and a host may hold its own world lock while calling any
    /// query on this registry.
    pub fn advance<F>(&self, delta: f32, is_live: F) -> AdvanceReport
    where
        F: Fn(ActorId) -> bool,
    {
        let mut report = AdvanceReport::default();
        if !self.armed.load(Ordering::Acquire) {
            return report;
        }

        let delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            tracing::warn!(delta, "invalid tick delta, advancing by 0");
            0.0
        };

        let tracked: Vec<ActorId> = self.read().keys().copied().collect();
        let invalid: HashSet<ActorId> = tracked
            .into_iter()
            .filter(|&actor| !is_live(actor))
            .collect();

        let mut timers = self.write();
        if timers.is_empty() {
            self.armed.store(false, Ordering::Release);
            return report;
        }

        let end = self.window.end;
        timers.retain(|&actor, elapsed| {
            if invalid.contains(&actor) {
                tracing::debug!(%actor, "dropping parry timer for invalid actor");
                report.invalidated += 1;
                return false;
            }
            if *elapsed > end {
                report.expired += 1;
                return false;
            }
            *elapsed += delta;
            report.advanced += 1;
            true
        });

        report
    }

    /// Returns true if `actor` has an active timer at or past `window.start`.
    #[must_use]
    pub fn in_window(&self, actor: ActorId) -> bool {
        self.read()
            .get(&actor)
            .is_some_and(|&elapsed| elapsed >= self.window.start)
    }

    /// Returns the timing state of `actor`.
    #[must_use]
    pub fn state(&self, actor: ActorId) -> TimerState {
        self.read()
            .get(&actor)
            .map_or(TimerState::Idle, |&elapsed| TimerState::Active { elapsed })
    }

    /// Returns the elapsed time of `actor`'s attempt, if one is active.
    #[must_use]
    pub fn elapsed(&self, actor: ActorId) -> Option<f32> {
        self.read().get(&actor).copied()
    }

    /// Number of active timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no timers are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns true if the next `advance` will scan the map.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ActorId = ActorId::new(1);
    const B: ActorId = ActorId::new(2);

    fn registry(start: f32, end: f32) -> TimingRegistry {
        TimingRegistry::new(ParryWindow { start, end })
    }

    mod window_tests {
        use super::*;

        #[test]
        fn before_start_is_outside() {
            let reg = registry(0.1, 0.3);
            reg.start(A);
            assert!(!reg.in_window(A));
            reg.advance(0.05, |_| true);
            assert!(!reg.in_window(A));
        }

        #[test]
        fn between_start_and_end_is_inside() {
            let reg = registry(0.1, 0.3);
            reg.start(A);
            reg.advance(0.1, |_| true);
            assert!(reg.in_window(A));
            reg.advance(0.1, |_| true);
            assert!(reg.in_window(A));
        }

        #[test]
        fn zero_start_is_inside_immediately() {
            let reg = registry(0.0, 0.3);
            reg.start(A);
            assert!(reg.in_window(A));
        }

        #[test]
        fn finish_leaves_the_window() {
            let reg = registry(0.0, 0.3);
            reg.start(A);
            assert!(reg.finish(A));
            assert!(!reg.in_window(A));
            assert!(!reg.finish(A));
        }

        #[test]
        fn unknown_actor_is_idle() {
            let reg = registry(0.0, 0.3);
            assert!(!reg.in_window(B));
            assert_eq!(reg.state(B), TimerState::Idle);
        }
    }

    mod expiry_tests {
        use super::*;

        #[test]
        fn past_end_reads_in_window_until_next_prune() {
            let reg = registry(0.0, 0.3);
            reg.start(A);
            reg.advance(0.5, |_| true);
            // Advanced past end but not yet pruned.
            assert_eq!(reg.elapsed(A), Some(0.5));
            assert!(reg.in_window(A));

            let report = reg.advance(0.016, |_| true);
            assert_eq!(report.expired, 1);
            assert!(!reg.in_window(A));
            assert_eq!(reg.state(A), TimerState::Idle);
        }

        #[test]
        fn exactly_at_end_survives_the_prune() {
            let reg = registry(0.0, 0.25);
            reg.start(A);
            reg.advance(0.25, |_| true);
            let report = reg.advance(0.0, |_| true);
            assert_eq!(report.expired, 0);
            assert!(reg.in_window(A));
        }

        #[test]
        fn nan_delta_does_not_pin_a_timer() {
            let reg = registry(0.0, 0.3);
            reg.start(A);
            reg.advance(f32::NAN, |_| true);
            assert_eq!(reg.elapsed(A), Some(0.0));

            for _ in 0..3 {
                reg.advance(1.0, |_| true);
            }
            assert!(reg.is_empty());
            reg.advance(1.0, |_| true);
            assert!(!reg.is_armed());
        }

        #[test]
        fn negative_and_infinite_deltas_count_as_zero() {
            let reg = registry(0.0, 0.3);
            reg.start(A);
            reg.advance(0.1, |_| true);
            reg.advance(-5.0, |_| true);
            reg.advance(f32::INFINITY, |_| true);
            assert_eq!(reg.elapsed(A), Some(0.1));
        }

        #[test]
        fn invalid_actors_are_dropped() {
            let reg = registry(0.0, 0.3);
            reg.start(A);
            reg.start(B);
            let report = reg.advance(0.01, |actor| actor != B);
            assert_eq!(report.invalidated, 1);
            assert_eq!(report.advanced, 1);
            assert_eq!(reg.state(B), TimerState::Idle);
            assert!(reg.in_window(A));
        }
    }

    mod restart_tests {
        use super::*;

        #[test]
        fn restart_resets_elapsed_without_duplicating() {
            let reg = registry(0.1, 0.3);
            reg.start(A);
            reg.advance(0.2, |_| true);
            assert!(reg.in_window(A));

            reg.start(A);
            assert_eq!(reg.len(), 1);
            assert_eq!(reg.state(A), TimerState::Active { elapsed: 0.0 });
            assert!(!reg.in_window(A));
        }
    }

    mod arming_tests {
        use super::*;

        #[test]
        fn new_registry_is_disarmed() {
            let reg = registry(0.0, 0.3);
            assert!(!reg.is_armed());
            assert_eq!(reg.advance(0.1, |_| true), AdvanceReport::default());
        }

        #[test]
        fn empty_registry_disarms_on_advance() {
            let reg = registry(0.0, 0.3);
            reg.start(A);
            reg.finish(A);
            assert!(reg.is_armed());
            reg.advance(0.1, |_| true);
            assert!(!reg.is_armed());
        }

        #[test]
        fn start_rearms() {
            let reg = registry(0.0, 0.3);
            reg.start(A);
            reg.finish(A);
            reg.advance(0.1, |_| true);
            reg.start(B);
            assert!(reg.is_armed());
            assert_eq!(reg.advance(0.1, |_| true).advanced, 1);
        }

        #[test]
        fn liveness_check_may_read_the_registry() {
            let reg = registry(0.0, 0.3);
            reg.start(A);
            reg.start(B);
            let report = reg.advance(0.01, |actor| actor == A || !reg.in_window(actor));
            assert_eq!(report.invalidated, 1);
            assert!(reg.in_window(A));
        }

        #[test]
        fn disarmed_advance_never_consults_liveness() {
            let reg = registry(0.0, 0.3);
            reg.advance(0.1, |_| panic!("should not scan"));
        }
    }
}
