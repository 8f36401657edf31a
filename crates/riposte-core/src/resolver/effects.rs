//! Cosmetic feedback for parries and guard bashes.

use crate::actor::{ActorId, ActorSnapshot};
use crate::host::SoundCue;

use super::ParryEngine;

/// Slow-time duration in seconds.
pub const SLOW_TIME_DURATION: f32 = 0.2;
/// Time scale while slowed.
pub const SLOW_TIME_PERCENTAGE: f32 = 0.3;
/// Camera shake strength.
pub const SCREEN_SHAKE_STRENGTH: f32 = 1.5;
/// Camera shake duration in seconds.
pub const SCREEN_SHAKE_DURATION: f32 = 0.4;

impl ParryEngine {
    /// Sound, spark, then the player-only slow time and camera shake.
    pub(super) fn play_parry_effects(&self, parrier: ActorId, snapshot: &ActorSnapshot) {
        let cue = if snapshot.has_shield() {
            SoundCue::ShieldParry
        } else {
            SoundCue::WeaponParry
        };
        self.play_effects(parrier, snapshot, cue);
    }

    /// Guard bashes always use the shield cue.
    pub(super) fn play_guard_bash_effects(&self, basher: ActorId, snapshot: &ActorSnapshot) {
        self.play_effects(basher, snapshot, SoundCue::ShieldParry);
    }

    fn play_effects(&self, actor: ActorId, snapshot: &ActorSnapshot, cue: SoundCue) {
        let settings = &self.settings.effects;
        let effects = &self.host.effects;

        if settings.parry_sound {
            effects.play_sound(actor, cue);
        }
        if settings.parry_spark {
            effects.block_spark(actor);
        }
        if snapshot.is_player() {
            if settings.slow_time {
                effects.slow_time(SLOW_TIME_DURATION, SLOW_TIME_PERCENTAGE);
            }
            if settings.screen_shake {
                effects.shake_camera(
                    SCREEN_SHAKE_STRENGTH,
                    snapshot.position,
                    SCREEN_SHAKE_DURATION,
                );
            }
        }
    }
}
