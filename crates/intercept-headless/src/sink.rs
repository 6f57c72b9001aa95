//! Notification rendering.

use intercept_core::launcher::LauncherState;
use intercept_core::{EventRecord, Notification, NotificationSink, Preferences};
use tracing::{debug, info, trace, warn};

/// Logs notifications and stands in for the haptics device.
pub struct LogSink {
    preferences: Preferences,
    vibration_pulses: u32,
}

impl LogSink {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            vibration_pulses: 0,
        }
    }

    pub fn vibration_pulses(&self) -> u32 {
        self.vibration_pulses
    }

    fn vibrate(&mut self, tick: u64) {
        if self.preferences.use_vibration {
            self.vibration_pulses += 1;
            debug!(tick, "vibration pulse");
        }
    }
}

impl NotificationSink for LogSink {
    fn notify(&mut self, record: &EventRecord) {
        let tick = record.tick;
        match &record.notification {
            Notification::EntitySpawned { id, kind, .. } => trace!(tick, %id, %kind, "spawned"),
            Notification::EntityDespawned { id, kind } => trace!(tick, %id, %kind, "despawned"),
            Notification::MissileLaunched {
                launcher,
                target,
                ammo_left,
                ..
            } => debug!(tick, %launcher, x = target.x, y = target.y, ammo_left, "launch"),
            Notification::MissileExploded {
                missile,
                caused_by_player,
                ..
            } => trace!(tick, %missile, caused_by_player, "detonation"),
            Notification::MissileExpired { missile } => trace!(tick, %missile, "expired"),
            Notification::ClusterSplit { missile, children } => {
                debug!(tick, %missile, children, "cluster split");
            }
            Notification::ComboIncremented {
                tracker,
                combo_count,
                score_gain,
            } => info!(tick, %tracker, combo_count, score_gain, "combo"),
            Notification::ComboEnded {
                tracker,
                combo_count,
                accumulated_score,
            } => debug!(tick, %tracker, combo_count, accumulated_score, "combo ended"),
            Notification::LauncherStateChanged { launcher, from, to } => {
                debug!(tick, %launcher, ?from, ?to, "launcher state");
                if *to == LauncherState::Destroyed {
                    self.vibrate(tick);
                }
            }
            Notification::LauncherLowAmmo { launcher, ammo } => {
                warn!(tick, %launcher, ammo, "low ammo");
            }
            Notification::NoLauncherSelected => debug!(tick, "no launcher selected"),
            Notification::DestructibleDestroyed {
                destructible,
                remaining,
            } => {
                warn!(tick, %destructible, remaining, "structure destroyed");
                self.vibrate(tick);
            }
            Notification::FastForwardChanged { active } => info!(tick, active, "fast-forward"),
            Notification::WaveAdvanced { wave } => info!(tick, wave, "wave"),
            Notification::GameOver {
                score,
                waves_survived,
            } => {
                info!(tick, score, waves_survived, "game over");
                self.vibrate(tick);
            }
        }
    }
}
