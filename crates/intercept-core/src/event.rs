//! Notifications emitted by the simulation.
//!
//! The core never calls out to audio, UI or haptics. It appends
//! [`Notification`]s to an [`EventLog`] instead, and the host drains the log
//! once per frame with [`EventLog::take_events`] or
//! [`EventLog::drain_into`].
//!
//! Records carry the tick they were emitted on and a sequence number that is
//! unique and increasing across the whole run, so two runs with the same seed
//! and input produce identical logs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::combo::ComboId;
use crate::entity::{EntityId, EntityKind, LauncherState};

/// Something observable happened inside the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    /// An entity was registered. Presentation layers attach visuals here.
    EntitySpawned {
        /// New entity.
        id: EntityId,
        /// Its kind.
        kind: EntityKind,
        /// Spawn position.
        position: Vec2,
        /// Spawn heading in radians.
        heading: f32,
    },
    /// An entity was removed.
    EntityDespawned {
        /// Removed entity.
        id: EntityId,
        /// Its kind.
        kind: EntityKind,
    },
    /// A launcher fired an interceptor.
    MissileLaunched {
        /// Firing launcher.
        launcher: EntityId,
        /// New missile.
        missile: EntityId,
        /// Aim point.
        target: Vec2,
        /// Ammo remaining after the shot.
        ammo_left: u32,
    },
    /// A missile terminated and spawned its explosion.
    MissileExploded {
        /// Terminated missile.
        missile: EntityId,
        /// Spawned explosion.
        explosion: EntityId,
        /// Provenance of the explosion.
        caused_by_player: bool,
    },
    /// An enemy missile reached its age limit and was removed.
    MissileExpired {
        /// Removed missile.
        missile: EntityId,
    },
    /// A cluster missile split into regular missiles.
    ClusterSplit {
        /// Removed cluster missile.
        missile: EntityId,
        /// Number of missiles released.
        children: u32,
    },
    /// A kill was credited to a combo chain.
    ComboIncremented {
        /// Chain credited.
        tracker: ComboId,
        /// Count after the kill.
        combo_count: u32,
        /// Score awarded.
        score_gain: u64,
    },
    /// The last explosion of a chain finished.
    ComboEnded {
        /// Closed chain.
        tracker: ComboId,
        /// Final count.
        combo_count: u32,
        /// Total score earned by the chain.
        accumulated_score: u64,
    },
    /// A launcher changed state.
    LauncherStateChanged {
        /// Launcher.
        launcher: EntityId,
        /// Previous state.
        from: LauncherState,
        /// New state.
        to: LauncherState,
    },
    /// A launcher dropped to its low-ammo threshold.
    LauncherLowAmmo {
        /// Launcher.
        launcher: EntityId,
        /// Ammo remaining.
        ammo: u32,
    },
    /// The player pressed while no launcher was selected.
    NoLauncherSelected,
    /// A city or building was destroyed.
    DestructibleDestroyed {
        /// Destroyed structure.
        destructible: EntityId,
        /// Structures still standing.
        remaining: usize,
    },
    /// Fast-forward switched on or off.
    FastForwardChanged {
        /// True while time runs fast.
        active: bool,
    },
    /// A new wave started.
    WaveAdvanced {
        /// Wave number, starting at 1.
        wave: u32,
    },
    /// Every structure is destroyed.
    GameOver {
        /// Final score.
        score: u64,
        /// Waves fully cleared before the end.
        waves_survived: u32,
    },
}

/// A notification stamped with its tick and sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Tick the notification was emitted on.
    pub tick: u64,
    /// Run-wide sequence number.
    pub sequence: u64,
    /// The notification.
    pub notification: Notification,
}

/// Consumer of drained notifications.
pub trait NotificationSink {
    /// Handles one record. Must not call back into the simulation.
    fn notify(&mut self, record: &EventRecord);
}

impl NotificationSink for Vec<EventRecord> {
    fn notify(&mut self, record: &EventRecord) {
        self.push(record.clone());
    }
}

/// Append-only notification buffer drained by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
    next_sequence: u64,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a notification for `tick`.
    pub fn push(&mut self, tick: u64, notification: Notification) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.records.push(EventRecord {
            tick,
            sequence,
            notification,
        });
    }

    /// Drains and returns every pending record in emission order.
    pub fn take_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }

    /// Drains every pending record into `sink`.
    pub fn drain_into<S: NotificationSink + ?Sized>(&mut self, sink: &mut S) {
        for record in self.records.drain(..) {
            sink.notify(&record);
        }
    }

    /// Pending records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> + '_ {
        self.records.iter()
    }

    /// Returns the number of pending records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
