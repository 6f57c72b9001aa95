//! Combo chains.
//!
//! Every player missile that reaches its destination opens a
//! [`ComboTracker`]. Each explosion in the chain registers itself with the
//! tracker while alive; every enemy missile killed inside one of those
//! explosions bumps the chain's count and scores `base_score * count`.
//!
//! Trackers are reference counted by their live explosions. Despawning an
//! explosion detaches it, and [`ComboLedger::sweep`] closes every tracker whose
//! set of live explosions is empty.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Identifier of a combo chain.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComboId(u64);

impl ComboId {
    /// Creates a new `ComboId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ComboId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComboId({})", self.0)
    }
}

impl fmt::Display for ComboId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Score state of one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTracker {
    id: ComboId,
    combo_count: u32,
    accumulated_score: u64,
    live_explosions: BTreeSet<EntityId>,
}

impl ComboTracker {
    fn new(id: ComboId) -> Self {
        Self {
            id,
            combo_count: 0,
            accumulated_score: 0,
            live_explosions: BTreeSet::new(),
        }
    }

    /// Returns the tracker ID.
    #[must_use]
    pub const fn id(&self) -> ComboId {
        self.id
    }

    /// Number of kills in the chain so far.
    #[must_use]
    pub const fn combo_count(&self) -> u32 {
        self.combo_count
    }

    /// Total score earned by the chain.
    #[must_use]
    pub const fn accumulated_score(&self) -> u64 {
        self.accumulated_score
    }

    /// Explosions currently referencing this tracker.
    #[must_use]
    pub fn live_explosions(&self) -> &BTreeSet<EntityId> {
        &self.live_explosions
    }
}

/// Result of a kill credited to a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboGain {
    /// Chain credited.
    pub tracker: ComboId,
    /// Count after the increment.
    pub combo_count: u32,
    /// Score awarded for this kill.
    pub score_gain: u64,
}

/// Owner of every open combo tracker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboLedger {
    next_id: u64,
    trackers: BTreeMap<ComboId, ComboTracker>,
}

impl ComboLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new tracker with a count of zero.
    pub fn open(&mut self) -> ComboId {
        let id = ComboId::new(self.next_id);
        self.next_id += 1;
        self.trackers.insert(id, ComboTracker::new(id));
        id
    }

    /// Registers a live explosion with a tracker.
    pub fn attach(&mut self, id: ComboId, explosion: EntityId) {
        if let Some(tracker) = self.trackers.get_mut(&id) {
            tracker.live_explosions.insert(explosion);
        }
    }

    /// Removes a destroyed explosion from a tracker.
    pub fn detach(&mut self, id: ComboId, explosion: EntityId) {
        if let Some(tracker) = self.trackers.get_mut(&id) {
            tracker.live_explosions.remove(&explosion);
        }
    }

    /// Credits a kill worth `base_score` to a chain.
    ///
    /// The count is incremented first and the gain uses the new count.
    pub fn register_kill(&mut self, id: ComboId, base_score: u32) -> Option<ComboGain> {
        let tracker = self.trackers.get_mut(&id)?;
        tracker.combo_count += 1;
        let score_gain = u64::from(base_score) * u64::from(tracker.combo_count);
        tracker.accumulated_score += score_gain;
        Some(ComboGain {
            tracker: id,
            combo_count: tracker.combo_count,
            score_gain,
        })
    }

    /// Picks the chain with the strictly greatest count.
    ///
    /// On a tie the earliest candidate wins; callers pass candidates in
    /// ascending explosion ID order. Unknown trackers are ignored.
    #[must_use]
    pub fn strongest<I>(&self, candidates: I) -> Option<ComboId>
    where
        I: IntoIterator<Item = ComboId>,
    {
        let mut best: Option<&ComboTracker> = None;
        for tracker in candidates.into_iter().filter_map(|id| self.trackers.get(&id)) {
            if best.map_or(true, |b| tracker.combo_count > b.combo_count) {
                best = Some(tracker);
            }
        }
        best.map(ComboTracker::id)
    }

    /// Closes every tracker with no live explosions and returns them.
    pub fn sweep(&mut self) -> Vec<ComboTracker> {
        let spent: Vec<ComboId> = self
            .trackers
            .values()
            .filter(|t| t.live_explosions.is_empty())
            .map(ComboTracker::id)
            .collect();
        spent
            .into_iter()
            .filter_map(|id| self.trackers.remove(&id))
            .collect()
    }

    /// Returns a tracker by ID.
    #[must_use]
    pub fn get(&self, id: ComboId) -> Option<&ComboTracker> {
        self.trackers.get(&id)
    }

    /// Returns the number of open trackers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// Returns true if no tracker is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
