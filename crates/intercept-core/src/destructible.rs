//! Destructible tracking and game-over detection.

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::entity::{DestructibleComponents, Entity, EntityId};

/// The cities and buildings the player defends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestructibleTracker {
    ids: Vec<EntityId>,
}

impl DestructibleTracker {
    /// Creates a tracker over already spawned structures.
    #[must_use]
    pub fn new(ids: Vec<EntityId>) -> Self {
        Self { ids }
    }

    /// Structure IDs in configuration order.
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Number of tracked structures still standing.
    #[must_use]
    pub fn remaining(&self, arena: &Arena) -> usize {
        self.ids
            .iter()
            .filter(|id| {
                arena
                    .get(**id)
                    .and_then(Entity::as_destructible)
                    .is_some_and(DestructibleComponents::is_standing)
            })
            .count()
    }
}

/// One-way, edge-triggered game-over switch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameOverLatch {
    tripped: bool,
}

impl GameOverLatch {
    /// Creates an untripped latch.
    #[must_use]
    pub const fn new() -> Self {
        Self { tripped: false }
    }

    /// Feeds the current standing count. Returns true on the single
    /// observation where the count first reaches zero.
    pub fn observe(&mut self, remaining: usize) -> bool {
        if self.tripped || remaining > 0 {
            return false;
        }
        self.tripped = true;
        true
    }

    /// Returns true once the game is over.
    #[must_use]
    pub const fn is_tripped(&self) -> bool {
        self.tripped
    }
}
