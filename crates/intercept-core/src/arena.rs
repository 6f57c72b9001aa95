//! Arena module: the entity registry.
//!
//! The Arena is the container for all live entities. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - A spatial index of circular footprints for overlap queries
//! - Entity lifecycle management (spawn/despawn)
//! - The simulation tick counter
//!
//! # Spatial Index Synchronization
//!
//! The spatial index is NOT automatically synchronized when an entity moves
//! or an explosion changes radius. After mutating through `get_mut()`, call
//! `update_spatial(id)`. Spawning and despawning update the index.
//!
//! ```
//! # use glam::Vec2;
//! # use intercept_core::arena::Arena;
//! # use intercept_core::entity::{DestructibleComponents, EntityInner, Transform};
//! # let mut arena = Arena::new();
//! # let id = arena.spawn(Transform::default(), EntityInner::Destructible(DestructibleComponents::new(0.5)));
//! if let Some(entity) = arena.get_mut(id) {
//!     entity.transform_mut().position = Vec2::new(5.0, 5.0);
//! }
//! // REQUIRED: sync spatial index after position change
//! arena.update_spatial(id);
//! ```
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use intercept_core::arena::Arena;
//! use intercept_core::entity::{DestructibleComponents, EntityInner, KindMask, Transform};
//!
//! let mut arena = Arena::new();
//! let city = arena.spawn(
//!     Transform::at(Vec2::new(1.0, 2.0)),
//!     EntityInner::Destructible(DestructibleComponents::new(0.5)),
//! );
//!
//! let hits = arena.query_overlap(Vec2::new(1.0, 3.0), 0.6, KindMask::DESTRUCTIBLE);
//! assert_eq!(hits, vec![city]);
//! ```

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityInner, EntityKind, KindMask, Transform};

// =============================================================================
// Spatial Index
// =============================================================================

/// Circle occupied by an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Circle center.
    pub position: Vec2,
    /// Circle radius.
    pub radius: f32,
    /// Kind of the owning entity.
    pub kind: EntityKind,
}

impl Footprint {
    /// Returns true if this footprint overlaps the circle at `center`.
    #[must_use]
    pub fn overlaps(&self, center: Vec2, radius: f32) -> bool {
        let reach = radius + self.radius;
        center.distance_squared(self.position) <= reach * reach
    }
}

/// Brute-force spatial index over entity footprints.
///
/// `HashMap` is fine here: queries scan everything and sort the result, so
/// the map's iteration order never reaches simulation state. The entity
/// counts in a round are small enough that a grid would not pay for itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpatialIndex {
    footprints: HashMap<EntityId, Footprint>,
}

impl SpatialIndex {
    /// Creates a new empty spatial index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            footprints: HashMap::new(),
        }
    }

    /// Inserts or replaces an entity's footprint.
    pub fn insert(&mut self, id: EntityId, footprint: Footprint) {
        self.footprints.insert(id, footprint);
    }

    /// Removes an entity from the index.
    pub fn remove(&mut self, id: EntityId) {
        self.footprints.remove(&id);
    }

    /// Returns the footprint of an entity, if indexed.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<Footprint> {
        self.footprints.get(&id).copied()
    }

    /// Returns the IDs whose footprint overlaps the query circle and whose
    /// kind passes `mask`, sorted by ID.
    #[must_use]
    pub fn query_overlap(&self, center: Vec2, radius: f32, mask: KindMask) -> Vec<EntityId> {
        let mut results: Vec<EntityId> = self
            .footprints
            .iter()
            .filter(|(_, fp)| mask.matches(fp.kind) && fp.overlaps(center, radius))
            .map(|(id, _)| *id)
            .collect();

        // Sort for deterministic order
        results.sort_unstable();
        results
    }

    /// Returns the number of indexed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    /// Returns true if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Registry of every live entity.
///
/// # Determinism
///
/// Entities live in a `BTreeMap` keyed by monotonically assigned IDs, so
/// iteration always visits them in spawn order. IDs are never reused: once
/// despawned, an ID resolves to `None` forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// Footprints for overlap queries.
    spatial: SpatialIndex,
    /// Current simulation tick.
    tick: u64,
}

impl Arena {
    /// Creates a new empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
            spatial: SpatialIndex::new(),
            tick: 0,
        }
    }

    /// Registers a new entity and returns its ID.
    ///
    /// The entity is added to both the entity map and the spatial index.
    pub fn spawn(&mut self, transform: Transform, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        let entity = Entity::new(id, transform, inner);
        self.spatial.insert(id, Self::footprint_of(&entity));
        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity from the entity map and the spatial index.
    ///
    /// Returns the removed entity, if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.spatial.remove(id);
        self.entities.remove(&id)
    }

    /// Returns true if `id` refers to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns an iterator over entity IDs in deterministic (sorted) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over entities in deterministic (sorted by ID) order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Snapshot of the IDs of every live entity of `kind`, sorted.
    ///
    /// Systems iterate over this snapshot so that entities spawned during a
    /// phase are not visited until the next tick.
    #[must_use]
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.kind() == kind)
            .map(Entity::id)
            .collect()
    }

    /// Returns the IDs of entities overlapping the circle at `center`.
    ///
    /// Overlap means the distance between centers is at most `radius` plus
    /// the entity's footprint. Results are sorted by ID.
    #[must_use]
    pub fn query_overlap(&self, center: Vec2, radius: f32, mask: KindMask) -> Vec<EntityId> {
        self.spatial.query_overlap(center, radius, mask)
    }

    /// Counts live entities of `kind` satisfying `predicate`.
    #[must_use]
    pub fn count_where<P>(&self, kind: EntityKind, predicate: P) -> usize
    where
        P: Fn(&Entity) -> bool,
    {
        self.entities
            .values()
            .filter(|e| e.kind() == kind && predicate(e))
            .count()
    }

    /// Counts live entities of `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.count_where(kind, |_| true)
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns a reference to the spatial index.
    #[must_use]
    pub fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Re-indexes an entity after its position or footprint changed.
    pub fn update_spatial(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get(&id) {
            self.spatial.insert(id, Self::footprint_of(entity));
        }
    }

    fn footprint_of(entity: &Entity) -> Footprint {
        Footprint {
            position: entity.position(),
            radius: entity.footprint(),
            kind: entity.kind(),
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
