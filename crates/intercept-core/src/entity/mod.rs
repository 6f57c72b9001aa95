//! Entity module for the missile-defense simulation.
//!
//! This module provides the core entity types:
//! - [`EntityId`]: Unique identifier for entities
//! - [`EntityKind`]: Type classification used by queries and notifications
//! - [`KindMask`]: Bit mask over kinds for overlap queries
//! - [`EntityInner`]: Type-safe storage for kind-specific components
//! - [`Entity`]: The complete entity container
//!
//! Every entity carries a [`Transform`] (position and heading). The kind is
//! derived from the [`EntityInner`] variant, so the two can never disagree.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use intercept_core::entity::{
//!     DestructibleComponents, Entity, EntityId, EntityInner, EntityKind, Transform,
//! };
//!
//! let city = Entity::new(
//!     EntityId::new(42),
//!     Transform::at(Vec2::new(-3.0, -4.5)),
//!     EntityInner::Destructible(DestructibleComponents::new(0.6)),
//! );
//!
//! assert_eq!(city.id().as_u64(), 42);
//! assert_eq!(city.kind(), EntityKind::Destructible);
//! ```

pub mod components;

use std::fmt;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use components::{
    DestructibleComponents, DestructibleState, ExplosionComponents, ExplosionPhase,
    ExplosionStep, MarkerComponents, MissileClass, MissileComponents, Payload, Transform,
};
pub use crate::launcher::{LauncherComponents, LauncherState};

/// Unique identifier for an entity.
///
/// Entity IDs are assigned monotonically by the [`Arena`](crate::arena::Arena)
/// and never reused, so a stale ID simply fails to resolve.
///
/// # Ordering
///
/// IDs are ordered by their numeric value. Every query and iteration in the
/// simulation visits entities in this order.
///
/// ```
/// use intercept_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Player interceptor or enemy warhead in flight.
    Missile,
    /// Expanding/contracting blast area.
    Explosion,
    /// Player missile battery.
    Launcher,
    /// City or building the player defends.
    Destructible,
    /// Target marker placed by a player fire action.
    DestinationMarker,
}

impl EntityKind {
    /// Returns the single-bit mask matching this kind.
    #[must_use]
    pub const fn mask(self) -> KindMask {
        match self {
            Self::Missile => KindMask::MISSILE,
            Self::Explosion => KindMask::EXPLOSION,
            Self::Launcher => KindMask::LAUNCHER,
            Self::Destructible => KindMask::DESTRUCTIBLE,
            Self::DestinationMarker => KindMask::MARKER,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missile => write!(f, "Missile"),
            Self::Explosion => write!(f, "Explosion"),
            Self::Launcher => write!(f, "Launcher"),
            Self::Destructible => write!(f, "Destructible"),
            Self::DestinationMarker => write!(f, "DestinationMarker"),
        }
    }
}

bitflags! {
    /// Kind filter for [`Arena::query_overlap`](crate::arena::Arena::query_overlap).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindMask: u8 {
        /// Missiles.
        const MISSILE = 1 << 0;
        /// Explosions.
        const EXPLOSION = 1 << 1;
        /// Launchers.
        const LAUNCHER = 1 << 2;
        /// Destructibles.
        const DESTRUCTIBLE = 1 << 3;
        /// Destination markers.
        const MARKER = 1 << 4;
    }
}

impl KindMask {
    /// Returns true if `kind` passes this filter.
    #[must_use]
    pub const fn matches(self, kind: EntityKind) -> bool {
        self.contains(kind.mask())
    }
}

/// Type-safe storage for kind-specific components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Missile flight state and payload
    Missile(MissileComponents),
    /// Explosion radius lifecycle and provenance
    Explosion(ExplosionComponents),
    /// Launcher ammo and selection state
    Launcher(LauncherComponents),
    /// City/building state
    Destructible(DestructibleComponents),
    /// Destination marker ownership
    Marker(MarkerComponents),
}

impl EntityInner {
    /// Returns the kind for this inner storage.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Missile(_) => EntityKind::Missile,
            Self::Explosion(_) => EntityKind::Explosion,
            Self::Launcher(_) => EntityKind::Launcher,
            Self::Destructible(_) => EntityKind::Destructible,
            Self::Marker(_) => EntityKind::DestinationMarker,
        }
    }

    /// Returns the circular footprint radius used by overlap queries.
    #[must_use]
    pub fn footprint(&self) -> f32 {
        match self {
            Self::Missile(c) => c.collider_radius,
            Self::Explosion(c) => c.radius.max(0.0),
            Self::Launcher(c) => c.collider_radius,
            Self::Destructible(c) => c.radius,
            Self::Marker(_) => 0.0,
        }
    }
}

/// A complete entity in the simulation.
///
/// # Invariants
///
/// - The `EntityId` is unique within an arena
/// - The kind is fixed for the entity's lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    transform: Transform,
    inner: EntityInner,
}

impl Entity {
    /// Creates a new entity with the given ID, transform, and components.
    #[must_use]
    pub const fn new(id: EntityId, transform: Transform, inner: EntityInner) -> Self {
        Self {
            id,
            transform,
            inner,
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.inner.kind()
    }

    /// Returns the entity's transform.
    #[must_use]
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Returns a mutable reference to the entity's transform.
    ///
    /// Call [`Arena::update_spatial`](crate::arena::Arena::update_spatial)
    /// after moving the entity.
    #[must_use]
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Returns the entity's world position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Returns the entity's footprint radius.
    #[must_use]
    pub fn footprint(&self) -> f32 {
        self.inner.footprint()
    }

    /// Returns a reference to the inner component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns a mutable reference to the inner component storage.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Returns true if this entity is a missile.
    #[must_use]
    pub const fn is_missile(&self) -> bool {
        matches!(self.inner, EntityInner::Missile(_))
    }

    /// Returns true if this entity is an explosion.
    #[must_use]
    pub const fn is_explosion(&self) -> bool {
        matches!(self.inner, EntityInner::Explosion(_))
    }

    /// Returns the missile components, if this is a missile.
    #[must_use]
    pub const fn as_missile(&self) -> Option<&MissileComponents> {
        match &self.inner {
            EntityInner::Missile(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the missile components mutably, if this is a missile.
    #[must_use]
    pub fn as_missile_mut(&mut self) -> Option<&mut MissileComponents> {
        match &mut self.inner {
            EntityInner::Missile(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the explosion components, if this is an explosion.
    #[must_use]
    pub const fn as_explosion(&self) -> Option<&ExplosionComponents> {
        match &self.inner {
            EntityInner::Explosion(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the explosion components mutably, if this is an explosion.
    #[must_use]
    pub fn as_explosion_mut(&mut self) -> Option<&mut ExplosionComponents> {
        match &mut self.inner {
            EntityInner::Explosion(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the launcher components, if this is a launcher.
    #[must_use]
    pub const fn as_launcher(&self) -> Option<&LauncherComponents> {
        match &self.inner {
            EntityInner::Launcher(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the launcher components mutably, if this is a launcher.
    #[must_use]
    pub fn as_launcher_mut(&mut self) -> Option<&mut LauncherComponents> {
        match &mut self.inner {
            EntityInner::Launcher(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the destructible components, if this is a destructible.
    #[must_use]
    pub const fn as_destructible(&self) -> Option<&DestructibleComponents> {
        match &self.inner {
            EntityInner::Destructible(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the destructible components mutably, if this is a destructible.
    #[must_use]
    pub fn as_destructible_mut(&mut self) -> Option<&mut DestructibleComponents> {
        match &mut self.inner {
            EntityInner::Destructible(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the marker components, if this is a destination marker.
    #[must_use]
    pub const fn as_marker(&self) -> Option<&MarkerComponents> {
        match &self.inner {
            EntityInner::Marker(c) => Some(c),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
