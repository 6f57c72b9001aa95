//! Component structs for each entity kind.
//!
//! Components hold state and the small per-entity transitions that need no
//! access to the rest of the world (flight integration, radius lifecycle).
//! Anything that spawns or destroys other entities lives in
//! [`World`](crate::world::World) or the [`systems`](crate::systems).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::combo::ComboId;

/// Position and heading of an entity.
///
/// Heading is in radians, counter-clockwise from +X. Straight down is
/// `-FRAC_PI_2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position.
    pub position: Vec2,
    /// Heading in radians.
    pub heading: f32,
}

impl Transform {
    /// Creates a transform with the given position and heading.
    #[must_use]
    pub const fn new(position: Vec2, heading: f32) -> Self {
        Self { position, heading }
    }

    /// Creates a transform at `position` with zero heading.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self::new(position, 0.0)
    }

    /// Unit vector along the heading.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// Moves the position `distance` units along the heading.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.direction() * distance;
    }
}

/// Explosion sizing and score carried by a missile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Radius at which the explosion stops growing.
    pub explosion_radius: f32,
    /// Growth rate in units per second.
    pub growth_rate: f32,
    /// Shrink rate in units per second.
    pub shrink_rate: f32,
    /// Score base awarded when this missile is killed inside a combo.
    pub base_score: u32,
}

impl Default for Payload {
    fn default() -> Self {
        Self {
            explosion_radius: 1.2,
            growth_rate: 1.6,
            shrink_rate: 1.6,
            base_score: 10,
        }
    }
}

// =============================================================================
// Missile
// =============================================================================

/// Warhead behavior of a missile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MissileClass {
    /// Flies until it collides.
    Regular,
    /// Splits into regular missiles when the fuse runs out.
    Cluster {
        /// Seconds until the split.
        fuse: f32,
    },
}

/// Flight state of a player or enemy missile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileComponents {
    /// True for interceptors fired by a launcher.
    pub owned_by_player: bool,
    /// Flight speed in units per second.
    pub speed: f32,
    /// Spawn position.
    pub origin: Vec2,
    /// Target point (player missiles only).
    pub destination: Option<Vec2>,
    /// Distance after which a player missile detonates.
    pub distance_to_travel: f32,
    /// Cumulative distance flown.
    pub travelled: f32,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds after which an enemy missile is removed.
    pub age_limit: Option<f32>,
    /// Explosion sizing and score.
    pub payload: Payload,
    /// Warhead behavior.
    pub class: MissileClass,
    /// Destination marker owned by this missile.
    pub marker: Option<EntityId>,
    /// Footprint radius for overlap tests.
    pub collider_radius: f32,
    pub(crate) resolved: bool,
}

impl MissileComponents {
    /// Creates a player interceptor flying from `origin` to `destination`.
    #[must_use]
    pub fn player(
        origin: Vec2,
        destination: Vec2,
        speed: f32,
        payload: Payload,
        collider_radius: f32,
    ) -> Self {
        Self {
            owned_by_player: true,
            speed,
            origin,
            destination: Some(destination),
            distance_to_travel: origin.distance(destination),
            travelled: 0.0,
            age: 0.0,
            age_limit: None,
            payload,
            class: MissileClass::Regular,
            marker: None,
            collider_radius,
            resolved: false,
        }
    }

    /// Creates an enemy missile starting at `origin`.
    #[must_use]
    pub fn enemy(
        origin: Vec2,
        speed: f32,
        payload: Payload,
        age_limit: f32,
        collider_radius: f32,
    ) -> Self {
        Self {
            owned_by_player: false,
            speed,
            origin,
            destination: None,
            distance_to_travel: f32::INFINITY,
            travelled: 0.0,
            age: 0.0,
            age_limit: Some(age_limit),
            payload,
            class: MissileClass::Regular,
            marker: None,
            collider_radius,
            resolved: false,
        }
    }

    /// Sets the warhead class.
    #[must_use]
    pub fn with_class(mut self, class: MissileClass) -> Self {
        self.class = class;
        self
    }

    /// Attaches a destination marker.
    #[must_use]
    pub fn with_marker(mut self, marker: EntityId) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Returns true once the missile has detonated or been killed.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Returns true for an enemy missile that has not been resolved yet.
    #[must_use]
    pub const fn is_live_threat(&self) -> bool {
        !self.owned_by_player && !self.resolved
    }

    /// Ages the missile and returns the distance to move this tick.
    pub fn fly(&mut self, dt: f32) -> f32 {
        let step = self.speed * dt;
        self.age += dt;
        self.travelled += step;
        step
    }

    /// Returns true when a player missile has covered its distance.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.owned_by_player && self.travelled >= self.distance_to_travel
    }

    /// Returns true when an enemy missile has outlived its age limit.
    #[must_use]
    pub fn has_expired(&self) -> bool {
        self.age_limit.is_some_and(|limit| self.age >= limit)
    }

    /// Burns the cluster fuse. Returns true on the tick it runs out.
    pub fn burn_fuse(&mut self, dt: f32) -> bool {
        match &mut self.class {
            MissileClass::Cluster { fuse } => {
                *fuse -= dt;
                *fuse <= 0.0
            }
            MissileClass::Regular => false,
        }
    }
}

// =============================================================================
// Explosion
// =============================================================================

/// Explosion lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionPhase {
    /// Radius growing toward the maximum.
    Expanding,
    /// Radius shrinking toward zero.
    Contracting,
}

/// Outcome of advancing an explosion by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionStep {
    /// Still growing.
    Expanding,
    /// Reached the maximum radius this tick.
    BeganContracting,
    /// Still shrinking.
    Contracting,
    /// Contracted to nothing; the entity must be destroyed.
    Spent,
}

/// Blast area state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionComponents {
    /// True if this blast belongs to a player chain.
    pub caused_by_player: bool,
    /// Current radius.
    pub radius: f32,
    /// Radius at which expansion stops.
    pub max_radius: f32,
    /// Growth rate in units per second.
    pub growth_rate: f32,
    /// Shrink rate in units per second.
    pub shrink_rate: f32,
    /// Lifecycle phase.
    pub phase: ExplosionPhase,
    /// Combo chain this blast scores into.
    pub combo: Option<ComboId>,
}

impl ExplosionComponents {
    fn from_payload(payload: &Payload, combo: Option<ComboId>) -> Self {
        Self {
            caused_by_player: combo.is_some(),
            radius: 0.0,
            max_radius: payload.explosion_radius,
            growth_rate: payload.growth_rate,
            shrink_rate: payload.shrink_rate,
            phase: ExplosionPhase::Expanding,
            combo,
        }
    }

    /// Creates a player-caused explosion scoring into `combo`.
    #[must_use]
    pub fn player(payload: &Payload, combo: ComboId) -> Self {
        Self::from_payload(payload, Some(combo))
    }

    /// Creates an enemy-caused explosion.
    #[must_use]
    pub fn enemy(payload: &Payload) -> Self {
        Self::from_payload(payload, None)
    }

    /// Returns the combo chain, if this blast is player-caused.
    #[must_use]
    pub fn chain(&self) -> Option<ComboId> {
        self.combo.filter(|_| self.caused_by_player)
    }

    /// Advances the radius lifecycle by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> ExplosionStep {
        match self.phase {
            ExplosionPhase::Expanding => {
                self.radius += self.growth_rate * dt;
                if self.radius >= self.max_radius {
                    self.phase = ExplosionPhase::Contracting;
                    ExplosionStep::BeganContracting
                } else {
                    ExplosionStep::Expanding
                }
            }
            ExplosionPhase::Contracting => {
                self.radius -= self.shrink_rate * dt;
                if self.radius <= 0.0 {
                    ExplosionStep::Spent
                } else {
                    ExplosionStep::Contracting
                }
            }
        }
    }
}

// =============================================================================
// Destructible
// =============================================================================

/// City/building state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestructibleState {
    /// Standing.
    Normal,
    /// Destroyed. Terminal.
    Destroyed,
}

/// Components for a city or building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestructibleComponents {
    /// Current state.
    pub state: DestructibleState,
    /// Footprint radius.
    pub radius: f32,
}

impl DestructibleComponents {
    /// Creates a standing structure.
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self {
            state: DestructibleState::Normal,
            radius,
        }
    }

    /// Returns true while the structure stands.
    #[must_use]
    pub fn is_standing(&self) -> bool {
        self.state == DestructibleState::Normal
    }

    /// Destroys the structure. Returns false if it was already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.is_standing() {
            self.state = DestructibleState::Destroyed;
            true
        } else {
            false
        }
    }
}

/// Components for a destination marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerComponents {
    /// Launcher whose fire action placed the marker.
    pub launcher: EntityId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Payload {
        Payload {
            explosion_radius: 1.0,
            growth_rate: 2.0,
            shrink_rate: 4.0,
            base_score: 5,
        }
    }

    mod missile_tests {
        use super::*;

        #[test]
        fn player_missile_precomputes_distance() {
            let m = MissileComponents::player(Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0, payload(), 0.1);
            assert!((m.distance_to_travel - 5.0).abs() < 1e-6);
            assert!(m.owned_by_player);
            assert!(!m.has_arrived());
        }

        #[test]
        fn arrival_uses_cumulative_distance() {
            let mut m = MissileComponents::player(Vec2::ZERO, Vec2::new(0.0, 2.0), 4.0, payload(), 0.1);
            assert!((m.fly(0.25) - 1.0).abs() < f32::EPSILON);
            assert!(!m.has_arrived());
            m.fly(0.25);
            assert!(m.has_arrived());
        }

        #[test]
        fn enemy_missiles_never_arrive() {
            let mut m = MissileComponents::enemy(Vec2::ZERO, 1.0, payload(), 20.0, 0.1);
            m.fly(100.0);
            assert!(!m.has_arrived());
            assert!(m.has_expired());
        }

        #[test]
        fn cluster_fuse_burns_down() {
            let mut m = MissileComponents::enemy(Vec2::ZERO, 1.0, payload(), 20.0, 0.1)
                .with_class(MissileClass::Cluster { fuse: 0.5 });
            assert!(!m.burn_fuse(0.25));
            assert!(m.burn_fuse(0.25));
        }

        #[test]
        fn regular_missiles_have_no_fuse() {
            let mut m = MissileComponents::enemy(Vec2::ZERO, 1.0, payload(), 20.0, 0.1);
            assert!(!m.burn_fuse(100.0));
        }
    }

    mod explosion_tests {
        use super::*;

        #[test]
        fn expands_then_contracts_then_spends() {
            let mut e = ExplosionComponents::enemy(&payload());
            assert_eq!(e.advance(0.25), ExplosionStep::Expanding);
            assert_eq!(e.advance(0.25), ExplosionStep::BeganContracting);
            assert_eq!(e.phase, ExplosionPhase::Contracting);
            assert_eq!(e.advance(0.125), ExplosionStep::Contracting);
            assert_eq!(e.advance(0.125), ExplosionStep::Spent);
        }

        #[test]
        fn contracting_never_returns_to_expanding() {
            let mut e = ExplosionComponents::enemy(&payload());
            e.advance(1.0);
            assert_eq!(e.phase, ExplosionPhase::Contracting);
            e.advance(0.01);
            assert_eq!(e.phase, ExplosionPhase::Contracting);
        }

        #[test]
        fn chain_only_for_player_blasts() {
            let enemy = ExplosionComponents::enemy(&payload());
            assert!(!enemy.caused_by_player);
            assert!(enemy.chain().is_none());

            let player = ExplosionComponents::player(&payload(), ComboId::new(3));
            assert!(player.caused_by_player);
            assert_eq!(player.chain(), Some(ComboId::new(3)));
        }
    }

    mod destructible_tests {
        use super::*;

        #[test]
        fn destroy_is_one_shot() {
            let mut city = DestructibleComponents::new(0.5);
            assert!(city.destroy());
            assert!(!city.destroy());
            assert_eq!(city.state, DestructibleState::Destroyed);
        }
    }

    #[test]
    fn transform_advances_along_heading() {
        let mut t = Transform::new(Vec2::ZERO, std::f32::consts::FRAC_PI_2);
        t.advance(2.0);
        assert!(t.position.x.abs() < 1e-5);
        assert!((t.position.y - 2.0).abs() < 1e-5);
    }
}
