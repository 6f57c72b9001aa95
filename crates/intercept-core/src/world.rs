//! Shared mutable state of a running game.
//!
//! [`World`] bundles the registry, the combo ledger, the notification log and
//! the score so that every system mutates them through the same handful of
//! operations. Those operations keep the cross-cutting rules in one place:
//!
//! - every spawn and despawn is announced;
//! - despawning a chained explosion detaches it from its combo tracker;
//! - a missile terminates at most once and always leaves exactly one
//!   explosion behind, taking its destination marker with it.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::arena::Arena;
use crate::combo::{ComboId, ComboLedger};
use crate::entity::{
    DestructibleComponents, Entity, EntityId, EntityInner, EntityKind, ExplosionComponents,
    LauncherComponents, MarkerComponents, MissileComponents, Payload, Transform,
};
use crate::event::{EventLog, Notification};
use crate::geometry::heading_towards;
use crate::launcher::{FireOrder, Transition};

/// Provenance of a new explosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// Enemy ordnance: damages structures, never scores.
    Enemy,
    /// A player interceptor detonating: opens a new combo chain.
    PlayerShot,
    /// A kill inside an existing chain.
    Chain(ComboId),
}

impl Cause {
    /// Returns true for player-caused blasts.
    #[must_use]
    pub const fn is_player(self) -> bool {
        !matches!(self, Self::Enemy)
    }
}

/// Registry, combo ledger, notification log and score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Every live entity.
    pub arena: Arena,
    /// Open combo chains.
    pub combos: ComboLedger,
    /// Pending notifications.
    pub events: EventLog,
    /// Player score.
    pub score: u64,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// Appends a notification stamped with the current tick.
    pub fn emit(&mut self, notification: Notification) {
        let tick = self.tick();
        self.events.push(tick, notification);
    }

    /// Registers an entity and announces it.
    pub fn spawn(&mut self, transform: Transform, inner: EntityInner) -> EntityId {
        let kind = inner.kind();
        let id = self.arena.spawn(transform, inner);
        self.emit(Notification::EntitySpawned {
            id,
            kind,
            position: transform.position,
            heading: transform.heading,
        });
        id
    }

    /// Removes an entity and announces it.
    ///
    /// A chained explosion is detached from its tracker here; the tracker
    /// itself closes in the next [`World::sweep_combos`].
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.arena.despawn(id)?;
        if let Some(combo) = entity.as_explosion().and_then(|e| e.combo) {
            self.combos.detach(combo, id);
        }
        self.emit(Notification::EntityDespawned {
            id,
            kind: entity.kind(),
        });
        Some(entity)
    }

    /// Spawns an explosion at `position` sized by `payload`.
    pub fn spawn_explosion(&mut self, position: Vec2, payload: &Payload, cause: Cause) -> EntityId {
        let components = match cause {
            Cause::Enemy => ExplosionComponents::enemy(payload),
            Cause::PlayerShot => ExplosionComponents::player(payload, self.combos.open()),
            Cause::Chain(combo) => ExplosionComponents::player(payload, combo),
        };
        let combo = components.combo;
        let id = self.spawn(Transform::at(position), EntityInner::Explosion(components));
        if let Some(combo) = combo {
            self.combos.attach(combo, id);
        }
        id
    }

    /// Terminates a missile: removes it and its marker, and spawns its
    /// explosion.
    ///
    /// Returns the explosion, or `None` if the missile is gone or was already
    /// resolved.
    pub fn detonate_missile(&mut self, missile: EntityId, cause: Cause) -> Option<EntityId> {
        let entity = self.arena.get_mut(missile)?;
        let position = entity.position();
        let components = entity.as_missile_mut()?;
        if components.resolved {
            return None;
        }
        components.resolved = true;
        let payload = components.payload;
        let marker = components.marker.take();

        self.despawn(missile);
        if let Some(marker) = marker {
            self.despawn(marker);
        }

        let explosion = self.spawn_explosion(position, &payload, cause);
        trace!(%missile, %explosion, ?cause, "missile detonated");
        self.emit(Notification::MissileExploded {
            missile,
            explosion,
            caused_by_player: cause.is_player(),
        });
        Some(explosion)
    }

    /// Resolves an enemy missile caught inside `explosions`.
    ///
    /// If any of them is player-caused the missile is a kill: the chain with
    /// the strictly highest count (first in the given order on ties) is
    /// credited `base_score * count` and continues through a new explosion at
    /// the missile. Otherwise the missile detonates as enemy ordnance.
    ///
    /// Calling this again for a missile that was already resolved changes
    /// nothing and returns `None`.
    pub fn resolve_explosion_contact(
        &mut self,
        missile: EntityId,
        explosions: &[EntityId],
    ) -> Option<EntityId> {
        let base_score = {
            let m = self.arena.get(missile).and_then(Entity::as_missile)?;
            if !m.is_live_threat() {
                return None;
            }
            m.payload.base_score
        };

        let arena = &self.arena;
        let chains = explosions.iter().filter_map(|id| {
            arena
                .get(*id)
                .and_then(Entity::as_explosion)
                .and_then(ExplosionComponents::chain)
        });

        match self.combos.strongest(chains) {
            Some(combo) => {
                let gain = self.combos.register_kill(combo, base_score)?;
                self.score += gain.score_gain;
                debug!(
                    tracker = %combo,
                    combo_count = gain.combo_count,
                    score_gain = gain.score_gain,
                    "combo kill"
                );
                self.emit(Notification::ComboIncremented {
                    tracker: combo,
                    combo_count: gain.combo_count,
                    score_gain: gain.score_gain,
                });
                self.detonate_missile(missile, Cause::Chain(combo))
            }
            None => self.detonate_missile(missile, Cause::Enemy),
        }
    }

    /// Removes an enemy missile that outlived its age limit. No explosion.
    pub fn expire_missile(&mut self, missile: EntityId) {
        let marker = self
            .arena
            .get_mut(missile)
            .and_then(Entity::as_missile_mut)
            .and_then(|m| {
                m.resolved = true;
                m.marker.take()
            });
        if self.despawn(missile).is_none() {
            return;
        }
        if let Some(marker) = marker {
            self.despawn(marker);
        }
        self.emit(Notification::MissileExpired { missile });
    }

    /// Spawns an interceptor and its destination marker for a granted
    /// fire order.
    pub fn launch_interceptor(&mut self, launcher: EntityId, order: &FireOrder) -> EntityId {
        let marker = self.spawn(
            Transform::at(order.target),
            EntityInner::Marker(MarkerComponents { launcher }),
        );
        let heading = heading_towards(order.origin, order.target);
        let components =
            MissileComponents::player(order.origin, order.target, order.speed, order.payload, 0.0)
                .with_marker(marker);
        let missile = self.spawn(
            Transform::new(order.origin, heading),
            EntityInner::Missile(components),
        );
        self.emit(Notification::MissileLaunched {
            launcher,
            missile,
            target: order.target,
            ammo_left: order.ammo_left,
        });
        missile
    }

    /// Applies a launcher mutator and announces the transition, if any.
    pub fn update_launcher<F>(&mut self, launcher: EntityId, mutate: F) -> Option<Transition>
    where
        F: FnOnce(&mut LauncherComponents) -> Option<Transition>,
    {
        let transition = self
            .arena
            .get_mut(launcher)
            .and_then(Entity::as_launcher_mut)
            .and_then(mutate)?;
        self.emit(Notification::LauncherStateChanged {
            launcher,
            from: transition.from,
            to: transition.to,
        });
        Some(transition)
    }

    /// Destroys a standing structure. Returns false if it was already down.
    pub fn destroy_structure(&mut self, destructible: EntityId) -> bool {
        let destroyed = self
            .arena
            .get_mut(destructible)
            .and_then(Entity::as_destructible_mut)
            .is_some_and(DestructibleComponents::destroy);
        if destroyed {
            let remaining = self.standing_structures();
            self.emit(Notification::DestructibleDestroyed {
                destructible,
                remaining,
            });
        }
        destroyed
    }

    /// Closes every combo chain with no live explosions.
    pub fn sweep_combos(&mut self) {
        for tracker in self.combos.sweep() {
            debug!(
                tracker = %tracker.id(),
                combo_count = tracker.combo_count(),
                score = tracker.accumulated_score(),
                "combo ended"
            );
            self.emit(Notification::ComboEnded {
                tracker: tracker.id(),
                combo_count: tracker.combo_count(),
                accumulated_score: tracker.accumulated_score(),
            });
        }
    }

    /// Missiles in flight, player and enemy.
    #[must_use]
    pub fn live_missiles(&self) -> usize {
        self.arena.count_kind(EntityKind::Missile)
    }

    /// Player interceptors in flight.
    #[must_use]
    pub fn player_missiles(&self) -> usize {
        self.arena.count_where(EntityKind::Missile, |e| {
            e.as_missile().is_some_and(|m| m.owned_by_player)
        })
    }

    /// Explosions alive.
    #[must_use]
    pub fn live_explosions(&self) -> usize {
        self.arena.count_kind(EntityKind::Explosion)
    }

    /// Structures still standing.
    #[must_use]
    pub fn standing_structures(&self) -> usize {
        self.arena.count_where(EntityKind::Destructible, |e| {
            e.as_destructible().is_some_and(DestructibleComponents::is_standing)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::KindMask;

    fn payload() -> Payload {
        Payload {
            explosion_radius: 1.0,
            growth_rate: 1.0,
            shrink_rate: 1.0,
            base_score: 10,
        }
    }

    fn enemy_missile(world: &mut World, position: Vec2) -> EntityId {
        world.spawn(
            Transform::at(position),
            EntityInner::Missile(MissileComponents::enemy(position, 1.0, payload(), 20.0, 0.1)),
        )
    }

    mod detonation_tests {
        use super::*;

        #[test]
        fn detonation_spawns_exactly_one_explosion() {
            let mut world = World::new();
            let m = enemy_missile(&mut world, Vec2::ZERO);

            let explosion = world.detonate_missile(m, Cause::Enemy);
            assert!(explosion.is_some());
            assert!(world.detonate_missile(m, Cause::Enemy).is_none());

            assert_eq!(world.live_explosions(), 1);
            assert_eq!(world.live_missiles(), 0);
        }

        #[test]
        fn player_shot_opens_a_tracker() {
            let mut world = World::new();
            let m = enemy_missile(&mut world, Vec2::ZERO);

            let explosion = world.detonate_missile(m, Cause::PlayerShot).unwrap();
            let combo = world
                .arena
                .get(explosion)
                .and_then(Entity::as_explosion)
                .and_then(ExplosionComponents::chain)
                .unwrap();
            assert!(world.combos.get(combo).unwrap().live_explosions().contains(&explosion));
        }

        #[test]
        fn detonation_removes_marker() {
            let mut world = World::new();
            let marker = world.spawn(
                Transform::at(Vec2::new(0.0, 3.0)),
                EntityInner::Marker(MarkerComponents {
                    launcher: EntityId::new(99),
                }),
            );
            let missile = world.spawn(
                Transform::at(Vec2::ZERO),
                EntityInner::Missile(
                    MissileComponents::player(Vec2::ZERO, Vec2::new(0.0, 3.0), 5.0, payload(), 0.0)
                        .with_marker(marker),
                ),
            );

            world.detonate_missile(missile, Cause::PlayerShot);
            assert!(!world.arena.contains(marker));
            assert!(world
                .arena
                .query_overlap(Vec2::new(0.0, 3.0), 1.0, KindMask::MARKER)
                .is_empty());
        }

        #[test]
        fn despawning_chained_explosion_detaches_it() {
            let mut world = World::new();
            let explosion = world.spawn_explosion(Vec2::ZERO, &payload(), Cause::PlayerShot);
            let combo = world
                .arena
                .get(explosion)
                .and_then(Entity::as_explosion)
                .and_then(|e| e.combo)
                .unwrap();

            world.despawn(explosion);
            assert!(world.combos.get(combo).unwrap().live_explosions().is_empty());

            world.sweep_combos();
            assert!(world.combos.is_empty());
            assert!(world
                .events
                .iter()
                .any(|r| matches!(r.notification, Notification::ComboEnded { .. })));
        }

        #[test]
        fn expiry_leaves_no_explosion() {
            let mut world = World::new();
            let m = enemy_missile(&mut world, Vec2::ZERO);
            world.expire_missile(m);

            assert_eq!(world.live_missiles(), 0);
            assert_eq!(world.live_explosions(), 0);
        }
    }

    mod contact_tests {
        use super::*;

        #[test]
        fn contact_with_enemy_blast_scores_nothing() {
            let mut world = World::new();
            let blast = world.spawn_explosion(Vec2::ZERO, &payload(), Cause::Enemy);
            let m = enemy_missile(&mut world, Vec2::ZERO);

            let explosion = world.resolve_explosion_contact(m, &[blast]).unwrap();
            assert_eq!(world.score, 0);
            let caused_by_player = world
                .arena
                .get(explosion)
                .and_then(Entity::as_explosion)
                .is_some_and(|e| e.caused_by_player);
            assert!(!caused_by_player);
        }

        #[test]
        fn duplicate_contact_is_ignored() {
            let mut world = World::new();
            let blast = world.spawn_explosion(Vec2::ZERO, &payload(), Cause::PlayerShot);
            let m = enemy_missile(&mut world, Vec2::ZERO);

            assert!(world.resolve_explosion_contact(m, &[blast, blast]).is_some());
            assert!(world.resolve_explosion_contact(m, &[blast]).is_none());

            assert_eq!(world.score, 10);
            assert_eq!(world.live_explosions(), 2);
        }

        #[test]
        fn player_missiles_are_not_kills() {
            let mut world = World::new();
            let blast = world.spawn_explosion(Vec2::ZERO, &payload(), Cause::PlayerShot);
            let interceptor = world.spawn(
                Transform::at(Vec2::ZERO),
                EntityInner::Missile(MissileComponents::player(
                    Vec2::ZERO,
                    Vec2::new(0.0, 5.0),
                    5.0,
                    payload(),
                    0.0,
                )),
            );

            assert!(world.resolve_explosion_contact(interceptor, &[blast]).is_none());
            assert!(world.arena.contains(interceptor));
        }
    }

    #[test]
    fn spawn_and_despawn_are_announced() {
        let mut world = World::new();
        let m = enemy_missile(&mut world, Vec2::ONE);
        world.despawn(m);

        let kinds: Vec<_> = world.events.take_events().into_iter().map(|r| r.notification).collect();
        assert!(matches!(kinds[0], Notification::EntitySpawned { kind: EntityKind::Missile, .. }));
        assert!(matches!(kinds[1], Notification::EntityDespawned { kind: EntityKind::Missile, .. }));
    }
}
