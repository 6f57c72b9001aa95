//! Missile flight.
//!
//! Per missile, in ascending ID order:
//!
//! 1. Fly `speed * dt` along the heading and add it to the travelled total.
//! 2. Player interceptors detonate once the travelled total reaches their
//!    precomputed distance, or when they leave the playfield. Arrival opens a
//!    new combo chain.
//! 3. Enemy missiles detonate on leaving the playfield or touching a standing
//!    structure or a collidable launcher. Otherwise a cluster missile whose
//!    fuse ran out splits, and a missile past its age limit is removed.
//!
//! Contact with explosions is resolved by the explosion system.

use rand::Rng;
use tracing::trace;

use crate::config::GameConfig;
use crate::entity::{
    DestructibleComponents, Entity, EntityId, EntityInner, EntityKind, KindMask,
    LauncherComponents, MissileComponents, Transform,
};
use crate::event::Notification;
use crate::geometry::{sample_between, sample_count};
use crate::world::{Cause, World};

/// What a missile does at the end of its flight step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Fly,
    Detonate(Cause),
    Split,
    Expire,
}

/// Advances every missile alive at the start of the phase.
pub fn run<R: Rng + ?Sized>(world: &mut World, config: &GameConfig, rng: &mut R, dt: f32) {
    for id in world.arena.ids_of_kind(EntityKind::Missile) {
        match step(world, config, id, dt) {
            Outcome::Fly => {}
            Outcome::Detonate(cause) => {
                world.detonate_missile(id, cause);
            }
            Outcome::Split => split_cluster(world, config, rng, id),
            Outcome::Expire => world.expire_missile(id),
        }
    }
}

fn step(world: &mut World, config: &GameConfig, id: EntityId, dt: f32) -> Outcome {
    let Some(entity) = world.arena.get_mut(id) else {
        return Outcome::Fly;
    };
    let Some(missile) = entity.as_missile_mut() else {
        return Outcome::Fly;
    };
    if missile.is_resolved() {
        return Outcome::Fly;
    }

    let distance = missile.fly(dt);
    let fuse_out = missile.burn_fuse(dt);
    let owned_by_player = missile.owned_by_player;
    let arrived = missile.has_arrived();
    let expired = missile.has_expired();
    let radius = missile.collider_radius;

    entity.transform_mut().advance(distance);
    let position = entity.position();
    world.arena.update_spatial(id);

    let inside = config.bounds.contains(position);
    if owned_by_player {
        return if arrived || !inside {
            Outcome::Detonate(Cause::PlayerShot)
        } else {
            Outcome::Fly
        };
    }

    if !inside || hits_structure(world, position, radius) {
        Outcome::Detonate(Cause::Enemy)
    } else if fuse_out {
        Outcome::Split
    } else if expired {
        Outcome::Expire
    } else {
        Outcome::Fly
    }
}

fn hits_structure(world: &World, position: glam::Vec2, radius: f32) -> bool {
    world
        .arena
        .query_overlap(position, radius, KindMask::LAUNCHER | KindMask::DESTRUCTIBLE)
        .into_iter()
        .filter_map(|id| world.arena.get(id))
        .any(|entity| match entity.inner() {
            EntityInner::Launcher(l) => LauncherComponents::is_collidable(l),
            EntityInner::Destructible(d) => DestructibleComponents::is_standing(d),
            _ => false,
        })
}

fn split_cluster<R: Rng + ?Sized>(world: &mut World, config: &GameConfig, rng: &mut R, id: EntityId) {
    let Some((transform, speed)) = world
        .arena
        .get(id)
        .and_then(|e| e.as_missile().map(|m| (*e.transform(), m.speed)))
    else {
        return;
    };
    if let Some(missile) = world.arena.get_mut(id).and_then(Entity::as_missile_mut) {
        missile.resolved = true;
    }
    world.despawn(id);

    let missiles = &config.missiles;
    let cluster = &missiles.cluster;
    let children = sample_count(rng, cluster.min_children, cluster.max_children);
    for _ in 0..children {
        let spread = sample_between(
            rng,
            cluster.min_spread_degrees.to_radians(),
            cluster.max_spread_degrees.to_radians(),
        );
        let child = MissileComponents::enemy(
            transform.position,
            speed,
            missiles.enemy_payload,
            missiles.enemy_age_limit,
            missiles.collider_radius,
        );
        world.spawn(
            Transform::new(transform.position, transform.heading + spread),
            EntityInner::Missile(child),
        );
    }

    trace!(missile = %id, children, "cluster split");
    world.emit(Notification::ClusterSplit {
        missile: id,
        children,
    });
}
