//! Explosion lifecycle and blast contact.
//!
//! Runs in two passes. The first grows or shrinks every blast and removes
//! the spent ones. The second takes a snapshot of the surviving blasts and
//! resolves what they touch:
//!
//! - an enemy missile inside any snapshot blast is resolved once, against
//!   every snapshot blast it overlaps, so a kill goes to the strongest chain;
//! - enemy-caused blasts also destroy structures and knock out collidable
//!   launchers.
//!
//! Explosions created during the second pass join the next tick's snapshot.

use tracing::trace;

use crate::entity::{Entity, EntityId, EntityKind, ExplosionStep, KindMask, LauncherComponents};
use crate::world::World;

/// Advances every explosion and applies blast contact.
pub fn run(world: &mut World, dt: f32) {
    advance_all(world, dt);

    let snapshot = world.arena.ids_of_kind(EntityKind::Explosion);
    for blast in snapshot.iter().copied() {
        apply_blast(world, blast, &snapshot);
    }
}

fn advance_all(world: &mut World, dt: f32) {
    for id in world.arena.ids_of_kind(EntityKind::Explosion) {
        let step = world
            .arena
            .get_mut(id)
            .and_then(Entity::as_explosion_mut)
            .map(|e| e.advance(dt));
        match step {
            Some(ExplosionStep::Spent) => {
                trace!(explosion = %id, "explosion spent");
                world.despawn(id);
            }
            Some(_) => world.arena.update_spatial(id),
            None => {}
        }
    }
}

fn apply_blast(world: &mut World, blast: EntityId, snapshot: &[EntityId]) {
    let Some((center, radius, caused_by_player)) = world.arena.get(blast).and_then(|e| {
        e.as_explosion()
            .map(|x| (e.position(), x.radius.max(0.0), x.caused_by_player))
    }) else {
        return;
    };

    for missile in world.arena.query_overlap(center, radius, KindMask::MISSILE) {
        let Some((position, collider)) = world.arena.get(missile).and_then(|e| {
            e.as_missile()
                .filter(|m| m.is_live_threat())
                .map(|m| (e.position(), m.collider_radius))
        }) else {
            continue;
        };
        let touching: Vec<EntityId> = world
            .arena
            .query_overlap(position, collider, KindMask::EXPLOSION)
            .into_iter()
            .filter(|id| snapshot.binary_search(id).is_ok())
            .collect();
        world.resolve_explosion_contact(missile, &touching);
    }

    if caused_by_player {
        return;
    }

    for structure in world.arena.query_overlap(center, radius, KindMask::DESTRUCTIBLE) {
        world.destroy_structure(structure);
    }
    for launcher in world.arena.query_overlap(center, radius, KindMask::LAUNCHER) {
        let collidable = world
            .arena
            .get(launcher)
            .and_then(Entity::as_launcher)
            .is_some_and(LauncherComponents::is_collidable);
        if collidable {
            world.update_launcher(launcher, LauncherComponents::receive_damage);
        }
    }
}
