//! Test setup and query helpers.

use glam::Vec2;

use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::event::{EventRecord, Notification};
use crate::launcher::{LauncherComponents, LauncherState};
use crate::simulation::Simulation;
use crate::wave::Ramp;

/// Frame delta used by the scenario tests.
pub const DT: f32 = 1.0 / 30.0;

// =============================================================================
// Configurations
// =============================================================================

/// Default layout with a spawner that effectively never fires.
pub fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.waves.spawn_quantity = Ramp::new(1.0, 1.0, 0.0);
    config.waves.min_spawn_delay = Ramp::new(1_000.0, 1_000.0, 0.0);
    config.waves.max_spawn_delay = Ramp::new(1_000.0, 1_000.0, 0.0);
    config
}

/// One fast missile per wave, spawned almost immediately.
pub fn short_wave_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.waves.spawn_quantity = Ramp::new(1.0, 1.0, 0.0);
    config.waves.min_spawn_delay = Ramp::new(0.1, 0.1, 0.0);
    config.waves.max_spawn_delay = Ramp::new(0.1, 0.1, 0.0);
    config.waves.missile_speed = Ramp::new(10.0, 10.0, 0.0);
    config
}

pub fn new_sim(config: GameConfig) -> Simulation {
    Simulation::new(config).expect("test config is valid")
}

// =============================================================================
// Input
// =============================================================================

/// Presses on launcher `index` (configuration order).
pub fn press_launcher(sim: &mut Simulation, index: usize) {
    let at = sim.config().launchers[index].position;
    sim.pointer_activated(at);
}

/// Advances `ticks` frames of [`DT`].
pub fn run_ticks(sim: &mut Simulation, ticks: usize) {
    for _ in 0..ticks {
        sim.advance(DT);
    }
}

/// Advances until `done` holds or `max_ticks` pass. Returns true if `done`
/// was reached.
pub fn run_until<F>(sim: &mut Simulation, max_ticks: usize, mut done: F) -> bool
where
    F: FnMut(&Simulation) -> bool,
{
    for _ in 0..max_ticks {
        if done(sim) {
            return true;
        }
        sim.advance(DT);
    }
    done(sim)
}

/// Lowest enemy missile, if any.
pub fn lowest_threat(sim: &Simulation) -> Option<Vec2> {
    sim.arena()
        .entities_sorted()
        .filter(|e| e.as_missile().is_some_and(|m| !m.owned_by_player))
        .map(Entity::position)
        .min_by(|a, b| a.y.total_cmp(&b.y))
}

// =============================================================================
// Queries
// =============================================================================

pub fn launcher(sim: &Simulation, index: usize) -> &LauncherComponents {
    let id = sim.launchers().ids()[index];
    sim.arena()
        .get(id)
        .and_then(Entity::as_launcher)
        .expect("launcher exists")
}

pub fn launcher_id(sim: &Simulation, index: usize) -> EntityId {
    sim.launchers().ids()[index]
}

pub fn launcher_state(sim: &Simulation, index: usize) -> LauncherState {
    launcher(sim, index).state()
}

pub fn notifications(events: &[EventRecord]) -> Vec<&Notification> {
    events.iter().map(|r| &r.notification).collect()
}

pub fn count_events<P>(events: &[EventRecord], predicate: P) -> usize
where
    P: Fn(&Notification) -> bool,
{
    events.iter().filter(|r| predicate(&r.notification)).count()
}

/// Knocks every structure down through the world, as enemy blasts would.
pub fn destroy_all_structures(sim: &mut Simulation) {
    let ids = sim.structures().ids().to_vec();
    for id in ids {
        sim.world_mut().destroy_structure(id);
    }
}

/// Number of entities of `kind` alive.
pub fn alive(sim: &Simulation, kind: EntityKind) -> usize {
    sim.arena().count_kind(kind)
}
