//! The tick driver.
//!
//! [`Simulation`] owns the world and every controller and runs a fixed phase
//! order on each [`Simulation::advance`]:
//!
//! 1. **Spawn**: the missile spawner may issue one enemy missile
//! 2. **Missiles**: flight, arrival, collisions, splits, age-out
//! 3. **Explosions**: radius lifecycle, kills, structure and launcher damage
//! 4. **Combo cleanup**: trackers with no live explosions close
//! 5. **Input**: queued pointer activations select or fire
//! 6. **Game over**: the latch trips once the last structure falls
//! 7. **Waves**: the next wave starts once the current one is cleared
//! 8. **Clock**: fast-forward or the game-over slowdown
//!
//! # Determinism
//!
//! All randomness comes from one `ChaCha8Rng` seeded from the configuration,
//! and every system walks entities in ID order. The same seed and the same
//! sequence of `pointer_activated`/`advance` calls produce the same
//! notification stream and score.
//!
//! # Example
//!
//! ```
//! use intercept_core::config::GameConfig;
//! use intercept_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(GameConfig::default()).unwrap();
//! for _ in 0..60 {
//!     sim.advance(1.0 / 60.0);
//! }
//! assert_eq!(sim.wave(), 1);
//! assert_eq!(sim.tick(), 60);
//! ```

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::clock::GameClock;
use crate::config::GameConfig;
use crate::destructible::{DestructibleTracker, GameOverLatch};
use crate::entity::{
    DestructibleComponents, EntityInner, LauncherComponents, MissileClass, MissileComponents,
    Transform,
};
use crate::error::Result;
use crate::event::{EventRecord, Notification, NotificationSink};
use crate::geometry::sample_between;
use crate::launcher::LauncherBank;
use crate::spawner::{MissileSpawner, SpawnRequest};
use crate::systems::{explosion, missile};
use crate::wave::WaveProgression;
use crate::world::World;

/// A running game.
#[derive(Debug, Clone)]
pub struct Simulation {
    world: World,
    config: GameConfig,
    launchers: LauncherBank,
    structures: DestructibleTracker,
    spawner: MissileSpawner,
    waves: WaveProgression,
    clock: GameClock,
    rng: ChaCha8Rng,
    pending: Vec<Vec2>,
    game_over: GameOverLatch,
}

impl Simulation {
    /// Validates `config` and sets up wave 1: launchers, structures and a
    /// loaded spawner.
    ///
    /// # Errors
    ///
    /// Returns any error from [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let launchers = config
            .launchers
            .iter()
            .map(|l| {
                world.spawn(
                    Transform::at(l.position),
                    EntityInner::Launcher(LauncherComponents::from_config(
                        l,
                        config.launcher_collision,
                    )),
                )
            })
            .collect();
        let structures = config
            .destructibles
            .iter()
            .map(|d| {
                world.spawn(
                    Transform::at(d.position),
                    EntityInner::Destructible(DestructibleComponents::new(d.radius)),
                )
            })
            .collect();

        let waves = WaveProgression::new();
        let params = config.waves.parameters(waves.current());
        let spawner = MissileSpawner::new(config.spawner.clone(), params, &mut rng);
        let clock = GameClock::new(config.clock);

        info!(
            seed = config.seed,
            launchers = config.launchers.len(),
            structures = config.destructibles.len(),
            "simulation ready"
        );

        Ok(Self {
            world,
            config,
            launchers: LauncherBank::new(launchers),
            structures: DestructibleTracker::new(structures),
            spawner,
            waves,
            clock,
            rng,
            pending: Vec::new(),
            game_over: GameOverLatch::new(),
        })
    }

    /// Queues a pointer activation at a world point. Routed during the input
    /// phase of the next [`Simulation::advance`].
    pub fn pointer_activated(&mut self, point: Vec2) {
        self.pending.push(point);
    }

    /// Runs one tick with `raw_dt` real seconds.
    pub fn advance(&mut self, raw_dt: f32) {
        let dt = self.clock.scaled(raw_dt);

        if let Some(request) = self.spawner.tick(dt, &mut self.rng) {
            self.spawn_enemy(request);
        }
        missile::run(&mut self.world, &self.config, &mut self.rng, dt);
        explosion::run(&mut self.world, dt);
        self.world.sweep_combos();
        self.route_input();
        self.check_game_over();
        self.check_wave_cleared();
        self.update_clock(raw_dt);

        self.world.arena.advance_tick();
    }

    fn spawn_enemy(&mut self, request: SpawnRequest) {
        let missiles = &self.config.missiles;
        let (payload, class) = if request.cluster {
            let fuse = sample_between(
                &mut self.rng,
                missiles.cluster.min_fuse,
                missiles.cluster.max_fuse,
            );
            (missiles.cluster_payload, MissileClass::Cluster { fuse })
        } else {
            (missiles.enemy_payload, MissileClass::Regular)
        };
        let components = MissileComponents::enemy(
            request.position,
            request.speed,
            payload,
            missiles.enemy_age_limit,
            missiles.collider_radius,
        )
        .with_class(class);
        self.world.spawn(
            Transform::new(request.position, request.heading),
            EntityInner::Missile(components),
        );
    }

    fn route_input(&mut self) {
        for point in std::mem::take(&mut self.pending) {
            if let Some(id) = self.launchers.hit_test(&self.world.arena, point) {
                self.launchers.select(&mut self.world, id);
            } else if let Some(id) = self.launchers.selected(&self.world.arena) {
                self.launchers.fire(&mut self.world, id, point);
            }

            if !self.game_over.is_tripped() && self.launchers.selected(&self.world.arena).is_none() {
                self.world.emit(Notification::NoLauncherSelected);
            }
        }
    }

    fn check_game_over(&mut self) {
        let remaining = self.structures.remaining(&self.world.arena);
        if !self.game_over.observe(remaining) {
            return;
        }

        self.launchers.stop_fire_all(&mut self.world);
        self.spawner.disable();
        self.clock.begin_ending();

        let waves_survived = self.waves.current() - 1;
        info!(score = self.world.score, waves_survived, "game over");
        self.world.emit(Notification::GameOver {
            score: self.world.score,
            waves_survived,
        });
    }

    fn check_wave_cleared(&mut self) {
        let cleared = WaveProgression::is_cleared(
            self.spawner.is_exhausted(),
            self.world.live_missiles(),
            self.world.live_explosions(),
        );
        if !cleared || self.game_over.is_tripped() {
            return;
        }

        let params = self.waves.advance(&self.config.waves);
        self.spawner.load(params, &mut self.rng);
        self.launchers.resupply_and_repair_all(&mut self.world);

        info!(
            wave = params.wave,
            quantity = params.spawn_quantity,
            speed = params.missile_speed,
            "wave advanced"
        );
        self.world.emit(Notification::WaveAdvanced { wave: params.wave });
    }

    fn update_clock(&mut self, raw_dt: f32) {
        if self.game_over.is_tripped() {
            let settled = self.world.player_missiles() == 0 && self.world.combos.is_empty();
            self.clock.ease_ending(raw_dt, settled);
            return;
        }

        let all_out = self.launchers.all_out(&self.world.arena);
        if let Some(active) = self.clock.set_fast_forward(all_out) {
            debug!(active, scale = self.clock.scale(), "fast-forward changed");
            self.world.emit(Notification::FastForwardChanged { active });
        }
    }

    /// Entity registry.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.world.arena
    }

    /// Shared world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world state, for hosts and tests that stage scenarios.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Player score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.world.score
    }

    /// Current wave number, starting at 1.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.waves.current()
    }

    /// Completed ticks.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.world.tick()
    }

    /// Time-scale state.
    #[must_use]
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// The player's launchers.
    #[must_use]
    pub const fn launchers(&self) -> &LauncherBank {
        &self.launchers
    }

    /// The defended structures.
    #[must_use]
    pub const fn structures(&self) -> &DestructibleTracker {
        &self.structures
    }

    /// The enemy spawner.
    #[must_use]
    pub const fn spawner(&self) -> &MissileSpawner {
        &self.spawner
    }

    /// Returns true once every structure has fallen.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over.is_tripped()
    }

    /// Takes every pending notification.
    pub fn take_events(&mut self) -> Vec<EventRecord> {
        self.world.events.take_events()
    }

    /// Forwards every pending notification to `sink`.
    pub fn drain_into<S: NotificationSink + ?Sized>(&mut self, sink: &mut S) {
        self.world.events.drain_into(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LauncherConfig;
    use crate::error::CoreError;

    #[test]
    fn construction_spawns_launchers_and_structures() {
        let sim = Simulation::new(GameConfig::default()).unwrap();
        assert_eq!(sim.launchers().ids().len(), 3);
        assert_eq!(sim.structures().remaining(sim.arena()), 6);
        assert_eq!(sim.wave(), 1);
        assert_eq!(sim.spawner().remaining(), 20);
        assert!(!sim.is_game_over());
    }

    #[test]
    fn construction_rejects_missing_launchers() {
        let config = GameConfig {
            launchers: Vec::new(),
            ..GameConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(CoreError::MissingReference("launcher"))
        ));
    }

    #[test]
    fn press_on_launcher_selects_it() {
        let mut sim = Simulation::new(GameConfig::default()).unwrap();
        let target = sim.launchers().ids()[1];
        sim.pointer_activated(LauncherConfig::default().position);
        sim.advance(0.01);
        assert_eq!(sim.launchers().selected(sim.arena()), Some(target));
    }

    #[test]
    fn press_without_selection_is_reported() {
        let mut sim = Simulation::new(GameConfig::default()).unwrap();
        sim.take_events();
        sim.pointer_activated(Vec2::new(0.0, 5.0));
        sim.advance(0.01);
        let events = sim.take_events();
        assert!(events
            .iter()
            .any(|r| r.notification == Notification::NoLauncherSelected));
        assert_eq!(sim.world().player_missiles(), 0);
    }

    #[test]
    fn tick_counter_advances() {
        let mut sim = Simulation::new(GameConfig::default()).unwrap();
        sim.advance(0.01);
        sim.advance(0.01);
        assert_eq!(sim.tick(), 2);
    }
}
