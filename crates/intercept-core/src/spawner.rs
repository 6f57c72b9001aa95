//! Enemy missile spawner.
//!
//! The spawner issues one wave's quota of enemy missiles, one at a time, with
//! a random delay between spawns. Each spawn appears at a random point in the
//! spawn area, heads straight down plus a random deviation, and is a cluster
//! missile when its roll lands above the wave's regular chance.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{sample_between, Rect, HEADING_DOWN};
use crate::wave::WaveParameters;

/// Spawn placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Area new missiles appear in.
    pub area: Rect,
    /// Smallest heading deviation from straight down, in degrees.
    pub min_deviation_degrees: f32,
    /// Largest heading deviation from straight down, in degrees.
    pub max_deviation_degrees: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            area: Rect::new(Vec2::new(-9.0, 9.0), Vec2::new(9.0, 9.5)),
            min_deviation_degrees: -25.0,
            max_deviation_degrees: 25.0,
        }
    }
}

/// A missile the spawner wants created this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    /// Spawn position.
    pub position: Vec2,
    /// Heading in radians.
    pub heading: f32,
    /// Flight speed.
    pub speed: f32,
    /// True for a cluster missile.
    pub cluster: bool,
}

/// Issues the current wave's enemy missiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileSpawner {
    config: SpawnerConfig,
    params: WaveParameters,
    remaining: u32,
    elapsed: f32,
    next_delay: f32,
    enabled: bool,
}

impl MissileSpawner {
    /// Creates a spawner loaded with `params`.
    pub fn new<R: Rng + ?Sized>(config: SpawnerConfig, params: WaveParameters, rng: &mut R) -> Self {
        let mut spawner = Self {
            config,
            params,
            remaining: 0,
            elapsed: 0.0,
            next_delay: 0.0,
            enabled: true,
        };
        spawner.load(params, rng);
        spawner
    }

    /// Loads a new wave and restarts the spawn timer.
    pub fn load<R: Rng + ?Sized>(&mut self, params: WaveParameters, rng: &mut R) {
        self.params = params;
        self.remaining = params.spawn_quantity;
        self.elapsed = 0.0;
        self.next_delay = self.sample_delay(rng);
    }

    fn sample_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        sample_between(rng, self.params.min_spawn_delay, self.params.max_spawn_delay)
    }

    /// Advances the timer. Returns at most one spawn per call.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Option<SpawnRequest> {
        if !self.enabled || self.remaining == 0 {
            return None;
        }
        self.elapsed += dt;
        if self.elapsed < self.next_delay {
            return None;
        }

        self.elapsed = 0.0;
        self.remaining -= 1;
        self.next_delay = self.sample_delay(rng);

        let position = self.config.area.sample(rng);
        let deviation = sample_between(
            rng,
            self.config.min_deviation_degrees.to_radians(),
            self.config.max_deviation_degrees.to_radians(),
        );
        let roll: f32 = rng.gen();
        Some(SpawnRequest {
            position,
            heading: HEADING_DOWN + deviation,
            speed: self.params.missile_speed,
            cluster: roll > self.params.regular_chance,
        })
    }

    /// Returns true once the whole quota has been issued.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Missiles still to be issued this wave.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Parameters of the loaded wave.
    #[must_use]
    pub const fn parameters(&self) -> &WaveParameters {
        &self.params
    }

    /// Stops spawning for good.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Returns true while spawning is allowed.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}
