//! Wave progression.
//!
//! Difficulty is a pure function of the wave number. Each axis is a
//! [`Ramp`]: a linear step per wave from a starting value toward a limit,
//! clamped so it never passes the limit. [`WaveCurve::parameters`] evaluates
//! every axis for one wave; [`WaveProgression`] decides when the next wave may
//! start.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Bounded linear interpolation over wave numbers.
///
/// `value(wave) = clamp(from ± step * (wave - 1))`, moving from `from` toward
/// `to` and never beyond it.
///
/// ```
/// use intercept_core::wave::Ramp;
///
/// let quantity = Ramp::new(20.0, 35.0, 2.0);
/// assert_eq!(quantity.value(1), 20.0);
/// assert_eq!(quantity.value(5), 28.0);
/// assert_eq!(quantity.value(50), 35.0);
///
/// let delay = Ramp::new(1.0, 0.4, 0.1);
/// assert_eq!(delay.value(100), 0.4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    /// Value on wave 1.
    pub from: f32,
    /// Limit approached as waves increase.
    pub to: f32,
    /// Change per wave, applied toward `to`.
    pub step: f32,
}

impl Ramp {
    /// Creates a ramp.
    #[must_use]
    pub const fn new(from: f32, to: f32, step: f32) -> Self {
        Self { from, to, step }
    }

    /// Returns true if the ramp increases with the wave number.
    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.to >= self.from
    }

    /// Lower bound of the ramp.
    #[must_use]
    pub fn lower(&self) -> f32 {
        self.from.min(self.to)
    }

    /// Upper bound of the ramp.
    #[must_use]
    pub fn upper(&self) -> f32 {
        self.from.max(self.to)
    }

    /// Unclamped value for `wave`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn raw(&self, wave: u32) -> f32 {
        let offset = self.step.abs() * wave.saturating_sub(1) as f32;
        if self.is_rising() {
            self.from + offset
        } else {
            self.from - offset
        }
    }

    /// Clamped value for `wave`.
    #[must_use]
    pub fn value(&self, wave: u32) -> f32 {
        self.raw(wave).clamp(self.lower(), self.upper())
    }

    /// Returns true once the unclamped value has reached the limit.
    #[must_use]
    pub fn is_saturated(&self, wave: u32) -> bool {
        if self.is_rising() {
            self.raw(wave) >= self.to
        } else {
            self.raw(wave) <= self.to
        }
    }

    fn validate(&self, axis: &str) -> Result<()> {
        if !(self.from.is_finite() && self.to.is_finite() && self.step.is_finite()) {
            return Err(CoreError::InvalidConfig(format!("{axis} ramp must be finite")));
        }
        if self.step < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "{axis} ramp step must be non-negative, got {}",
                self.step
            )));
        }
        Ok(())
    }
}

/// Spawner settings for one wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParameters {
    /// Wave number, starting at 1.
    pub wave: u32,
    /// Enemy missiles the spawner issues this wave.
    pub spawn_quantity: u32,
    /// Shortest delay between spawns in seconds.
    pub min_spawn_delay: f32,
    /// Longest delay between spawns in seconds.
    pub max_spawn_delay: f32,
    /// Chance a spawn is a cluster missile.
    pub cluster_chance: f32,
    /// Roll threshold below which a spawn is a regular missile.
    pub regular_chance: f32,
    /// Enemy missile speed.
    pub missile_speed: f32,
}

/// Difficulty curve: one [`Ramp`] per spawner axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveCurve {
    /// Missiles per wave (floored).
    pub spawn_quantity: Ramp,
    /// Shortest spawn delay.
    pub min_spawn_delay: Ramp,
    /// Longest spawn delay.
    pub max_spawn_delay: Ramp,
    /// Cluster missile chance.
    pub cluster_chance: Ramp,
    /// Enemy missile speed.
    pub missile_speed: Ramp,
}

impl Default for WaveCurve {
    fn default() -> Self {
        Self {
            spawn_quantity: Ramp::new(20.0, 35.0, 2.0),
            min_spawn_delay: Ramp::new(1.0, 0.4, 0.1),
            max_spawn_delay: Ramp::new(2.0, 1.2, 0.1),
            cluster_chance: Ramp::new(0.0, 0.8, 0.15),
            missile_speed: Ramp::new(1.1, 2.2, 0.15),
        }
    }
}

impl WaveCurve {
    /// Evaluates every axis for `wave`. Wave 0 is treated as wave 1.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn parameters(&self, wave: u32) -> WaveParameters {
        let wave = wave.max(1);
        WaveParameters {
            wave,
            spawn_quantity: self.spawn_quantity.value(wave).floor() as u32,
            min_spawn_delay: self.min_spawn_delay.value(wave),
            max_spawn_delay: self.max_spawn_delay.value(wave),
            cluster_chance: self.cluster_chance.value(wave),
            regular_chance: self.regular_chance(wave),
            missile_speed: self.missile_speed.value(wave),
        }
    }

    /// Regular-missile roll threshold for `wave`.
    ///
    /// Follows `1 - cluster` until the cluster ramp saturates, then holds the
    /// value of the last unsaturated wave.
    #[must_use]
    pub fn regular_chance(&self, wave: u32) -> f32 {
        let ramp = &self.cluster_chance;
        let mut w = wave.max(1);
        while ramp.is_saturated(w) {
            if w == 1 {
                return (1.0 - ramp.upper()).clamp(0.0, 1.0);
            }
            w -= 1;
        }
        (1.0 - ramp.raw(w)).clamp(0.0, 1.0)
    }

    /// Checks every ramp for usable values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] for non-finite or negative steps,
    /// a spawn quantity below one, negative delays, or chances outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        self.spawn_quantity.validate("spawn quantity")?;
        self.min_spawn_delay.validate("min spawn delay")?;
        self.max_spawn_delay.validate("max spawn delay")?;
        self.cluster_chance.validate("cluster chance")?;
        self.missile_speed.validate("missile speed")?;

        if self.spawn_quantity.lower() < 1.0 {
            return Err(CoreError::InvalidConfig(
                "spawn quantity must be at least 1".into(),
            ));
        }
        if self.min_spawn_delay.lower() < 0.0 || self.max_spawn_delay.lower() < 0.0 {
            return Err(CoreError::InvalidConfig("spawn delays must be non-negative".into()));
        }
        if self.cluster_chance.lower() < 0.0 || self.cluster_chance.upper() > 1.0 {
            return Err(CoreError::InvalidConfig(
                "cluster chance must stay within [0, 1]".into(),
            ));
        }
        if self.missile_speed.lower() <= 0.0 {
            return Err(CoreError::InvalidConfig("missile speed must be positive".into()));
        }
        Ok(())
    }
}

/// Tracks the current wave and the condition for starting the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveProgression {
    wave: u32,
}

impl WaveProgression {
    /// Starts at wave 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { wave: 1 }
    }

    /// Current wave number.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.wave
    }

    /// Returns true when the quota is issued and the sky is clear.
    #[must_use]
    pub const fn is_cleared(spawner_exhausted: bool, live_missiles: usize, live_explosions: usize) -> bool {
        spawner_exhausted && live_missiles == 0 && live_explosions == 0
    }

    /// Moves to the next wave and returns its parameters.
    pub fn advance(&mut self, curve: &WaveCurve) -> WaveParameters {
        self.wave += 1;
        curve.parameters(self.wave)
    }
}

impl Default for WaveProgression {
    fn default() -> Self {
        Self::new()
    }
}
