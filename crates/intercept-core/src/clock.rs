//! Global time scale.
//!
//! Every state machine receives `raw_dt * scale`. The scale is 1.0 during
//! normal play, [`ClockConfig::fast_forward_scale`] while the player has no
//! usable launcher, and after game over it eases from 1.0 toward 0 once the
//! last player missile and combo chain have resolved.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Time-scale policy settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Scale applied while every launcher is destroyed or empty.
    pub fast_forward_scale: f32,
    /// Scale lost per real second while the game-over slowdown runs.
    pub ending_ease_rate: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            fast_forward_scale: 2.0,
            ending_ease_rate: 0.2,
        }
    }
}

impl ClockConfig {
    /// Checks the policy values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if fast-forward would slow time
    /// down or the ease rate is negative.
    pub fn validate(&self) -> Result<()> {
        if !(self.fast_forward_scale >= 1.0) {
            return Err(CoreError::InvalidConfig(format!(
                "fast-forward scale must be at least 1.0, got {}",
                self.fast_forward_scale
            )));
        }
        if !(self.ending_ease_rate >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "ending ease rate must be non-negative, got {}",
                self.ending_ease_rate
            )));
        }
        Ok(())
    }
}

/// Current clock regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockMode {
    /// Real time.
    Normal,
    /// Sped up.
    FastForward,
    /// Game over: waiting for the last chain, then slowing to a stop.
    Ending {
        /// True once the slowdown has started.
        easing: bool,
    },
}

/// Owner of the global time scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameClock {
    config: ClockConfig,
    mode: ClockMode,
    scale: f32,
    elapsed: f64,
}

impl GameClock {
    /// Creates a clock running at 1.0.
    #[must_use]
    pub fn new(config: ClockConfig) -> Self {
        Self {
            config,
            mode: ClockMode::Normal,
            scale: 1.0,
            elapsed: 0.0,
        }
    }

    /// Scales a frame delta and accumulates simulated time.
    pub fn scaled(&mut self, raw_dt: f32) -> f32 {
        let dt = raw_dt.max(0.0) * self.scale;
        self.elapsed += f64::from(dt);
        dt
    }

    /// Current multiplier.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Current regime.
    #[must_use]
    pub const fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Simulated seconds since the start of the run.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Returns true while fast-forward is active.
    #[must_use]
    pub fn is_fast_forward(&self) -> bool {
        self.mode == ClockMode::FastForward
    }

    /// Switches fast-forward on or off.
    ///
    /// Returns the new state when it changed. Ignored once the game has ended.
    pub fn set_fast_forward(&mut self, active: bool) -> Option<bool> {
        let next = match (self.mode, active) {
            (ClockMode::Ending { .. }, _)
            | (ClockMode::FastForward, true)
            | (ClockMode::Normal, false) => return None,
            (ClockMode::Normal, true) => (ClockMode::FastForward, self.config.fast_forward_scale),
            (ClockMode::FastForward, false) => (ClockMode::Normal, 1.0),
        };
        self.mode = next.0;
        self.scale = next.1;
        Some(active)
    }

    /// Enters the ending regime. Time keeps its current pace until
    /// [`GameClock::ease_ending`] reports the field as settled.
    pub fn begin_ending(&mut self) {
        if !matches!(self.mode, ClockMode::Ending { .. }) {
            self.mode = ClockMode::Ending { easing: false };
        }
    }

    /// Advances the game-over slowdown by `raw_dt` real seconds.
    ///
    /// Nothing happens until `settled` is true. The first settled call resets
    /// the scale to 1.0; every call after that lowers it toward 0.
    pub fn ease_ending(&mut self, raw_dt: f32, settled: bool) {
        match self.mode {
            ClockMode::Ending { easing: false } if settled => {
                self.mode = ClockMode::Ending { easing: true };
                self.scale = 1.0;
            }
            ClockMode::Ending { easing: true } => {
                self.scale = (self.scale - self.config.ending_ease_rate * raw_dt.max(0.0)).clamp(0.0, 1.0);
            }
            _ => {}
        }
    }
}
