//! Game configuration.
//!
//! Everything tunable lives in [`GameConfig`], deserialized from JSON with
//! `serde`. Every struct implements `Default` with the classic layout (three
//! launchers, six cities) and missing JSON fields fall back to those defaults.
//!
//! Validation happens once, in [`GameConfig::validate`], which
//! [`Simulation::new`](crate::simulation::Simulation::new) calls before
//! building anything.
//!
//! ```
//! use intercept_core::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "seed": 7 }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.launchers.len(), 3);
//! ```

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::ClockConfig;
use crate::entity::Payload;
use crate::error::{CoreError, Result};
use crate::geometry::Rect;
use crate::launcher::LauncherCollision;
use crate::spawner::SpawnerConfig;
use crate::wave::WaveCurve;

/// One launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Base position.
    pub position: Vec2,
    /// Magazine size.
    pub capacity: u32,
    /// Interceptor speed.
    pub launch_speed: f32,
    /// Height of the muzzle above the base position.
    pub tip_offset: f32,
    /// Presses below this height never fire.
    pub no_fire_below_y: f32,
    /// Footprint radius for hit-testing and collisions.
    pub collider_radius: f32,
    /// Fraction of capacity at or below which the low-ammo alert fires.
    pub low_ammo_fraction: f32,
    /// Interceptor warhead.
    pub interceptor: Payload,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(0.0, -4.2),
            capacity: 10,
            launch_speed: 8.0,
            tip_offset: 0.5,
            no_fire_below_y: -1.0,
            collider_radius: 0.6,
            low_ammo_fraction: 0.4,
            interceptor: Payload {
                explosion_radius: 1.5,
                growth_rate: 2.0,
                shrink_rate: 2.0,
                base_score: 0,
            },
        }
    }
}

impl LauncherConfig {
    /// Default launcher at `position`.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// One city or building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestructibleConfig {
    /// Position.
    pub position: Vec2,
    /// Footprint radius.
    pub radius: f32,
}

impl Default for DestructibleConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(0.0, -4.5),
            radius: 0.6,
        }
    }
}

impl DestructibleConfig {
    /// Default structure at `position`.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Cluster missile behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Shortest fuse in seconds.
    pub min_fuse: f32,
    /// Longest fuse in seconds.
    pub max_fuse: f32,
    /// Fewest missiles released.
    pub min_children: u32,
    /// Upper bound on missiles released (exclusive).
    pub max_children: u32,
    /// Smallest heading change of a released missile, in degrees.
    pub min_spread_degrees: f32,
    /// Largest heading change of a released missile, in degrees.
    pub max_spread_degrees: f32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_fuse: 3.0,
            max_fuse: 6.0,
            min_children: 2,
            max_children: 5,
            min_spread_degrees: -30.0,
            max_spread_degrees: 30.0,
        }
    }
}

/// Enemy ordnance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileConfig {
    /// Warhead of regular enemy missiles and cluster children.
    pub enemy_payload: Payload,
    /// Warhead of cluster missiles.
    pub cluster_payload: Payload,
    /// Seconds before an enemy missile is removed.
    pub enemy_age_limit: f32,
    /// Footprint radius of enemy missiles.
    pub collider_radius: f32,
    /// Cluster behavior.
    pub cluster: ClusterConfig,
}

impl Default for MissileConfig {
    fn default() -> Self {
        Self {
            enemy_payload: Payload {
                explosion_radius: 0.8,
                growth_rate: 1.6,
                shrink_rate: 1.6,
                base_score: 10,
            },
            cluster_payload: Payload {
                explosion_radius: 1.0,
                growth_rate: 1.6,
                shrink_rate: 1.6,
                base_score: 25,
            },
            enemy_age_limit: 20.0,
            collider_radius: 0.1,
            cluster: ClusterConfig::default(),
        }
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed. Same seed and inputs replay the same game.
    pub seed: u64,
    /// Playfield. Enemy missiles leaving it detonate.
    pub bounds: Rect,
    /// Launchers, in selection order.
    pub launchers: Vec<LauncherConfig>,
    /// Which launcher states still collide.
    pub launcher_collision: LauncherCollision,
    /// Cities and buildings.
    pub destructibles: Vec<DestructibleConfig>,
    /// Enemy ordnance.
    pub missiles: MissileConfig,
    /// Spawn area and heading spread.
    pub spawner: SpawnerConfig,
    /// Difficulty curve.
    pub waves: WaveCurve,
    /// Time-scale policy.
    pub clock: ClockConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            bounds: Rect::new(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 10.0)),
            launchers: [-7.0, 0.0, 7.0]
                .into_iter()
                .map(|x| LauncherConfig::at(Vec2::new(x, -4.2)))
                .collect(),
            launcher_collision: LauncherCollision::default(),
            destructibles: [-5.0, -3.5, -2.0, 2.0, 3.5, 5.0]
                .into_iter()
                .map(|x| DestructibleConfig::at(Vec2::new(x, -4.5)))
                .collect(),
            missiles: MissileConfig::default(),
            spawner: SpawnerConfig::default(),
            waves: WaveCurve::default(),
            clock: ClockConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] for malformed JSON and any error from
    /// [`GameConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be read, otherwise as
    /// [`GameConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that the configuration describes a playable game.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MissingReference`] if there is no launcher or no
    ///   destructible.
    /// - [`CoreError::InvalidConfig`] for inverted rectangles or ranges,
    ///   empty magazines, non-positive speeds or radii, and invalid waves or
    ///   clock settings.
    pub fn validate(&self) -> Result<()> {
        if self.launchers.is_empty() {
            return Err(CoreError::MissingReference("launcher"));
        }
        if self.destructibles.is_empty() {
            return Err(CoreError::MissingReference("destructible"));
        }
        if !self.bounds.is_valid() {
            return Err(invalid("bounds min must not exceed max"));
        }
        if !self.spawner.area.is_valid() {
            return Err(invalid("spawn area min must not exceed max"));
        }
        if !self.bounds.contains(self.spawner.area.min) || !self.bounds.contains(self.spawner.area.max) {
            return Err(invalid("spawn area must lie inside the bounds"));
        }
        if self.spawner.min_deviation_degrees > self.spawner.max_deviation_degrees {
            return Err(invalid("spawn deviation range is inverted"));
        }

        for (index, launcher) in self.launchers.iter().enumerate() {
            if launcher.capacity == 0 {
                return Err(invalid(format!("launcher {index} has no capacity")));
            }
            if !(launcher.launch_speed > 0.0) {
                return Err(invalid(format!("launcher {index} launch speed must be positive")));
            }
            if !(0.0..=1.0).contains(&launcher.low_ammo_fraction) {
                return Err(invalid(format!("launcher {index} low-ammo fraction must be within [0, 1]")));
            }
            if launcher.collider_radius < 0.0 {
                return Err(invalid(format!("launcher {index} collider radius is negative")));
            }
            validate_payload(&launcher.interceptor, "interceptor")?;
        }
        for (index, structure) in self.destructibles.iter().enumerate() {
            if structure.radius < 0.0 {
                return Err(invalid(format!("destructible {index} radius is negative")));
            }
        }

        let missiles = &self.missiles;
        validate_payload(&missiles.enemy_payload, "enemy")?;
        validate_payload(&missiles.cluster_payload, "cluster")?;
        if !(missiles.enemy_age_limit > 0.0) {
            return Err(invalid("enemy age limit must be positive"));
        }
        if missiles.collider_radius < 0.0 {
            return Err(invalid("missile collider radius is negative"));
        }
        let cluster = &missiles.cluster;
        if cluster.min_fuse < 0.0 || cluster.min_fuse > cluster.max_fuse {
            return Err(invalid("cluster fuse range is invalid"));
        }
        if cluster.min_children > cluster.max_children {
            return Err(invalid("cluster children range is inverted"));
        }
        if cluster.min_spread_degrees > cluster.max_spread_degrees {
            return Err(invalid("cluster spread range is inverted"));
        }

        self.waves.validate()?;
        self.clock.validate()
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::InvalidConfig(message.into())
}

fn validate_payload(payload: &Payload, name: &str) -> Result<()> {
    if !(payload.explosion_radius > 0.0 && payload.growth_rate > 0.0 && payload.shrink_rate > 0.0) {
        return Err(invalid(format!(
            "{name} payload radius and rates must be positive"
        )));
    }
    Ok(())
}

// =============================================================================
// Preferences
// =============================================================================

/// Player preferences read once at startup.
///
/// The simulation never reads these; the host uses them to decide how to
/// render notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Pulse the device on impacts.
    pub use_vibration: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            use_vibration: true,
        }
    }
}

impl Preferences {
    /// Parses preferences from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] for malformed JSON or wrongly typed values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads preferences from `path`, falling back to the defaults when the
    /// file is missing or unreadable.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(CoreError::from)
            .and_then(|text| Self::from_json_str(&text));
        match loaded {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "using default preferences");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod game_config_tests {
        use super::*;

        #[test]
        fn default_config_is_valid() {
            assert!(GameConfig::default().validate().is_ok());
        }

        #[test]
        fn default_layout() {
            let config = GameConfig::default();
            assert_eq!(config.launchers.len(), 3);
            assert_eq!(config.destructibles.len(), 6);
            assert_eq!(config.launchers[0].capacity, 10);
        }

        #[test]
        fn json_round_trip() {
            let config = GameConfig {
                seed: 99,
                ..GameConfig::default()
            };
            let json = serde_json::to_string(&config).unwrap();
            let parsed = GameConfig::from_json_str(&json).unwrap();
            assert_eq!(parsed, config);
        }

        #[test]
        fn partial_json_uses_defaults() {
            let parsed = GameConfig::from_json_str(
                r#"{ "clock": { "fast_forward_scale": 3.0 }, "launchers": [ { "capacity": 4 } ] }"#,
            )
            .unwrap();
            assert!((parsed.clock.fast_forward_scale - 3.0).abs() < f32::EPSILON);
            assert!((parsed.clock.ending_ease_rate - 0.2).abs() < f32::EPSILON);
            assert_eq!(parsed.launchers.len(), 1);
            assert_eq!(parsed.launchers[0].capacity, 4);
            assert!((parsed.launchers[0].low_ammo_fraction - 0.4).abs() < f32::EPSILON);
        }

        #[test]
        fn missing_launchers_is_a_missing_reference() {
            let config = GameConfig {
                launchers: Vec::new(),
                ..GameConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(CoreError::MissingReference("launcher"))
            ));
        }

        #[test]
        fn missing_destructibles_is_a_missing_reference() {
            let config = GameConfig {
                destructibles: Vec::new(),
                ..GameConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(CoreError::MissingReference("destructible"))
            ));
        }

        #[test]
        fn empty_magazine_is_invalid() {
            let mut config = GameConfig::default();
            config.launchers[1].capacity = 0;
            assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
        }

        #[test]
        fn inverted_cluster_range_is_invalid() {
            let mut config = GameConfig::default();
            config.missiles.cluster.min_children = 6;
            assert!(config.validate().is_err());
        }

        #[test]
        fn spawn_area_outside_bounds_is_invalid() {
            let mut config = GameConfig::default();
            config.spawner.area.max.y = 50.0;
            assert!(config.validate().is_err());
        }

        #[test]
        fn malformed_json_is_a_parse_error() {
            assert!(matches!(
                GameConfig::from_json_str("{ seed: }"),
                Err(CoreError::Parse(_))
            ));
        }

        #[test]
        fn missing_file_is_an_io_error() {
            assert!(matches!(
                GameConfig::from_path("/nonexistent/intercept.json"),
                Err(CoreError::Io(_))
            ));
        }
    }

    mod preferences_tests {
        use super::*;

        #[test]
        fn vibration_defaults_on() {
            assert!(Preferences::default().use_vibration);
            assert!(Preferences::from_json_str("{}").unwrap().use_vibration);
        }

        #[test]
        fn explicit_value_is_read() {
            let prefs = Preferences::from_json_str(r#"{ "use_vibration": false }"#).unwrap();
            assert!(!prefs.use_vibration);
        }

        #[test]
        fn wrongly_typed_value_is_rejected() {
            assert!(Preferences::from_json_str(r#"{ "use_vibration": 3 }"#).is_err());
        }

        #[test]
        fn unreadable_file_falls_back() {
            let prefs = Preferences::load_or_default("/nonexistent/prefs.json");
            assert_eq!(prefs, Preferences::default());
        }
    }
}
