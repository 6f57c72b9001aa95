//! # Intercept Core
//!
//! Deterministic simulation core for Intercept, an arcade missile-defense
//! game.
//!
//! Player launchers fire interceptors at descending enemy missiles before
//! they reach the cities. Interceptor blasts that catch enemy missiles chain
//! into further blasts, and every kill in a chain scores more than the last.
//!
//! ## Architecture
//!
//! - **Arena**: entity storage with sorted overlap queries
//! - **World**: arena, combo ledger, notification log and score, plus the
//!   detonation rules every system shares
//! - **Systems**: missile flight and explosion contact, run once per tick
//! - **Controllers**: launchers, structures, waves, spawner and clock
//! - **Simulation**: owns everything and runs the fixed phase order
//!
//! Presentation, audio and input devices stay outside. They observe the core
//! through [`event::Notification`]s and feed it pointer activations.
//!
//! ## Usage
//!
//! ```rust
//! use glam::Vec2;
//! use intercept_core::{GameConfig, Simulation};
//!
//! let mut sim = Simulation::new(GameConfig::default())?;
//! sim.pointer_activated(Vec2::new(0.0, -4.2)); // select the middle launcher
//! sim.pointer_activated(Vec2::new(0.0, 4.0)); // fire
//! sim.advance(1.0 / 60.0);
//! assert_eq!(sim.world().player_missiles(), 1);
//! # Ok::<(), intercept_core::CoreError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod clock;
pub mod combo;
pub mod config;
pub mod destructible;
pub mod entity;
pub mod error;
pub mod event;
pub mod geometry;
pub mod launcher;
pub mod paging;
pub mod simulation;
pub mod spawner;
pub mod systems;
pub mod wave;
pub mod world;

pub use arena::Arena;
pub use config::{GameConfig, Preferences};
pub use entity::{Entity, EntityId, EntityKind};
pub use error::{CoreError, Result};
pub use event::{EventRecord, Notification, NotificationSink};
pub use simulation::Simulation;

#[cfg(test)]
mod tests;
