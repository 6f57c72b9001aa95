//! Whole-simulation tests.
//!
//! - `determinism.rs`: same seed and input script, same game
//! - `integration.rs`: end-to-end scenarios through [`Simulation`](crate::simulation::Simulation)
//! - `helpers.rs`: configurations, input scripts and event queries

mod determinism;
mod helpers;

pub use helpers::*;
