//! Per-tick systems.
//!
//! Each system walks a sorted snapshot of the IDs it owns, taken at the start
//! of its phase. Entities spawned during the phase wait for the next tick and
//! entities destroyed during the phase are skipped.
//!
//! - [`missile`]: flight, arrival, structure and boundary collisions, cluster
//!   splits, age-out
//! - [`explosion`]: radius lifecycle and area effects, including combo kills

pub mod explosion;
pub mod missile;
