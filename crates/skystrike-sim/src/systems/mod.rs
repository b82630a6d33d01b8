//! Simulation systems, run in a fixed order by the engine each tick.

pub mod ai;
pub mod cleanup;
pub mod flight;
pub mod missile;
pub mod movement;
pub mod snapshot;
pub mod weapons;
