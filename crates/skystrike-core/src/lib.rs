//! Core types and definitions for the SKYSTRIKE simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, tuning configuration, state snapshots, events, and
//! constants. It has no dependency on any runtime framework.

pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
