//! Simulation engine for SKYRAID.
//!
//! Owns the entity collections of one level, runs the fixed-order tick
//! pipeline and produces `GameStateSnapshot`s for the frontend. Completely
//! headless: an external scheduler calls `Level::tick`.

pub mod clock;
pub mod entities;
pub mod level;
pub mod systems;

pub use level::{Level, SimConfig};
pub use skyraid_core as core;

#[cfg(test)]
mod tests;
