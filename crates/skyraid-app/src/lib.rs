//! SKYRAID headless application.
//!
//! This crate wires the simulation crates together: a fixed-cadence game
//! loop thread, the command channel into it, latest-snapshot sharing and an
//! optional autopilot.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use skyraid_core as core;
