//! Boss behaviour for SKYRAID.
//!
//! Implements the boss movement pattern, the shield sub-state machine and
//! shield-aware damage routing as pure functions over plain data.

pub mod fsm;
pub mod movement;

pub use skyraid_core as core;
