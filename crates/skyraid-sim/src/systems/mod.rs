//! Systems that operate on the level's collections each tick.
//!
//! Systems are free functions over the collections they touch. They own no
//! state; everything lives in the level and its entities.

pub mod cleanup;
pub mod collision;
pub mod progression;
pub mod snapshot;
pub mod spawner;
