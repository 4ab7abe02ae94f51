//! Error types for configuration and simulation invariants.

use thiserror::Error;

use crate::enums::EntityKind;
use crate::enums::RunState;
use crate::types::EntityId;

/// Invalid level parameters. Raised at level construction, never mid-tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("level `{level}`: target enemy count must be at least 1")]
    NoEnemies { level: String },

    #[error("level `{level}`: spawn probability {probability} is outside (0, 1]")]
    SpawnProbability { level: String, probability: f64 },

    #[error("level `{level}`: kill target must be at least 1")]
    NoKillTarget { level: String },

    #[error("level `{level}`: player health must be at least 1")]
    NoPlayerHealth { level: String },

    #[error("level `{level}`: screen {width}x{height} is too small")]
    Screen {
        level: String,
        width: f64,
        height: f64,
    },

    #[error(
        "level `{level}`: {target} concurrent enemies cannot always be placed in a {band}px spawn band"
    )]
    SpawnBudget { level: String, target: u32, band: f64 },
}

/// Invariant violations: programming errors surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("{kind:?} {id:?} cannot fire projectiles")]
    ProjectileCannotFire { id: EntityId, kind: EntityKind },

    #[error("{kind:?} {id:?} took damage after it was destroyed")]
    DamagedAfterDestroyed { id: EntityId, kind: EntityKind },

    #[error("finish_transition called while the level is {state:?}")]
    NotTransitioning { state: RunState },

    #[error("the exit window of this level was already closed")]
    TransitionFinished,
}
