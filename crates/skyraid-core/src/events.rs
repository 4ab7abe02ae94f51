//! Events emitted by the simulation for audio, UI and navigation.

use serde::{Deserialize, Serialize};

use crate::config::LevelId;
use crate::types::EntityId;

/// Per-tick feedback events for the rendering and audio collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// The user fired; play the shot cue at this volume.
    ShotFired { volume: f64 },
    /// A fighter was shot down or rammed while on screen.
    EnemyDestroyed { id: EntityId },
    /// Any debug highlight attached to this entity should be removed.
    HighlightRemoved { id: EntityId },
    /// The user plane took a hit.
    PlayerHit { remaining_health: u32 },
    ShieldActivated,
    /// The active shield absorbed a hit.
    ShieldHit { remaining: u32 },
    /// The shield went down, by timeout or by damage.
    ShieldDeactivated { broken: bool },
    BossDefeated,
}

/// Navigation events surfaced to the level-selection collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LifecycleEvent {
    /// The level's objective was met. `next` is `None` after the final level.
    LevelComplete { next: Option<LevelId> },
    PlayerDefeated,
}
