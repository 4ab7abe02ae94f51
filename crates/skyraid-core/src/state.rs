//! Game state snapshot: the complete visible state published after each tick.

use serde::{Deserialize, Serialize};

use crate::config::LevelId;
use crate::enums::{EntityKind, RunState};
use crate::events::{GameEvent, LifecycleEvent};
use crate::types::{EntityId, Position, SimTime, Size};

/// Complete level state handed to the rendering collaborator after each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub level: LevelId,
    /// Opaque background identity from the level configuration.
    pub background: String,
    pub state: RunState,
    /// Live entities, sorted by id.
    pub entities: Vec<EntityView>,
    pub user: UserView,
    /// Present only on boss levels once the boss has spawned.
    pub boss: Option<BossView>,
    pub events: Vec<GameEvent>,
    pub lifecycle: Option<LifecycleEvent>,
}

/// A live entity on the playfield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub size: Size,
}

/// Player status for the HUD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserView {
    pub health: u32,
    pub max_health: u32,
    pub kills: u32,
    /// Kills required to advance, when the level has a kill target.
    pub kill_target: Option<u32>,
}

/// Boss status for the boss health bar and shield overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub position: Position,
    /// Hull health, 0.0 - 100.0.
    pub health_percent: f64,
    /// Shield health, 0.0 - 100.0.
    pub shield_percent: f64,
    pub shield_visible: bool,
}
