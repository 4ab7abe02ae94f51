//! Plain-data state shared between the entity model and behaviour crates.
//!
//! Components carry no logic. Behaviour lives in `skyraid-boss-ai` and
//! `skyraid-sim`.

use serde::{Deserialize, Serialize};

use crate::enums::ShieldPhase;

/// Integer health pool of an armed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hull {
    pub health: u32,
    pub max_health: u32,
}

/// Boss shield sub-state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldState {
    pub phase: ShieldPhase,
    /// Remaining shield hits, always within `0..=BOSS_SHIELD_MAX_HEALTH`.
    pub health: u32,
    /// Ticks since the current activation began.
    pub frames_active: u32,
    /// Ticks left before the shield is eligible again.
    pub cooldown_remaining: u32,
    /// One-way flag: once set the shield never activates again.
    pub broken: bool,
}

/// Shuffled pool of vertical velocities and a cursor into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovePattern {
    pub pool: Vec<f64>,
    pub cursor: usize,
    /// Consecutive ticks spent on the entry under the cursor.
    pub frames_on_move: u32,
}

/// Movement intent multipliers, each in {-1, 0, 1}.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub vertical: i8,
    pub horizontal: i8,
}

impl Hull {
    pub fn new(health: u32) -> Self {
        Self {
            health,
            max_health: health,
        }
    }
}
