//! Logical commands sent from the input layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::Direction;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Flight ---
    /// Start moving in a direction (replaces the intent on that axis).
    Move { direction: Direction },
    /// Zero the vertical intent.
    StopVertical,
    /// Zero the horizontal intent.
    StopHorizontal,
    /// Fire a shot, subject to the cooldown.
    Fire,

    // --- Level control ---
    /// Begin ticking a freshly constructed level.
    Start,
    TogglePause,
    Pause,
    Resume,
    /// Rebuild the level from its configuration and run it again.
    Restart,

    // --- Audio bridge ---
    /// Set the shot cue volume (clamped to 0.0 - 1.0).
    SetVolume { volume: f64 },
}
