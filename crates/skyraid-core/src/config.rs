//! Per-level configuration supplied by the campaign layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ENEMY_SPAWN_BAND_MARGIN, SPAWN_EXCLUSION_Y};
use crate::enums::ShieldBreakPolicy;
use crate::error::ConfigError;
use crate::types::Screen;

/// Level identifier, resolved by the campaign registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub String);

impl LevelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the player must do to clear a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Objective {
    /// Shoot down this many fighters.
    KillTarget { kills: u32 },
    /// Spawn the boss and destroy it.
    DefeatBoss {
        #[serde(default)]
        shield_break: ShieldBreakPolicy,
    },
}

/// Parameters for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: LevelId,
    /// Background identity, opaque to the simulation.
    pub background: String,
    /// Concurrent enemies the spawn controller tops up to.
    pub target_enemies: u32,
    /// Per-slot Bernoulli probability of a spawn attempt.
    pub spawn_probability: f64,
    pub objective: Objective,
    pub player_health: u32,
    /// `None` for the final level.
    #[serde(default)]
    pub next_level: Option<LevelId>,
    #[serde(default)]
    pub screen: Screen,
}

impl LevelConfig {
    /// Vertical band enemies spawn in: `[0, band)`.
    pub fn spawn_band(&self) -> f64 {
        self.screen.height - ENEMY_SPAWN_BAND_MARGIN
    }

    /// Kill target, if the objective has one.
    pub fn kill_target(&self) -> Option<u32> {
        match self.objective {
            Objective::KillTarget { kills } => Some(kills),
            Objective::DefeatBoss { .. } => None,
        }
    }

    pub fn has_boss(&self) -> bool {
        matches!(self.objective, Objective::DefeatBoss { .. })
    }

    /// Reject parameters that would misbehave mid-tick.
    ///
    /// The spawn controller retries a rejected placement without a cap, so a
    /// budget must leave free room in the band even when every other enemy
    /// sits in the spawn column: each existing enemy blocks a `2 * 50` px
    /// window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.id.0.clone();

        if self.target_enemies == 0 {
            return Err(ConfigError::NoEnemies { level });
        }
        if !(self.spawn_probability > 0.0 && self.spawn_probability <= 1.0) {
            return Err(ConfigError::SpawnProbability {
                level,
                probability: self.spawn_probability,
            });
        }
        if self.kill_target() == Some(0) {
            return Err(ConfigError::NoKillTarget { level });
        }
        if self.player_health == 0 {
            return Err(ConfigError::NoPlayerHealth { level });
        }
        if self.screen.width <= 0.0 || self.spawn_band() <= 0.0 {
            return Err(ConfigError::Screen {
                level,
                width: self.screen.width,
                height: self.screen.height,
            });
        }

        let band = self.spawn_band();
        let blocked = f64::from(self.target_enemies - 1) * 2.0 * SPAWN_EXCLUSION_Y;
        if blocked >= band {
            return Err(ConfigError::SpawnBudget {
                level,
                target: self.target_enemies,
                band,
            });
        }

        Ok(())
    }
}
