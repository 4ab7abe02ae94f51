//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Top-level run state of a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Constructed, waiting for `start`.
    #[default]
    NotStarted,
    Running,
    Paused,
    /// The user plane was destroyed.
    Lost,
    /// Final objective met; no further level.
    Won,
    /// Objective met; exit window open before the next level.
    Transitioning,
}

impl RunState {
    /// Whether ticking has permanently stopped for this level instance.
    pub fn is_over(self) -> bool {
        matches!(self, RunState::Lost | RunState::Won | RunState::Transitioning)
    }
}

/// Visual-kind tag attached to every entity in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    UserPlane,
    EnemyPlane,
    Boss,
    UserProjectile,
    EnemyProjectile,
    BossProjectile,
}

impl EntityKind {
    pub fn is_projectile(self) -> bool {
        matches!(
            self,
            EntityKind::UserProjectile | EntityKind::EnemyProjectile | EntityKind::BossProjectile
        )
    }
}

/// Movement direction for the user plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Boss shield phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldPhase {
    #[default]
    Inactive,
    Active,
    Cooldown,
}

/// What happens when an active shield is shot down to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldBreakPolicy {
    /// The shield never comes back.
    #[default]
    Permanent,
    /// The shield goes through one cooldown cycle and may return.
    CooldownOnly,
}

/// Result of applying one unit of damage to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// A shield took the hit; hull untouched.
    Absorbed,
    /// Hull damaged, still flying.
    Damaged,
    /// This hit destroyed the entity. Reported exactly once per entity.
    Destroyed,
}
