//! Level progression predicate, evaluated once at the end of every tick.

use skyraid_core::config::{LevelConfig, Objective};

use crate::entities::{Actor, Hostile, UserPlane};

/// Result of the end-of-tick evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    /// The user plane was destroyed.
    Lost,
    ObjectiveMet,
}

/// Loss takes precedence over the objective.
pub fn evaluate(
    config: &LevelConfig,
    user: &UserPlane,
    hostiles: &[Hostile],
    boss_spawned: bool,
) -> Verdict {
    if user.is_destroyed() {
        return Verdict::Lost;
    }

    let met = match config.objective {
        Objective::KillTarget { kills } => user.kills() >= kills,
        Objective::DefeatBoss { .. } => boss_spawned && !hostiles.iter().any(Hostile::is_boss),
    };

    if met {
        Verdict::ObjectiveMet
    } else {
        Verdict::Continue
    }
}
