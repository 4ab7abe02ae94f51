//! The standard campaign: two kill-target levels followed by the boss.

use skyraid_core::config::{LevelConfig, LevelId, Objective};
use skyraid_core::enums::ShieldBreakPolicy;
use skyraid_core::types::Screen;

pub const LEVEL_ONE: &str = "level-one";
pub const LEVEL_TWO: &str = "level-two";
pub const LEVEL_THREE: &str = "level-three";

pub fn level_one() -> LevelConfig {
    LevelConfig {
        id: LevelId::new(LEVEL_ONE),
        background: "Background1".into(),
        target_enemies: 5,
        spawn_probability: 0.20,
        objective: Objective::KillTarget { kills: 10 },
        player_health: 5,
        next_level: Some(LevelId::new(LEVEL_TWO)),
        screen: Screen::default(),
    }
}

pub fn level_two() -> LevelConfig {
    LevelConfig {
        id: LevelId::new(LEVEL_TWO),
        background: "Background2".into(),
        target_enemies: 8,
        spawn_probability: 0.30,
        objective: Objective::KillTarget { kills: 20 },
        player_health: 5,
        next_level: Some(LevelId::new(LEVEL_THREE)),
        screen: Screen::default(),
    }
}

/// Boss level. The boss is the only enemy, so the spawn target is one.
pub fn level_three() -> LevelConfig {
    LevelConfig {
        id: LevelId::new(LEVEL_THREE),
        background: "Background3".into(),
        target_enemies: 1,
        spawn_probability: 1.0,
        objective: Objective::DefeatBoss {
            shield_break: ShieldBreakPolicy::Permanent,
        },
        player_health: 8,
        next_level: None,
        screen: Screen::default(),
    }
}

/// Constructor for one level of the standard table.
pub type StandardLevel = (&'static str, fn() -> LevelConfig);

/// All standard levels in play order.
pub fn standard() -> [StandardLevel; 3] {
    [
        (LEVEL_ONE, level_one),
        (LEVEL_TWO, level_two),
        (LEVEL_THREE, level_three),
    ]
}
