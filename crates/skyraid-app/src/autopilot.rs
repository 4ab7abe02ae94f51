//! Autopilot: flies the user plane from snapshots for headless runs.
//!
//! Lines the plane up with the nearest hostile ahead of it and keeps the
//! trigger held; the level's fire cooldown sets the actual rate.

use skyraid_core::commands::PlayerCommand;
use skyraid_core::enums::{Direction, EntityKind, RunState};
use skyraid_core::state::{EntityView, GameStateSnapshot};

/// Vertical offset (pixels) treated as lined up.
const ALIGN_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    tolerance: f64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            tolerance: ALIGN_TOLERANCE,
        }
    }
}

impl Autopilot {
    /// Commands for the next tick. Nothing while the level is not running.
    pub fn decide(&self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        if snapshot.state != RunState::Running {
            return Vec::new();
        }
        let Some(user) = snapshot
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::UserPlane)
        else {
            return Vec::new();
        };

        let target = snapshot
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::EnemyPlane | EntityKind::Boss))
            .filter(|e| e.position.x > user.position.x)
            .min_by(|a, b| a.position.x.total_cmp(&b.position.x));

        let Some(target) = target else {
            return vec![PlayerCommand::StopVertical];
        };

        let dy = centre_y(target) - centre_y(user);
        let steer = if dy < -self.tolerance {
            PlayerCommand::Move {
                direction: Direction::Up,
            }
        } else if dy > self.tolerance {
            PlayerCommand::Move {
                direction: Direction::Down,
            }
        } else {
            PlayerCommand::StopVertical
        };

        vec![steer, PlayerCommand::Fire]
    }
}

fn centre_y(entity: &EntityView) -> f64 {
    entity.position.y + entity.size.height / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyraid_core::config::LevelId;
    use skyraid_core::state::UserView;
    use skyraid_core::types::{EntityId, Position, SimTime, Size};

    fn view(id: u32, kind: EntityKind, x: f64, y: f64) -> EntityView {
        EntityView {
            id: EntityId(id),
            kind,
            position: Position::new(x, y),
            size: Size::new(110.0, 50.0),
        }
    }

    fn snapshot(state: RunState, entities: Vec<EntityView>) -> GameStateSnapshot {
        GameStateSnapshot {
            time: SimTime::default(),
            level: LevelId::new("level-one"),
            background: "Background1".into(),
            state,
            entities,
            user: UserView::default(),
            boss: None,
            events: Vec::new(),
            lifecycle: None,
        }
    }

    fn up() -> PlayerCommand {
        PlayerCommand::Move {
            direction: Direction::Up,
        }
    }

    fn down() -> PlayerCommand {
        PlayerCommand::Move {
            direction: Direction::Down,
        }
    }

    #[test]
    fn test_climbs_towards_higher_enemy() {
        let snap = snapshot(
            RunState::Running,
            vec![
                view(1, EntityKind::UserPlane, 5.0, 300.0),
                view(2, EntityKind::EnemyPlane, 900.0, 100.0),
            ],
        );
        assert_eq!(
            Autopilot::default().decide(&snap),
            vec![up(), PlayerCommand::Fire]
        );
    }

    #[test]
    fn test_targets_nearest_enemy_ahead() {
        let snap = snapshot(
            RunState::Running,
            vec![
                view(1, EntityKind::UserPlane, 200.0, 300.0),
                // Behind the user: ignored
                view(2, EntityKind::EnemyPlane, 100.0, 100.0),
                view(3, EntityKind::EnemyPlane, 1500.0, 100.0),
                view(4, EntityKind::EnemyPlane, 700.0, 600.0),
            ],
        );
        assert_eq!(
            Autopilot::default().decide(&snap),
            vec![down(), PlayerCommand::Fire]
        );
    }

    #[test]
    fn test_holds_altitude_when_aligned() {
        let snap = snapshot(
            RunState::Running,
            vec![
                view(1, EntityKind::UserPlane, 5.0, 300.0),
                view(2, EntityKind::EnemyPlane, 900.0, 305.0),
            ],
        );
        assert_eq!(
            Autopilot::default().decide(&snap),
            vec![PlayerCommand::StopVertical, PlayerCommand::Fire]
        );
    }

    #[test]
    fn test_idle_without_targets() {
        let snap = snapshot(
            RunState::Running,
            vec![
                view(1, EntityKind::UserPlane, 5.0, 300.0),
                view(2, EntityKind::EnemyProjectile, 900.0, 305.0),
            ],
        );
        assert_eq!(
            Autopilot::default().decide(&snap),
            vec![PlayerCommand::StopVertical]
        );
    }

    #[test]
    fn test_silent_unless_running() {
        let entities = vec![
            view(1, EntityKind::UserPlane, 5.0, 300.0),
            view(2, EntityKind::EnemyPlane, 900.0, 100.0),
        ];
        for state in [RunState::Paused, RunState::Lost, RunState::Transitioning] {
            let snap = snapshot(state, entities.clone());
            assert!(Autopilot::default().decide(&snap).is_empty());
        }
        // Destroyed user plane is omitted from the snapshot
        let snap = snapshot(RunState::Running, entities[1..].to_vec());
        assert!(Autopilot::default().decide(&snap).is_empty());
    }
}
