//! Snapshot system: builds a complete GameStateSnapshot from the level's
//! collections.
//!
//! This system is read-only: it never modifies the level.

use skyraid_core::config::LevelConfig;
use skyraid_core::enums::RunState;
use skyraid_core::events::{GameEvent, LifecycleEvent};
use skyraid_core::state::*;
use skyraid_core::types::SimTime;

use crate::entities::{Actor, Boss, Hostile, Projectile, UserPlane};

/// Collections and counters the snapshot is built from.
pub struct SnapshotInput<'a> {
    pub time: SimTime,
    pub config: &'a LevelConfig,
    pub state: RunState,
    pub user: &'a UserPlane,
    pub hostiles: &'a [Hostile],
    pub user_projectiles: &'a [Projectile],
    pub enemy_projectiles: &'a [Projectile],
}

/// Build a complete GameStateSnapshot.
pub fn build_snapshot(
    input: &SnapshotInput<'_>,
    events: Vec<GameEvent>,
    lifecycle: Option<LifecycleEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: input.time,
        level: input.config.id.clone(),
        background: input.config.background.clone(),
        state: input.state,
        entities: build_entities(input),
        user: UserView {
            health: input.user.hull().health,
            max_health: input.user.hull().max_health,
            kills: input.user.kills(),
            kill_target: input.config.kill_target(),
        },
        boss: input.hostiles.iter().find_map(Hostile::as_boss).map(build_boss),
        events,
        lifecycle,
    }
}

/// Live entities, sorted by id so renderers can diff consecutive snapshots.
fn build_entities(input: &SnapshotInput<'_>) -> Vec<EntityView> {
    let user = (!input.user.is_destroyed()).then(|| view(input.user));

    let mut entities: Vec<EntityView> = user
        .into_iter()
        .chain(input.hostiles.iter().map(view))
        .chain(input.user_projectiles.iter().map(view))
        .chain(input.enemy_projectiles.iter().map(view))
        .collect();
    entities.sort_by_key(|entity| entity.id);
    entities
}

fn view<A: Actor>(actor: &A) -> EntityView {
    let body = actor.body();
    EntityView {
        id: body.id,
        kind: body.kind,
        position: body.position,
        size: body.size,
    }
}

fn build_boss(boss: &Boss) -> BossView {
    BossView {
        position: boss.body().position,
        health_percent: boss.health_percent(),
        shield_percent: boss.shield_percent(),
        shield_visible: boss.is_shielded(),
    }
}
