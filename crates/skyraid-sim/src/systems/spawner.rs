//! Spawn controller: tops the enemy collection up to the level's target.

use rand::Rng;

use skyraid_core::config::{LevelConfig, Objective};
use skyraid_core::constants::{SPAWN_EXCLUSION_X, SPAWN_EXCLUSION_Y};
use skyraid_core::error::SimError;
use skyraid_core::types::Position;

use crate::entities::{Actor, Boss, EnemyPlane, Hostile, IdAllocator, Projectile, TickContext};

/// Run the spawn controller for one tick.
///
/// Boss levels place the boss first, once, while the enemy collection is
/// empty. Each missing fighter slot is then retried until it is filled: a
/// failed Bernoulli trial or a position on the right edge that does not
/// clear every existing enemy both draw again. A new fighter immediately
/// attempts its first shot.
pub fn run<R: Rng + ?Sized>(
    config: &LevelConfig,
    hostiles: &mut Vec<Hostile>,
    enemy_projectiles: &mut Vec<Projectile>,
    ids: &mut IdAllocator,
    boss_spawned: &mut bool,
    ctx: &TickContext,
    rng: &mut R,
) -> Result<(), SimError> {
    if let Objective::DefeatBoss { shield_break } = config.objective {
        if !*boss_spawned && hostiles.is_empty() {
            let boss = ids.adopt(Hostile::Boss(Box::new(Boss::new(shield_break, rng))));
            tracing::info!(id = boss.id().0, "boss spawned");
            hostiles.push(boss);
            *boss_spawned = true;
        }
    }

    let deficit = (config.target_enemies as usize).saturating_sub(hostiles.len());
    let band = config.spawn_band();

    for _ in 0..deficit {
        loop {
            if !rng.gen_bool(config.spawn_probability) {
                continue;
            }
            let candidate = Position::new(config.screen.width, rng.gen_range(0.0..band));
            if !placement_clear(hostiles, candidate) {
                continue;
            }

            let mut fighter = ids.adopt(Hostile::Fighter(EnemyPlane::new(candidate)));
            tracing::debug!(id = fighter.id().0, y = candidate.y, "enemy spawned");
            if let Some(shot) = fighter.fire(ctx, rng)? {
                enemy_projectiles.push(ids.adopt(shot));
            }
            hostiles.push(fighter);
            break;
        }
    }

    Ok(())
}

/// Whether `candidate` lies outside the exclusion zone of every enemy.
pub fn placement_clear(hostiles: &[Hostile], candidate: Position) -> bool {
    hostiles.iter().all(|hostile| {
        let pos = hostile.body().position;
        !((pos.x - candidate.x).abs() < SPAWN_EXCLUSION_X
            && (pos.y - candidate.y).abs() < SPAWN_EXCLUSION_Y)
    })
}
