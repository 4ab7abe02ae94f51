//! Tests for the entity model, collision system, spawn controller and level
//! orchestrator.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skyraid_core::commands::PlayerCommand;
use skyraid_core::config::{LevelConfig, LevelId, Objective};
use skyraid_core::constants::*;
use skyraid_core::enums::*;
use skyraid_core::error::{ConfigError, SimError};
use skyraid_core::events::{GameEvent, LifecycleEvent};
use skyraid_core::types::{EntityId, Position, Screen};

use crate::clock::ManualClock;
use crate::entities::*;
use crate::level::{Level, SimConfig};
use crate::systems::{collision, spawner};

fn kill_level(target_enemies: u32, spawn_probability: f64, kills: u32) -> LevelConfig {
    LevelConfig {
        id: LevelId::new("test-kills"),
        background: "Background1".into(),
        target_enemies,
        spawn_probability,
        objective: Objective::KillTarget { kills },
        player_health: 5,
        next_level: Some(LevelId::new("test-next")),
        screen: Screen::default(),
    }
}

fn boss_level(shield_break: ShieldBreakPolicy) -> LevelConfig {
    LevelConfig {
        id: LevelId::new("test-boss"),
        background: "Background3".into(),
        target_enemies: 1,
        spawn_probability: 1.0,
        objective: Objective::DefeatBoss { shield_break },
        player_health: 8,
        next_level: None,
        screen: Screen::default(),
    }
}

fn new_level(config: LevelConfig, seed: u64) -> (Level, ManualClock) {
    let clock = ManualClock::new();
    let level = Level::new(config, SimConfig { seed }, Arc::new(clock.clone())).unwrap();
    (level, clock)
}

fn running(config: LevelConfig, seed: u64) -> (Level, ManualClock) {
    let (mut level, clock) = new_level(config, seed);
    level.start();
    (level, clock)
}

fn ctx_at(user: Position) -> TickContext {
    TickContext {
        user,
        screen: Screen::default(),
        now: Duration::ZERO,
    }
}

fn user_start() -> Position {
    Position::new(USER_PLANE_INITIAL_X, USER_PLANE_INITIAL_Y)
}

/// Every Bernoulli draw succeeds.
fn always() -> StepRng {
    StepRng::new(0, 0)
}

/// Every Bernoulli draw with p < 1 fails.
fn never() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let (mut level_a, clock_a) = running(kill_level(5, 0.2, 10), 12345);
    let (mut level_b, clock_b) = running(kill_level(5, 0.2, 10), 12345);

    for tick in 0..300 {
        if tick % 7 == 0 {
            level_a.queue_command(PlayerCommand::Fire);
            level_b.queue_command(PlayerCommand::Fire);
        }
        clock_a.advance(TICK_MILLIS);
        clock_b.advance(TICK_MILLIS);

        let snap_a = serde_json::to_string(&level_a.tick().unwrap()).unwrap();
        let snap_b = serde_json::to_string(&level_b.tick().unwrap()).unwrap();
        assert_eq!(snap_a, snap_b, "diverged at tick {tick}");
    }
}

#[test]
fn test_different_seeds_diverge() {
    let (mut level_a, _) = running(kill_level(5, 1.0, 10), 1);
    let (mut level_b, _) = running(kill_level(5, 1.0, 10), 2);

    let snap_a = level_a.tick().unwrap();
    let snap_b = level_b.tick().unwrap();
    let ys = |snap: &skyraid_core::state::GameStateSnapshot| -> Vec<f64> {
        snap.entities
            .iter()
            .filter(|e| e.kind == EntityKind::EnemyPlane)
            .map(|e| e.position.y)
            .collect()
    };
    assert_ne!(ys(&snap_a), ys(&snap_b));
}

// ---- Run state ----

#[test]
fn test_level_waits_for_start() {
    let (mut level, _) = new_level(kill_level(5, 1.0, 10), 1);
    let snap = level.tick().unwrap();
    assert_eq!(snap.state, RunState::NotStarted);
    assert_eq!(snap.time.tick, 0);
    assert!(level.hostiles().is_empty());

    level.queue_command(PlayerCommand::Start);
    let snap = level.tick().unwrap();
    assert_eq!(snap.state, RunState::Running);
    assert_eq!(snap.time.tick, 1);
    assert_eq!(level.hostiles().len(), 5);
}

#[test]
fn test_pause_freezes_level() {
    let (mut level, _) = running(kill_level(5, 0.5, 10), 9);
    for _ in 0..20 {
        level.tick().unwrap();
    }

    level.queue_command(PlayerCommand::TogglePause);
    let paused = level.tick().unwrap();
    assert_eq!(paused.state, RunState::Paused);
    let frozen = serde_json::to_string(&paused.entities).unwrap();

    for _ in 0..10 {
        let snap = level.tick().unwrap();
        assert_eq!(snap.time.tick, paused.time.tick);
        assert_eq!(serde_json::to_string(&snap.entities).unwrap(), frozen);
    }

    level.queue_command(PlayerCommand::Resume);
    let resumed = level.tick().unwrap();
    assert_eq!(resumed.state, RunState::Running);
    assert_eq!(resumed.time.tick, paused.time.tick + 1);
}

#[test]
fn test_fire_ignored_unless_running() {
    let (mut level, _) = new_level(kill_level(5, 0.2, 10), 1);
    level.queue_command(PlayerCommand::Fire);
    level.tick().unwrap();
    assert!(level.user_projectiles().is_empty());

    level.start();
    level.pause();
    level.queue_command(PlayerCommand::Fire);
    level.tick().unwrap();
    assert!(level.user_projectiles().is_empty());
}

#[test]
fn test_restart_rebuilds_level() {
    let (mut level, _) = running(kill_level(5, 0.3, 10), 77);
    let (mut fresh, _) = running(kill_level(5, 0.3, 10), 77);

    for _ in 0..50 {
        level.tick().unwrap();
    }
    level.user_mut().hull.health = 1;
    level.queue_command(PlayerCommand::Restart);
    let snap = level.tick().unwrap();
    let first = fresh.tick().unwrap();

    assert_eq!(snap.state, RunState::Running);
    assert_eq!(snap.user.health, 5);
    assert_eq!(snap.time.tick, 1);
    assert_eq!(
        serde_json::to_string(&snap.entities).unwrap(),
        serde_json::to_string(&first.entities).unwrap()
    );
}

#[test]
fn test_finish_transition_requires_transitioning() {
    let (mut level, _) = running(kill_level(5, 0.2, 10), 1);
    let err = level.finish_transition().unwrap_err();
    assert_eq!(
        err,
        SimError::NotTransitioning {
            state: RunState::Running
        }
    );
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let clock = ManualClock::new();
    let result = Level::new(kill_level(0, 0.2, 10), SimConfig::default(), Arc::new(clock));
    assert!(matches!(result, Err(ConfigError::NoEnemies { .. })));
}

// ---- User plane ----

#[test]
fn test_fire_cooldown() {
    let (mut level, clock) = running(kill_level(1, 0.01, 10), 3);

    level.queue_command(PlayerCommand::Fire);
    let snap = level.tick().unwrap();
    assert_eq!(level.user_projectiles().len(), 1);
    assert!(snap
        .events
        .contains(&GameEvent::ShotFired { volume: USER_PLANE_DEFAULT_VOLUME }));

    clock.advance(100);
    level.queue_command(PlayerCommand::Fire);
    level.tick().unwrap();
    assert_eq!(level.user_projectiles().len(), 1, "fired inside cooldown");

    clock.advance(200);
    level.queue_command(PlayerCommand::Fire);
    level.tick().unwrap();
    assert_eq!(level.user_projectiles().len(), 2);
}

#[test]
fn test_shot_spawns_ahead_of_user() {
    let mut user = UserPlane::new(5);
    let shot = user.fire(&ctx_at(user_start()), &mut always()).unwrap().unwrap();
    assert_eq!(
        shot.body().position,
        Position::new(
            USER_PLANE_INITIAL_X + USER_PLANE_PROJECTILE_X_OFFSET,
            USER_PLANE_INITIAL_Y + USER_PLANE_PROJECTILE_Y_OFFSET
        )
    );
}

#[test]
fn test_muted_shot_emits_no_cue() {
    let (mut level, _) = running(kill_level(1, 0.01, 10), 3);
    level.queue_commands([PlayerCommand::SetVolume { volume: -2.0 }, PlayerCommand::Fire]);
    let snap = level.tick().unwrap();
    assert_eq!(level.user().volume(), 0.0);
    assert_eq!(level.user_projectiles().len(), 1);
    assert!(!snap.events.iter().any(|e| matches!(e, GameEvent::ShotFired { .. })));
}

#[test]
fn test_user_plane_clamped_to_bounds() {
    let mut user = UserPlane::new(5);
    let ctx = ctx_at(user_start());
    let mut rng = always();

    user.steer(Direction::Left);
    user.steer(Direction::Down);
    for _ in 0..200 {
        user.advance(&ctx, &mut rng);
    }
    assert_eq!(user.body().position.x, USER_PLANE_LEFT_BOUND);
    assert_eq!(
        user.body().position.y,
        USER_PLANE_LOWER_BOUND - USER_PLANE_HEIGHT
    );

    user.steer(Direction::Right);
    user.steer(Direction::Up);
    for _ in 0..200 {
        user.advance(&ctx, &mut rng);
    }
    assert_eq!(
        user.body().position.x,
        USER_PLANE_RIGHT_BOUND - USER_PLANE_WIDTH
    );
    assert_eq!(user.body().position.y, USER_PLANE_UPPER_BOUND);

    user.stop_horizontal();
    user.stop_vertical();
    let before = user.body().position;
    user.advance(&ctx, &mut rng);
    assert_eq!(user.body().position, before);
}

// ---- Enemy plane ----

#[test]
fn test_enemy_holds_fire_at_point_blank() {
    let mut enemy = EnemyPlane::new(Position::new(900.0, USER_PLANE_INITIAL_Y + 50.0));
    let shot = enemy.fire(&ctx_at(user_start()), &mut always()).unwrap();
    assert!(shot.is_none());
}

#[test]
fn test_enemy_fires_outside_safety_band() {
    let mut enemy = EnemyPlane::new(Position::new(900.0, USER_PLANE_INITIAL_Y + 150.0));
    let shot = enemy
        .fire(&ctx_at(user_start()), &mut always())
        .unwrap()
        .unwrap();
    assert_eq!(shot.kind(), ProjectileKind::Enemy);
    assert_eq!(
        shot.body().position,
        Position::new(
            900.0 + ENEMY_PLANE_PROJECTILE_X_OFFSET,
            USER_PLANE_INITIAL_Y + 150.0 + ENEMY_PLANE_PROJECTILE_Y_OFFSET
        )
    );

    assert!(enemy.fire(&ctx_at(user_start()), &mut never()).unwrap().is_none());
}

#[test]
fn test_enemy_stops_firing_once_past_user() {
    let mut enemy = EnemyPlane::new(Position::new(500.0, 100.0));
    let ctx = ctx_at(Position::new(600.0, 500.0));
    enemy.advance(&ctx, &mut always());
    assert!(enemy.has_passed_user());
    assert!(enemy.fire(&ctx, &mut always()).unwrap().is_none());
}

#[test]
fn test_enemy_penetration_self_destroys() {
    let ctx = ctx_at(user_start());
    let mut enemy = EnemyPlane::new(Position::new(10.0, 300.0));
    enemy.advance(&ctx, &mut always());
    assert!(!enemy.is_destroyed());
    assert!(!enemy.has_penetrated());

    // Left edge crossed: x = -2
    enemy.advance(&ctx, &mut always());
    assert!(enemy.is_destroyed());
    assert!(enemy.has_penetrated());
}

// ---- Invariant violations ----

#[test]
fn test_damage_after_destroyed_is_error() {
    let mut enemy = EnemyPlane::new(Position::new(900.0, 300.0));
    assert_eq!(enemy.take_damage().unwrap(), DamageOutcome::Destroyed);
    assert!(matches!(
        enemy.take_damage(),
        Err(SimError::DamagedAfterDestroyed {
            kind: EntityKind::EnemyPlane,
            ..
        })
    ));

    let mut shot = Projectile::enemy(Position::new(900.0, 300.0));
    shot.take_damage().unwrap();
    assert!(shot.take_damage().is_err());
}

#[test]
fn test_projectile_cannot_fire() {
    let mut shot = Projectile::user(Position::new(100.0, 100.0));
    let err = shot.fire(&ctx_at(user_start()), &mut always()).unwrap_err();
    assert!(matches!(
        err,
        SimError::ProjectileCannotFire {
            kind: EntityKind::UserProjectile,
            ..
        }
    ));
}

#[test]
fn test_armed_health_monotonic() {
    let mut user = UserPlane::new(3);
    let outcomes: Vec<_> = (0..3).map(|_| user.take_damage().unwrap()).collect();
    assert_eq!(
        outcomes,
        vec![
            DamageOutcome::Damaged,
            DamageOutcome::Damaged,
            DamageOutcome::Destroyed
        ]
    );
    assert_eq!(user.hull().health, 0);
    assert!(user.take_damage().is_err());
    assert_eq!(user.hull().health, 0);
}

// ---- Projectiles ----

#[test]
fn test_straight_projectile_lifespan_cap() {
    let ctx = TickContext {
        screen: Screen::new(1.0e9, 1.0e9),
        ..ctx_at(user_start())
    };
    for mut shot in [
        Projectile::user(Position::new(0.0, 0.0)),
        Projectile::enemy(Position::new(1.0e8, 0.0)),
    ] {
        let mut ticks = 0;
        while !shot.is_destroyed() {
            shot.advance(&ctx, &mut always());
            ticks += 1;
            assert!(ticks <= shot.max_lives(), "outlived its lifespan");
        }
        assert_eq!(ticks, shot.max_lives());
    }
}

#[test]
fn test_projectile_destroyed_off_screen() {
    let ctx = ctx_at(user_start());
    let mut shot = Projectile::user(Position::new(1900.0, 300.0));
    let mut ticks = 0;
    while !shot.is_destroyed() {
        shot.advance(&ctx, &mut always());
        ticks += 1;
    }
    // Leaves the screen grown by its own height: x > 1920 + 125.
    assert_eq!(ticks, 10);
}

#[test]
fn test_boss_projectile_homes_toward_user() {
    let mut shot = Projectile::boss(Position::new(100.0, 100.0));
    shot.advance(&ctx_at(Position::new(400.0, 500.0)), &mut always());
    assert_eq!(shot.kind(), ProjectileKind::Boss(Homing::Tracking));
    let pos = shot.body().position;
    assert!((pos.x - 109.0).abs() < 1e-9);
    assert!((pos.y - 112.0).abs() < 1e-9);
}

#[test]
fn test_boss_projectile_locks_when_target_behind() {
    let ctx = ctx_at(Position::new(500.0, 400.0));
    let mut shot = Projectile::boss(Position::new(1000.0, 400.0));

    shot.advance(&ctx, &mut always());
    let ProjectileKind::Boss(Homing::Ballistic { heading }) = shot.kind() else {
        panic!("expected ballistic, got {:?}", shot.kind());
    };
    assert!((heading - std::f64::consts::PI).abs() < 1e-9);
    // The locking tick does not move.
    assert_eq!(shot.body().position, Position::new(1000.0, 400.0));

    shot.advance(&ctx, &mut always());
    let pos = shot.body().position;
    assert!((pos.x - (1000.0 - BOSS_PROJECTILE_VELOCITY)).abs() < 1e-9);
    assert!((pos.y - 400.0).abs() < 1e-9);
}

#[test]
fn test_boss_projectile_locks_out_of_range() {
    let mut shot = Projectile::boss(Position::new(100.0, 100.0));
    shot.advance(&ctx_at(Position::new(700.0, 100.0)), &mut always());
    assert!(matches!(
        shot.kind(),
        ProjectileKind::Boss(Homing::Ballistic { .. })
    ));
}

// ---- Collision system ----

#[test]
fn test_sweep_symmetric_and_order_independent() {
    let build = |reverse: bool| {
        let mut ids = IdAllocator::default();
        let mut fighters = vec![
            ids.adopt(Hostile::Fighter(EnemyPlane::new(Position::new(800.0, 100.0)))),
            ids.adopt(Hostile::Fighter(EnemyPlane::new(Position::new(800.0, 600.0)))),
        ];
        let mut shots = vec![
            ids.adopt(Projectile::user(Position::new(800.0, 60.0))),
            ids.adopt(Projectile::user(Position::new(800.0, 560.0))),
        ];
        if reverse {
            fighters.reverse();
            shots.reverse();
        }
        (fighters, shots)
    };

    let mut results = Vec::new();
    for reverse in [false, true] {
        let (mut fighters, mut shots) = build(reverse);
        let hits = collision::sweep(&mut shots, &mut fighters, |_, _| true, |_| false).unwrap();
        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert_eq!(hit.left_outcome, Some(DamageOutcome::Destroyed));
            assert_eq!(hit.right_outcome, Some(DamageOutcome::Destroyed));
        }
        let mut destroyed: Vec<EntityId> = fighters
            .iter()
            .map(|f| f.id())
            .chain(shots.iter().map(|s| s.id()))
            .collect();
        destroyed.sort();
        assert!(fighters.iter().all(|f| f.is_destroyed()));
        assert!(shots.iter().all(|s| s.is_destroyed()));
        results.push(destroyed);
    }
    assert_eq!(results[0], results[1]);
}

#[test]
fn test_one_shot_over_two_fighters_destroys_both_in_any_order() {
    let mut survivors = Vec::new();
    for reverse in [false, true] {
        let mut ids = IdAllocator::default();
        let mut fighters = vec![
            ids.adopt(Hostile::Fighter(EnemyPlane::new(Position::new(800.0, 300.0)))),
            ids.adopt(Hostile::Fighter(EnemyPlane::new(Position::new(800.0, 305.0)))),
        ];
        if reverse {
            fighters.reverse();
        }
        let mut shots = vec![ids.adopt(Projectile::user(Position::new(780.0, 270.0)))];

        let hits = collision::sweep(&mut shots, &mut fighters, |_, _| true, |_| false).unwrap();

        assert_eq!(hits.len(), 2, "reverse={reverse}");
        assert_eq!(hits[0].left_outcome, Some(DamageOutcome::Destroyed));
        // The shot is already spent: it absorbs the second pair.
        assert_eq!(hits[1].left_outcome, None);
        assert!(hits
            .iter()
            .all(|hit| hit.right_outcome == Some(DamageOutcome::Destroyed)));
        assert!(shots[0].is_destroyed());

        let alive: Vec<EntityId> = fighters
            .iter()
            .filter(|f| !f.is_destroyed())
            .map(|f| f.id())
            .collect();
        survivors.push(alive);
    }
    assert!(survivors[0].is_empty());
    assert_eq!(survivors[0], survivors[1]);
}

#[test]
fn test_one_shot_over_two_fighters_counts_two_kills() {
    let (mut level, _) = running(kill_level(2, 0.2, 10), 5);
    let first = level.spawn_fighter_at(Position::new(800.0, 300.0));
    let second = level.spawn_fighter_at(Position::new(800.0, 305.0));
    level.spawn_user_projectile_at(Position::new(780.0, 270.0));

    let snap = level.tick().unwrap();

    assert_eq!(snap.user.kills, 2);
    assert!(snap.events.contains(&GameEvent::EnemyDestroyed { id: first }));
    assert!(snap.events.contains(&GameEvent::EnemyDestroyed { id: second }));
    assert!(level.user_projectiles().is_empty());
}

#[test]
fn test_user_projectile_kills_enemy() {
    let (mut level, _) = running(kill_level(1, 0.2, 10), 5);
    let enemy = level.spawn_fighter_at(Position::new(800.0, 300.0));
    let shot = level.spawn_user_projectile_at(Position::new(780.0, 270.0));

    let snap = level.tick().unwrap();

    assert_eq!(snap.user.kills, 1);
    assert!(snap.events.contains(&GameEvent::EnemyDestroyed { id: enemy }));
    assert!(snap.events.contains(&GameEvent::HighlightRemoved { id: enemy }));
    assert!(level.hostiles().iter().all(|h| h.id() != enemy));
    assert!(level.user_projectiles().iter().all(|p| p.id() != shot));
    assert!(snap.entities.iter().all(|e| e.id != enemy && e.id != shot));
}

#[test]
fn test_multi_hit_counts_one_kill() {
    let (mut level, _) = running(kill_level(1, 0.2, 10), 5);
    level.spawn_fighter_at(Position::new(800.0, 300.0));
    let first = level.spawn_user_projectile_at(Position::new(780.0, 270.0));
    let second = level.spawn_user_projectile_at(Position::new(780.0, 280.0));

    let snap = level.tick().unwrap();

    assert_eq!(snap.user.kills, 1);
    let destroyed_events = snap
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
        .count();
    assert_eq!(destroyed_events, 1);
    // Both overlapping shots are consumed, whichever destroyed the fighter.
    assert!(level.user_projectiles().iter().all(|p| p.id() != first));
    assert!(level.user_projectiles().iter().all(|p| p.id() != second));
}

#[test]
fn test_offscreen_enemy_not_hit_by_projectiles() {
    let (mut level, _) = running(kill_level(1, 0.2, 10), 5);
    let enemy = level.spawn_fighter_at(Position::new(1930.0, 300.0));
    let shot = level.spawn_user_projectile_at(Position::new(1900.0, 270.0));

    let snap = level.tick().unwrap();

    assert_eq!(snap.user.kills, 0);
    assert!(level.hostiles().iter().any(|h| h.id() == enemy));
    assert!(level.user_projectiles().iter().any(|p| p.id() == shot));
}

#[test]
fn test_body_collision_damages_both_and_counts_kill() {
    let (mut level, _) = running(kill_level(1, 0.2, 10), 5);
    let enemy = level.spawn_fighter_at(Position::new(20.0, USER_PLANE_INITIAL_Y));

    let snap = level.tick().unwrap();

    assert_eq!(snap.user.health, 4);
    assert_eq!(snap.user.kills, 1);
    assert!(snap
        .events
        .contains(&GameEvent::PlayerHit { remaining_health: 4 }));
    assert!(level.hostiles().iter().all(|h| h.id() != enemy));
}

#[test]
fn test_enemy_projectile_sweep_short_circuits_on_defeat() {
    let mut config = kill_level(1, 0.2, 10);
    config.player_health = 1;
    let (mut level, _) = running(config, 5);
    let first = level.spawn_enemy_projectile_at(Position::new(60.0, USER_PLANE_INITIAL_Y));
    let second = level.spawn_enemy_projectile_at(Position::new(70.0, USER_PLANE_INITIAL_Y));

    let snap = level.tick().unwrap();

    assert_eq!(snap.state, RunState::Lost);
    assert_eq!(snap.lifecycle, Some(LifecycleEvent::PlayerDefeated));
    assert!(level.enemy_projectiles().iter().all(|p| p.id() != first));
    assert!(level.enemy_projectiles().iter().any(|p| p.id() == second));
    assert!(snap.entities.iter().all(|e| e.kind != EntityKind::UserPlane));

    // Lost is terminal.
    let after = level.tick().unwrap();
    assert_eq!(after.state, RunState::Lost);
    assert_eq!(after.time.tick, snap.time.tick);
    assert_eq!(after.lifecycle, None);
}

// ---- Spawn controller ----

#[test]
fn test_spawn_respects_exclusion_zone() {
    let config = kill_level(8, 1.0, 10);
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ids = IdAllocator::default();
        let mut hostiles = Vec::new();
        let mut projectiles = Vec::new();
        let mut boss_spawned = false;

        spawner::run(
            &config,
            &mut hostiles,
            &mut projectiles,
            &mut ids,
            &mut boss_spawned,
            &ctx_at(user_start()),
            &mut rng,
        )
        .unwrap();

        assert_eq!(hostiles.len(), 8);
        for (i, a) in hostiles.iter().enumerate() {
            let pa = a.body().position;
            assert_eq!(pa.x, SCREEN_WIDTH);
            assert!(pa.y >= 0.0 && pa.y < SCREEN_HEIGHT - ENEMY_SPAWN_BAND_MARGIN);
            for b in &hostiles[i + 1..] {
                let pb = b.body().position;
                assert!(
                    !((pa.x - pb.x).abs() < SPAWN_EXCLUSION_X
                        && (pa.y - pb.y).abs() < SPAWN_EXCLUSION_Y),
                    "seed {seed}: overlapping spawn"
                );
            }
        }
        assert!(!boss_spawned);
    }
}

#[test]
fn test_failed_draws_retry_until_deficit_filled() {
    let config = kill_level(5, 0.2, 10);
    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ids = IdAllocator::default();
        let mut hostiles = Vec::new();
        let mut projectiles = Vec::new();
        let mut boss_spawned = false;

        spawner::run(
            &config,
            &mut hostiles,
            &mut projectiles,
            &mut ids,
            &mut boss_spawned,
            &ctx_at(user_start()),
            &mut rng,
        )
        .unwrap();

        assert_eq!(hostiles.len(), 5, "seed {seed}");
    }
}

#[test]
fn test_low_probability_level_fills_on_first_tick() {
    let (mut level, _) = running(kill_level(5, 0.2, 10), 3);
    level.tick().unwrap();
    assert_eq!(level.hostiles().len(), 5);
}

#[test]
fn test_spawner_fills_only_the_deficit() {
    let (mut level, _) = running(kill_level(5, 1.0, 10), 8);
    level.tick().unwrap();
    assert_eq!(level.hostiles().len(), 5);
    level.tick().unwrap();
    assert_eq!(level.hostiles().len(), 5);
}

// ---- Boss ----

#[test]
fn test_boss_level_spawns_boss_once() {
    let (mut level, _) = running(boss_level(ShieldBreakPolicy::Permanent), 11);
    let snap = level.tick().unwrap();

    let boss = snap.boss.expect("boss view");
    assert_eq!(boss.position.x, BOSS_INITIAL_X);
    assert!((boss.position.y - BOSS_INITIAL_Y).abs() <= BOSS_VERTICAL_VELOCITY);
    assert_eq!(boss.health_percent, 100.0);
    assert!(!boss.shield_visible);
    assert_eq!(level.hostiles().len(), 1);
    assert!(snap.user.kill_target.is_none());

    for _ in 0..20 {
        level.tick().unwrap();
    }
    assert_eq!(level.hostiles().iter().filter(|h| h.is_boss()).count(), 1);
}

#[test]
fn test_boss_takes_single_damage_per_hit() {
    let (mut level, _) = running(boss_level(ShieldBreakPolicy::Permanent), 11);
    level.tick().unwrap();
    level.spawn_user_projectile_at(Position::new(1050.0, 450.0));

    level.tick().unwrap();

    let boss = level.boss().unwrap();
    assert_eq!(boss.hull().health, BOSS_HEALTH - 1);
    assert!(level.user_projectiles().is_empty());
}

#[test]
fn test_shielded_boss_absorbs_damage() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut boss = Boss::new(ShieldBreakPolicy::Permanent, &mut rng);
    boss.shield.phase = ShieldPhase::Active;
    boss.shield.health = 1;

    assert_eq!(boss.take_damage().unwrap(), DamageOutcome::Absorbed);
    assert_eq!(boss.hull().health, BOSS_HEALTH);
    assert_eq!(boss.shield().health, 0);
    assert!(boss.shield().broken);
    assert_eq!(boss.shield().phase, ShieldPhase::Cooldown);

    let events = boss.drain_events();
    assert!(events.contains(&GameEvent::ShieldHit { remaining: 0 }));
    assert!(events.contains(&GameEvent::ShieldDeactivated { broken: true }));

    // Shield down: the next hit reaches the hull.
    assert_eq!(boss.take_damage().unwrap(), DamageOutcome::Damaged);
    assert_eq!(boss.hull().health, BOSS_HEALTH - 1);
}

#[test]
fn test_boss_stays_within_band() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut boss = Boss::new(ShieldBreakPolicy::Permanent, &mut rng);
    let ctx = ctx_at(user_start());
    for _ in 0..5000 {
        boss.advance(&ctx, &mut rng);
        let y = boss.body().position.y;
        assert!((BOSS_Y_UPPER_BOUND..=BOSS_Y_LOWER_BOUND).contains(&y));
        assert_eq!(boss.body().position.x, BOSS_INITIAL_X);
    }
}

#[test]
fn test_boss_defeat_wins_final_level() {
    let (mut level, _) = running(boss_level(ShieldBreakPolicy::Permanent), 11);
    level.tick().unwrap();
    {
        let boss = level.boss_mut().unwrap();
        boss.hull.health = 1;
        boss.shield.broken = true;
    }
    level.spawn_user_projectile_at(Position::new(1050.0, 450.0));

    let snap = level.tick().unwrap();

    assert_eq!(snap.state, RunState::Won);
    assert_eq!(
        snap.lifecycle,
        Some(LifecycleEvent::LevelComplete { next: None })
    );
    assert!(snap.events.contains(&GameEvent::BossDefeated));
    assert!(snap.boss.is_none());
    assert_eq!(snap.user.kills, 0);
}

// ---- Progression ----

#[test]
fn test_kill_target_evaluated_at_end_of_next_tick() {
    let (mut level, _) = running(kill_level(1, 0.2, 10), 4);
    level.tick().unwrap();

    level.user_mut().set_kills(10);
    assert_eq!(level.state(), RunState::Running);

    let snap = level.tick().unwrap();
    assert_eq!(snap.state, RunState::Transitioning);
    assert_eq!(snap.lifecycle, None);

    // Frozen until the scheduler closes the window.
    let frozen = level.tick().unwrap();
    assert_eq!(frozen.time.tick, snap.time.tick);

    let event = level.finish_transition().unwrap();
    assert_eq!(
        event,
        LifecycleEvent::LevelComplete {
            next: Some(LevelId::new("test-next"))
        }
    );

    // Reported once only.
    assert_eq!(
        level.finish_transition().unwrap_err(),
        SimError::TransitionFinished
    );
    assert_eq!(level.state(), RunState::Transitioning);
}

#[test]
fn test_kill_target_on_final_level_wins() {
    let mut config = kill_level(1, 0.2, 3);
    config.next_level = None;
    let (mut level, _) = running(config, 4);
    level.user_mut().set_kills(3);

    let snap = level.tick().unwrap();
    assert_eq!(snap.state, RunState::Won);
    assert_eq!(
        snap.lifecycle,
        Some(LifecycleEvent::LevelComplete { next: None })
    );
    assert!(level.finish_transition().is_err());
}

#[test]
fn test_long_run_invariants() {
    let (mut level, clock) = running(kill_level(8, 0.3, 1000), 2024);
    let mut last_health = level.user().hull().health;
    let mut destroyed_events = 0;

    for tick in 0..3000u32 {
        if tick % 3 == 0 {
            level.queue_command(PlayerCommand::Fire);
        }
        clock.advance(TICK_MILLIS);
        let snap = level.tick().unwrap();

        assert!(snap.user.health <= last_health, "health increased");
        last_health = snap.user.health;
        destroyed_events += snap
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .count() as u32;
        assert_eq!(snap.user.kills, destroyed_events);
        assert!(level.hostiles().iter().all(|h| !h.is_destroyed()));
        assert!(level.user_projectiles().iter().all(|p| !p.is_destroyed()));
        assert!(level.enemy_projectiles().iter().all(|p| !p.is_destroyed()));
        assert!(level.hostiles().len() <= 8);

        if snap.state == RunState::Lost {
            assert_eq!(snap.user.health, 0);
            break;
        }
    }
}
