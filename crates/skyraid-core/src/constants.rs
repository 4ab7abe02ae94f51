//! Simulation constants and tuning parameters.

/// Milliseconds between simulation ticks.
pub const TICK_MILLIS: u64 = 50;

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = (1000 / TICK_MILLIS) as u32;

// --- Playfield ---

pub const SCREEN_WIDTH: f64 = 1920.0;
pub const SCREEN_HEIGHT: f64 = 1080.0;

/// Enemies spawn no lower than `screen height - this` (room for the HUD).
pub const ENEMY_SPAWN_BAND_MARGIN: f64 = 150.0;

/// Collision rectangles keep this fraction of the sprite width.
pub const BOUNDS_WIDTH_SHRINK: f64 = 0.8;

/// Collision rectangles keep this fraction of the sprite height.
pub const BOUNDS_HEIGHT_SHRINK: f64 = 0.4;

// --- User plane ---

pub const USER_PLANE_WIDTH: f64 = 110.0;
pub const USER_PLANE_HEIGHT: f64 = 50.0;
pub const USER_PLANE_INITIAL_X: f64 = 5.0;
pub const USER_PLANE_INITIAL_Y: f64 = 300.0;
pub const USER_PLANE_VERTICAL_VELOCITY: f64 = 12.0;
pub const USER_PLANE_HORIZONTAL_VELOCITY: f64 = 12.0;
pub const USER_PLANE_UPPER_BOUND: f64 = 0.0;
pub const USER_PLANE_LOWER_BOUND: f64 = 800.0;
pub const USER_PLANE_LEFT_BOUND: f64 = 0.0;
pub const USER_PLANE_RIGHT_BOUND: f64 = 1600.0;
pub const USER_PLANE_FIRE_COOLDOWN_MILLIS: u64 = 300;
pub const USER_PLANE_PROJECTILE_X_OFFSET: f64 = 110.0;
pub const USER_PLANE_PROJECTILE_Y_OFFSET: f64 = -20.0;
pub const USER_PLANE_DEFAULT_VOLUME: f64 = 0.5;

// --- User projectile ---

pub const USER_PROJECTILE_WIDTH: f64 = 60.0;
pub const USER_PROJECTILE_HEIGHT: f64 = 125.0;
pub const USER_PROJECTILE_VELOCITY: f64 = 15.0;
pub const USER_PROJECTILE_MAX_LIVES: u32 = 300;

// --- Enemy plane ---

pub const ENEMY_PLANE_WIDTH: f64 = 110.0;
pub const ENEMY_PLANE_HEIGHT: f64 = 50.0;
pub const ENEMY_PLANE_HORIZONTAL_VELOCITY: f64 = -6.0;
pub const ENEMY_PLANE_INITIAL_HEALTH: u32 = 1;
pub const ENEMY_PLANE_FIRE_RATE: f64 = 0.01;
pub const ENEMY_PLANE_PROJECTILE_X_OFFSET: f64 = -60.0;
pub const ENEMY_PLANE_PROJECTILE_Y_OFFSET: f64 = 10.0;
/// Enemies hold fire while the user is vertically closer than this.
pub const ENEMY_PLANE_VERTICAL_SAFETY_DISTANCE: f64 = 100.0;

// --- Enemy projectile ---

pub const ENEMY_PROJECTILE_WIDTH: f64 = 50.0;
pub const ENEMY_PROJECTILE_HEIGHT: f64 = 50.0;
pub const ENEMY_PROJECTILE_VELOCITY: f64 = 10.0;
pub const ENEMY_PROJECTILE_MAX_LIVES: u32 = 300;

// --- Spawn controller ---

/// Minimum horizontal separation between a spawn candidate and any enemy.
pub const SPAWN_EXCLUSION_X: f64 = 100.0;

/// Minimum vertical separation between a spawn candidate and any enemy.
pub const SPAWN_EXCLUSION_Y: f64 = 50.0;

// --- Boss ---

pub const BOSS_WIDTH: f64 = 300.0;
pub const BOSS_HEIGHT: f64 = 250.0;
pub const BOSS_INITIAL_X: f64 = 1000.0;
pub const BOSS_INITIAL_Y: f64 = 400.0;
pub const BOSS_HEALTH: u32 = 100;
pub const BOSS_FIRE_RATE: f64 = 0.02;
pub const BOSS_PROJECTILE_X_OFFSET: f64 = -50.0;
pub const BOSS_PROJECTILE_Y_OFFSET: f64 = 75.0;
pub const BOSS_VERTICAL_VELOCITY: f64 = 8.0;
/// Repetitions of each velocity (+V, -V, 0) in the movement pool.
pub const BOSS_MOVE_FREQUENCY_PER_CYCLE: usize = 5;
/// Consecutive ticks a pool entry is held before reshuffling.
pub const BOSS_MAX_FRAMES_WITH_SAME_MOVE: u32 = 10;
pub const BOSS_Y_UPPER_BOUND: f64 = -100.0;
pub const BOSS_Y_LOWER_BOUND: f64 = 500.0;

// --- Boss shield ---

pub const BOSS_SHIELD_MAX_HEALTH: u32 = 50;
/// Per-tick activation probability once eligible.
pub const BOSS_SHIELD_PROBABILITY: f64 = 0.2;
/// Shield becomes eligible at or below this fraction of max health.
pub const BOSS_SHIELD_HEALTH_THRESHOLD: f64 = 0.75;
/// Ticks a shield stays up before timing out.
pub const BOSS_SHIELD_MAX_ACTIVE_FRAMES: u32 = 300;
/// Ticks after deactivation before the shield may come back.
pub const BOSS_SHIELD_COOLDOWN_FRAMES: u32 = 300;

// --- Boss projectile ---

pub const BOSS_PROJECTILE_SIZE: f64 = 75.0;
pub const BOSS_PROJECTILE_VELOCITY: f64 = 15.0;
/// Homing stops once the target is farther than this.
pub const BOSS_PROJECTILE_HOMING_DISTANCE: f64 = 500.0;
pub const BOSS_PROJECTILE_MAX_LIVES: u32 = 300;

// --- Level flow ---

/// Duration of the exit animation window before control leaves a level.
pub const LEVEL_TRANSITION_MILLIS: u64 = 1000;
