//! Vertical movement pattern of the boss.
//!
//! The boss walks a shuffled pool of vertical velocities, holding each entry
//! for a fixed number of ticks. The pool is reshuffled every time the cursor
//! moves on.

use rand::seq::SliceRandom;
use rand::Rng;

use skyraid_core::components::MovePattern;
use skyraid_core::constants::*;

/// Build and shuffle the velocity pool: `BOSS_MOVE_FREQUENCY_PER_CYCLE`
/// copies each of up, down and hover.
pub fn new_pattern<R: Rng + ?Sized>(rng: &mut R) -> MovePattern {
    let mut pool = Vec::with_capacity(BOSS_MOVE_FREQUENCY_PER_CYCLE * 3);
    for _ in 0..BOSS_MOVE_FREQUENCY_PER_CYCLE {
        pool.push(BOSS_VERTICAL_VELOCITY);
        pool.push(-BOSS_VERTICAL_VELOCITY);
        pool.push(0.0);
    }
    pool.shuffle(rng);

    MovePattern {
        pool,
        cursor: 0,
        frames_on_move: 0,
    }
}

/// Return the velocity for this tick and step the pattern.
///
/// After `BOSS_MAX_FRAMES_WITH_SAME_MOVE` consecutive ticks the pool is
/// reshuffled and the cursor advances, wrapping at the end of the pool.
pub fn next_move<R: Rng + ?Sized>(pattern: &mut MovePattern, rng: &mut R) -> f64 {
    let Some(&current) = pattern.pool.get(pattern.cursor) else {
        pattern.cursor = 0;
        return 0.0;
    };

    pattern.frames_on_move += 1;
    if pattern.frames_on_move >= BOSS_MAX_FRAMES_WITH_SAME_MOVE {
        pattern.pool.shuffle(rng);
        pattern.frames_on_move = 0;
        pattern.cursor += 1;
    }
    if pattern.cursor >= pattern.pool.len() {
        pattern.cursor = 0;
    }

    current
}

/// Apply a vertical displacement, reverting it if the result would leave the
/// `[BOSS_Y_UPPER_BOUND, BOSS_Y_LOWER_BOUND]` band.
pub fn apply_band(y: f64, dy: f64) -> f64 {
    let moved = y + dy;
    if (BOSS_Y_UPPER_BOUND..=BOSS_Y_LOWER_BOUND).contains(&moved) {
        moved
    } else {
        y
    }
}
