//! Cleanup system: removes destroyed entities from every collection.

use crate::entities::{Actor, Hostile, Projectile};

/// Drop every destroyed member in one pass. Returns how many were removed.
pub fn run(
    hostiles: &mut Vec<Hostile>,
    user_projectiles: &mut Vec<Projectile>,
    enemy_projectiles: &mut Vec<Projectile>,
) -> usize {
    let before = hostiles.len() + user_projectiles.len() + enemy_projectiles.len();

    hostiles.retain(|hostile| !hostile.is_destroyed());
    user_projectiles.retain(|projectile| !projectile.is_destroyed());
    enemy_projectiles.retain(|projectile| !projectile.is_destroyed());

    before - (hostiles.len() + user_projectiles.len() + enemy_projectiles.len())
}
