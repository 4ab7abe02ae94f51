//! Collision system.
//!
//! A sweep first collects every overlapping pair of live members, then
//! applies one unit of damage to both members of each pair. A member already
//! destroyed by an earlier pair of the same sweep absorbs further hits
//! without effect, while its partner still takes its damage. The set of
//! destroyed entities therefore does not depend on collection order, and a
//! destroyed entity is never counted twice.

use std::slice;

use skyraid_core::enums::DamageOutcome;
use skyraid_core::error::SimError;
use skyraid_core::events::GameEvent;
use skyraid_core::types::Screen;

use crate::entities::{Actor, Hostile, Projectile, UserPlane};

/// One resolved collision between `left[left]` and `right[right]`.
///
/// An outcome is `None` when that member was already destroyed earlier in
/// the same sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub left: usize,
    pub right: usize,
    pub left_outcome: Option<DamageOutcome>,
    pub right_outcome: Option<DamageOutcome>,
}

/// Side effects of all sweeps in one tick, applied by the level.
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// Visible fighters destroyed this tick.
    pub kills: u32,
    pub events: Vec<GameEvent>,
    pub user_destroyed: bool,
}

/// Generic sweep over two collections.
///
/// `eligible` filters candidate pairs before the overlap test. `halt` is
/// consulted after every hit; returning `true` abandons the remaining pairs.
pub fn sweep<A: Actor, B: Actor>(
    left: &mut [A],
    right: &mut [B],
    eligible: impl Fn(&A, &B) -> bool,
    mut halt: impl FnMut(&Hit) -> bool,
) -> Result<Vec<Hit>, SimError> {
    let mut pairs = Vec::new();
    for (i, a) in left.iter().enumerate() {
        if a.is_destroyed() {
            continue;
        }
        let bounds = a.body().bounds();
        for (j, b) in right.iter().enumerate() {
            if !b.is_destroyed() && eligible(a, b) && bounds.intersects(&b.body().bounds()) {
                pairs.push((i, j));
            }
        }
    }

    let mut hits = Vec::with_capacity(pairs.len());
    for (i, j) in pairs {
        let hit = Hit {
            left: i,
            right: j,
            left_outcome: strike(&mut left[i])?,
            right_outcome: strike(&mut right[j])?,
        };
        if hit.left_outcome.is_none() && hit.right_outcome.is_none() {
            continue;
        }
        let stop = halt(&hit);
        hits.push(hit);
        if stop {
            break;
        }
    }

    Ok(hits)
}

/// Damage a member that is still alive; a member destroyed earlier in the
/// sweep absorbs the hit.
fn strike<A: Actor>(actor: &mut A) -> Result<Option<DamageOutcome>, SimError> {
    if actor.is_destroyed() {
        return Ok(None);
    }
    actor.take_damage().map(Some)
}

/// Run every collision routine in order:
///
/// 1. user body vs enemy bodies, regardless of visibility
/// 2. user projectiles vs visible fighters
/// 3. user projectiles vs the boss
/// 4. enemy projectiles vs the user, stopping as soon as the user is destroyed
pub fn run(
    user: &mut UserPlane,
    hostiles: &mut [Hostile],
    user_projectiles: &mut [Projectile],
    enemy_projectiles: &mut [Projectile],
    screen: &Screen,
) -> Result<CollisionReport, SimError> {
    let mut report = CollisionReport::default();

    // 1. Bodies
    let mut health = user.hull.health;
    let hits = sweep(slice::from_mut(user), hostiles, |_, _| true, |_| false)?;
    for hit in &hits {
        if let Some(outcome) = hit.left_outcome {
            report.player_hit(&mut health, outcome);
        }
        report.fighter_down(&hostiles[hit.right], hit.right_outcome, screen);
    }

    // 2. User projectiles vs fighters
    let hits = sweep(
        user_projectiles,
        hostiles,
        |_, hostile| !hostile.is_boss() && hostile.body().is_visible(screen),
        |_| false,
    )?;
    for hit in &hits {
        report.fighter_down(&hostiles[hit.right], hit.right_outcome, screen);
    }

    // 3. User projectiles vs boss (shield-routed, events recorded by the boss)
    sweep(
        user_projectiles,
        hostiles,
        |_, hostile| hostile.is_boss(),
        |_| false,
    )?;

    // 4. Enemy projectiles vs user
    let mut health = user.hull.health;
    let hits = sweep(
        enemy_projectiles,
        slice::from_mut(user),
        |_, _| true,
        |hit| hit.right_outcome == Some(DamageOutcome::Destroyed),
    )?;
    for hit in &hits {
        if let Some(outcome) = hit.right_outcome {
            report.player_hit(&mut health, outcome);
        }
    }

    Ok(report)
}

impl CollisionReport {
    fn player_hit(&mut self, health: &mut u32, outcome: DamageOutcome) {
        *health = health.saturating_sub(1);
        self.events.push(GameEvent::PlayerHit {
            remaining_health: *health,
        });
        if outcome == DamageOutcome::Destroyed && !self.user_destroyed {
            self.user_destroyed = true;
            tracing::info!("user plane destroyed");
        }
    }

    /// Count a kill on the destroying transition of a visible fighter.
    fn fighter_down(
        &mut self,
        hostile: &Hostile,
        outcome: Option<DamageOutcome>,
        screen: &Screen,
    ) {
        if outcome != Some(DamageOutcome::Destroyed) || hostile.is_boss() {
            return;
        }
        if !hostile.body().is_visible(screen) {
            return;
        }
        let id = hostile.id();
        self.kills += 1;
        self.events.push(GameEvent::EnemyDestroyed { id });
        self.events.push(GameEvent::HighlightRemoved { id });
        tracing::debug!(id = id.0, "enemy destroyed");
    }
}
