//! Boss shield finite state machine.
//!
//! Pure functions that compute shield phase transitions and route incoming
//! damage. No entity dependency: operates on plain data.
//!
//! Phases cycle `Inactive -> Active -> Cooldown -> Inactive`. A shield shot
//! down to zero while active always enters `Cooldown`; under
//! [`ShieldBreakPolicy::Permanent`] it is also flagged broken and never
//! activates again.

use rand::Rng;

use skyraid_core::components::{Hull, ShieldState};
use skyraid_core::constants::*;
use skyraid_core::enums::{ShieldBreakPolicy, ShieldPhase};

/// Input to the shield FSM for one tick.
pub struct ShieldContext {
    pub shield: ShieldState,
    pub hull: Hull,
}

/// Notable shield transitions, surfaced as events by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldTransition {
    Activated,
    /// Active window ran out.
    Expired,
    /// Shield health reached zero while active.
    Depleted { broken: bool },
    /// Cooldown finished; activation possible again (unless broken).
    Ready,
}

/// Output from the shield FSM.
pub struct ShieldUpdate {
    pub shield: ShieldState,
    pub transition: Option<ShieldTransition>,
}

/// Where one unit of damage aimed at the boss ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageRoute {
    /// The active shield absorbed the hit.
    Shield {
        shield: ShieldState,
        depleted: Option<ShieldTransition>,
    },
    /// No active shield: damage the hull.
    Hull,
}

/// Whether hull health has dropped far enough for the shield to be eligible.
pub fn below_threshold(hull: &Hull) -> bool {
    f64::from(hull.health) <= f64::from(hull.max_health) * BOSS_SHIELD_HEALTH_THRESHOLD
}

/// Evaluate the shield for one tick.
pub fn evaluate<R: Rng + ?Sized>(ctx: &ShieldContext, rng: &mut R) -> ShieldUpdate {
    let mut shield = ctx.shield;

    let transition = match shield.phase {
        ShieldPhase::Active => {
            shield.frames_active += 1;
            if shield.frames_active >= BOSS_SHIELD_MAX_ACTIVE_FRAMES {
                enter_cooldown(&mut shield);
                Some(ShieldTransition::Expired)
            } else {
                None
            }
        }
        ShieldPhase::Cooldown => {
            shield.cooldown_remaining = shield.cooldown_remaining.saturating_sub(1);
            if shield.cooldown_remaining == 0 {
                shield.phase = ShieldPhase::Inactive;
                Some(ShieldTransition::Ready)
            } else {
                None
            }
        }
        ShieldPhase::Inactive => {
            // The draw is only taken once the boss is eligible.
            if !shield.broken && below_threshold(&ctx.hull) && rng.gen_bool(BOSS_SHIELD_PROBABILITY)
            {
                shield.phase = ShieldPhase::Active;
                shield.health = BOSS_SHIELD_MAX_HEALTH;
                shield.frames_active = 0;
                Some(ShieldTransition::Activated)
            } else {
                None
            }
        }
    };

    ShieldUpdate { shield, transition }
}

/// Route one unit of damage. An active shield absorbs it; anything else
/// passes through to the hull.
pub fn route_damage(shield: &ShieldState, policy: ShieldBreakPolicy) -> DamageRoute {
    if shield.phase != ShieldPhase::Active {
        return DamageRoute::Hull;
    }

    let mut shield = *shield;
    shield.health = shield.health.saturating_sub(1);

    let depleted = if shield.health == 0 {
        let broken = policy == ShieldBreakPolicy::Permanent;
        enter_cooldown(&mut shield);
        shield.broken |= broken;
        Some(ShieldTransition::Depleted { broken })
    } else {
        None
    };

    DamageRoute::Shield { shield, depleted }
}

fn enter_cooldown(shield: &mut ShieldState) {
    shield.phase = ShieldPhase::Cooldown;
    shield.frames_active = 0;
    shield.cooldown_remaining = BOSS_SHIELD_COOLDOWN_FRAMES;
}
