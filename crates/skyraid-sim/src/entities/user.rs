//! The player's plane.

use std::time::Duration;

use rand::Rng;

use skyraid_core::components::{Hull, MoveIntent};
use skyraid_core::constants::*;
use skyraid_core::enums::{DamageOutcome, Direction, EntityKind};
use skyraid_core::error::SimError;
use skyraid_core::types::{Position, Size};

use super::{damage_hull, Actor, Body, Projectile, TickContext};

/// Player-controlled plane: intent-driven movement, cooldown-gated firing
/// and the level's kill counter.
#[derive(Debug, Clone)]
pub struct UserPlane {
    pub(crate) body: Body,
    pub(crate) hull: Hull,
    intent: MoveIntent,
    kills: u32,
    last_fire: Option<Duration>,
    volume: f64,
}

impl UserPlane {
    pub fn new(health: u32) -> Self {
        Self {
            body: Body::new(
                EntityKind::UserPlane,
                Position::new(USER_PLANE_INITIAL_X, USER_PLANE_INITIAL_Y),
                Size::new(USER_PLANE_WIDTH, USER_PLANE_HEIGHT),
            ),
            hull: Hull::new(health),
            intent: MoveIntent::default(),
            kills: 0,
            last_fire: None,
            volume: USER_PLANE_DEFAULT_VOLUME,
        }
    }

    /// Set the intent multiplier for one axis.
    pub fn steer(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.intent.vertical = -1,
            Direction::Down => self.intent.vertical = 1,
            Direction::Left => self.intent.horizontal = -1,
            Direction::Right => self.intent.horizontal = 1,
        }
    }

    pub fn stop_vertical(&mut self) {
        self.intent.vertical = 0;
    }

    pub fn stop_horizontal(&mut self) {
        self.intent.horizontal = 0;
    }

    /// Shot cue volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.max(0.0).min(1.0);
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn intent(&self) -> MoveIntent {
        self.intent
    }

    pub fn hull(&self) -> Hull {
        self.hull
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub(crate) fn record_kills(&mut self, kills: u32) {
        self.kills += kills;
    }

    #[cfg(test)]
    pub(crate) fn set_kills(&mut self, kills: u32) {
        self.kills = kills;
    }
}

impl Actor for UserPlane {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn advance<R: Rng + ?Sized>(&mut self, _ctx: &TickContext, _rng: &mut R) {
        let size = self.body.size;
        let pos = &mut self.body.position;

        pos.y += USER_PLANE_VERTICAL_VELOCITY * f64::from(self.intent.vertical);
        pos.x += USER_PLANE_HORIZONTAL_VELOCITY * f64::from(self.intent.horizontal);

        // Keep the whole footprint inside the bounds.
        if pos.y < USER_PLANE_UPPER_BOUND {
            pos.y = USER_PLANE_UPPER_BOUND;
        } else if pos.y + size.height > USER_PLANE_LOWER_BOUND {
            pos.y = USER_PLANE_LOWER_BOUND - size.height;
        }
        if pos.x < USER_PLANE_LEFT_BOUND {
            pos.x = USER_PLANE_LEFT_BOUND;
        } else if pos.x + size.width > USER_PLANE_RIGHT_BOUND {
            pos.x = USER_PLANE_RIGHT_BOUND - size.width;
        }
    }

    fn take_damage(&mut self) -> Result<DamageOutcome, SimError> {
        damage_hull(&mut self.body, &mut self.hull)
    }

    /// Fire unless the previous shot was less than the cooldown ago.
    fn fire<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext,
        _rng: &mut R,
    ) -> Result<Option<Projectile>, SimError> {
        let cooldown = Duration::from_millis(USER_PLANE_FIRE_COOLDOWN_MILLIS);
        if let Some(last) = self.last_fire {
            if ctx.now.saturating_sub(last) < cooldown {
                return Ok(None);
            }
        }
        self.last_fire = Some(ctx.now);

        let pos = self.body.position;
        Ok(Some(Projectile::user(Position::new(
            pos.x + USER_PLANE_PROJECTILE_X_OFFSET,
            pos.y + USER_PLANE_PROJECTILE_Y_OFFSET,
        ))))
    }
}
