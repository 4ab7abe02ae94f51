//! Enemy fighter plane.

use rand::Rng;

use skyraid_core::components::Hull;
use skyraid_core::constants::*;
use skyraid_core::enums::{DamageOutcome, EntityKind};
use skyraid_core::error::SimError;
use skyraid_core::types::{Position, Size};

use super::{damage_hull, Actor, Body, Projectile, TickContext};

/// Fighter that flies left across the screen, firing at the player until it
/// has passed them.
#[derive(Debug, Clone)]
pub struct EnemyPlane {
    pub(crate) body: Body,
    pub(crate) hull: Hull,
    passed_user: bool,
    penetrated: bool,
}

impl EnemyPlane {
    pub fn new(position: Position) -> Self {
        Self {
            body: Body::new(
                EntityKind::EnemyPlane,
                position,
                Size::new(ENEMY_PLANE_WIDTH, ENEMY_PLANE_HEIGHT),
            ),
            hull: Hull::new(ENEMY_PLANE_INITIAL_HEALTH),
            passed_user: false,
            penetrated: false,
        }
    }

    pub fn hull(&self) -> Hull {
        self.hull
    }

    /// Whether the fighter has flown past the user's horizontal position.
    pub fn has_passed_user(&self) -> bool {
        self.passed_user
    }

    /// Whether the fighter left the screen through the player's side.
    pub fn has_penetrated(&self) -> bool {
        self.penetrated
    }
}

impl Actor for EnemyPlane {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn advance<R: Rng + ?Sized>(&mut self, ctx: &TickContext, _rng: &mut R) {
        self.body.position.x += ENEMY_PLANE_HORIZONTAL_VELOCITY;

        if !self.passed_user && self.body.position.x < ctx.user.x {
            self.passed_user = true;
        }

        // Past the left edge: leaves play without counting as a kill.
        if !self.body.destroyed && self.body.position.x < 0.0 {
            self.penetrated = true;
            self.body.destroyed = true;
            tracing::debug!(id = self.body.id.0, "enemy penetrated defences");
        }
    }

    fn take_damage(&mut self) -> Result<DamageOutcome, SimError> {
        damage_hull(&mut self.body, &mut self.hull)
    }

    fn fire<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext,
        rng: &mut R,
    ) -> Result<Option<Projectile>, SimError> {
        let pos = self.body.position;
        let point_blank = (pos.y - ctx.user.y).abs() < ENEMY_PLANE_VERTICAL_SAFETY_DISTANCE;
        if self.passed_user || point_blank || !rng.gen_bool(ENEMY_PLANE_FIRE_RATE) {
            return Ok(None);
        }

        Ok(Some(Projectile::enemy(Position::new(
            pos.x + ENEMY_PLANE_PROJECTILE_X_OFFSET,
            pos.y + ENEMY_PLANE_PROJECTILE_Y_OFFSET,
        ))))
    }
}
