//! Projectiles: straight user and enemy shots, and homing boss shots.

use glam::DVec2;
use rand::Rng;

use skyraid_core::constants::*;
use skyraid_core::enums::{DamageOutcome, EntityKind};
use skyraid_core::error::SimError;
use skyraid_core::types::{Position, Size};

use super::{Actor, Body, TickContext};

/// Guidance state of a boss projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Homing {
    /// Steering toward the user every tick.
    Tracking,
    /// Heading locked (radians); flies straight from now on.
    Ballistic { heading: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileKind {
    User,
    Enemy,
    Boss(Homing),
}

/// Projectile with no health: any damage destroys it.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub(crate) body: Body,
    kind: ProjectileKind,
    /// Ticks lived so far.
    lives: u32,
}

impl Projectile {
    pub fn user(position: Position) -> Self {
        Self::new(
            EntityKind::UserProjectile,
            ProjectileKind::User,
            position,
            Size::new(USER_PROJECTILE_WIDTH, USER_PROJECTILE_HEIGHT),
        )
    }

    pub fn enemy(position: Position) -> Self {
        Self::new(
            EntityKind::EnemyProjectile,
            ProjectileKind::Enemy,
            position,
            Size::new(ENEMY_PROJECTILE_WIDTH, ENEMY_PROJECTILE_HEIGHT),
        )
    }

    pub fn boss(position: Position) -> Self {
        Self::new(
            EntityKind::BossProjectile,
            ProjectileKind::Boss(Homing::Tracking),
            position,
            Size::new(BOSS_PROJECTILE_SIZE, BOSS_PROJECTILE_SIZE),
        )
    }

    fn new(kind_tag: EntityKind, kind: ProjectileKind, position: Position, size: Size) -> Self {
        Self {
            body: Body::new(kind_tag, position, size),
            kind,
            lives: 0,
        }
    }

    pub fn kind(&self) -> ProjectileKind {
        self.kind
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        match self.kind {
            ProjectileKind::User => USER_PROJECTILE_MAX_LIVES,
            ProjectileKind::Enemy => ENEMY_PROJECTILE_MAX_LIVES,
            ProjectileKind::Boss(_) => BOSS_PROJECTILE_MAX_LIVES,
        }
    }

    /// Off-screen margin: the projectile's own height.
    fn margin(&self) -> f64 {
        self.body.size.height
    }

    fn steer(&mut self, homing: Homing, target: Position) {
        let pos = DVec2::new(self.body.position.x, self.body.position.y);

        let next = match homing {
            Homing::Tracking => {
                let delta = DVec2::new(target.x, target.y) - pos;
                let distance = delta.length();
                // Lock on when the target is behind, out of range or too close.
                if delta.x < 0.0
                    || distance > BOSS_PROJECTILE_HOMING_DISTANCE
                    || distance < BOSS_PROJECTILE_SIZE / 2.0
                {
                    let heading = delta.y.atan2(delta.x);
                    self.kind = ProjectileKind::Boss(Homing::Ballistic { heading });
                    return;
                }
                pos + delta / distance * BOSS_PROJECTILE_VELOCITY
            }
            Homing::Ballistic { heading } => {
                pos + DVec2::from_angle(heading) * BOSS_PROJECTILE_VELOCITY
            }
        };

        self.body.position = Position::new(next.x, next.y);
    }
}

impl Actor for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn advance<R: Rng + ?Sized>(&mut self, ctx: &TickContext, _rng: &mut R) {
        self.lives += 1;

        match self.kind {
            ProjectileKind::User => self.body.position.x += USER_PROJECTILE_VELOCITY,
            ProjectileKind::Enemy => self.body.position.x -= ENEMY_PROJECTILE_VELOCITY,
            ProjectileKind::Boss(homing) => self.steer(homing, ctx.user),
        }

        if self.lives >= self.max_lives() || self.body.is_outside(&ctx.screen, self.margin()) {
            self.body.destroyed = true;
        }
    }

    fn take_damage(&mut self) -> Result<DamageOutcome, SimError> {
        if self.body.destroyed {
            return Err(self.body.damaged_after_destroyed());
        }
        self.body.destroyed = true;
        Ok(DamageOutcome::Destroyed)
    }

    fn fire<R: Rng + ?Sized>(
        &mut self,
        _ctx: &TickContext,
        _rng: &mut R,
    ) -> Result<Option<Projectile>, SimError> {
        Err(SimError::ProjectileCannotFire {
            id: self.body.id,
            kind: self.body.kind,
        })
    }
}
