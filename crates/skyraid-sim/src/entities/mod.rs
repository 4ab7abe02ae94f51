//! Entity model: the user plane, enemy fighters, the boss and projectiles.
//!
//! Every entity owns a [`Body`] and implements [`Actor`]. The level owns all
//! collections; entities read the state they depend on (the user's position,
//! the screen, the wall clock) from a [`TickContext`] handed to them.

pub mod boss;
pub mod enemy;
pub mod projectile;
pub mod user;

pub use boss::Boss;
pub use enemy::EnemyPlane;
pub use projectile::{Homing, Projectile, ProjectileKind};
pub use user::UserPlane;

use std::time::Duration;

use rand::Rng;

use skyraid_core::components::Hull;
use skyraid_core::enums::{DamageOutcome, EntityKind};
use skyraid_core::error::SimError;
use skyraid_core::types::{EntityId, Position, Rect, Screen, Size};

/// Read-only state shared with entities for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    /// Top-left corner of the user plane.
    pub user: Position,
    pub screen: Screen,
    /// Wall-clock reading for cooldown checks.
    pub now: Duration,
}

/// Position, footprint and liveness common to every entity.
#[derive(Debug, Clone)]
pub struct Body {
    /// Assigned by the level when the entity joins a collection.
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub size: Size,
    pub destroyed: bool,
}

impl Body {
    pub fn new(kind: EntityKind, position: Position, size: Size) -> Self {
        Self {
            id: EntityId::default(),
            kind,
            position,
            size,
            destroyed: false,
        }
    }

    /// Full visual rectangle.
    pub fn sprite(&self) -> Rect {
        Rect::from_sprite(self.position, self.size)
    }

    /// Shrunk collision rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::shrunk(self.position, self.size)
    }

    pub fn is_visible(&self, screen: &Screen) -> bool {
        self.sprite().overlaps_screen(screen)
    }

    /// Whether the top-left corner lies outside the screen grown by `margin`
    /// on every side.
    pub fn is_outside(&self, screen: &Screen, margin: f64) -> bool {
        let p = self.position;
        p.x < -margin || p.x > screen.width + margin || p.y < -margin || p.y > screen.height + margin
    }

    pub(crate) fn damaged_after_destroyed(&self) -> SimError {
        SimError::DamagedAfterDestroyed {
            id: self.id,
            kind: self.kind,
        }
    }
}

/// Capability set shared by every entity.
pub trait Actor {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    /// Advance own position and internal state by one tick.
    fn advance<R: Rng + ?Sized>(&mut self, ctx: &TickContext, rng: &mut R);

    /// Apply one unit of damage.
    ///
    /// Reports [`DamageOutcome::Destroyed`] exactly once, on the destroying
    /// transition. Damaging an already destroyed entity is an error.
    fn take_damage(&mut self) -> Result<DamageOutcome, SimError>;

    /// Try to fire. `Ok(None)` is the ordinary "no shot this tick" outcome.
    fn fire<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext,
        rng: &mut R,
    ) -> Result<Option<Projectile>, SimError>;

    fn is_destroyed(&self) -> bool {
        self.body().destroyed
    }

    fn id(&self) -> EntityId {
        self.body().id
    }
}

/// Hands out entity ids in creation order.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }

    /// Stamp a fresh id on an entity about to join a collection.
    pub fn adopt<A: Actor>(&mut self, mut actor: A) -> A {
        actor.body_mut().id = self.next_id();
        actor
    }
}

/// Standard hull damage path for armed entities.
pub(crate) fn damage_hull(body: &mut Body, hull: &mut Hull) -> Result<DamageOutcome, SimError> {
    if body.destroyed {
        return Err(body.damaged_after_destroyed());
    }
    hull.health = hull.health.saturating_sub(1);
    if hull.health == 0 {
        body.destroyed = true;
        Ok(DamageOutcome::Destroyed)
    } else {
        Ok(DamageOutcome::Damaged)
    }
}

/// Member of the enemy collection.
#[derive(Debug, Clone)]
pub enum Hostile {
    Fighter(EnemyPlane),
    Boss(Box<Boss>),
}

impl Hostile {
    pub fn is_boss(&self) -> bool {
        matches!(self, Hostile::Boss(_))
    }

    pub fn as_boss(&self) -> Option<&Boss> {
        match self {
            Hostile::Boss(boss) => Some(&**boss),
            Hostile::Fighter(_) => None,
        }
    }

    pub fn as_boss_mut(&mut self) -> Option<&mut Boss> {
        match self {
            Hostile::Boss(boss) => Some(&mut **boss),
            Hostile::Fighter(_) => None,
        }
    }
}

impl Actor for Hostile {
    fn body(&self) -> &Body {
        match self {
            Hostile::Fighter(fighter) => fighter.body(),
            Hostile::Boss(boss) => boss.body(),
        }
    }

    fn body_mut(&mut self) -> &mut Body {
        match self {
            Hostile::Fighter(fighter) => fighter.body_mut(),
            Hostile::Boss(boss) => boss.body_mut(),
        }
    }

    fn advance<R: Rng + ?Sized>(&mut self, ctx: &TickContext, rng: &mut R) {
        match self {
            Hostile::Fighter(fighter) => fighter.advance(ctx, rng),
            Hostile::Boss(boss) => boss.advance(ctx, rng),
        }
    }

    fn take_damage(&mut self) -> Result<DamageOutcome, SimError> {
        match self {
            Hostile::Fighter(fighter) => fighter.take_damage(),
            Hostile::Boss(boss) => boss.take_damage(),
        }
    }

    fn fire<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext,
        rng: &mut R,
    ) -> Result<Option<Projectile>, SimError> {
        match self {
            Hostile::Fighter(fighter) => fighter.fire(ctx, rng),
            Hostile::Boss(boss) => boss.fire(ctx, rng),
        }
    }
}
