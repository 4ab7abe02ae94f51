//! The boss: armed entity driven by the boss-ai movement pattern and shield
//! state machine.

use rand::Rng;

use skyraid_boss_ai::fsm::{self, DamageRoute, ShieldContext, ShieldTransition};
use skyraid_boss_ai::movement;
use skyraid_core::components::{Hull, MovePattern, ShieldState};
use skyraid_core::constants::*;
use skyraid_core::enums::{DamageOutcome, EntityKind, ShieldBreakPolicy, ShieldPhase};
use skyraid_core::error::SimError;
use skyraid_core::events::GameEvent;
use skyraid_core::types::{Position, Size};

use super::{damage_hull, Actor, Body, Projectile, TickContext};

#[derive(Debug, Clone)]
pub struct Boss {
    pub(crate) body: Body,
    pub(crate) hull: Hull,
    pub(crate) shield: ShieldState,
    pattern: MovePattern,
    policy: ShieldBreakPolicy,
    /// Shield and defeat events awaiting collection by the level.
    events: Vec<GameEvent>,
}

impl Boss {
    pub fn new<R: Rng + ?Sized>(policy: ShieldBreakPolicy, rng: &mut R) -> Self {
        Self {
            body: Body::new(
                EntityKind::Boss,
                Position::new(BOSS_INITIAL_X, BOSS_INITIAL_Y),
                Size::new(BOSS_WIDTH, BOSS_HEIGHT),
            ),
            hull: Hull::new(BOSS_HEALTH),
            shield: ShieldState::default(),
            pattern: movement::new_pattern(rng),
            policy,
            events: Vec::new(),
        }
    }

    pub fn hull(&self) -> Hull {
        self.hull
    }

    pub fn shield(&self) -> ShieldState {
        self.shield
    }

    pub fn policy(&self) -> ShieldBreakPolicy {
        self.policy
    }

    pub fn is_shielded(&self) -> bool {
        self.shield.phase == ShieldPhase::Active
    }

    pub fn health_percent(&self) -> f64 {
        f64::from(self.hull.health) / f64::from(self.hull.max_health) * 100.0
    }

    pub fn shield_percent(&self) -> f64 {
        f64::from(self.shield.health) / f64::from(BOSS_SHIELD_MAX_HEALTH) * 100.0
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, transition: ShieldTransition) {
        let event = match transition {
            ShieldTransition::Activated => GameEvent::ShieldActivated,
            ShieldTransition::Expired => GameEvent::ShieldDeactivated { broken: false },
            ShieldTransition::Depleted { broken } => GameEvent::ShieldDeactivated { broken },
            ShieldTransition::Ready => return,
        };
        tracing::debug!(id = self.body.id.0, ?transition, "boss shield transition");
        self.events.push(event);
    }
}

impl Actor for Boss {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn advance<R: Rng + ?Sized>(&mut self, _ctx: &TickContext, rng: &mut R) {
        let dy = movement::next_move(&mut self.pattern, rng);
        self.body.position.y = movement::apply_band(self.body.position.y, dy);

        let update = fsm::evaluate(
            &ShieldContext {
                shield: self.shield,
                hull: self.hull,
            },
            rng,
        );
        self.shield = update.shield;
        if let Some(transition) = update.transition {
            self.record(transition);
        }
    }

    fn take_damage(&mut self) -> Result<DamageOutcome, SimError> {
        if self.body.destroyed {
            return Err(self.body.damaged_after_destroyed());
        }

        match fsm::route_damage(&self.shield, self.policy) {
            DamageRoute::Shield { shield, depleted } => {
                self.shield = shield;
                self.events.push(GameEvent::ShieldHit {
                    remaining: shield.health,
                });
                if let Some(transition) = depleted {
                    self.record(transition);
                }
                Ok(DamageOutcome::Absorbed)
            }
            DamageRoute::Hull => {
                let outcome = damage_hull(&mut self.body, &mut self.hull)?;
                if outcome == DamageOutcome::Destroyed {
                    tracing::debug!(id = self.body.id.0, "boss destroyed");
                    self.events.push(GameEvent::BossDefeated);
                }
                Ok(outcome)
            }
        }
    }

    fn fire<R: Rng + ?Sized>(
        &mut self,
        _ctx: &TickContext,
        rng: &mut R,
    ) -> Result<Option<Projectile>, SimError> {
        if !rng.gen_bool(BOSS_FIRE_RATE) {
            return Ok(None);
        }
        let pos = self.body.position;
        Ok(Some(Projectile::boss(Position::new(
            pos.x + BOSS_PROJECTILE_X_OFFSET,
            pos.y + BOSS_PROJECTILE_Y_OFFSET,
        ))))
    }
}
