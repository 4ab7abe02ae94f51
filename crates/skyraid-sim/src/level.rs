//! Level orchestrator: the game loop tick.
//!
//! `Level` owns every entity collection of one level, processes player
//! commands, runs the systems in a fixed order and produces
//! `GameStateSnapshot`s. Completely headless: something external calls
//! [`Level::tick`] at the cadence it controls.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use skyraid_core::commands::PlayerCommand;
use skyraid_core::config::LevelConfig;
use skyraid_core::enums::RunState;
use skyraid_core::error::{ConfigError, SimError};
use skyraid_core::events::{GameEvent, LifecycleEvent};
use skyraid_core::state::GameStateSnapshot;
use skyraid_core::types::SimTime;

use crate::clock::Clock;
use crate::entities::{Actor, Boss, Hostile, IdAllocator, Projectile, TickContext, UserPlane};
use crate::systems;
use crate::systems::progression::Verdict;
use crate::systems::snapshot::SnapshotInput;

/// Configuration for starting a level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same level.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// One running level. Owns the user plane and every entity collection.
pub struct Level {
    config: LevelConfig,
    sim: SimConfig,
    clock: Arc<dyn Clock>,
    state: RunState,
    time: SimTime,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    user: UserPlane,
    hostiles: Vec<Hostile>,
    user_projectiles: Vec<Projectile>,
    enemy_projectiles: Vec<Projectile>,
    boss_spawned: bool,
    /// Set once `finish_transition` has reported the level complete.
    exit_reported: bool,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
    lifecycle: Option<LifecycleEvent>,
}

impl Level {
    /// Build a level. Invalid parameters are rejected here, never mid-tick.
    pub fn new(
        config: LevelConfig,
        sim: SimConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut ids = IdAllocator::default();
        let user = ids.adopt(UserPlane::new(config.player_health));

        Ok(Self {
            user,
            ids,
            rng: ChaCha8Rng::seed_from_u64(sim.seed),
            config,
            sim,
            clock,
            state: RunState::NotStarted,
            time: SimTime::default(),
            hostiles: Vec::new(),
            user_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            boss_spawned: false,
            exit_reported: false,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            lifecycle: None,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Process queued commands, advance one tick if running, and return the
    /// resulting snapshot.
    pub fn tick(&mut self) -> Result<GameStateSnapshot, SimError> {
        self.process_commands()?;

        if self.state == RunState::Running {
            self.run_systems()?;
            self.time.advance();
        }

        Ok(self.snapshot())
    }

    /// NotStarted -> Running.
    pub fn start(&mut self) {
        if self.state == RunState::NotStarted {
            self.set_state(RunState::Running);
        } else {
            tracing::warn!(state = ?self.state, "start ignored");
        }
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.set_state(RunState::Paused);
        } else {
            tracing::warn!(state = ?self.state, "pause ignored");
        }
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Paused {
            self.set_state(RunState::Running);
        } else {
            tracing::warn!(state = ?self.state, "resume ignored");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            state => tracing::warn!(?state, "toggle pause ignored"),
        }
    }

    /// Rebuild the level from its configuration and seed, then run it.
    pub fn restart(&mut self) {
        let mut ids = IdAllocator::default();
        self.user = ids.adopt(UserPlane::new(self.config.player_health));
        self.ids = ids;
        self.rng = ChaCha8Rng::seed_from_u64(self.sim.seed);
        self.time = SimTime::default();
        self.hostiles.clear();
        self.user_projectiles.clear();
        self.enemy_projectiles.clear();
        self.boss_spawned = false;
        self.exit_reported = false;
        self.events.clear();
        self.lifecycle = None;
        tracing::info!(level = %self.config.id, "level restarted");
        self.set_state(RunState::Running);
    }

    /// Close the exit window opened by a met objective.
    ///
    /// Called by the external scheduler once its transition animation ends.
    /// Entity state stays frozen. The completion is reported only once.
    pub fn finish_transition(&mut self) -> Result<LifecycleEvent, SimError> {
        if self.state != RunState::Transitioning {
            return Err(SimError::NotTransitioning { state: self.state });
        }
        if self.exit_reported {
            return Err(SimError::TransitionFinished);
        }
        self.exit_reported = true;
        let next = self.config.next_level.clone();
        tracing::info!(level = %self.config.id, next = ?next, "level complete");
        Ok(LifecycleEvent::LevelComplete { next })
    }

    /// Build a snapshot of the current state, draining pending events.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        let lifecycle = self.lifecycle.take();
        systems::snapshot::build_snapshot(
            &SnapshotInput {
                time: self.time,
                config: &self.config,
                state: self.state,
                user: &self.user,
                hostiles: &self.hostiles,
                user_projectiles: &self.user_projectiles,
                enemy_projectiles: &self.enemy_projectiles,
            },
            events,
            lifecycle,
        )
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn user(&self) -> &UserPlane {
        &self.user
    }

    pub fn hostiles(&self) -> &[Hostile] {
        &self.hostiles
    }

    pub fn user_projectiles(&self) -> &[Projectile] {
        &self.user_projectiles
    }

    pub fn enemy_projectiles(&self) -> &[Projectile] {
        &self.enemy_projectiles
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.hostiles.iter().find_map(Hostile::as_boss)
    }

    /// Context handed to entities: the user's current position, the screen
    /// and the wall clock.
    fn context(&self) -> TickContext {
        TickContext {
            user: self.user.body().position,
            screen: self.config.screen,
            now: self.clock.now(),
        }
    }

    fn set_state(&mut self, state: RunState) {
        tracing::info!(level = %self.config.id, from = ?self.state, to = ?state, "run state");
        self.state = state;
    }

    /// Process all queued commands.
    fn process_commands(&mut self) -> Result<(), SimError> {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command)?;
        }
        Ok(())
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), SimError> {
        match command {
            PlayerCommand::Start => self.start(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
            PlayerCommand::TogglePause => self.toggle_pause(),
            PlayerCommand::Restart => self.restart(),
            PlayerCommand::SetVolume { volume } => self.user.set_volume(volume),
            PlayerCommand::Move { direction } => {
                if !self.state.is_over() {
                    self.user.steer(direction);
                }
            }
            PlayerCommand::StopVertical => self.user.stop_vertical(),
            PlayerCommand::StopHorizontal => self.user.stop_horizontal(),
            PlayerCommand::Fire => self.fire_user()?,
        }
        Ok(())
    }

    fn fire_user(&mut self) -> Result<(), SimError> {
        if self.state != RunState::Running {
            tracing::warn!(state = ?self.state, "fire ignored");
            return Ok(());
        }
        let ctx = self.context();
        if let Some(shot) = self.user.fire(&ctx, &mut self.rng)? {
            self.user_projectiles.push(self.ids.adopt(shot));
            if self.user.volume() > 0.0 {
                self.events.push(GameEvent::ShotFired {
                    volume: self.user.volume(),
                });
            }
        }
        Ok(())
    }

    /// Run one tick of systems in order.
    fn run_systems(&mut self) -> Result<(), SimError> {
        // 1. Spawning
        let ctx = self.context();
        systems::spawner::run(
            &self.config,
            &mut self.hostiles,
            &mut self.enemy_projectiles,
            &mut self.ids,
            &mut self.boss_spawned,
            &ctx,
            &mut self.rng,
        )?;

        // 2. Movement: the user first, so everyone else sees where it went
        self.user.advance(&ctx, &mut self.rng);
        let ctx = self.context();
        for hostile in &mut self.hostiles {
            hostile.advance(&ctx, &mut self.rng);
        }
        for projectile in &mut self.user_projectiles {
            projectile.advance(&ctx, &mut self.rng);
        }
        for projectile in &mut self.enemy_projectiles {
            projectile.advance(&ctx, &mut self.rng);
        }

        // 3. Enemy fire
        for hostile in &mut self.hostiles {
            if hostile.is_destroyed() {
                continue;
            }
            if let Some(shot) = hostile.fire(&ctx, &mut self.rng)? {
                self.enemy_projectiles.push(self.ids.adopt(shot));
            }
        }

        // 4. Collisions
        let report = systems::collision::run(
            &mut self.user,
            &mut self.hostiles,
            &mut self.user_projectiles,
            &mut self.enemy_projectiles,
            &self.config.screen,
        )?;
        self.collect_boss_events();
        self.events.extend(report.events);

        // 5. Cleanup
        systems::cleanup::run(
            &mut self.hostiles,
            &mut self.user_projectiles,
            &mut self.enemy_projectiles,
        );

        // 6. Counters
        self.user.record_kills(report.kills);

        // 7. Progression
        match systems::progression::evaluate(
            &self.config,
            &self.user,
            &self.hostiles,
            self.boss_spawned,
        ) {
            Verdict::Continue => {}
            Verdict::Lost => {
                self.set_state(RunState::Lost);
                self.lifecycle = Some(LifecycleEvent::PlayerDefeated);
            }
            Verdict::ObjectiveMet => match self.config.next_level {
                Some(_) => self.set_state(RunState::Transitioning),
                None => {
                    self.set_state(RunState::Won);
                    self.lifecycle = Some(LifecycleEvent::LevelComplete { next: None });
                }
            },
        }

        Ok(())
    }

    fn collect_boss_events(&mut self) {
        for hostile in &mut self.hostiles {
            if let Some(boss) = hostile.as_boss_mut() {
                self.events.extend(boss.drain_events());
            }
        }
    }
}

/// Test hooks for placing entities and forcing counters.
#[cfg(test)]
impl Level {
    pub(crate) fn user_mut(&mut self) -> &mut UserPlane {
        &mut self.user
    }

    pub(crate) fn boss_mut(&mut self) -> Option<&mut Boss> {
        self.hostiles.iter_mut().find_map(Hostile::as_boss_mut)
    }

    pub(crate) fn spawn_fighter_at(
        &mut self,
        position: skyraid_core::types::Position,
    ) -> skyraid_core::types::EntityId {
        let fighter = self.ids.adopt(Hostile::Fighter(crate::entities::EnemyPlane::new(position)));
        let id = fighter.id();
        self.hostiles.push(fighter);
        id
    }

    pub(crate) fn spawn_user_projectile_at(
        &mut self,
        position: skyraid_core::types::Position,
    ) -> skyraid_core::types::EntityId {
        let shot = self.ids.adopt(Projectile::user(position));
        let id = shot.id();
        self.user_projectiles.push(shot);
        id
    }

    pub(crate) fn spawn_enemy_projectile_at(
        &mut self,
        position: skyraid_core::types::Position,
    ) -> skyraid_core::types::EntityId {
        let shot = self.ids.adopt(Projectile::enemy(position));
        let id = shot.id();
        self.enemy_projectiles.push(shot);
        id
    }
}
