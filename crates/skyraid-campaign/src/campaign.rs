//! Campaign: routes lifecycle events from one level to the next.

use std::sync::Arc;

use skyraid_core::config::LevelId;
use skyraid_core::events::LifecycleEvent;
use skyraid_sim::clock::Clock;
use skyraid_sim::{Level, SimConfig};

use crate::error::CampaignError;
use crate::registry::LevelRegistry;

/// Where play goes after a lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Continue with this level.
    Next(LevelId),
    /// The final level was cleared.
    Finished,
    /// The player was shot down; restart or leave.
    Defeated,
}

/// Progress through a registry of levels.
pub struct Campaign {
    registry: LevelRegistry,
    current: LevelId,
    sim: SimConfig,
    clock: Arc<dyn Clock>,
}

impl Campaign {
    /// Start a campaign at `start`, which must be registered.
    pub fn new(
        registry: LevelRegistry,
        start: LevelId,
        sim: SimConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CampaignError> {
        if !registry.contains(&start) {
            return Err(CampaignError::UnknownLevel(start));
        }
        Ok(Self {
            registry,
            current: start,
            sim,
            clock,
        })
    }

    /// Start at the registry's first level.
    pub fn from_first(
        registry: LevelRegistry,
        sim: SimConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CampaignError> {
        let start = registry.first().cloned().ok_or(CampaignError::EmptyTable)?;
        Self::new(registry, start, sim, clock)
    }

    pub fn current(&self) -> &LevelId {
        &self.current
    }

    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    /// Build the current level.
    pub fn build_current(&self) -> Result<Level, CampaignError> {
        self.registry
            .build(&self.current, self.sim, Arc::clone(&self.clock))
    }

    /// Apply a lifecycle event surfaced by the current level.
    pub fn route(&mut self, event: &LifecycleEvent) -> Result<Navigation, CampaignError> {
        match event {
            LifecycleEvent::LevelComplete { next: Some(next) } => {
                if !self.registry.contains(next) {
                    return Err(CampaignError::UnknownLevel(next.clone()));
                }
                tracing::info!(from = %self.current, to = %next, "advancing campaign");
                self.current = next.clone();
                Ok(Navigation::Next(next.clone()))
            }
            LifecycleEvent::LevelComplete { next: None } => {
                tracing::info!(level = %self.current, "campaign complete");
                Ok(Navigation::Finished)
            }
            LifecycleEvent::PlayerDefeated => {
                tracing::info!(level = %self.current, "player defeated");
                Ok(Navigation::Defeated)
            }
        }
    }

    /// Go back to the first level.
    pub fn reset(&mut self) {
        if let Some(first) = self.registry.first() {
            self.current = first.clone();
        }
    }
}
