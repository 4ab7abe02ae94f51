//! Level registry: level identifier -> constructor.
//!
//! Resolution happens at the orchestration boundary. The simulation never
//! constructs levels by name itself.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use skyraid_core::config::{LevelConfig, LevelId};
use skyraid_sim::clock::Clock;
use skyraid_sim::{Level, SimConfig};

use crate::error::CampaignError;
use crate::levels;
use crate::loader::{self, LevelTable};

/// Builds a fresh configuration for one level.
pub type LevelConstructor = Box<dyn Fn() -> LevelConfig + Send + Sync>;

/// Registered levels, in registration order.
#[derive(Default)]
pub struct LevelRegistry {
    constructors: HashMap<LevelId, LevelConstructor>,
    order: Vec<LevelId>,
}

impl fmt::Debug for LevelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelRegistry")
            .field("levels", &self.order)
            .finish()
    }
}

impl LevelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard three-level campaign.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (id, constructor) in levels::standard() {
            registry.insert(LevelId::new(id), constructor);
        }
        registry
    }

    /// Build a registry from explicit configurations, validating each one and
    /// every `next_level` link.
    pub fn from_configs(configs: Vec<LevelConfig>) -> Result<Self, CampaignError> {
        if configs.is_empty() {
            return Err(CampaignError::EmptyTable);
        }

        let mut registry = Self::new();
        for config in configs {
            config.validate()?;
            let id = config.id.clone();
            registry.register(id, move || config.clone())?;
        }
        registry.check_links()?;
        Ok(registry)
    }

    pub fn from_table(table: LevelTable) -> Result<Self, CampaignError> {
        Self::from_configs(table.levels)
    }

    /// Load a registry from a JSON level table.
    pub fn load(path: &Path) -> Result<Self, CampaignError> {
        Self::from_table(loader::load_table(path)?)
    }

    /// Register a constructor. Ids must be unique.
    pub fn register(
        &mut self,
        id: LevelId,
        constructor: impl Fn() -> LevelConfig + Send + Sync + 'static,
    ) -> Result<(), CampaignError> {
        if self.constructors.contains_key(&id) {
            return Err(CampaignError::DuplicateLevel(id));
        }
        self.insert(id, constructor);
        Ok(())
    }

    fn insert(&mut self, id: LevelId, constructor: impl Fn() -> LevelConfig + Send + Sync + 'static) {
        self.order.push(id.clone());
        self.constructors.insert(id, Box::new(constructor));
    }

    /// First registered level: where a campaign starts.
    pub fn first(&self) -> Option<&LevelId> {
        self.order.first()
    }

    pub fn ids(&self) -> &[LevelId] {
        &self.order
    }

    pub fn contains(&self, id: &LevelId) -> bool {
        self.constructors.contains_key(id)
    }

    /// Construct the configuration registered under `id`.
    pub fn resolve(&self, id: &LevelId) -> Result<LevelConfig, CampaignError> {
        self.constructors
            .get(id)
            .map(|constructor| constructor())
            .ok_or_else(|| CampaignError::UnknownLevel(id.clone()))
    }

    /// Resolve `id` and build a ready-to-start level.
    pub fn build(
        &self,
        id: &LevelId,
        sim: SimConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Level, CampaignError> {
        let config = self.resolve(id)?;
        Ok(Level::new(config, sim, clock)?)
    }

    /// Every `next_level` must name a registered level.
    pub fn check_links(&self) -> Result<(), CampaignError> {
        for id in &self.order {
            let config = self.resolve(id)?;
            if let Some(next) = config.next_level {
                if !self.contains(&next) {
                    return Err(CampaignError::DanglingNext {
                        level: id.clone(),
                        next,
                    });
                }
            }
        }
        Ok(())
    }

    /// Snapshot every registered level as a table, in registration order.
    pub fn to_table(&self) -> Result<LevelTable, CampaignError> {
        let levels = self
            .order
            .iter()
            .map(|id| self.resolve(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LevelTable { levels })
    }
}
