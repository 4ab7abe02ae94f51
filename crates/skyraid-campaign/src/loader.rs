//! JSON level tables.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use skyraid_core::config::LevelConfig;

use crate::error::CampaignError;

/// A campaign as stored on disk. The first level is where play starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    pub levels: Vec<LevelConfig>,
}

pub fn parse_table(json: &str) -> Result<LevelTable, CampaignError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_table(path: &Path) -> Result<LevelTable, CampaignError> {
    let json = fs::read_to_string(path).map_err(|source| CampaignError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_table(&json)?;
    tracing::info!(path = %path.display(), levels = table.levels.len(), "loaded level table");
    Ok(table)
}

pub fn save_table(path: &Path, table: &LevelTable) -> Result<(), CampaignError> {
    let json = serde_json::to_string_pretty(table)?;
    fs::write(path, json).map_err(|source| CampaignError::Io {
        path: path.to_path_buf(),
        source,
    })
}
