//! Campaign errors.

use std::path::PathBuf;

use thiserror::Error;

use skyraid_core::config::LevelId;
use skyraid_core::error::ConfigError;

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("unknown level `{0}`")]
    UnknownLevel(LevelId),

    #[error("level `{0}` is registered twice")]
    DuplicateLevel(LevelId),

    #[error("level `{level}` continues to unknown level `{next}`")]
    DanglingNext { level: LevelId, next: LevelId },

    #[error("level table has no levels")]
    EmptyTable,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to access level table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse level table: {0}")]
    Json(#[from] serde_json::Error),
}
