//! Level progression for SKYRAID.
//!
//! Maps level identifiers to level configurations, defines the standard
//! three-level campaign, loads level tables from JSON and routes lifecycle
//! events from a finished level to the next one.

pub mod campaign;
pub mod error;
pub mod levels;
pub mod loader;
pub mod registry;

pub use campaign::{Campaign, Navigation};
pub use error::CampaignError;
pub use registry::LevelRegistry;
pub use skyraid_core as core;
