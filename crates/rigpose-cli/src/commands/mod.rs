//! CLI command implementations

pub mod actions;
pub mod config;
pub mod pose;
pub mod simulate;

use anyhow::{Context, Result};
use rigpose_core::EngineConfig;

/// Loads an engine config file, or the built-in defaults when no path is given.
pub(crate) fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path)),
        None => Ok(EngineConfig::default()),
    }
}
