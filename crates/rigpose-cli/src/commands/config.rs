//! Config command implementation
//!
//! Validates an engine config file and prints the effective configuration
//! with all defaults filled in.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use super::load_config;

/// Run the config command
///
/// # Returns
/// Exit code 0 when the config is valid; invalid configs surface as errors.
pub fn run(config_path: Option<&str>, json_output: bool) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let rendered = config
        .to_json_pretty()
        .context("Failed to serialize config")?;

    if json_output {
        println!("{}", rendered);
        return Ok(ExitCode::SUCCESS);
    }

    match config_path {
        Some(path) => println!("{} {}", "Config OK:".green().bold(), path),
        None => println!("{}", "Built-in defaults:".cyan().bold()),
    }
    println!("{}", rendered);
    Ok(ExitCode::SUCCESS)
}
