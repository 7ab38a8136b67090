//! Actions command implementation
//!
//! Lists every action the engine understands.

use anyhow::Result;
use colored::Colorize;
use rigpose_core::Action;
use serde::Serialize;
use std::process::ExitCode;

/// One row of the action listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionInfo {
    pub name: &'static str,
    pub forward_reaching: bool,
}

/// Describes every action, in menu order.
pub fn list() -> Vec<ActionInfo> {
    Action::ALL
        .iter()
        .map(|action| ActionInfo {
            name: action.as_str(),
            forward_reaching: action.is_forward_reaching(),
        })
        .collect()
}

/// Run the actions command
pub fn run(json_output: bool) -> Result<ExitCode> {
    let infos = list();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Actions:".cyan().bold());
    for info in &infos {
        let note = if info.forward_reaching {
            "forward-reaching".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {:<10} {}", info.name.green(), note);
    }
    Ok(ExitCode::SUCCESS)
}
