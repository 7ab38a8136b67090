//! Pose command implementation
//!
//! Samples the action library at a single local time, optionally applying
//! the joint limits and collision resolver of the configured engine.

use anyhow::{Context, Result};
use colored::Colorize;
use rigpose_core::{evaluate, Action, CollisionResolver, EngineConfig, Pose, ResolveOutcome};
use serde::Serialize;
use std::process::ExitCode;

use super::load_config;

/// How much of the constraint pipeline to apply to the sampled pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoseOptions {
    /// Clamp shoulders and elbows to the limit table.
    pub clamp: bool,
    /// Clamp, then push the arms out of the torso.
    pub resolve: bool,
}

/// A sampled pose and, when resolved, the per-arm outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseSample {
    pub action: Action,
    pub time: f64,
    pub pose: Pose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<[ResolveOutcome; 2]>,
}

/// Evaluates `action` at `time` under `config`.
pub fn sample(action: Action, time: f64, config: &EngineConfig, options: PoseOptions) -> PoseSample {
    let mut pose = evaluate(action, time);
    let mut outcomes = None;

    if options.clamp || options.resolve {
        pose = config.limits.clamp(&pose);
    }
    if options.resolve {
        let resolver = CollisionResolver::new(
            config.torso,
            config.arm.clone(),
            config.limits,
            config.resolver,
        );
        let (resolved, result) = resolver.resolve(&pose, action);
        pose = resolved;
        outcomes = Some(result);
    }

    PoseSample {
        action,
        time,
        pose,
        outcomes,
    }
}

/// Run the pose command
///
/// # Arguments
/// * `action_name` - Action to sample (strict; unknown names are an error)
/// * `time` - Local time in seconds since the action started
/// * `config_path` - Optional engine config file
/// * `options` - Constraint stages to apply
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(
    action_name: &str,
    time: f64,
    config_path: Option<&str>,
    options: PoseOptions,
    json_output: bool,
) -> Result<ExitCode> {
    let action: Action = action_name.parse()?;
    let config = load_config(config_path)?;
    let result = sample(action, time, &config, options);

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize pose")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} at t={:.3}s",
        "Pose:".cyan().bold(),
        action.as_str().green(),
        time
    );
    print_pose(&result.pose);

    if let Some(outcomes) = &result.outcomes {
        for (label, outcome) in ["left", "right"].iter().zip(outcomes.iter()) {
            print_outcome(label, outcome);
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn print_pose(pose: &Pose) {
    let rows = [
        ("body", pose.body.as_array()),
        ("head", pose.head.as_array()),
        ("shoulder_l", pose.shoulder_l.as_array()),
        ("shoulder_r", pose.shoulder_r.as_array()),
        ("leg_l", pose.leg_l.as_array()),
        ("leg_r", pose.leg_r.as_array()),
    ];
    for (name, [pitch, yaw, roll]) in rows {
        println!(
            "  {:<11} pitch {:>7.3}  yaw {:>7.3}  roll {:>7.3}",
            name, pitch, yaw, roll
        );
    }
    println!(
        "  {:<11} left {:>7.3}  right {:>7.3}",
        "elbows", pose.elbow_l, pose.elbow_r
    );
    println!(
        "  {:<11} y {:>7.3}  yaw {:>7.3}",
        "root", pose.root_y, pose.root_yaw
    );
    if pose.show_heart {
        println!("  {}", "heart shown".magenta());
    }
    if pose.show_flower {
        println!("  {}", "flower shown".magenta());
    }
}

pub(crate) fn print_outcome(label: &str, outcome: &ResolveOutcome) {
    match outcome {
        ResolveOutcome::Cleared {
            iterations,
            min_field,
        } => println!(
            "  {} {} arm clear after {} iteration(s) (min field {:.3})",
            "ok".green(),
            label,
            iterations,
            min_field
        ),
        ResolveOutcome::Capped {
            iterations,
            residual,
        } => println!(
            "  {} {} arm still intersecting after {} iteration(s) (min field {:.3})",
            "!".yellow(),
            label,
            iterations,
            residual
        ),
    }
}
