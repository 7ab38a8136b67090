//! Simulate command implementation
//!
//! Drives an in-memory rig through a scripted sequence of action requests at
//! a fixed frame rate and reports what the live joints did.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use rigpose_core::{Action, Engine, EngineConfig, FrameClock, Pose, PuppetRig};
use serde::Serialize;
use std::process::ExitCode;

use super::load_config;
use super::pose::print_pose;
use crate::script::Script;

/// Frame rate used when neither the script nor the command line sets one.
pub const DEFAULT_FPS: f64 = 60.0;

/// Seconds simulated past the last event when no duration is given.
pub const DEFAULT_TAIL: f64 = 2.0;

/// Command-line overrides for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulateOptions {
    pub fps: Option<f64>,
    pub duration: Option<f64>,
    /// Record every Nth frame; the last frame is always recorded.
    pub every: usize,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            fps: None,
            duration: None,
            every: 1,
        }
    }
}

/// Live rig state at one recorded frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSample {
    pub frame: usize,
    pub elapsed: f64,
    pub action: Action,
    pub progress: f64,
    pub live: Pose,
    pub eye_scale: f64,
    /// True if either resolver pass hit its iteration cap this frame.
    pub capped: bool,
}

/// Result of a whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub fps: f64,
    pub duration: f64,
    pub frames: usize,
    pub capped_frames: usize,
    pub samples: Vec<FrameSample>,
    pub final_rig: PuppetRig,
}

/// Runs `script` against a fresh engine built from `config`.
pub fn simulate(
    script: &Script,
    config: &EngineConfig,
    options: &SimulateOptions,
) -> Result<SimulationResult> {
    let timeline = script.timeline()?;

    let fps = options.fps.or(script.fps).unwrap_or(DEFAULT_FPS);
    if !fps.is_finite() || fps <= 0.0 {
        bail!("fps must be finite and positive, got {}", fps);
    }
    let duration = options
        .duration
        .or(script.duration)
        .unwrap_or_else(|| script.last_event_time() + DEFAULT_TAIL);
    if !duration.is_finite() || duration < 0.0 {
        bail!("duration must be finite and >= 0, got {}", duration);
    }

    let mut engine = Engine::new(config.clone()).context("Invalid engine config")?;
    let mut rig = PuppetRig::new();
    let every = options.every.max(1);
    let frames = (duration * fps).round() as usize;

    let mut pending = timeline.into_iter().peekable();
    let mut samples = Vec::new();
    let mut capped_frames = 0;

    for frame in 0..=frames {
        let elapsed = frame as f64 / fps;
        let dt = if frame == 0 { 0.0 } else { 1.0 / fps };

        while let Some(event) = pending.next_if(|e| e.at <= elapsed) {
            engine.set_action(event.action);
        }

        let report = engine.frame(FrameClock::new(elapsed, dt), &mut rig);
        let capped = report
            .target_outcomes
            .iter()
            .chain(report.live_outcomes.iter())
            .any(|o| !o.is_cleared());
        if capped {
            capped_frames += 1;
        }

        if frame % every == 0 || frame == frames {
            samples.push(FrameSample {
                frame,
                elapsed,
                action: report.state.current,
                progress: report.state.progress,
                live: rig.pose,
                eye_scale: rig.eye_scale,
                capped,
            });
        }
    }

    tracing::debug!(frames, capped_frames, "simulation finished");
    Ok(SimulationResult {
        fps,
        duration,
        frames: frames + 1,
        capped_frames,
        samples,
        final_rig: rig,
    })
}

/// Run the simulate command
///
/// # Arguments
/// * `script_path` - Path to the script JSON
/// * `config_path` - Optional engine config file
/// * `options` - Frame rate, duration and sampling overrides
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(
    script_path: &str,
    config_path: Option<&str>,
    options: SimulateOptions,
    json_output: bool,
) -> Result<ExitCode> {
    let script = Script::load(script_path)
        .with_context(|| format!("Failed to load script: {}", script_path))?;
    let config = load_config(config_path)?;
    let result = simulate(&script, &config, &options)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize simulation")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Simulating:".cyan().bold(), script_path);
    println!(
        "{} {} frames at {} fps ({:.2}s)",
        "Frames:".dimmed(),
        result.frames,
        result.fps,
        result.duration
    );

    for s in &result.samples {
        let marker = if s.capped {
            "!".yellow().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {:>6} {:>7.3}s  {:<8} {:>5.2}  arm_r pitch {:>7.3}  elbow_r {:>6.3}  eyes {:.2}",
            marker,
            s.frame,
            s.elapsed,
            s.action.as_str().green(),
            s.progress,
            s.live.shoulder_r.pitch,
            s.live.elbow_r,
            s.eye_scale
        );
    }

    if result.capped_frames > 0 {
        println!(
            "{} {} frame(s) left an arm intersecting the torso",
            "!".yellow(),
            result.capped_frames
        );
    }

    println!("{}", "Final live pose:".cyan().bold());
    print_pose(&result.final_rig.pose);
    Ok(ExitCode::SUCCESS)
}
