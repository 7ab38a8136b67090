//! rigpose CLI - Command-line host for the procedural pose engine
//!
//! This binary lists actions, samples individual poses and runs scripted
//! simulations against an in-memory rig.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rigpose_cli::commands;
use rigpose_cli::commands::pose::PoseOptions;
use rigpose_cli::commands::simulate::SimulateOptions;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "RIGPOSE_LOG";

/// rigpose - Procedural Pose and Constraint Engine
#[derive(Parser)]
#[command(name = "rigpose")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every action the engine understands
    Actions {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Sample an action's target pose at a local time
    Pose {
        /// Action name (idle, wave, heart, dance, spin, hug, comfort, flower)
        #[arg(short, long)]
        action: String,

        /// Seconds since the action started
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,

        /// Path to an engine config file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Clamp shoulders and elbows to the joint limits
        #[arg(long)]
        clamp: bool,

        /// Clamp, then push the arms out of the torso
        #[arg(long)]
        resolve: bool,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a scripted sequence of actions against an in-memory rig
    Simulate {
        /// Path to the script file (JSON)
        #[arg(short, long)]
        script: String,

        /// Path to an engine config file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Frames per second (overrides the script)
        #[arg(long)]
        fps: Option<f64>,

        /// Seconds to simulate (overrides the script)
        #[arg(long)]
        duration: Option<f64>,

        /// Record every Nth frame
        #[arg(long, default_value_t = 6)]
        every: usize,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an engine config and print the effective values
    Config {
        /// Path to an engine config file (JSON); defaults when omitted
        #[arg(short, long)]
        config: Option<String>,

        /// Output machine-readable JSON only
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Actions { json } => commands::actions::run(json),
        Commands::Pose {
            action,
            time,
            config,
            clamp,
            resolve,
            json,
        } => commands::pose::run(
            &action,
            time,
            config.as_deref(),
            PoseOptions { clamp, resolve },
            json,
        ),
        Commands::Simulate {
            script,
            config,
            fps,
            duration,
            every,
            json,
        } => commands::simulate::run(
            &script,
            config.as_deref(),
            SimulateOptions {
                fps,
                duration,
                every,
            },
            json,
        ),
        Commands::Config { config, json } => commands::config::run(config.as_deref(), json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
