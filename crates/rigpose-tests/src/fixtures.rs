//! Test fixture utilities for engines, rigs and script files.

use std::fs;
use std::path::{Path, PathBuf};

use rigpose_core::{Engine, EngineConfig, FrameClock, FrameReport, PuppetRig};
use tempfile::TempDir;

/// Tolerance for float comparisons in scenario tests.
pub const EPS: f64 = 1e-9;

/// Returns true if `a` and `b` differ by less than [`EPS`].
pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

/// An engine, a rig and a fixed-step clock.
pub struct Harness {
    pub engine: Engine,
    pub rig: PuppetRig,
    pub clock: FrameClock,
    pub step: f64,
}

impl Harness {
    /// Create a harness with default tuning at the given frame rate.
    pub fn new(fps: f64) -> Self {
        Self::with_config(EngineConfig::default(), fps)
    }

    /// Create a harness with custom tuning.
    pub fn with_config(config: EngineConfig, fps: f64) -> Self {
        Self {
            engine: Engine::new(config).expect("test config should be valid"),
            rig: PuppetRig::new(),
            clock: FrameClock::new(0.0, 0.0),
            step: 1.0 / fps,
        }
    }

    /// Run one frame at the current clock, then advance it.
    pub fn step(&mut self) -> FrameReport {
        let report = self.engine.frame(self.clock, &mut self.rig);
        self.clock = self.clock.advance(self.step);
        report
    }

    /// Run `n` frames and return the last report.
    pub fn run(&mut self, n: usize) -> Option<FrameReport> {
        (0..n).map(|_| self.step()).last()
    }
}

/// A temp directory holding script and config files for CLI tests.
pub struct ScriptFixture {
    pub root: TempDir,
}

impl ScriptFixture {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write a file into the fixture and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    /// Write a script from `(at, action)` pairs.
    pub fn add_script(&self, name: &str, events: &[(f64, &str)], duration: Option<f64>) -> PathBuf {
        let events: Vec<_> = events
            .iter()
            .map(|(at, action)| serde_json::json!({ "at": at, "action": action }))
            .collect();
        let mut doc = serde_json::json!({ "events": events });
        if let Some(duration) = duration {
            doc["duration"] = serde_json::json!(duration);
        }
        self.write(name, &doc.to_string())
    }
}

impl Default for ScriptFixture {
    fn default() -> Self {
        Self::new()
    }
}
