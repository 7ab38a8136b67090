//! Action scripts for the `simulate` command.
//!
//! A script is a JSON document listing timed action requests:
//!
//! ```json
//! {
//!   "fps": 60,
//!   "duration": 4.0,
//!   "events": [
//!     { "at": 0.0, "action": "wave" },
//!     { "at": 1.5, "action": "heart" }
//!   ]
//! }
//! ```

use std::path::Path;

use rigpose_core::{Action, ActionParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("script JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("events[{index}]: {source}")]
    UnknownAction {
        index: usize,
        #[source]
        source: ActionParseError,
    },

    #[error("events[{index}].at must be finite and >= 0, got {at}")]
    InvalidTime { index: usize, at: f64 },

    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// One timed action request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptEvent {
    /// Seconds from the start of the simulation.
    pub at: f64,
    /// Action name.
    pub action: String,
}

/// A parsed script document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
    /// Frames per second; overridable on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    /// Seconds to simulate; overridable on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// A validated event with its action resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedAction {
    pub at: f64,
    pub action: Action,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validates every event and returns them sorted by time.
    ///
    /// Events sharing a timestamp keep their document order.
    pub fn timeline(&self) -> Result<Vec<TimedAction>, ScriptError> {
        for (field, value) in [("fps", self.fps), ("duration", self.duration)] {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ScriptError::NotPositive { field, value });
                }
            }
        }

        let mut timeline = self
            .events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                if !event.at.is_finite() || event.at < 0.0 {
                    return Err(ScriptError::InvalidTime {
                        index,
                        at: event.at,
                    });
                }
                let action = event
                    .action
                    .parse::<Action>()
                    .map_err(|source| ScriptError::UnknownAction { index, source })?;
                Ok(TimedAction {
                    at: event.at,
                    action,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        timeline.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(timeline)
    }

    /// Time of the last event, or 0 for an empty script.
    pub fn last_event_time(&self) -> f64 {
        self.events.iter().map(|e| e.at).fold(0.0, f64::max)
    }
}
