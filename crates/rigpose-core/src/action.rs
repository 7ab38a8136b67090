//! Action identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ActionParseError;

/// A named discrete motion intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Standing rest; sway comes from the secondary layer.
    #[default]
    Idle,
    /// Right arm raised and waving.
    Wave,
    /// Both arms forming a heart in front of the chest.
    Heart,
    /// Swaying dance with stepping legs.
    Dance,
    /// Slow full turn on the spot.
    Spin,
    /// Both arms curled inward for a hug.
    Hug,
    /// Patting motion toward a comforted subject.
    Comfort,
    /// Presenting a flower with the right hand.
    Flower,
}

impl Action {
    /// Every action, in menu order.
    pub const ALL: [Action; 8] = [
        Action::Idle,
        Action::Wave,
        Action::Heart,
        Action::Dance,
        Action::Spin,
        Action::Hug,
        Action::Comfort,
        Action::Flower,
    ];

    /// Returns the action name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Wave => "wave",
            Action::Heart => "heart",
            Action::Dance => "dance",
            Action::Spin => "spin",
            Action::Hug => "hug",
            Action::Comfort => "comfort",
            Action::Flower => "flower",
        }
    }

    /// Actions whose arms deliberately reach in front of the torso.
    ///
    /// Collision resolution uses a smaller forward nudge for these so the
    /// reach is kept instead of being pushed away.
    pub fn is_forward_reaching(&self) -> bool {
        matches!(self, Action::Flower | Action::Heart | Action::Hug)
    }

    /// Parses an action name, falling back to [`Action::Idle`] for unknown names.
    pub fn from_name_lenient(name: &str) -> Action {
        match name.parse() {
            Ok(action) => action,
            Err(err) => {
                tracing::warn!("{}; treating as idle", err);
                Action::Idle
            }
        }
    }

    fn expected_names() -> String {
        Action::ALL
            .iter()
            .map(Action::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| ActionParseError {
                name: s.to_string(),
                expected: Action::expected_names(),
            })
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
