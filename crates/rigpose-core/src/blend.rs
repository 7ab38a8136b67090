//! Action state machine and eased cross-fading between actions.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::library::evaluate;
use crate::math::{sanitize_dt, smoothstep};
use crate::pose::Pose;

/// Snapshot of the blender's action state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionState {
    /// The action being blended toward.
    pub current: Action,
    /// The action being blended away from.
    pub previous: Action,
    /// Elapsed time at which `current` started.
    pub current_start: f64,
    /// Elapsed time at which `previous` started.
    pub previous_start: f64,
    /// Transition progress in `[0, 1]`.
    pub progress: f64,
    /// Seconds for a full transition.
    pub transition_duration: f64,
}

impl ActionState {
    /// Initial state: idle on both sides, transition complete.
    pub fn initial(transition_duration: f64) -> Self {
        Self {
            current: Action::Idle,
            previous: Action::Idle,
            current_start: 0.0,
            previous_start: 0.0,
            progress: 1.0,
            transition_duration,
        }
    }

    /// Eased blend weight of the current action.
    pub fn alpha(&self) -> f64 {
        smoothstep(self.progress)
    }

    /// Returns true once the transition has completed.
    pub fn is_settled(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Blends the outgoing and incoming action poses over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseBlender {
    state: ActionState,
}

impl PoseBlender {
    /// Creates a blender resting in idle.
    ///
    /// `transition_duration` must be positive; [`EngineConfig::validate`]
    /// guarantees this for engine-built blenders.
    ///
    /// [`EngineConfig::validate`]: crate::EngineConfig::validate
    pub fn new(transition_duration: f64) -> Self {
        Self {
            state: ActionState::initial(transition_duration),
        }
    }

    pub fn state(&self) -> &ActionState {
        &self.state
    }

    pub fn current(&self) -> Action {
        self.state.current
    }

    /// Starts a transition to `action` at elapsed time `now`.
    ///
    /// Requesting the current action does nothing. Returns whether the state
    /// changed.
    pub fn set_action(&mut self, action: Action, now: f64) -> bool {
        let s = &mut self.state;
        if action == s.current {
            return false;
        }
        tracing::debug!(
            from = s.current.as_str(),
            to = action.as_str(),
            at = now,
            "action change"
        );
        s.previous = s.current;
        s.previous_start = s.current_start;
        s.current = action;
        s.current_start = now;
        s.progress = 0.0;
        true
    }

    /// Advances the transition by `dt` and returns the blended target pose.
    pub fn update(&mut self, elapsed: f64, dt: f64) -> Pose {
        let s = &mut self.state;
        let prev_local = (elapsed - s.previous_start).max(0.0);
        let curr_local = (elapsed - s.current_start).max(0.0);
        let from = evaluate(s.previous, prev_local);
        let to = evaluate(s.current, curr_local);

        s.progress = (s.progress + sanitize_dt(dt) / s.transition_duration).min(1.0);
        blend(&from, &to, s.alpha())
    }
}

/// Blends two poses with weight `alpha` on `to`.
pub fn blend(from: &Pose, to: &Pose, alpha: f64) -> Pose {
    from.lerp(to, alpha)
}
