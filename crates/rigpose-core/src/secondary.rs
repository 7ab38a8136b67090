//! Secondary motion layered on top of the constrained pose.
//!
//! Sway, idle head drift, blinking and the heart pulse are driven by the
//! global elapsed time, not by any action's local clock, so they never reset
//! on action changes.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ConfigError;
use crate::math::{damp, smoothing_factor};
use crate::pose::Pose;

/// Amplitudes and frequencies of the secondary layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecondaryConfig {
    /// Root bob frequency (rad/s).
    #[serde(default = "default_root_bob_freq")]
    pub root_bob_freq: f64,
    /// Root bob amplitude.
    #[serde(default = "default_root_bob_amp")]
    pub root_bob_amp: f64,
    /// Body roll sway frequency (rad/s).
    #[serde(default = "default_body_sway_freq")]
    pub body_sway_freq: f64,
    /// Body roll sway amplitude (radians).
    #[serde(default = "default_body_sway_amp")]
    pub body_sway_amp: f64,
    /// Head yaw drift frequency while idle (rad/s).
    #[serde(default = "default_idle_head_freq")]
    pub idle_head_freq: f64,
    /// Head yaw drift amplitude while idle (radians).
    #[serde(default = "default_idle_head_amp")]
    pub idle_head_amp: f64,
    /// Blink trigger frequency (rad/s).
    #[serde(default = "default_blink_freq")]
    pub blink_freq: f64,
    /// A blink starts while `sin(blink_freq·t)` exceeds this.
    #[serde(default = "default_blink_threshold")]
    pub blink_threshold: f64,
    /// Eye scale at the bottom of a blink; also the eye scale floor.
    #[serde(default = "default_blink_closed")]
    pub blink_closed: f64,
    /// Rate at which the eyes reopen.
    #[serde(default = "default_blink_recovery_rate")]
    pub blink_recovery_rate: f64,
    /// Heart pulse frequency (rad/s).
    #[serde(default = "default_heart_pulse_freq")]
    pub heart_pulse_freq: f64,
    /// Heart scale at rest.
    #[serde(default = "default_heart_scale")]
    pub heart_scale: f64,
    /// Relative heart scale swing.
    #[serde(default = "default_heart_scale_amp")]
    pub heart_scale_amp: f64,
    /// Minimum heart opacity.
    #[serde(default = "default_heart_opacity")]
    pub heart_opacity: f64,
    /// Heart opacity swing above the minimum.
    #[serde(default = "default_heart_opacity_amp")]
    pub heart_opacity_amp: f64,
}

fn default_root_bob_freq() -> f64 {
    2.1
}

fn default_root_bob_amp() -> f64 {
    0.013
}

fn default_body_sway_freq() -> f64 {
    1.3
}

fn default_body_sway_amp() -> f64 {
    0.03
}

fn default_idle_head_freq() -> f64 {
    0.9
}

fn default_idle_head_amp() -> f64 {
    0.06
}

fn default_blink_freq() -> f64 {
    2.9
}

fn default_blink_threshold() -> f64 {
    0.992
}

fn default_blink_closed() -> f64 {
    0.2
}

fn default_blink_recovery_rate() -> f64 {
    14.0
}

fn default_heart_pulse_freq() -> f64 {
    6.0
}

fn default_heart_scale() -> f64 {
    0.45
}

fn default_heart_scale_amp() -> f64 {
    0.14
}

fn default_heart_opacity() -> f64 {
    0.66
}

fn default_heart_opacity_amp() -> f64 {
    0.26
}

impl Default for SecondaryConfig {
    fn default() -> Self {
        Self {
            root_bob_freq: default_root_bob_freq(),
            root_bob_amp: default_root_bob_amp(),
            body_sway_freq: default_body_sway_freq(),
            body_sway_amp: default_body_sway_amp(),
            idle_head_freq: default_idle_head_freq(),
            idle_head_amp: default_idle_head_amp(),
            blink_freq: default_blink_freq(),
            blink_threshold: default_blink_threshold(),
            blink_closed: default_blink_closed(),
            blink_recovery_rate: default_blink_recovery_rate(),
            heart_pulse_freq: default_heart_pulse_freq(),
            heart_scale: default_heart_scale(),
            heart_scale_amp: default_heart_scale_amp(),
            heart_opacity: default_heart_opacity(),
            heart_opacity_amp: default_heart_opacity_amp(),
        }
    }
}

impl SecondaryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("secondary.root_bob_freq", self.root_bob_freq),
            ("secondary.root_bob_amp", self.root_bob_amp),
            ("secondary.body_sway_freq", self.body_sway_freq),
            ("secondary.body_sway_amp", self.body_sway_amp),
            ("secondary.idle_head_freq", self.idle_head_freq),
            ("secondary.idle_head_amp", self.idle_head_amp),
            ("secondary.blink_freq", self.blink_freq),
            ("secondary.blink_threshold", self.blink_threshold),
            ("secondary.blink_closed", self.blink_closed),
            ("secondary.blink_recovery_rate", self.blink_recovery_rate),
            ("secondary.heart_pulse_freq", self.heart_pulse_freq),
            ("secondary.heart_scale", self.heart_scale),
            ("secondary.heart_scale_amp", self.heart_scale_amp),
            ("secondary.heart_opacity", self.heart_opacity),
            ("secondary.heart_opacity_amp", self.heart_opacity_amp),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.blink_closed) {
            return Err(ConfigError::invalid(
                "secondary.blink_closed",
                format!("must be within [0, 1], got {}", self.blink_closed),
            ));
        }
        if self.blink_recovery_rate < 0.0 {
            return Err(ConfigError::invalid(
                "secondary.blink_recovery_rate",
                format!("must be >= 0, got {}", self.blink_recovery_rate),
            ));
        }
        Ok(())
    }
}

/// Scale and opacity of the heart prop for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartPulse {
    pub scale: f64,
    pub opacity: f64,
}

/// Output of one secondary pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondaryFrame {
    /// The pose with sway applied.
    pub pose: Pose,
    /// Eye scale in `[blink_closed, 1]`.
    pub eye_scale: f64,
    /// Heart pulse, present only while the heart is shown.
    pub heart_pulse: Option<HeartPulse>,
}

/// Stateful secondary layer. The only state is the blink level.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryAnimator {
    config: SecondaryConfig,
    blink: f64,
}

impl SecondaryAnimator {
    pub fn new(config: SecondaryConfig) -> Self {
        Self { config, blink: 1.0 }
    }

    pub fn config(&self) -> &SecondaryConfig {
        &self.config
    }

    /// Current blink level before clamping.
    pub fn blink(&self) -> f64 {
        self.blink
    }

    /// Overlays sway onto `pose` and advances the blink.
    pub fn apply(&mut self, pose: &Pose, current: Action, elapsed: f64, dt: f64) -> SecondaryFrame {
        let cfg = &self.config;
        let t = elapsed;
        let mut out = *pose;

        out.root_y += (t * cfg.root_bob_freq).sin() * cfg.root_bob_amp;
        out.body.roll += (t * cfg.body_sway_freq).sin() * cfg.body_sway_amp;
        if current == Action::Idle {
            out.head.yaw += (t * cfg.idle_head_freq).sin() * cfg.idle_head_amp;
        }

        if (t * cfg.blink_freq).sin() > cfg.blink_threshold {
            self.blink = cfg.blink_closed;
        }
        self.blink = damp(
            self.blink,
            1.0,
            smoothing_factor(dt, cfg.blink_recovery_rate),
        );
        let eye_scale = self.blink.clamp(cfg.blink_closed, 1.0);

        let heart_pulse = out.show_heart.then(|| {
            let wave = (t * cfg.heart_pulse_freq).sin();
            HeartPulse {
                scale: cfg.heart_scale * (1.0 + wave * cfg.heart_scale_amp),
                opacity: cfg.heart_opacity + cfg.heart_opacity_amp * (wave * 0.5 + 0.5),
            }
        });

        SecondaryFrame {
            pose: out,
            eye_scale,
            heart_pulse,
        }
    }
}

impl Default for SecondaryAnimator {
    fn default() -> Self {
        Self::new(SecondaryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::NEUTRAL_POSE;
    use std::f64::consts::PI;

    #[test]
    fn test_sway_at_time_zero_is_identity() {
        let mut anim = SecondaryAnimator::default();
        let frame = anim.apply(&NEUTRAL_POSE, Action::Idle, 0.0, 0.0);
        assert_eq!(frame.pose, NEUTRAL_POSE);
        assert_eq!(frame.eye_scale, 1.0);
        assert!(frame.heart_pulse.is_none());
    }

    #[test]
    fn test_head_drift_only_while_idle() {
        let t = 1.5;
        let mut anim = SecondaryAnimator::default();
        let idle = anim.apply(&NEUTRAL_POSE, Action::Idle, t, 0.016);
        let wave = anim.apply(&NEUTRAL_POSE, Action::Wave, t, 0.016);

        assert!((idle.pose.head.yaw - (t * 0.9).sin() * 0.06).abs() < 1e-12);
        assert_eq!(wave.pose.head.yaw, NEUTRAL_POSE.head.yaw);
        // Body sway and root bob apply regardless of action.
        assert_eq!(idle.pose.body.roll, wave.pose.body.roll);
        assert_eq!(idle.pose.root_y, wave.pose.root_y);
        assert!((wave.pose.root_y - (t * 2.1).sin() * 0.013).abs() < 1e-12);
    }

    #[test]
    fn test_blink_triggers_and_recovers() {
        let mut anim = SecondaryAnimator::default();
        // sin(2.9t) peaks at t = π / 5.8.
        let peak = PI / 2.0 / 2.9;
        let frame = anim.apply(&NEUTRAL_POSE, Action::Idle, peak, 0.0);
        assert!((frame.eye_scale - 0.2).abs() < 1e-12);

        let mut last = frame.eye_scale;
        for i in 1..30 {
            let t = peak + 0.5 + i as f64 * 0.016;
            let frame = anim.apply(&NEUTRAL_POSE, Action::Idle, t, 0.016);
            assert!(frame.eye_scale >= last);
            assert!(frame.eye_scale <= 1.0);
            last = frame.eye_scale;
        }
        assert!(last > 0.9);
    }

    #[test]
    fn test_heart_pulse_ranges() {
        let mut anim = SecondaryAnimator::default();
        let mut pose = NEUTRAL_POSE;
        pose.show_heart = true;
        for i in 0..100 {
            let frame = anim.apply(&pose, Action::Heart, i as f64 * 0.05, 0.05);
            let pulse = frame.heart_pulse.unwrap();
            assert!(pulse.scale >= 0.45 * 0.86 - 1e-12 && pulse.scale <= 0.45 * 1.14 + 1e-12);
            assert!(pulse.opacity >= 0.66 - 1e-12 && pulse.opacity <= 0.92 + 1e-12);
        }
    }

    #[test]
    fn test_config_validate() {
        assert!(SecondaryConfig::default().validate().is_ok());
        let bad = SecondaryConfig {
            blink_closed: 1.5,
            ..SecondaryConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = SecondaryConfig {
            body_sway_amp: f64::INFINITY,
            ..SecondaryConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
