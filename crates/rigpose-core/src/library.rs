//! Action library: target poses as pure functions of action and local time.
//!
//! Each action starts from [`NEUTRAL_POSE`] and overlays its own offsets.
//! Evaluation carries no state between calls; the pose at a given local time
//! is always rebuilt from zero-based local time.

use std::f64::consts::{PI, TAU};

use crate::action::Action;
use crate::math::mix;
use crate::pose::{Pose, Rotation, NEUTRAL_POSE};

/// Seconds for one full turn of the spin action.
pub const SPIN_PERIOD: f64 = 7.0;

/// Seconds for the flower action's arm to reach the presenting pose.
pub const FLOWER_ENTER_DURATION: f64 = 0.8;

/// Evaluates the target pose of `action` at `local_time` seconds since it started.
///
/// Negative times are treated as 0.
pub fn evaluate(action: Action, local_time: f64) -> Pose {
    let t = if local_time.is_finite() {
        local_time.max(0.0)
    } else {
        0.0
    };
    let mut p = NEUTRAL_POSE;

    match action {
        Action::Idle => {}
        Action::Wave => {
            p.shoulder_r = Rotation::new(-1.18, 0.36, -0.38);
            p.elbow_r = 0.86;
            p.head.yaw = (t * 2.2).sin() * 0.09;
        }
        Action::Heart => {
            p.shoulder_l = Rotation::new(-0.82, -0.2, 0.34);
            p.shoulder_r = Rotation::new(-0.82, 0.2, -0.34);
            p.elbow_l = 1.3;
            p.elbow_r = 1.3;
            p.body.pitch = 0.05;
            p.show_heart = true;
        }
        Action::Dance => {
            p.body.roll = (t * 2.2).sin() * 0.24;
            p.head.yaw = (t * 2.2).sin() * 0.3;
            p.shoulder_l.roll = 0.25 + (t * 4.2).sin() * 0.6;
            p.shoulder_r.roll = -0.25 - (t * 4.2 + 0.8).sin() * 0.6;
            p.leg_l.pitch = 0.04 + (t * 3.2).sin() * 0.22;
            p.leg_r.pitch = 0.04 + (t * 3.2 + PI).sin() * 0.22;
            p.root_y = (t * 3.1).sin().abs() * 0.06;
        }
        Action::Spin => {
            p.root_yaw = (t / SPIN_PERIOD) * TAU;
            p.head.yaw = (t * 1.2).sin() * 0.14;
        }
        Action::Hug => {
            p.shoulder_l = Rotation::new(-0.72, -0.24, 0.3);
            p.shoulder_r = Rotation::new(-0.72, 0.24, -0.3);
            p.elbow_l = 1.22;
            p.elbow_r = 1.22;
            p.body.pitch = 0.12;
            p.head.pitch = -0.08;
        }
        Action::Comfort => {
            let pat = (t * 2.8).sin();
            p.head.pitch = pat * 0.22;
            p.shoulder_r.pitch = -0.56;
            p.shoulder_r.yaw = 0.2;
            p.elbow_r = 0.86 + pat * 0.16;
            p.body.roll = pat * 0.05;
        }
        Action::Flower => {
            let enter = (t / FLOWER_ENTER_DURATION).clamp(0.0, 1.0);
            let hold = ((t - FLOWER_ENTER_DURATION).max(0.0) * 2.2).sin() * 0.04;
            let rest = NEUTRAL_POSE.shoulder_r;
            p.shoulder_r = rest.lerp(Rotation::new(-0.94, 0.26, -0.3), enter);
            p.elbow_r = mix(NEUTRAL_POSE.elbow_r, 1.18, enter);
            p.shoulder_l.roll = 0.2;
            p.body.pitch = mix(0.0, 0.14, enter);
            p.head.pitch = mix(0.0, -0.05, enter);
            p.root_y = hold * 0.05;
            p.show_flower = true;
        }
    }

    p
}

/// Evaluates an action given by name; unknown names yield the neutral pose.
pub fn evaluate_named(name: &str, local_time: f64) -> Pose {
    evaluate(Action::from_name_lenient(name), local_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_idle_is_neutral_for_all_times() {
        for t in [0.0, 0.1, 1.0, 3.7, 100.0, 1e6] {
            assert_eq!(evaluate(Action::Idle, t), NEUTRAL_POSE);
        }
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        for action in Action::ALL {
            for t in [0.0, 0.42, 2.5, 9.0] {
                assert_eq!(evaluate(action, t), evaluate(action, t));
            }
        }
    }

    #[test]
    fn test_negative_time_clamps_to_zero() {
        for action in Action::ALL {
            assert_eq!(evaluate(action, -5.0), evaluate(action, 0.0));
            assert_eq!(evaluate(action, f64::NAN), evaluate(action, 0.0));
        }
    }

    #[test]
    fn test_all_actions_finite() {
        for action in Action::ALL {
            for i in 0..200 {
                let pose = evaluate(action, i as f64 * 0.173);
                assert!(pose.is_finite(), "{} at step {}", action, i);
            }
        }
    }

    #[test]
    fn test_wave_raises_right_arm() {
        let pose = evaluate(Action::Wave, 0.5);
        assert_eq!(pose.shoulder_r, Rotation::new(-1.18, 0.36, -0.38));
        assert_eq!(pose.elbow_r, 0.86);
        assert_eq!(pose.shoulder_l, NEUTRAL_POSE.shoulder_l);
        assert!((pose.head.yaw - (1.1f64).sin() * 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_heart_shows_heart() {
        let pose = evaluate(Action::Heart, 1.0);
        assert!(pose.show_heart);
        assert!(!pose.show_flower);
        assert_eq!(pose.elbow_l, 1.3);
        assert_eq!(pose.elbow_r, 1.3);
        // Mirrored arms.
        assert_eq!(pose.shoulder_l.yaw, -pose.shoulder_r.yaw);
        assert_eq!(pose.shoulder_l.roll, -pose.shoulder_r.roll);
    }

    #[test]
    fn test_dance_legs_in_anti_phase() {
        for t in [0.3, 1.1, 2.7] {
            let pose = evaluate(Action::Dance, t);
            let l = pose.leg_l.pitch - 0.04;
            let r = pose.leg_r.pitch - 0.04;
            assert!((l + r).abs() < 1e-12);
            assert!(pose.root_y >= 0.0);
        }
    }

    #[test]
    fn test_spin_full_turn_over_period() {
        assert_eq!(evaluate(Action::Spin, 0.0).root_yaw, 0.0);
        let half = evaluate(Action::Spin, SPIN_PERIOD / 2.0);
        assert!((half.root_yaw - PI).abs() < 1e-12);
        let full = evaluate(Action::Spin, SPIN_PERIOD);
        assert!((full.root_yaw - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_hug_leans_forward() {
        let pose = evaluate(Action::Hug, 0.0);
        assert_eq!(pose.body.pitch, 0.12);
        assert_eq!(pose.shoulder_l.pitch, -0.72);
        assert_eq!(pose.shoulder_r.pitch, -0.72);
    }

    #[test]
    fn test_comfort_body_in_phase_with_head() {
        for t in [0.2, 0.9, 1.7] {
            let pose = evaluate(Action::Comfort, t);
            assert!((pose.head.pitch / 0.22 - pose.body.roll / 0.05).abs() < 1e-12);
        }
    }

    #[test]
    fn test_flower_enter_phase() {
        let start = evaluate(Action::Flower, 0.0);
        assert_eq!(start.shoulder_r, NEUTRAL_POSE.shoulder_r);
        assert_eq!(start.elbow_r, NEUTRAL_POSE.elbow_r);
        assert!(start.show_flower);
        assert_eq!(start.root_y, 0.0);

        let entered = evaluate(Action::Flower, FLOWER_ENTER_DURATION);
        assert!((entered.shoulder_r.pitch - (-0.94)).abs() < 1e-12);
        assert!((entered.elbow_r - 1.18).abs() < 1e-12);

        // Holding: only the root height oscillates.
        let later = evaluate(Action::Flower, 2.0);
        assert_eq!(later.shoulder_r, entered.shoulder_r);
        assert!(later.root_y.abs() <= 0.04 * 0.05 + 1e-12);
    }

    #[test]
    fn test_evaluate_named_unknown_is_neutral() {
        assert_eq!(evaluate_named("moonwalk", 3.0), NEUTRAL_POSE);
        assert_eq!(evaluate_named("wave", 0.0), evaluate(Action::Wave, 0.0));
    }
}
