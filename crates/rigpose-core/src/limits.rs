//! Joint limit enforcement for shoulders and elbows.
//!
//! The table is configured for the left arm. The right arm's limits are the
//! mirror image (yaw and roll negated), derived on demand so the two sides
//! can never drift apart.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pose::{ArmPose, Pose, Rotation, Side};

// =============================================================================
// Interval
// =============================================================================

/// A closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamps `value` into the interval. NaN maps to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        // f64::max ignores NaN, so NaN lands on `min`.
        value.max(self.min).min(self.max)
    }

    /// Returns true if `value` lies in the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// The interval reflected through zero.
    pub fn mirrored(&self) -> Interval {
        Interval::new(-self.max, -self.min)
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        for value in [self.min, self.max] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if self.min > self.max {
            return Err(ConfigError::InvalidInterval {
                field: field.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Per-arm limits
// =============================================================================

/// Resolved limits for one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmLimits {
    pub pitch: Interval,
    pub yaw: Interval,
    pub roll: Interval,
    pub elbow: Interval,
}

impl ArmLimits {
    /// Clamps every axis independently.
    pub fn clamp(&self, arm: ArmPose) -> ArmPose {
        ArmPose {
            shoulder: Rotation {
                pitch: self.pitch.clamp(arm.shoulder.pitch),
                yaw: self.yaw.clamp(arm.shoulder.yaw),
                roll: self.roll.clamp(arm.shoulder.roll),
            },
            elbow: self.elbow.clamp(arm.elbow),
        }
    }

    /// Returns true if every axis is within its interval.
    pub fn contains(&self, arm: &ArmPose) -> bool {
        self.pitch.contains(arm.shoulder.pitch)
            && self.yaw.contains(arm.shoulder.yaw)
            && self.roll.contains(arm.shoulder.roll)
            && self.elbow.contains(arm.elbow)
    }
}

// =============================================================================
// Limit table
// =============================================================================

/// Anatomical limits for the shoulders and elbows, given for the left arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JointLimitTable {
    /// Left shoulder pitch range.
    #[serde(default = "default_shoulder_pitch")]
    pub shoulder_pitch: Interval,
    /// Left shoulder yaw range. Negative yaw abducts the left arm.
    #[serde(default = "default_shoulder_yaw")]
    pub shoulder_yaw: Interval,
    /// Left shoulder roll range. Positive roll abducts the left arm.
    #[serde(default = "default_shoulder_roll")]
    pub shoulder_roll: Interval,
    /// Maximum elbow flexion; the elbow range is `[0, elbow_max]`.
    #[serde(default = "default_elbow_max")]
    pub elbow_max: f64,
}

fn default_shoulder_pitch() -> Interval {
    Interval::new(-1.45, 0.95)
}

fn default_shoulder_yaw() -> Interval {
    Interval::new(-1.2, 0.28)
}

fn default_shoulder_roll() -> Interval {
    Interval::new(0.05, 1.3)
}

fn default_elbow_max() -> f64 {
    2.08
}

impl Default for JointLimitTable {
    fn default() -> Self {
        Self {
            shoulder_pitch: default_shoulder_pitch(),
            shoulder_yaw: default_shoulder_yaw(),
            shoulder_roll: default_shoulder_roll(),
            elbow_max: default_elbow_max(),
        }
    }
}

impl JointLimitTable {
    /// Returns the limits for one side.
    pub fn arm(&self, side: Side) -> ArmLimits {
        let left = ArmLimits {
            pitch: self.shoulder_pitch,
            yaw: self.shoulder_yaw,
            roll: self.shoulder_roll,
            elbow: Interval::new(0.0, self.elbow_max),
        };
        match side {
            Side::Left => left,
            Side::Right => ArmLimits {
                yaw: left.yaw.mirrored(),
                roll: left.roll.mirrored(),
                ..left
            },
        }
    }

    /// Clamps one arm in place.
    pub fn clamp_arm(&self, side: Side, arm: &mut ArmPose) {
        *arm = self.arm(side).clamp(*arm);
    }

    /// Returns a copy of `pose` with both arms clamped.
    pub fn clamp(&self, pose: &Pose) -> Pose {
        Side::BOTH.iter().fold(*pose, |acc, &side| {
            let clamped = self.arm(side).clamp(acc.arm(side));
            acc.with_arm(side, clamped)
        })
    }

    /// Returns true if the arm lies within this side's limits.
    pub fn contains(&self, side: Side, arm: &ArmPose) -> bool {
        self.arm(side).contains(arm)
    }

    /// Validates interval ordering and finiteness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shoulder_pitch.validate("limits.shoulder_pitch")?;
        self.shoulder_yaw.validate("limits.shoulder_yaw")?;
        self.shoulder_roll.validate("limits.shoulder_roll")?;
        if !self.elbow_max.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "limits.elbow_max".to_string(),
                value: self.elbow_max,
            });
        }
        if self.elbow_max < 0.0 {
            return Err(ConfigError::invalid(
                "limits.elbow_max",
                format!("must be >= 0, got {}", self.elbow_max),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::NEUTRAL_POSE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_interval_clamp() {
        let i = Interval::new(-1.0, 2.0);
        assert_eq!(i.clamp(-5.0), -1.0);
        assert_eq!(i.clamp(0.5), 0.5);
        assert_eq!(i.clamp(9.0), 2.0);
        assert_eq!(i.clamp(f64::NAN), -1.0);
        assert_eq!(i.clamp(f64::INFINITY), 2.0);
        assert_eq!(i.mirrored(), Interval::new(-2.0, 1.0));
    }

    #[test]
    fn test_right_limits_are_mirrored() {
        let table = JointLimitTable::default();
        let l = table.arm(Side::Left);
        let r = table.arm(Side::Right);
        assert_eq!(r.pitch, l.pitch);
        assert_eq!(r.yaw, Interval::new(-0.28, 1.2));
        assert_eq!(r.roll, Interval::new(-1.3, -0.05));
        assert_eq!(r.elbow, Interval::new(0.0, 2.08));
    }

    #[test]
    fn test_neutral_pose_within_limits() {
        let table = JointLimitTable::default();
        for side in Side::BOTH {
            assert!(table.contains(side, &NEUTRAL_POSE.arm(side)));
        }
        assert_eq!(table.clamp(&NEUTRAL_POSE), NEUTRAL_POSE);
    }

    #[test]
    fn test_clamp_pose_axis_independent() {
        let table = JointLimitTable::default();
        let mut pose = NEUTRAL_POSE;
        pose.shoulder_l = Rotation::new(-3.0, 0.5, -0.4);
        pose.elbow_l = -0.3;
        pose.shoulder_r = Rotation::new(2.0, -1.0, 0.4);
        pose.elbow_r = 4.0;

        let clamped = table.clamp(&pose);
        assert_eq!(clamped.shoulder_l, Rotation::new(-1.45, 0.28, 0.05));
        assert_eq!(clamped.elbow_l, 0.0);
        assert_eq!(clamped.shoulder_r, Rotation::new(0.95, -0.28, -0.05));
        assert_eq!(clamped.elbow_r, 2.08);
        // Non-arm fields untouched.
        assert_eq!(clamped.head, pose.head);
        assert_eq!(clamped.leg_l, pose.leg_l);
    }

    #[test]
    fn test_clamp_arm_in_place() {
        let table = JointLimitTable::default();
        let mut arm = ArmPose::new(Rotation::new(0.0, 5.0, 0.0), 1.0);
        table.clamp_arm(Side::Right, &mut arm);
        assert_eq!(arm.shoulder.yaw, 1.2);
        assert_eq!(arm.shoulder.roll, -0.05);
        assert!(table.contains(Side::Right, &arm));
    }

    #[test]
    fn test_validate() {
        assert!(JointLimitTable::default().validate().is_ok());

        let table = JointLimitTable {
            shoulder_yaw: Interval::new(1.0, -1.0),
            ..JointLimitTable::default()
        };
        let err = table.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval { .. }));
        assert!(err.to_string().contains("limits.shoulder_yaw"));

        let table = JointLimitTable {
            elbow_max: -0.5,
            ..JointLimitTable::default()
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_limit_table_serde_defaults() {
        let parsed: JointLimitTable = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, JointLimitTable::default());

        let parsed: JointLimitTable =
            serde_json::from_str(r#"{"elbow_max": 1.5, "shoulder_pitch": {"min": -1.0, "max": 0.5}}"#)
                .unwrap();
        assert_eq!(parsed.elbow_max, 1.5);
        assert_eq!(parsed.shoulder_pitch, Interval::new(-1.0, 0.5));
        assert_eq!(parsed.shoulder_roll, Interval::new(0.05, 1.3));
    }
}
