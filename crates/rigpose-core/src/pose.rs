//! Pose model: joint rotations, root offsets and display flags.

use serde::{Deserialize, Serialize};

use crate::math::mix;

// =============================================================================
// Rotation
// =============================================================================

/// A three-axis rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rotation {
    /// Rotation about the lateral (X) axis.
    #[serde(default)]
    pub pitch: f64,
    /// Rotation about the vertical (Y) axis.
    #[serde(default)]
    pub yaw: f64,
    /// Rotation about the forward (Z) axis.
    #[serde(default)]
    pub roll: f64,
}

impl Rotation {
    /// The zero rotation.
    pub const ZERO: Rotation = Rotation::new(0.0, 0.0, 0.0);

    /// Creates a rotation from pitch, yaw and roll.
    pub const fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Component-wise linear interpolation.
    pub fn lerp(self, other: Rotation, t: f64) -> Rotation {
        Rotation {
            pitch: mix(self.pitch, other.pitch, t),
            yaw: mix(self.yaw, other.yaw, t),
            roll: mix(self.roll, other.roll, t),
        }
    }

    /// Returns true if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }

    /// Returns the rotation as `[pitch, yaw, roll]`.
    pub fn as_array(&self) -> [f64; 3] {
        [self.pitch, self.yaw, self.roll]
    }
}

// =============================================================================
// Sides and arms
// =============================================================================

/// Body side of a limb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Sign of the outward direction along X in the character's local frame.
    ///
    /// The left shoulder sits at negative X.
    pub fn lateral_sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Short name used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// The constrained part of one arm: shoulder rotation plus elbow flexion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArmPose {
    pub shoulder: Rotation,
    pub elbow: f64,
}

impl ArmPose {
    pub fn new(shoulder: Rotation, elbow: f64) -> Self {
        Self { shoulder, elbow }
    }
}

// =============================================================================
// Pose
// =============================================================================

/// A full-body joint configuration.
///
/// Plain value type: every stage of the frame pipeline takes a pose and
/// returns a new one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pose {
    pub body: Rotation,
    pub head: Rotation,
    pub shoulder_l: Rotation,
    pub shoulder_r: Rotation,
    /// Left elbow flexion.
    pub elbow_l: f64,
    /// Right elbow flexion.
    pub elbow_r: f64,
    pub leg_l: Rotation,
    pub leg_r: Rotation,
    /// Vertical root offset.
    pub root_y: f64,
    /// Root heading.
    pub root_yaw: f64,
    pub show_heart: bool,
    pub show_flower: bool,
}

/// The rest pose every action starts from.
pub const NEUTRAL_POSE: Pose = Pose {
    body: Rotation::ZERO,
    head: Rotation::ZERO,
    shoulder_l: Rotation::new(0.1, -0.08, 0.22),
    shoulder_r: Rotation::new(0.1, 0.08, -0.22),
    elbow_l: 0.16,
    elbow_r: 0.16,
    leg_l: Rotation::new(0.04, 0.0, 0.04),
    leg_r: Rotation::new(0.04, 0.0, -0.04),
    root_y: 0.0,
    root_yaw: 0.0,
    show_heart: false,
    show_flower: false,
};

impl Default for Pose {
    fn default() -> Self {
        NEUTRAL_POSE
    }
}

impl Pose {
    /// Returns the neutral pose.
    pub fn neutral() -> Self {
        NEUTRAL_POSE
    }

    /// Blends two poses by `t`.
    ///
    /// Numeric fields are interpolated component-wise. Display flags are not
    /// blended: below `t = 0.5` they come from `self`, at or above from `other`.
    pub fn lerp(&self, other: &Pose, t: f64) -> Pose {
        let flags_from = if t < 0.5 { self } else { other };
        Pose {
            body: self.body.lerp(other.body, t),
            head: self.head.lerp(other.head, t),
            shoulder_l: self.shoulder_l.lerp(other.shoulder_l, t),
            shoulder_r: self.shoulder_r.lerp(other.shoulder_r, t),
            elbow_l: mix(self.elbow_l, other.elbow_l, t),
            elbow_r: mix(self.elbow_r, other.elbow_r, t),
            leg_l: self.leg_l.lerp(other.leg_l, t),
            leg_r: self.leg_r.lerp(other.leg_r, t),
            root_y: mix(self.root_y, other.root_y, t),
            root_yaw: mix(self.root_yaw, other.root_yaw, t),
            show_heart: flags_from.show_heart,
            show_flower: flags_from.show_flower,
        }
    }

    /// Returns true if every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        self.body.is_finite()
            && self.head.is_finite()
            && self.shoulder_l.is_finite()
            && self.shoulder_r.is_finite()
            && self.elbow_l.is_finite()
            && self.elbow_r.is_finite()
            && self.leg_l.is_finite()
            && self.leg_r.is_finite()
            && self.root_y.is_finite()
            && self.root_yaw.is_finite()
    }

    /// Returns the constrained arm values for one side.
    pub fn arm(&self, side: Side) -> ArmPose {
        match side {
            Side::Left => ArmPose::new(self.shoulder_l, self.elbow_l),
            Side::Right => ArmPose::new(self.shoulder_r, self.elbow_r),
        }
    }

    /// Returns a copy with one arm replaced.
    pub fn with_arm(mut self, side: Side, arm: ArmPose) -> Pose {
        match side {
            Side::Left => {
                self.shoulder_l = arm.shoulder;
                self.elbow_l = arm.elbow;
            }
            Side::Right => {
                self.shoulder_r = arm.shoulder;
                self.elbow_r = arm.elbow;
            }
        }
        self
    }
}
