//! Host-facing seams: joint handles and display sinks.
//!
//! The engine never owns the character. It reads and writes the host's live
//! joint values through [`JointHandles`] and pushes display state through
//! [`DisplaySinks`]. [`PuppetRig`] is an in-memory implementation of both.

use serde::{Deserialize, Serialize};

use crate::pose::{Pose, Rotation, Side, NEUTRAL_POSE};
use crate::secondary::HeartPulse;

/// A rotatable joint on the host rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Body,
    Head,
    ShoulderL,
    ShoulderR,
    LegL,
    LegR,
}

impl Joint {
    pub const ALL: [Joint; 6] = [
        Joint::Body,
        Joint::Head,
        Joint::ShoulderL,
        Joint::ShoulderR,
        Joint::LegL,
        Joint::LegR,
    ];

    pub fn shoulder(side: Side) -> Joint {
        match side {
            Side::Left => Joint::ShoulderL,
            Side::Right => Joint::ShoulderR,
        }
    }

    /// Reads this joint's rotation out of a pose.
    pub fn of(self, pose: &Pose) -> Rotation {
        match self {
            Joint::Body => pose.body,
            Joint::Head => pose.head,
            Joint::ShoulderL => pose.shoulder_l,
            Joint::ShoulderR => pose.shoulder_r,
            Joint::LegL => pose.leg_l,
            Joint::LegR => pose.leg_r,
        }
    }

    fn slot(self, pose: &mut Pose) -> &mut Rotation {
        match self {
            Joint::Body => &mut pose.body,
            Joint::Head => &mut pose.head,
            Joint::ShoulderL => &mut pose.shoulder_l,
            Joint::ShoulderR => &mut pose.shoulder_r,
            Joint::LegL => &mut pose.leg_l,
            Joint::LegR => &mut pose.leg_r,
        }
    }
}

/// Live joint values owned by the host.
pub trait JointHandles {
    fn rotation(&self, joint: Joint) -> Rotation;
    fn set_rotation(&mut self, joint: Joint, rotation: Rotation);
    fn elbow(&self, side: Side) -> f64;
    fn set_elbow(&mut self, side: Side, flexion: f64);
    fn root_height(&self) -> f64;
    fn set_root_height(&mut self, height: f64);
    fn root_yaw(&self) -> f64;
    fn set_root_yaw(&mut self, yaw: f64);
}

/// Display state pushed to the host each frame.
///
/// Hosts without eyes or a pulsing heart can ignore those effects.
pub trait DisplaySinks {
    fn set_heart_visible(&mut self, visible: bool);
    fn set_flower_visible(&mut self, visible: bool);

    fn set_eye_scale(&mut self, _scale: f64) {}

    fn set_heart_pulse(&mut self, _pulse: HeartPulse) {}
}

/// In-memory rig implementing both host seams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuppetRig {
    /// Live joint values and prop visibility.
    pub pose: Pose,
    pub eye_scale: f64,
    /// Last pulse pushed while the heart was shown.
    pub heart_pulse: Option<HeartPulse>,
}

impl PuppetRig {
    /// A rig standing in the neutral pose with open eyes.
    pub fn new() -> Self {
        Self::from_pose(NEUTRAL_POSE)
    }

    pub fn from_pose(pose: Pose) -> Self {
        Self {
            pose,
            eye_scale: 1.0,
            heart_pulse: None,
        }
    }
}

impl Default for PuppetRig {
    fn default() -> Self {
        Self::new()
    }
}

impl JointHandles for PuppetRig {
    fn rotation(&self, joint: Joint) -> Rotation {
        joint.of(&self.pose)
    }

    fn set_rotation(&mut self, joint: Joint, rotation: Rotation) {
        *joint.slot(&mut self.pose) = rotation;
    }

    fn elbow(&self, side: Side) -> f64 {
        self.pose.arm(side).elbow
    }

    fn set_elbow(&mut self, side: Side, flexion: f64) {
        match side {
            Side::Left => self.pose.elbow_l = flexion,
            Side::Right => self.pose.elbow_r = flexion,
        }
    }

    fn root_height(&self) -> f64 {
        self.pose.root_y
    }

    fn set_root_height(&mut self, height: f64) {
        self.pose.root_y = height;
    }

    fn root_yaw(&self) -> f64 {
        self.pose.root_yaw
    }

    fn set_root_yaw(&mut self, yaw: f64) {
        self.pose.root_yaw = yaw;
    }
}

impl DisplaySinks for PuppetRig {
    fn set_heart_visible(&mut self, visible: bool) {
        self.pose.show_heart = visible;
        if !visible {
            self.heart_pulse = None;
        }
    }

    fn set_flower_visible(&mut self, visible: bool) {
        self.pose.show_flower = visible;
    }

    fn set_eye_scale(&mut self, scale: f64) {
        self.eye_scale = scale;
    }

    fn set_heart_pulse(&mut self, pulse: HeartPulse) {
        self.heart_pulse = Some(pulse);
    }
}
