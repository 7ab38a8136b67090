//! Limb collision resolution against the torso ellipsoid.
//!
//! Each arm is sampled at a handful of points along the upper arm and
//! forearm. A sample is inside the torso when its ellipsoid field value is
//! below 1. The resolver nudges shoulder and elbow angles in a fixed priority
//! order (abduct, reach forward, relax the elbow) until every sample is clear
//! or the iteration cap is hit. Hitting the cap is a best-effort result, not
//! an error.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ConfigError;
use crate::limits::JointLimitTable;
use crate::pose::{ArmPose, Pose, Side};

// =============================================================================
// Torso collider
// =============================================================================

/// Axis-aligned ellipsoid approximating the torso, in character-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TorsoCollider {
    /// Ellipsoid center [X, Y, Z].
    #[serde(default = "default_torso_center")]
    pub center: [f64; 3],
    /// Semi-axis radii [X, Y, Z].
    #[serde(default = "default_torso_radii")]
    pub radii: [f64; 3],
}

fn default_torso_center() -> [f64; 3] {
    [0.0, 1.35, 0.03]
}

fn default_torso_radii() -> [f64; 3] {
    [0.93, 1.12, 0.81]
}

impl Default for TorsoCollider {
    fn default() -> Self {
        Self {
            center: default_torso_center(),
            radii: default_torso_radii(),
        }
    }
}

impl TorsoCollider {
    /// Normalized squared distance of `point` from the center.
    ///
    /// Below 1 is inside, 1 is on the surface, above 1 is outside.
    pub fn field(&self, point: DVec3) -> f64 {
        let d = (point - DVec3::from_array(self.center)) / DVec3::from_array(self.radii);
        d.length_squared()
    }

    /// Returns true if `point` is strictly inside the ellipsoid.
    pub fn contains(&self, point: DVec3) -> bool {
        self.field(point) < 1.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, value) in self.center.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite {
                    field: format!("torso.center[{}]", i),
                    value: *value,
                });
            }
        }
        for (i, value) in self.radii.iter().enumerate() {
            if !value.is_finite() || *value <= 0.0 {
                return Err(ConfigError::NotPositive {
                    field: format!("torso.radii[{}]", i),
                    value: *value,
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Arm geometry
// =============================================================================

/// Fixed arm dimensions used to place collision samples.
///
/// Frame: +Y up, +Z forward, the left shoulder at negative X. The right arm
/// mirrors the left across X = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmGeometry {
    /// Left shoulder pivot [X, Y, Z].
    #[serde(default = "default_shoulder")]
    pub shoulder: [f64; 3],
    /// Shoulder-to-elbow length.
    #[serde(default = "default_upper_length")]
    pub upper_length: f64,
    /// Elbow-to-wrist length.
    #[serde(default = "default_forearm_length")]
    pub forearm_length: f64,
    /// How much elbow flexion adds to the forearm's forward pitch.
    #[serde(default = "default_elbow_coupling")]
    pub elbow_coupling: f64,
    /// Sample positions along the upper arm, as fractions of its length.
    #[serde(default = "default_upper_samples")]
    pub upper_samples: Vec<f64>,
    /// Sample positions along the forearm, as fractions of its length.
    #[serde(default = "default_forearm_samples")]
    pub forearm_samples: Vec<f64>,
}

fn default_shoulder() -> [f64; 3] {
    [-0.94, 1.63, 0.08]
}

fn default_upper_length() -> f64 {
    0.9
}

fn default_forearm_length() -> f64 {
    0.86
}

fn default_elbow_coupling() -> f64 {
    0.88
}

fn default_upper_samples() -> Vec<f64> {
    vec![0.3, 0.7]
}

fn default_forearm_samples() -> Vec<f64> {
    vec![0.35, 0.7, 1.0]
}

impl Default for ArmGeometry {
    fn default() -> Self {
        Self {
            shoulder: default_shoulder(),
            upper_length: default_upper_length(),
            forearm_length: default_forearm_length(),
            elbow_coupling: default_elbow_coupling(),
            upper_samples: default_upper_samples(),
            forearm_samples: default_forearm_samples(),
        }
    }
}

impl ArmGeometry {
    /// Shoulder pivot for one side.
    pub fn shoulder_position(&self, side: Side) -> DVec3 {
        let [x, y, z] = self.shoulder;
        // The configured pivot is the left one; place it by side sign.
        DVec3::new(x.abs() * side.lateral_sign(), y, z)
    }

    /// Computes the arm's collision samples, upper arm first, wrist last.
    pub fn samples(&self, side: Side, arm: &ArmPose) -> Vec<DVec3> {
        let shoulder = self.shoulder_position(side);
        let (yaw_out, roll_out) = outward_angles(side, arm);
        let pitch = arm.shoulder.pitch;

        let upper_dir = segment_direction(side, pitch, yaw_out, roll_out);
        let fore_dir = segment_direction(
            side,
            pitch - self.elbow_coupling * arm.elbow,
            yaw_out,
            roll_out,
        );
        let elbow = shoulder + upper_dir * self.upper_length;

        let upper = self
            .upper_samples
            .iter()
            .map(|f| shoulder + upper_dir * (self.upper_length * f));
        let fore = self
            .forearm_samples
            .iter()
            .map(|f| elbow + fore_dir * (self.forearm_length * f));
        upper.chain(fore).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, value) in self.shoulder.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite {
                    field: format!("arm.shoulder[{}]", i),
                    value: *value,
                });
            }
        }
        for (field, value) in [
            ("arm.upper_length", self.upper_length),
            ("arm.forearm_length", self.forearm_length),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if !self.elbow_coupling.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "arm.elbow_coupling".to_string(),
                value: self.elbow_coupling,
            });
        }
        if self.upper_samples.is_empty() && self.forearm_samples.is_empty() {
            return Err(ConfigError::invalid(
                "arm",
                "at least one upper or forearm sample is required",
            ));
        }
        for (field, samples) in [
            ("arm.upper_samples", &self.upper_samples),
            ("arm.forearm_samples", &self.forearm_samples),
        ] {
            if let Some(bad) = samples.iter().find(|f| !(0.0..=1.0).contains(*f)) {
                return Err(ConfigError::invalid(
                    field,
                    format!("fractions must be within [0, 1], got {}", bad),
                ));
            }
        }
        Ok(())
    }
}

/// Shoulder yaw and roll expressed so that positive means away from the body.
///
/// The left arm abducts with negative yaw and positive roll; the right arm is
/// the mirror image.
fn outward_angles(side: Side, arm: &ArmPose) -> (f64, f64) {
    match side {
        Side::Left => (-arm.shoulder.yaw, arm.shoulder.roll),
        Side::Right => (arm.shoulder.yaw, -arm.shoulder.roll),
    }
}

/// Unit direction of a segment hanging straight down at rest.
///
/// Roll swings it sideways (outward for positive roll), pitch swings it
/// forward for negative pitch, and yaw then turns the result about the
/// vertical axis, outward for positive yaw.
fn segment_direction(side: Side, pitch: f64, yaw_out: f64, roll_out: f64) -> DVec3 {
    let (sr, cr) = roll_out.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sw, cw) = yaw_out.sin_cos();

    let lateral = sr * cw - cr * sp * sw;
    let up = -cr * cp;
    let forward = -sr * sw - cr * sp * cw;
    DVec3::new(lateral * side.lateral_sign(), up, forward)
}

// =============================================================================
// Resolver
// =============================================================================

/// Iteration cap and nudge magnitudes for push-out resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Maximum number of nudges per arm per pass.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Outward yaw added per nudge.
    #[serde(default = "default_abduct_yaw_step")]
    pub abduct_yaw_step: f64,
    /// Outward roll added per nudge.
    #[serde(default = "default_abduct_roll_step")]
    pub abduct_roll_step: f64,
    /// Forward pitch per nudge for forward-reaching actions.
    #[serde(default = "default_forward_step_reaching")]
    pub forward_step_reaching: f64,
    /// Forward pitch per nudge for every other action.
    #[serde(default = "default_forward_step")]
    pub forward_step: f64,
    /// Below this field value a sample counts as deeply embedded.
    #[serde(default = "default_deep_threshold")]
    pub deep_threshold: f64,
    /// Extra forward pitch per nudge while deeply embedded.
    #[serde(default = "default_deep_forward_step")]
    pub deep_forward_step: f64,
    /// Relax the elbow while deeply embedded.
    #[serde(default = "default_true")]
    pub reduce_flexion: bool,
    /// Elbow flexion removed per deep nudge.
    #[serde(default = "default_flexion_step")]
    pub flexion_step: f64,
}

fn default_max_iterations() -> u32 {
    10
}

fn default_abduct_yaw_step() -> f64 {
    0.09
}

fn default_abduct_roll_step() -> f64 {
    0.06
}

fn default_forward_step_reaching() -> f64 {
    0.02
}

fn default_forward_step() -> f64 {
    0.05
}

fn default_deep_threshold() -> f64 {
    0.9
}

fn default_deep_forward_step() -> f64 {
    0.04
}

fn default_true() -> bool {
    true
}

fn default_flexion_step() -> f64 {
    0.12
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            abduct_yaw_step: default_abduct_yaw_step(),
            abduct_roll_step: default_abduct_roll_step(),
            forward_step_reaching: default_forward_step_reaching(),
            forward_step: default_forward_step(),
            deep_threshold: default_deep_threshold(),
            deep_forward_step: default_deep_forward_step(),
            reduce_flexion: true,
            flexion_step: default_flexion_step(),
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::invalid(
                "resolver.max_iterations",
                "must be at least 1",
            ));
        }
        for (field, value) in [
            ("resolver.abduct_yaw_step", self.abduct_yaw_step),
            ("resolver.abduct_roll_step", self.abduct_roll_step),
            ("resolver.forward_step_reaching", self.forward_step_reaching),
            ("resolver.forward_step", self.forward_step),
            ("resolver.deep_threshold", self.deep_threshold),
            ("resolver.deep_forward_step", self.deep_forward_step),
            ("resolver.flexion_step", self.flexion_step),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be finite and >= 0, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// Result of resolving one arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveOutcome {
    /// Every sample ended at or outside the torso surface.
    Cleared {
        /// Nudges applied before the arm was clear.
        iterations: u32,
        /// Smallest sample field value after resolution.
        min_field: f64,
    },
    /// The iteration cap was reached with samples still inside.
    Capped {
        iterations: u32,
        /// Smallest sample field value left over.
        residual: f64,
    },
}

impl ResolveOutcome {
    pub fn is_cleared(&self) -> bool {
        matches!(self, ResolveOutcome::Cleared { .. })
    }

    pub fn iterations(&self) -> u32 {
        match self {
            ResolveOutcome::Cleared { iterations, .. } => *iterations,
            ResolveOutcome::Capped { iterations, .. } => *iterations,
        }
    }

    /// Smallest sample field value at the end of resolution.
    pub fn min_field(&self) -> f64 {
        match self {
            ResolveOutcome::Cleared { min_field, .. } => *min_field,
            ResolveOutcome::Capped { residual, .. } => *residual,
        }
    }
}

/// Iterative push-out solver keeping arms outside the torso.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResolver {
    collider: TorsoCollider,
    geometry: ArmGeometry,
    limits: JointLimitTable,
    config: ResolverConfig,
}

impl CollisionResolver {
    pub fn new(
        collider: TorsoCollider,
        geometry: ArmGeometry,
        limits: JointLimitTable,
        config: ResolverConfig,
    ) -> Self {
        Self {
            collider,
            geometry,
            limits,
            config,
        }
    }

    pub fn collider(&self) -> &TorsoCollider {
        &self.collider
    }

    pub fn geometry(&self) -> &ArmGeometry {
        &self.geometry
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Field value of every sample of one arm.
    pub fn sample_fields(&self, side: Side, arm: &ArmPose) -> Vec<f64> {
        self.geometry
            .samples(side, arm)
            .into_iter()
            .map(|p| self.collider.field(p))
            .collect()
    }

    /// Smallest sample field value of one arm.
    pub fn min_field(&self, side: Side, arm: &ArmPose) -> f64 {
        self.sample_fields(side, arm)
            .into_iter()
            .fold(f64::INFINITY, f64::min)
    }

    /// Resolves both arms of `pose` for the given action.
    pub fn resolve(&self, pose: &Pose, action: Action) -> (Pose, [ResolveOutcome; 2]) {
        let mut left = pose.arm(Side::Left);
        let mut right = pose.arm(Side::Right);
        let outcomes = [
            self.resolve_arm(Side::Left, &mut left, action),
            self.resolve_arm(Side::Right, &mut right, action),
        ];
        let resolved = pose
            .with_arm(Side::Left, left)
            .with_arm(Side::Right, right);
        (resolved, outcomes)
    }

    /// Resolves one arm in place. The arm is always left within its limits.
    pub fn resolve_arm(&self, side: Side, arm: &mut ArmPose, action: Action) -> ResolveOutcome {
        self.limits.clamp_arm(side, arm);

        for iteration in 0..self.config.max_iterations {
            let worst = self.min_field(side, arm);
            if worst >= 1.0 {
                return ResolveOutcome::Cleared {
                    iterations: iteration,
                    min_field: worst,
                };
            }
            self.nudge(side, arm, action, worst);
            self.limits.clamp_arm(side, arm);
        }

        let iterations = self.config.max_iterations;
        let worst = self.min_field(side, arm);
        if worst >= 1.0 {
            return ResolveOutcome::Cleared {
                iterations,
                min_field: worst,
            };
        }

        tracing::warn!(
            side = side.as_str(),
            action = action.as_str(),
            residual = worst,
            "arm still intersects torso after {} iterations",
            iterations
        );
        ResolveOutcome::Capped {
            iterations,
            residual: worst,
        }
    }

    /// One escape step: abduct, then reach forward, then relax the elbow.
    fn nudge(&self, side: Side, arm: &mut ArmPose, action: Action, worst: f64) {
        let cfg = &self.config;
        let sign = side.lateral_sign();

        arm.shoulder.yaw += sign * cfg.abduct_yaw_step;
        arm.shoulder.roll -= sign * cfg.abduct_roll_step;

        arm.shoulder.pitch -= if action.is_forward_reaching() {
            cfg.forward_step_reaching
        } else {
            cfg.forward_step
        };

        if worst < cfg.deep_threshold {
            arm.shoulder.pitch -= cfg.deep_forward_step;
            if cfg.reduce_flexion {
                arm.elbow -= cfg.flexion_step;
            }
        }
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(
            TorsoCollider::default(),
            ArmGeometry::default(),
            JointLimitTable::default(),
            ResolverConfig::default(),
        )
    }
}
