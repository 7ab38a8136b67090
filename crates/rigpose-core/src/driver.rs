//! Per-frame orchestration.
//!
//! [`Engine`] is the only stateful entry point. Each call to
//! [`Engine::frame`] computes a constrained target pose, eases the host's live
//! joints toward it, then re-constrains the live arm values so that whatever
//! the host ends up rendering respects the joint limits.

use serde::Serialize;

use crate::action::Action;
use crate::blend::{ActionState, PoseBlender};
use crate::collision::{CollisionResolver, ResolveOutcome};
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::limits::JointLimitTable;
use crate::math::{damp, sanitize_dt, smoothing_factor};
use crate::pose::{ArmPose, Pose, Rotation, Side};
use crate::rig::{DisplaySinks, Joint, JointHandles};
use crate::secondary::{HeartPulse, SecondaryAnimator};

// =============================================================================
// Clock
// =============================================================================

/// Timing of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrameClock {
    /// Seconds since the engine started.
    pub elapsed: f64,
    /// Seconds since the previous frame.
    pub dt: f64,
}

impl FrameClock {
    pub fn new(elapsed: f64, dt: f64) -> Self {
        Self { elapsed, dt }
    }

    /// The next frame of a fixed-step host.
    pub fn advance(&self, dt: f64) -> FrameClock {
        FrameClock {
            elapsed: self.elapsed + dt,
            dt,
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// What a frame did, for logging and inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub elapsed: f64,
    pub state: ActionState,
    /// Target pose after limits, collision and secondary motion.
    pub target: Pose,
    /// Resolver outcomes for the target pose, left then right.
    pub target_outcomes: [ResolveOutcome; 2],
    /// Resolver outcomes for the damped live arms, left then right.
    pub live_outcomes: [ResolveOutcome; 2],
    pub eye_scale: f64,
    pub heart_pulse: Option<HeartPulse>,
}

// =============================================================================
// Engine
// =============================================================================

/// The pose engine context.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    blender: PoseBlender,
    limits: JointLimitTable,
    resolver: CollisionResolver,
    secondary: SecondaryAnimator,
    last_elapsed: f64,
}

impl Engine {
    /// Builds an engine after validating `config`.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let resolver = CollisionResolver::new(
            config.torso,
            config.arm.clone(),
            config.limits,
            config.resolver,
        );
        Self {
            blender: PoseBlender::new(config.transition_duration),
            limits: config.limits,
            resolver,
            secondary: SecondaryAnimator::new(config.secondary),
            last_elapsed: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &ActionState {
        self.blender.state()
    }

    pub fn current_action(&self) -> Action {
        self.blender.current()
    }

    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    /// Elapsed time of the most recent frame.
    pub fn last_elapsed(&self) -> f64 {
        self.last_elapsed
    }

    /// Switches to `action`, starting it at the last frame's elapsed time.
    pub fn set_action(&mut self, action: Action) -> bool {
        self.blender.set_action(action, self.last_elapsed)
    }

    /// Switches by name. Unknown names fall back to idle.
    pub fn request_action(&mut self, name: &str) -> bool {
        self.set_action(Action::from_name_lenient(name))
    }

    /// Runs one frame against the host rig.
    pub fn frame<R>(&mut self, clock: FrameClock, rig: &mut R) -> FrameReport
    where
        R: JointHandles + DisplaySinks + ?Sized,
    {
        let elapsed = clock.elapsed;
        let dt = sanitize_dt(clock.dt);
        self.last_elapsed = elapsed;
        let action = self.blender.current();

        // Target pose.
        let blended = self.blender.update(elapsed, dt);
        let clamped = self.limits.clamp(&blended);
        let (resolved, target_outcomes) = self.resolver.resolve(&clamped, action);
        let secondary = self.secondary.apply(&resolved, action, elapsed, dt);
        let target = secondary.pose;

        // Ease live handles toward it.
        let s = smoothing_factor(dt, self.config.damping_rate);
        for joint in Joint::ALL {
            let live = rig.rotation(joint);
            rig.set_rotation(joint, damp_rotation(live, joint.of(&target), s));
        }
        for side in Side::BOTH {
            let live = rig.elbow(side);
            rig.set_elbow(side, damp(live, target.arm(side).elbow, s));
        }
        rig.set_root_height(damp(rig.root_height(), target.root_y, s));
        rig.set_root_yaw(damp(rig.root_yaw(), target.root_yaw, s));

        // Constrain what the host will actually show.
        let live_outcomes = Side::BOTH.map(|side| {
            let joint = Joint::shoulder(side);
            let mut arm = ArmPose::new(rig.rotation(joint), rig.elbow(side));
            let outcome = self.resolver.resolve_arm(side, &mut arm, action);
            rig.set_rotation(joint, arm.shoulder);
            rig.set_elbow(side, arm.elbow);
            outcome
        });

        rig.set_heart_visible(target.show_heart);
        rig.set_flower_visible(target.show_flower);
        rig.set_eye_scale(secondary.eye_scale);
        if let Some(pulse) = secondary.heart_pulse {
            rig.set_heart_pulse(pulse);
        }

        FrameReport {
            elapsed,
            state: *self.blender.state(),
            target,
            target_outcomes,
            live_outcomes,
            eye_scale: secondary.eye_scale,
            heart_pulse: secondary.heart_pulse,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

fn damp_rotation(current: Rotation, target: Rotation, s: f64) -> Rotation {
    Rotation {
        pitch: damp(current.pitch, target.pitch, s),
        yaw: damp(current.yaw, target.yaw, s),
        roll: damp(current.roll, target.roll, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::NEUTRAL_POSE;
    use crate::rig::PuppetRig;

    fn run(engine: &mut Engine, rig: &mut PuppetRig, from: f64, frames: usize, dt: f64) -> FrameClock {
        let mut clock = FrameClock::new(from, dt);
        for _ in 0..frames {
            engine.frame(clock, rig);
            clock = clock.advance(dt);
        }
        clock
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = EngineConfig {
            transition_duration: 0.0,
            ..EngineConfig::default()
        };
        assert!(Engine::new(config).is_err());
        assert!(Engine::new(EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_set_action_uses_last_frame_time() {
        let mut engine = Engine::default();
        let mut rig = PuppetRig::new();
        engine.frame(FrameClock::new(2.5, 0.016), &mut rig);
        assert!(engine.set_action(Action::Wave));
        assert_eq!(engine.state().current_start, 2.5);
        assert!(!engine.set_action(Action::Wave));
    }

    #[test]
    fn test_request_action_unknown_is_idle() {
        let mut engine = Engine::default();
        engine.set_action(Action::Spin);
        assert!(engine.request_action("moonwalk"));
        assert_eq!(engine.current_action(), Action::Idle);
        assert!(engine.request_action("hug"));
        assert_eq!(engine.current_action(), Action::Hug);
    }

    #[test]
    fn test_zero_dt_leaves_live_joints() {
        let mut engine = Engine::default();
        let mut rig = PuppetRig::new();
        engine.set_action(Action::Wave);
        engine.frame(FrameClock::new(0.0, 0.0), &mut rig);
        assert_eq!(rig.pose.shoulder_r, NEUTRAL_POSE.shoulder_r);
    }

    #[test]
    fn test_live_converges_toward_target() {
        let mut engine = Engine::default();
        let mut rig = PuppetRig::new();
        engine.set_action(Action::Wave);
        run(&mut engine, &mut rig, 0.0, 240, 1.0 / 60.0);
        // Wave is reachable within limits: live tracks it closely.
        assert!((rig.pose.shoulder_r.pitch - (-1.18)).abs() < 1e-3);
        assert!((rig.pose.elbow_r - 0.86).abs() < 1e-3);
    }

    #[test]
    fn test_live_arms_within_limits_every_frame() {
        let mut engine = Engine::default();
        let mut rig = PuppetRig::new();
        let limits = JointLimitTable::default();
        let mut clock = FrameClock::new(0.0, 1.0 / 30.0);
        for (i, action) in Action::ALL.into_iter().cycle().take(24).enumerate() {
            engine.set_action(action);
            for _ in 0..(10 + i % 7) {
                let report = engine.frame(clock, &mut rig);
                for side in Side::BOTH {
                    assert!(limits.contains(side, &rig.pose.arm(side)));
                    assert!(limits.contains(side, &report.target.arm(side)));
                }
                assert!(rig.pose.is_finite());
                clock = clock.advance(1.0 / 30.0);
            }
        }
    }

    #[test]
    fn test_host_nan_is_clamped() {
        let mut engine = Engine::default();
        let mut rig = PuppetRig::new();
        rig.pose.shoulder_l.yaw = f64::NAN;
        rig.pose.elbow_r = f64::INFINITY;
        engine.frame(FrameClock::new(0.1, 0.016), &mut rig);
        let limits = JointLimitTable::default();
        for side in Side::BOTH {
            assert!(limits.contains(side, &rig.pose.arm(side)));
        }
    }

    #[test]
    fn test_heart_flags_and_pulse() {
        let mut engine = Engine::default();
        let mut rig = PuppetRig::new();
        engine.set_action(Action::Heart);
        let clock = run(&mut engine, &mut rig, 0.0, 60, 1.0 / 60.0);
        assert!(rig.pose.show_heart);
        assert!(rig.heart_pulse.is_some());

        engine.set_action(Action::Idle);
        run(&mut engine, &mut rig, clock.elapsed, 60, 1.0 / 60.0);
        assert!(!rig.pose.show_heart);
        assert!(rig.heart_pulse.is_none());
    }

    #[test]
    fn test_report_serializes() {
        let mut engine = Engine::default();
        let mut rig = PuppetRig::new();
        let report = engine.frame(FrameClock::new(0.5, 0.016), &mut rig);
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["state"]["current"], "idle");
        assert_eq!(json["target_outcomes"][0]["status"], "cleared");
    }
}
