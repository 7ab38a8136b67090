//! rigpose Procedural Pose Engine
//!
//! This crate turns discrete action requests (wave, heart, dance, ...) into a
//! continuous, physically plausible joint configuration for a stylized
//! character rig, one frame at a time.
//!
//! # Overview
//!
//! Every frame runs the same pipeline:
//!
//! - **Blend**: the outgoing and incoming action poses are cross-faded with
//!   an eased weight
//! - **Limit**: shoulder and elbow values are clamped to anatomical ranges
//! - **Resolve**: arms are pushed out of the torso ellipsoid
//! - **Overlay**: sway, blink and heart pulse are added on top
//! - **Write back**: the host's live joints are eased toward the result and
//!   re-constrained
//!
//! # Example
//!
//! ```
//! use rigpose_core::{Action, Engine, EngineConfig, FrameClock, PuppetRig};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! let mut rig = PuppetRig::new();
//!
//! engine.set_action(Action::Wave);
//! let mut clock = FrameClock::new(0.0, 1.0 / 60.0);
//! for _ in 0..60 {
//!     engine.frame(clock, &mut rig);
//!     clock = clock.advance(1.0 / 60.0);
//! }
//! assert!(rig.pose.shoulder_r.pitch < 0.0);
//! ```
//!
//! # Modules
//!
//! - [`pose`]: Pose value types
//! - [`action`]: Action identifiers
//! - [`library`]: Per-action target poses
//! - [`blend`]: Action state machine and cross-fading
//! - [`limits`]: Joint limit table and clamping
//! - [`collision`]: Torso collider and arm push-out
//! - [`secondary`]: Sway, blink and heart pulse
//! - [`rig`]: Host joint handles and display sinks
//! - [`driver`]: The per-frame engine
//! - [`config`]: Engine configuration document

pub mod action;
pub mod blend;
pub mod collision;
pub mod config;
pub mod driver;
pub mod error;
pub mod library;
pub mod limits;
pub mod math;
pub mod pose;
pub mod rig;
pub mod secondary;

// Re-export commonly used types at the crate root
pub use action::Action;
pub use blend::{blend, ActionState, PoseBlender};
pub use collision::{ArmGeometry, CollisionResolver, ResolveOutcome, ResolverConfig, TorsoCollider};
pub use config::EngineConfig;
pub use driver::{Engine, FrameClock, FrameReport};
pub use error::{ActionParseError, ConfigError};
pub use library::evaluate;
pub use limits::{ArmLimits, Interval, JointLimitTable};
pub use pose::{ArmPose, Pose, Rotation, Side, NEUTRAL_POSE};
pub use rig::{DisplaySinks, Joint, JointHandles, PuppetRig};
pub use secondary::{HeartPulse, SecondaryAnimator, SecondaryConfig};
