//! Integration tests for action transitions.
//!
//! These tests drive the blender and the full engine through the transition
//! sequences a host produces: single requests, rapid interruptions and
//! repeated requests for the running action.

use pretty_assertions::assert_eq;
use rigpose_core::{evaluate, Action, EngineConfig, PoseBlender, NEUTRAL_POSE};
use rigpose_tests::fixtures::{approx, Harness};

// ============================================================================
// Blending
// ============================================================================

/// Halfway through a wave transition the right shoulder sits at the eased midpoint.
#[test]
fn test_wave_transition_midpoint() {
    let mut blender = PoseBlender::new(0.65);
    blender.set_action(Action::Wave, 0.0);
    let pose = blender.update(0.325, 0.325);

    assert!(approx(blender.state().progress, 0.5));
    let expected = 0.5 * NEUTRAL_POSE.shoulder_r.pitch + 0.5 * -1.18;
    assert!(approx(pose.shoulder_r.pitch, expected));
    assert!(approx(pose.shoulder_r.pitch, -0.54));
}

/// The full engine keeps the same midpoint: the pose needs no clamping or push-out.
#[test]
fn test_wave_transition_midpoint_through_engine() {
    let config = EngineConfig {
        transition_duration: 0.65,
        ..EngineConfig::default()
    };
    let mut h = Harness::with_config(config, 40.0);
    h.engine.set_action(Action::Wave);
    let report = h.run(14).unwrap();

    assert!(approx(report.elapsed, 0.325));
    assert!(approx(report.state.progress, 0.5));
    assert!(approx(report.target.shoulder_r.pitch, -0.54));
    assert!(report.target_outcomes.iter().all(|o| o.iterations() == 0));
}

/// Blend continuity at both ends of a transition.
#[test]
fn test_blend_continuity_at_endpoints() {
    let mut blender = PoseBlender::new(0.62);
    blender.set_action(Action::Hug, 2.0);

    // Progress 0: exactly the outgoing idle pose.
    assert_eq!(blender.update(2.0, 0.0), NEUTRAL_POSE);

    // Progress 1: exactly the incoming pose at its own local time.
    let pose = blender.update(3.0, 1.0);
    assert_eq!(blender.state().progress, 1.0);
    assert_eq!(pose, evaluate(Action::Hug, 1.0));
}

/// Display flags switch exactly when the eased weight reaches 0.5.
#[test]
fn test_flags_flip_at_half_weight() {
    let mut blender = PoseBlender::new(1.0);
    blender.set_action(Action::Heart, 0.0);

    let early = blender.update(0.25, 0.25);
    assert!(blender.state().alpha() < 0.5);
    assert!(!early.show_heart);

    let half = blender.update(0.5, 0.25);
    assert_eq!(blender.state().alpha(), 0.5);
    assert!(half.show_heart);

    blender.set_action(Action::Idle, 0.5);
    let leaving = blender.update(0.75, 0.25);
    assert!(leaving.show_heart);
    let gone = blender.update(1.0, 0.25);
    assert!(!gone.show_heart);
}

// ============================================================================
// Action changes
// ============================================================================

/// heart -> dance before heart finishes: heart keeps its own clock as the outgoing action.
#[test]
fn test_interrupted_transition() {
    let mut blender = PoseBlender::new(0.62);
    blender.set_action(Action::Heart, 1.0);
    blender.update(1.2, 0.2);
    blender.set_action(Action::Dance, 1.3);

    let state = *blender.state();
    assert_eq!(state.previous, Action::Heart);
    assert_eq!(state.previous_start, 1.0);
    assert_eq!(state.current, Action::Dance);
    assert_eq!(state.current_start, 1.3);
    assert_eq!(state.progress, 0.0);

    // With no time advanced, the pose is heart at local time 0.3.
    let pose = blender.update(1.3, 0.0);
    assert_eq!(pose, evaluate(Action::Heart, 1.3 - 1.0));
}

/// Requesting the running action leaves the state untouched.
#[test]
fn test_repeated_request_is_noop() {
    let mut h = Harness::new(60.0);
    assert!(h.engine.set_action(Action::Spin));
    h.run(20);
    let before = *h.engine.state();

    assert!(!h.engine.set_action(Action::Spin));
    assert!(!h.engine.request_action("spin"));
    assert_eq!(*h.engine.state(), before);
}

/// Unknown names fall back to idle rather than failing.
#[test]
fn test_unknown_request_falls_back_to_idle() {
    let mut h = Harness::new(60.0);
    h.engine.set_action(Action::Dance);
    h.run(10);
    assert!(h.engine.request_action("backflip"));
    assert_eq!(h.engine.current_action(), Action::Idle);
    assert_eq!(h.engine.state().previous, Action::Dance);
}

/// Idle evaluation is the neutral pose at every time.
#[test]
fn test_idle_is_neutral() {
    for i in 0..100 {
        assert_eq!(evaluate(Action::Idle, i as f64 * 0.37), NEUTRAL_POSE);
    }
}

/// A finished transition at 60 fps and at 15 fps ends in the same state.
#[test]
fn test_transition_length_independent_of_frame_rate() {
    for fps in [15.0, 60.0, 144.0] {
        let mut h = Harness::new(fps);
        h.engine.set_action(Action::Flower);
        let frames = (0.62 * fps).ceil() as usize + 1;
        let report = h.run(frames).unwrap();
        assert_eq!(report.state.progress, 1.0, "fps {}", fps);
    }
}
