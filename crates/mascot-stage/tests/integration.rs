//! Integration tests for StageEngine
//!
//! These tests drive the engine through the mock HAL the way a browser
//! would: timers and frame callbacks fire only when the test delivers them.
//! - Full appearance sequence and motion
//! - Edge flips and the bottom restart
//! - Library loading outcomes
//! - Hover pausing and resize handling
//! - The trigger policy with the hand layer

use mascot_hal::{Layer, Readiness, TimerKind};
use mascot_hal_mock::{MockHal, PlayerCall};
use mascot_stage::config::{HandConfig, Sequencing, VerticalPolicy};
use mascot_stage::{
    device, DeviceClass, Horizontal, LibraryState, Phase, StageConfig, StageEngine, StageEvent,
    TrailState,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

// =============================================================================
// Helpers
// =============================================================================

fn fire(engine: &mut StageEngine<MockHal>, kind: TimerKind) {
    assert!(
        engine.hal().take_timer(kind).is_some(),
        "{:?} was not scheduled",
        kind
    );
    engine.dispatch(StageEvent::Timer(kind));
}

/// Start the engine and run the sequence up to the first frame
fn start_running(engine: &mut StageEngine<MockHal>) {
    engine.dispatch(StageEvent::Start);
    fire(engine, TimerKind::ContainerAppearance);
    fire(engine, TimerKind::AnimationStart);
    engine.dispatch(StageEvent::ContentLoaded(Layer::Main));
    fire(engine, TimerKind::MovementStart);
    assert_eq!(engine.phase(), Phase::Running);
}

/// Deliver one frame if the engine asked for one
fn frame(engine: &mut StageEngine<MockHal>, ts: f64) -> bool {
    if !engine.hal().take_frame_request() {
        return false;
    }
    engine.dispatch(StageEvent::Frame(ts));
    true
}

// =============================================================================
// Motion
// =============================================================================

#[test]
fn test_right_edge_flip_over_four_and_a_half_seconds() {
    let mut engine = StageEngine::new(MockHal::with_viewport(1000.0, 1000.0), StageConfig::default());
    start_running(&mut engine);

    let limit = 1000.0 - 456.0 + 65.0;
    let mut ts = 0.0;
    let mut first_flip_x = None;
    while ts <= 4500.0 {
        assert!(frame(&mut engine, ts));
        let t = engine.hal().transform(Layer::Main).unwrap();
        assert!(t.x <= limit + 0.001, "x={} at {}ms", t.x, ts);
        if first_flip_x.is_none() && engine.mover().flip_count() == 1 {
            first_flip_x = Some(t.x);
        }
        ts += FRAME_MS;
    }

    assert_eq!(engine.mover().flip_count(), 1);
    assert_eq!(engine.mover().direction(), Horizontal::Left);
    assert!((first_flip_x.unwrap() - limit).abs() < 0.001);
    // Flip finished long ago
    assert!((engine.mover().scale_x() + 1.0).abs() < 0.001);
    assert!(engine.mover().position().x < limit);
}

#[test]
fn test_mobile_profile_at_startup() {
    let engine = StageEngine::new(MockHal::with_viewport(360.0, 740.0), StageConfig::default());
    let profile = engine.profile();
    assert_eq!(profile.class, DeviceClass::Mobile);
    assert!((profile.size.width - 292.0).abs() < 0.001);
    assert!((profile.size.height - 208.0).abs() < 0.001);
    assert!((profile.speeds.horizontal - 100.0).abs() < 0.001);
    assert!((profile.speeds.vertical - 50.0).abs() < 0.001);

    let resolved = device::resolve(&StageConfig::default(), 360.0);
    assert_eq!(&resolved, profile);
}

#[test]
fn test_height_only_resize_keeps_frame_loop() {
    let mut engine = StageEngine::new(MockHal::with_viewport(1400.0, 900.0), StageConfig::default());
    start_running(&mut engine);
    frame(&mut engine, 0.0);
    frame(&mut engine, FRAME_MS);

    let requests = engine.hal().frame_request_count();
    let cancels = engine.hal().frame_cancel_count();
    engine.hal().set_viewport(1400.0, 500.0);
    engine.dispatch(StageEvent::Resize {
        width: 1400.0,
        height: 500.0,
    });

    assert_eq!(engine.mover().last_timestamp(), Some(FRAME_MS));
    assert_eq!(engine.hal().frame_request_count(), requests);
    assert_eq!(engine.hal().frame_cancel_count(), cancels);
}

#[test]
fn test_restart_on_bottom_stops_updates_until_resumed() {
    let mut engine = StageEngine::new(MockHal::with_viewport(1400.0, 500.0), StageConfig::default());
    start_running(&mut engine);

    let mut ts = 0.0;
    while frame(&mut engine, ts) {
        ts += FRAME_MS;
    }
    assert_eq!(engine.phase(), Phase::Restarting);
    let bottom = engine.mover().position();
    assert!(bottom.y + 344.0 >= 490.0 - 0.001);

    // Nothing moves while the restart waits
    engine.dispatch(StageEvent::Frame(ts + 1000.0));
    assert_eq!(engine.mover().position(), bottom);

    fire(&mut engine, TimerKind::RestartResume);
    fire(&mut engine, TimerKind::RestartMove);
    assert_eq!(engine.phase(), Phase::Running);

    let restart_ts = ts + 20_000.0;
    frame(&mut engine, restart_ts);
    frame(&mut engine, restart_ts + 100.0);
    let t = engine.hal().transform(Layer::Main).unwrap();
    assert!((t.x - 23.0).abs() < 0.001);
    assert!((t.y - 5.0).abs() < 0.001);
}

// =============================================================================
// Sequencing
// =============================================================================

#[test]
fn test_full_timed_sequence() {
    let mut engine = StageEngine::new(MockHal::new(), StageConfig::default());
    engine.dispatch(StageEvent::Start);
    assert_eq!(engine.hal().pending_timers(), vec![TimerKind::ContainerAppearance]);
    assert!(engine.hal().mount_order().is_empty());

    fire(&mut engine, TimerKind::ContainerAppearance);
    assert_eq!(engine.hal().mount_order(), vec![Layer::Snow, Layer::Main]);

    fire(&mut engine, TimerKind::AnimationStart);
    assert_eq!(engine.hal().pending_timer(TimerKind::MovementStart), Some(2300));
    // Still invisible until the first frame renders
    assert_eq!(engine.hal().opacity(Layer::Main), Some(0.0));

    engine.dispatch(StageEvent::ContentLoaded(Layer::Main));
    assert_eq!(engine.hal().opacity(Layer::Main), Some(1.0));

    fire(&mut engine, TimerKind::MovementStart);
    assert!(engine.hal().frame_pending());
    let t = engine.hal().transform(Layer::Main).unwrap();
    assert_eq!((t.x, t.y, t.scale_x), (0.0, 0.0, 1.0));
    assert!(engine.hal().has_log_containing("[stage] movement started"));
}

#[test]
fn test_fade_driven_sequence() {
    let mut config = StageConfig::default();
    config.sequencing = Sequencing::FadeDriven;
    config.delays.movement_start = 0;
    let mut engine = StageEngine::new(MockHal::new(), config);
    engine.dispatch(StageEvent::Start);
    fire(&mut engine, TimerKind::ContainerAppearance);
    fire(&mut engine, TimerKind::AnimationStart);
    assert_eq!(engine.hal().pending_timer(TimerKind::MovementStart), None);

    engine.dispatch(StageEvent::ContentLoaded(Layer::Main));
    engine.dispatch(StageEvent::TransitionEnd(Layer::Main));
    // Falls back to movement.startDelay
    assert_eq!(engine.hal().pending_timer(TimerKind::MovementStart), Some(1000));
}

#[test]
fn test_library_pending_then_ready() {
    let hal = MockHal::new();
    hal.set_readiness(Readiness::Pending);
    let mut engine = StageEngine::new(hal, StageConfig::default());
    engine.dispatch(StageEvent::Start);
    fire(&mut engine, TimerKind::ContainerAppearance);
    fire(&mut engine, TimerKind::AnimationStart);

    assert_eq!(engine.phase(), Phase::Loading);
    assert!(!engine.has_player(Layer::Main));
    assert!(engine.hal().animation_requests().is_empty());

    engine.hal().set_readiness(Readiness::Ready);
    engine.dispatch(StageEvent::LibraryReady);
    assert_eq!(engine.library(), LibraryState::Ready);
    assert_eq!(engine.phase(), Phase::Waiting);
    assert!(engine.has_player(Layer::Main));
    assert!(engine.has_player(Layer::Snow));

    // A duplicate notification creates nothing new
    engine.dispatch(StageEvent::LibraryReady);
    assert_eq!(engine.hal().animation_requests().len(), 2);
}

#[test]
fn test_library_unavailable_is_silent() {
    let hal = MockHal::new();
    hal.set_readiness(Readiness::Failed);
    let mut engine = StageEngine::new(hal, StageConfig::default());
    engine.dispatch(StageEvent::Start);
    fire(&mut engine, TimerKind::ContainerAppearance);
    fire(&mut engine, TimerKind::AnimationStart);

    assert_eq!(engine.phase(), Phase::Failed);
    assert!(engine.hal().pending_timers().is_empty());
    assert!(!engine.hal().frame_pending());
    assert_eq!(engine.hal().opacity(Layer::Main), Some(0.0));
    assert!(engine.hal().has_log_containing("not rendering"));

    // Later events change nothing
    engine.dispatch(StageEvent::ContentLoaded(Layer::Main));
    assert_eq!(engine.hal().opacity(Layer::Main), Some(0.0));
}

// =============================================================================
// Hover, trail and hand
// =============================================================================

#[test]
fn test_hover_pauses_motion_and_trail() {
    let mut engine = StageEngine::new(MockHal::with_viewport(1400.0, 900.0), StageConfig::default());
    start_running(&mut engine);
    frame(&mut engine, 0.0);
    frame(&mut engine, FRAME_MS);
    fire(&mut engine, TimerKind::TrailReveal);
    assert_eq!(engine.trail().state(), TrailState::Visible);

    engine.dispatch(StageEvent::PointerEnter);
    assert_eq!(engine.trail().state(), TrailState::FadingOut);
    let held = engine.mover().position();
    frame(&mut engine, 2.0 * FRAME_MS);
    frame(&mut engine, 3.0 * FRAME_MS);
    assert_eq!(engine.mover().position(), held);

    fire(&mut engine, TimerKind::TrailSettle);
    assert_eq!(engine.trail().state(), TrailState::Hidden);

    engine.dispatch(StageEvent::PointerLeave);
    assert_eq!(engine.trail().state(), TrailState::Revealing);
    frame(&mut engine, 10_000.0);
    frame(&mut engine, 10_100.0);
    assert!((engine.mover().position().x - held.x - 23.0).abs() < 0.001);
}

#[test]
fn test_trigger_policy_fires_hand_and_restarts() {
    let mut config = StageConfig::default();
    config.movement.vertical_policy = VerticalPolicy::Trigger;
    config.movement.restart_on_bottom = false;
    config.hand = Some(HandConfig {
        lottie_path: String::from("hand.json"),
        ..Default::default()
    });
    let mut engine = StageEngine::new(MockHal::with_viewport(1400.0, 600.0), config);
    start_running(&mut engine);
    assert_eq!(engine.hal().mount_order(), vec![Layer::Snow, Layer::Hand, Layer::Main]);

    let hand_request = engine
        .hal()
        .animation_requests()
        .into_iter()
        .find(|r| r.layer == Layer::Hand)
        .unwrap();
    assert!(!hand_request.autoplay);
    assert!(!hand_request.looping);

    let mut ts = 0.0;
    while frame(&mut engine, ts) {
        ts += FRAME_MS;
    }

    let hand_calls = engine.hal().player_calls(Layer::Hand);
    assert_eq!(
        hand_calls
            .iter()
            .filter(|c| **c == PlayerCall::GoToAndPlay(0))
            .count(),
        1
    );
    assert_eq!(engine.phase(), Phase::Restarting);
    assert_eq!(engine.hal().opacity(Layer::Hand), Some(0.0));

    // The next cycle may fire the hand again
    fire(&mut engine, TimerKind::RestartResume);
    fire(&mut engine, TimerKind::RestartMove);
    let mut ts = ts + 30_000.0;
    while frame(&mut engine, ts) {
        ts += FRAME_MS;
    }
    let fired = engine
        .hal()
        .player_calls(Layer::Hand)
        .into_iter()
        .filter(|c| *c == PlayerCall::GoToAndPlay(0))
        .count();
    assert_eq!(fired, 2);
}

#[test]
fn test_one_time_cycle_halts() {
    let mut config = StageConfig::default();
    config.movement.one_time = true;
    let mut engine = StageEngine::new(MockHal::with_viewport(1400.0, 500.0), config);
    start_running(&mut engine);

    let mut ts = 0.0;
    while frame(&mut engine, ts) {
        ts += FRAME_MS;
    }
    assert_eq!(engine.phase(), Phase::Halted);
    assert!(engine.hal().pending_timers().is_empty());
    assert_eq!(engine.hal().opacity(Layer::Main), Some(0.0));

    engine.dispatch(StageEvent::Destroy);
    assert!(engine.hal().layers_removed());
}

#[test]
fn test_snapshot_serializes() {
    let mut engine = StageEngine::new(MockHal::new(), StageConfig::default());
    start_running(&mut engine);
    frame(&mut engine, 0.0);
    frame(&mut engine, 100.0);

    let json = serde_json::to_string(&engine.snapshot()).unwrap();
    assert!(json.contains("\"phase\":\"running\""));
    assert!(json.contains("\"device\":\"desktop\""));
    assert!(json.contains("\"direction\":\"right\""));
    assert!(json.contains("\"movementStarted\":true"));
}
