//! Scheduler tests

use std::time::Duration;

use crate::surface::SurfaceEvent;
use crate::test_utils::{FakeSurface, RecordingGraphics, ScriptedClock, TestGame, recorded_sleeps};

use super::{PacingPolicy, Runtime};

/// Policy with no safety margin so a 60 Hz fake surface yields an exact
/// 1/60 s budget.
fn exact_policy() -> PacingPolicy {
    PacingPolicy {
        safety_margin: Duration::ZERO,
        ..PacingPolicy::default()
    }
}

fn budget() -> Duration {
    Duration::from_secs_f64(1.0 / 60.0)
}

// ============================================================================
// Fixed-step catch-up
// ============================================================================

#[test]
fn test_update_steps_capped_at_three() {
    // Half a second of elapsed time implies 30 steps; the cap allows 3 and
    // the rest of the simulation time is dropped.
    let clock = ScriptedClock::for_iterations([Duration::from_millis(500), Duration::ZERO]);
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(1);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(game.updates, 3);
    assert_eq!(game.renders, 1);
}

#[test]
fn test_residual_clamped_to_budget_after_cap() {
    // Uncapped residual would be 0.5 - 3/60 = 0.45 s; the clamp leaves at
    // most one budget's worth.
    let clock = ScriptedClock::for_iterations([Duration::from_millis(500), Duration::ZERO]);
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(1);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(runtime.accumulator, budget());
}

#[test]
fn test_single_step_leaves_true_residual() {
    let elapsed = budget() + Duration::from_millis(1);
    let clock = ScriptedClock::for_iterations([elapsed, Duration::ZERO]);
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(1);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(game.updates, 1);
    assert_eq!(runtime.accumulator, Duration::from_millis(1));
}

#[test]
fn test_no_update_below_budget() {
    // Renders every iteration even when no fixed step is due.
    let clock = ScriptedClock::for_iterations([budget() / 2, Duration::ZERO]);
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(1);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(game.updates, 0);
    assert_eq!(game.renders, 1);
}

// ============================================================================
// Rendering and visibility
// ============================================================================

#[test]
fn test_render_presents_once_per_frame() {
    let clock = ScriptedClock::new([]);
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(3);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(game.renders, 3);
    assert_eq!(gfx.begin_frames, 3);
    assert_eq!(gfx.end_frames, 3);
}

#[test]
fn test_hidden_surface_suppresses_rendering() {
    // Updates keep running while minimized; no GPU work happens at all.
    let clock = ScriptedClock::for_iterations([
        budget() + Duration::from_millis(1),
        Duration::ZERO,
        budget() + Duration::from_millis(1),
        Duration::ZERO,
    ]);
    let mut runtime = Runtime::with_clock(FakeSurface::hidden(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(2);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(game.updates, 2);
    assert_eq!(game.renders, 0);
    assert_eq!(gfx.begin_frames, 0);
    assert_eq!(gfx.end_frames, 0);
}

// ============================================================================
// Frame-budget sleeping
// ============================================================================

#[test]
fn test_sleeps_off_unused_budget() {
    let clock = ScriptedClock::for_iterations([Duration::ZERO, budget() / 2]);
    let log = clock.sleep_log();
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(1);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(recorded_sleeps(&log), vec![budget() - budget() / 2]);
}

#[test]
fn test_sleep_skipped_when_frame_overruns() {
    let clock = ScriptedClock::for_iterations([Duration::ZERO, budget() * 2]);
    let log = clock.sleep_log();
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(1);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert!(recorded_sleeps(&log).is_empty());
}

#[test]
fn test_render_time_feeds_next_cycle() {
    // A frame that costs exactly one budget leaves a full step due on the
    // next iteration even though the top-of-iteration sample reads zero.
    let clock = ScriptedClock::for_iterations([
        Duration::ZERO,
        budget() + Duration::from_millis(1),
        Duration::ZERO,
        Duration::ZERO,
    ]);
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(2);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(game.updates, 1);
}

// ============================================================================
// Event dispatch
// ============================================================================

#[test]
fn test_close_request_terminates_by_default() {
    let surface = FakeSurface::new().script_events(0, vec![SurfaceEvent::CloseRequested]);
    let clock = ScriptedClock::new([]);
    let mut runtime = Runtime::with_clock(surface, exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(10);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(game.close_requests, 1);
    // Terminated before rendering that iteration.
    assert_eq!(game.renders, 0);
}

#[test]
fn test_deferred_close_keeps_loop_running() {
    let surface = FakeSurface::new()
        .script_events(0, vec![SurfaceEvent::CloseRequested])
        .script_events(1, vec![SurfaceEvent::CloseRequested]);
    let clock = ScriptedClock::new([]);
    let mut runtime = Runtime::with_clock(surface, exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(10);
    game.close_after_requests = Some(2);

    runtime.run(&mut gfx, &mut game).unwrap();

    assert_eq!(game.close_requests, 2);
    // First request was deferred, so exactly one frame rendered.
    assert_eq!(game.renders, 1);
}

#[test]
fn test_resize_reaches_backend_and_game() {
    let surface = FakeSurface::new().script_events(
        0,
        vec![SurfaceEvent::Resized {
            width: 800,
            height: 600,
        }],
    );
    let clock = ScriptedClock::new([]);
    let mut runtime = Runtime::with_clock(surface, exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(1);

    runtime.run(&mut gfx, &mut game).unwrap();

    // Initial set_screen at loop entry, then the resize event.
    assert_eq!(gfx.resizes, vec![(640, 480), (800, 600)]);
    assert_eq!(game.resizes, vec![(800, 600)]);
    assert_eq!(runtime.batch.screen_size(), (800, 600));
}

// ============================================================================
// Failure propagation
// ============================================================================

#[test]
fn test_update_error_propagates() {
    let clock = ScriptedClock::for_iterations([Duration::from_millis(100), Duration::ZERO]);
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(5);
    game.fail_update = true;

    let err = runtime.run(&mut gfx, &mut game).unwrap_err();
    assert!(err.to_string().contains("update failed"));
}

#[test]
fn test_render_error_propagates() {
    let clock = ScriptedClock::new([]);
    let mut runtime = Runtime::with_clock(FakeSurface::new(), exact_policy(), clock);
    let mut gfx = RecordingGraphics::new();
    let mut game = TestGame::run_for(5);
    game.fail_render = true;

    let err = runtime.run(&mut gfx, &mut game).unwrap_err();
    assert!(err.to_string().contains("render failed"));
}

// ============================================================================
// Budget derivation
// ============================================================================

#[test]
fn test_budget_derived_from_surface_refresh_rate() {
    let mut surface = FakeSurface::new();
    surface.refresh_hz = 120;
    let clock = ScriptedClock::new([]);
    let runtime = Runtime::with_clock(surface, PacingPolicy::default(), clock);

    assert_eq!(
        runtime.frame_budget(),
        PacingPolicy::default().frame_budget(120)
    );
}
