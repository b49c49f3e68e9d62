//! End-to-end control scenarios: probe readings in, heater and status out.
//!
//! Time is injected directly into `AppService::tick`; with the default
//! one-hour sampling interval, ticking on whole hours reads the probe on
//! every tick.

use std::time::Duration;

use heatguard::app::events::AppEvent;
use heatguard::app::service::AppService;
use heatguard::config::ControlConfig;
use heatguard::error::SensorFault;
use heatguard::fsm::context::{HeaterCommand, Transition};
use heatguard::fsm::{SafetyState, StatusLabel};
use heatguard::health::HealthOutcome;

use super::mock_hw::{MockHardware, RecordingSink};

const HOUR: Duration = Duration::from_secs(3600);
const SENTINEL: f32 = -127.0;

fn make_app(readings: impl IntoIterator<Item = f32>) -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(ControlConfig::default()).unwrap();
    let hw = MockHardware::new(readings);
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, hw, sink)
}

fn hours(h: u64) -> Duration {
    HOUR * h as u32
}

/// Drive the controller into `target` with one sample per hour.
/// Returns the time of the last tick.
fn drive_to(
    app: &mut AppService,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    target: SafetyState,
) -> Duration {
    let path: &[f32] = match target {
        SafetyState::Idle => &[25.0],
        SafetyState::Heating => &[20.0],
        SafetyState::Stabilizing => &[20.0, 24.0],
        SafetyState::Overheat => &[20.0, 31.0],
    };
    let mut now = Duration::ZERO;
    for (i, &t) in path.iter().enumerate() {
        now = hours(i as u64);
        hw.push_reading(t);
        app.tick(now, hw, sink);
    }
    assert_eq!(app.state(), target);
    now
}

// ── Reference heating cycle ───────────────────────────────────

#[test]
fn heating_cycle_with_duration_cutoff() {
    let (mut app, mut hw, mut sink) = make_app([25.0, 20.0, 24.0]);

    let mut states = vec![app.state()];
    let mut heater = vec![app.heater()];

    for now in [hours(0), hours(1), hours(2), hours(8) + Duration::from_secs(1)] {
        let out = app.tick(now, &mut hw, &mut sink);
        assert!(out.sampled);
        states.push(out.state);
        heater.push(out.heater.unwrap());
    }

    use HeaterCommand::{Off, On};
    use SafetyState::{Heating, Idle, Stabilizing};
    assert_eq!(states, [Idle, Idle, Heating, Stabilizing, Idle]);
    assert_eq!(heater, [Off, Off, On, On, Off]);
    assert_eq!(hw.heater(), Some(false));
    assert_eq!(hw.status(), Some(StatusLabel::Idle));
    assert_eq!(app.metrics().duration_cutoffs, 1);
}

#[test]
fn stabilizing_holds_until_window_strictly_exceeded() {
    let (mut app, mut hw, mut sink) = make_app([]);
    let entered = drive_to(&mut app, &mut hw, &mut sink, SafetyState::Stabilizing);
    let window_start = entered - HOUR;

    // Exactly 7 h after Heating was entered: still stabilizing.
    let out = app.tick(window_start + hours(7), &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Stabilizing);
    assert_eq!(out.heater, Some(HeaterCommand::On));

    let out = app.tick(window_start + hours(7) + Duration::from_millis(1), &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Idle);
    assert_eq!(out.heater, Some(HeaterCommand::Off));
}

// ── Over-temperature ──────────────────────────────────────────

#[test]
fn overheat_trip_and_recovery() {
    let (mut app, mut hw, mut sink) = make_app([]);
    let now = drive_to(&mut app, &mut hw, &mut sink, SafetyState::Heating);

    hw.push_reading(31.0);
    let out = app.tick(now + HOUR, &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Overheat);
    assert_eq!(out.heater, Some(HeaterCommand::Off));
    assert_eq!(hw.status(), Some(StatusLabel::Overheat));
    assert!(app.controller_state().window.is_none());

    hw.push_reading(21.5);
    let out = app.tick(now + hours(2), &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Idle);
    assert_eq!(hw.heater(), Some(false));
    assert_eq!(app.metrics().overheat_trips, 1);
}

#[test]
fn overheat_holds_at_exact_recovery_threshold() {
    let (mut app, mut hw, mut sink) = make_app([]);
    let now = drive_to(&mut app, &mut hw, &mut sink, SafetyState::Overheat);

    hw.push_reading(22.0);
    let out = app.tick(now + HOUR, &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Overheat);
    assert!(out.transition.is_none());
}

#[test]
fn ceiling_wins_over_stabilizing() {
    let (mut app, mut hw, mut sink) = make_app([]);
    let now = drive_to(&mut app, &mut hw, &mut sink, SafetyState::Heating);

    // 30.0 satisfies both the ceiling and the stabilizing threshold.
    hw.push_reading(30.0);
    let out = app.tick(now + HOUR, &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Overheat);
}

#[test]
fn only_idle_reaches_heating() {
    let (mut app, mut hw, mut sink) = make_app([]);
    let now = drive_to(&mut app, &mut hw, &mut sink, SafetyState::Overheat);

    // Cold enough to start heating from Idle, but Overheat only recovers.
    hw.push_reading(15.0);
    let out = app.tick(now + HOUR, &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Idle);

    hw.push_reading(15.0);
    let out = app.tick(now + hours(2), &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Heating);
}

// ── Sensor fault override ─────────────────────────────────────

#[test]
fn fault_forces_idle_from_every_state() {
    for from in SafetyState::ALL {
        for bad in [SENTINEL, f32::NAN] {
            let (mut app, mut hw, mut sink) = make_app([]);
            let now = drive_to(&mut app, &mut hw, &mut sink, from);

            hw.push_reading(bad);
            let out = app.tick(now + HOUR, &mut hw, &mut sink);

            assert!(out.health.is_faulted(), "{from:?}/{bad}");
            assert_eq!(out.state, SafetyState::Idle, "{from:?}/{bad}");
            assert_eq!(out.heater, Some(HeaterCommand::Off));
            assert_eq!(out.status, Some(StatusLabel::SensorError));
            assert_eq!(hw.heater(), Some(false));
            assert_eq!(hw.status(), Some(StatusLabel::SensorError));
            assert!(app.controller_state().window.is_none());
            assert_eq!(out.transition.is_some(), from != SafetyState::Idle);
        }
    }
}

#[test]
fn sentinel_while_heating_shuts_down_immediately() {
    let (mut app, mut hw, mut sink) = make_app([]);
    let now = drive_to(&mut app, &mut hw, &mut sink, SafetyState::Heating);
    sink.events.clear();

    hw.push_reading(SENTINEL);
    let out = app.tick(now + HOUR, &mut hw, &mut sink);

    assert_eq!(out.health, HealthOutcome::Faulted(SensorFault::ErrorSentinel));
    assert_eq!(
        out.transition,
        Some(Transition {
            from: SafetyState::Heating,
            to: SafetyState::Idle,
            at: now + HOUR,
        })
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorFault(SensorFault::ErrorSentinel))), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::StateChanged(_))), 1);
    assert_eq!(app.metrics().forced_idles, 1);
}

#[test]
fn stale_faulted_sample_keeps_faulting_until_next_sample() {
    let (mut app, mut hw, mut sink) = make_app([SENTINEL, 25.0]);

    let first = app.tick(Duration::ZERO, &mut hw, &mut sink);
    assert!(first.health.is_faulted());

    // Between samples the same bad reading is re-checked every tick.
    for s in 1..=3 {
        let out = app.tick(Duration::from_secs(s), &mut hw, &mut sink);
        assert!(!out.sampled);
        assert!(out.health.is_faulted());
        assert_eq!(hw.status(), Some(StatusLabel::SensorError));
    }
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorFault(_))), 4);

    // Next valid sample clears it with no latching.
    let out = app.tick(HOUR, &mut hw, &mut sink);
    assert_eq!(out.health, HealthOutcome::Healthy);
    assert_eq!(out.state, SafetyState::Idle);
    assert_eq!(hw.status(), Some(StatusLabel::Idle));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorRecovered)), 1);
}

#[test]
fn heating_resumes_after_fault_clears() {
    let (mut app, mut hw, mut sink) = make_app([20.0, SENTINEL, 20.0]);

    app.tick(hours(0), &mut hw, &mut sink);
    assert_eq!(app.state(), SafetyState::Heating);
    app.tick(hours(1), &mut hw, &mut sink);
    assert_eq!(app.state(), SafetyState::Idle);

    let out = app.tick(hours(2), &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Heating);
    // A fresh window, not the one from before the fault.
    assert_eq!(app.controller_state().window.map(|w| w.start), Some(hours(2)));
}

// ── Idempotence ───────────────────────────────────────────────

#[test]
fn settled_ticks_repeat_identical_outputs() {
    let (mut app, mut hw, mut sink) = make_app([]);
    let now = drive_to(&mut app, &mut hw, &mut sink, SafetyState::Heating);
    let transitions = app.metrics().transitions;

    hw.clear_calls();
    let outs: Vec<_> = (0..5).map(|_| app.tick(now, &mut hw, &mut sink)).collect();

    for out in &outs {
        assert_eq!(out.state, SafetyState::Heating);
        assert_eq!(out.heater, Some(HeaterCommand::On));
        assert_eq!(out.status, Some(StatusLabel::Heating));
        assert!(out.transition.is_none());
        assert!(!out.sampled);
    }
    assert_eq!(app.metrics().transitions, transitions);
    // Level-set outputs are rewritten every tick.
    assert_eq!(hw.heater_writes(), 5);
}

// ── Sampling cadence ──────────────────────────────────────────

#[test]
fn first_sample_is_immediate_and_then_hourly() {
    let (mut app, mut hw, mut sink) = make_app([25.0]);

    assert!(app.tick(Duration::ZERO, &mut hw, &mut sink).sampled);
    for s in [1, 60, 3599] {
        assert!(!app.tick(Duration::from_secs(s), &mut hw, &mut sink).sampled);
    }
    assert!(app.tick(HOUR, &mut hw, &mut sink).sampled);
    assert_eq!(hw.reads(), 2);
    assert_eq!(app.metrics().samples, 2);
    assert_eq!(app.tick_count(), 5);
}

#[test]
fn duration_guard_fires_between_samples() {
    let cfg = ControlConfig {
        sample_interval_ms: 10 * 3600 * 1000,
        ..ControlConfig::default()
    };
    let mut app = AppService::new(cfg).unwrap();
    let mut hw = MockHardware::new([20.0, 24.0]);
    let mut sink = RecordingSink::new();
    app.start(&mut sink);

    app.tick(Duration::ZERO, &mut hw, &mut sink);
    app.handle_command(heatguard::app::commands::AppCommand::RequestSample, &mut hw, &mut sink)
        .unwrap();
    app.tick(Duration::from_secs(1), &mut hw, &mut sink);
    assert_eq!(app.state(), SafetyState::Stabilizing);

    let out = app.tick(hours(7), &mut hw, &mut sink);
    assert_eq!(out.state, SafetyState::Stabilizing);

    let out = app.tick(hours(7) + Duration::from_secs(1), &mut hw, &mut sink);
    assert!(!out.sampled);
    assert_eq!(out.state, SafetyState::Idle);
    assert_eq!(hw.reads(), 2);
}
