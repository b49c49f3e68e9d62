//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the FSM, health monitor, sample scheduler and the
//! carried [`ControllerState`].  It exposes a hardware-agnostic API.  All
//! I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!    SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                   │        AppService         │
//!  ActuatorPort ◀── │ Scheduler · Health · FSM  │
//!   DisplayPort ◀── └──────────────────────────┘
//! ```
//!
//! One tick is `maybe-sample → health check → evaluate → emit`, run to
//! completion.  A faulted health check pre-empts the evaluation.

use core::time::Duration;

use log::{debug, info, warn};

use crate::config::{ControlConfig, ModeHandoff};
use crate::diagnostics::{Diagnostics, DiagnosticsReport, RuntimeMetrics};
use crate::error::Error;
use crate::fsm::context::{ControllerState, Evaluation, HeaterCommand, TickInput, Transition};
use crate::fsm::{Fsm, Mode, SafetyState, StatusLabel};
use crate::health::{HealthMonitor, HealthOutcome};
use crate::scheduler::SampleScheduler;
use crate::sensors::TemperatureSample;

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// Tick output
// ───────────────────────────────────────────────────────────────

/// What one tick decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Safety state after the tick.
    pub state: SafetyState,
    pub health: HealthOutcome,
    /// Heater level written this tick, `None` if the core left it alone.
    pub heater: Option<HeaterCommand>,
    /// Status written this tick, `None` if the core left it alone.
    pub status: Option<StatusLabel>,
    pub transition: Option<Transition>,
    /// Whether this tick read the probe.
    pub sampled: bool,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    state: ControllerState,
    config: ControlConfig,
    health: HealthMonitor,
    scheduler: SampleScheduler,
    mode: Mode,
    latest: Option<TemperatureSample>,
    /// Last heater level the core wrote.
    heater: HeaterCommand,
    /// Last status the core wrote.
    status: Option<StatusLabel>,
    diagnostics: Diagnostics,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Fails if the configuration breaks a startup invariant; no
    /// controller exists until it passes.  Does **not** start the FSM —
    /// call [`start`](Self::start) next.
    pub fn new(config: ControlConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            fsm: Fsm::default(),
            state: ControllerState::at(SafetyState::Idle),
            health: HealthMonitor::new(config.sensor_error_c),
            scheduler: SampleScheduler::new(config.sample_interval()),
            config,
            mode: Mode::Eco,
            latest: None,
            heater: HeaterCommand::Off,
            status: None,
            diagnostics: Diagnostics::new(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the initial state (Idle).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        let input = TickInput {
            temperature_c: f32::NAN,
            now: Duration::ZERO,
            config: &self.config,
        };
        self.state = self.fsm.start(SafetyState::Idle, &input).state;
        sink.emit(&AppEvent::Started {
            state: self.state.safety,
            mode: self.mode,
        });
        info!(
            "AppService started in {:?} ({:?} mode, target {:.1}\u{00b0}C)",
            self.state.safety, self.mode, self.config.target_temp_c
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle at monotonic time `now`.
    ///
    /// The `hw` parameter satisfies [`SensorPort`], [`ActuatorPort`] and
    /// [`DisplayPort`] at once — this avoids multiple mutable borrows
    /// while keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now: Duration,
        hw: &mut (impl SensorPort + ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> TickOutput {
        // 1. Sample if due
        let sampled = self.sample_if_due(now, hw, sink);

        // 2. Health check
        let was_faulted = self.health.active_fault().is_some();
        let health = self.health.check(self.latest.as_ref());
        let input = TickInput {
            temperature_c: self.latest.map_or(f32::NAN, |s| s.celsius),
            now,
            config: &self.config,
        };

        // 3. Fault override: forced Idle, heater off, no FSM this tick
        if let HealthOutcome::Faulted(fault) = health {
            let ev = self.fsm.force_transition(self.state, SafetyState::Idle, &input);
            self.state = ev.state;
            self.drive(hw, HeaterCommand::Off, StatusLabel::SensorError);
            self.diagnostics.record_sensor_fault();
            if let Some(t) = ev.transition {
                warn!("Sensor fault forced {:?} -> Idle", t.from);
                self.diagnostics.record_forced_idle(t);
                sink.emit(&AppEvent::StateChanged(t));
            }
            sink.emit(&AppEvent::SensorFault(fault));
            self.diagnostics.record_tick(false);

            return TickOutput {
                state: self.state.safety,
                health,
                heater: Some(HeaterCommand::Off),
                status: Some(StatusLabel::SensorError),
                transition: ev.transition,
                sampled,
            };
        }
        if was_faulted {
            sink.emit(&AppEvent::SensorRecovered);
        }

        // 4. Mode dispatch
        let out = match self.mode {
            Mode::Eco => {
                let ev = self.fsm.evaluate(self.state, &input);
                self.apply(ev, hw, sink);
                TickOutput {
                    state: ev.state.safety,
                    health,
                    heater: Some(ev.heater),
                    status: Some(ev.status),
                    transition: ev.transition,
                    sampled,
                }
            }
            // Heater and status belong to the mode's own controller.
            // SafetyState is held exactly as Eco left it.
            Mode::Comfort | Mode::Manual => TickOutput {
                state: self.state.safety,
                health,
                heater: None,
                status: None,
                transition: None,
                sampled,
            },
        };

        self.diagnostics
            .record_tick(out.heater.is_some_and(HeaterCommand::is_on));
        out
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.  Configuration changes are validated
    /// first; a rejected change leaves the running config untouched.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        match cmd {
            AppCommand::SetMode(mode) => {
                self.set_mode(mode, hw, sink);
                Ok(())
            }
            AppCommand::SetTarget(target) => {
                let cfg = self.config.with_target(target).inspect_err(|e| {
                    warn!("Rejected target {target:.1}\u{00b0}C: {e}");
                })?;
                info!(
                    "Target {:.1}\u{00b0}C -> {:.1}\u{00b0}C",
                    self.config.target_temp_c, target
                );
                self.replace_config(cfg, sink);
                Ok(())
            }
            AppCommand::UpdateConfig(cfg) => {
                cfg.validate().inspect_err(|e| {
                    warn!("Rejected configuration: {e}");
                })?;
                info!("Configuration updated at runtime");
                self.replace_config(cfg, sink);
                Ok(())
            }
            AppCommand::RequestSample => {
                self.scheduler.request();
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot at `now`.
    pub fn build_telemetry(&self, now: Duration) -> TelemetryData {
        TelemetryData {
            state: self.state.safety,
            mode: self.mode,
            temperature_c: self.latest.map(|s| s.celsius),
            sample_age_secs: self.latest.map(|s| s.age(now).as_secs()),
            target_temp_c: self.config.target_temp_c,
            heater_on: self.heater.is_on(),
            status: self.status,
            heating_elapsed_secs: self.state.window.map(|w| w.elapsed(now).as_secs()),
            sensor_fault: self.health.active_fault(),
        }
    }

    /// Current safety state.
    pub fn state(&self) -> SafetyState {
        self.state.safety
    }

    /// The full carried state record.
    pub fn controller_state(&self) -> ControllerState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn latest_sample(&self) -> Option<TemperatureSample> {
        self.latest
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Last heater level the core wrote.
    pub fn heater(&self) -> HeaterCommand {
        self.heater
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.diagnostics.metrics().ticks
    }

    pub fn metrics(&self) -> RuntimeMetrics {
        self.diagnostics.metrics()
    }

    pub fn diagnostics_report(&self) -> DiagnosticsReport {
        self.diagnostics.report()
    }

    // ── Internal ──────────────────────────────────────────────

    fn sample_if_due(
        &mut self,
        now: Duration,
        hw: &mut (impl SensorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.scheduler.is_due(now) {
            return false;
        }

        let celsius = hw.read_celsius();
        let sample = TemperatureSample::capture(celsius, now, self.config.sensor_error_c);
        self.scheduler.mark_sampled(now);
        self.latest = Some(sample);
        self.diagnostics.record_sample();
        debug!("[Sensor] Temp: {celsius:.2}\u{00b0}C");

        if sample.valid {
            hw.show_temperature(celsius);
        }
        sink.emit(&AppEvent::SampleTaken(sample));
        true
    }

    fn apply(
        &mut self,
        ev: Evaluation,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        self.state = ev.state;
        self.drive(hw, ev.heater, ev.status);
        if let Some(t) = ev.transition {
            self.diagnostics.record_transition(t);
            sink.emit(&AppEvent::StateChanged(t));
        }
    }

    /// Write both outputs.  Level-set, so repeating a write is harmless.
    fn drive(
        &mut self,
        hw: &mut (impl ActuatorPort + DisplayPort),
        heater: HeaterCommand,
        status: StatusLabel,
    ) {
        hw.set_heater(heater.is_on());
        hw.set_status(status);
        self.heater = heater;
        self.status = Some(status);
    }

    fn set_mode(
        &mut self,
        mode: Mode,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        if mode == self.mode {
            return;
        }
        let from = self.mode;
        self.mode = mode;
        info!("Mode {:?} -> {:?} (state {:?})", from, mode, self.state.safety);
        sink.emit(&AppEvent::ModeChanged { from, to: mode });

        match (from, mode) {
            (Mode::Eco, Mode::Comfort | Mode::Manual) => match self.config.mode_handoff {
                // The display follows the relay, not the held SafetyState.
                ModeHandoff::ForceOff => {
                    self.drive(hw, HeaterCommand::Off, StatusLabel::Idle);
                    info!("Leaving Eco: heater forced off");
                }
                // Heater and display both pass to the new mode's owner.
                ModeHandoff::Retain => {
                    info!("Leaving Eco: heater left {:?}", self.heater);
                }
            },
            // Back in Eco the next tick rewrites the held state's outputs;
            // between non-Eco modes the core owns nothing.
            (_, Mode::Eco) | (Mode::Comfort | Mode::Manual, _) => {}
        }
    }

    fn replace_config(&mut self, cfg: ControlConfig, sink: &mut impl EventSink) {
        self.scheduler.set_interval(cfg.sample_interval());
        self.health.set_sentinel(cfg.sensor_error_c);
        self.config = cfg;
        sink.emit(&AppEvent::ConfigUpdated);
    }
}
