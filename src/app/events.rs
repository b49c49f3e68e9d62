//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Every fault and every
//! state transition produces one, so nothing the controller decides goes
//! unobserved.

use serde::Serialize;

use crate::error::SensorFault;
use crate::fsm::context::Transition;
use crate::fsm::{Mode, SafetyState, StatusLabel};
use crate::sensors::TemperatureSample;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries initial state and mode).
    Started { state: SafetyState, mode: Mode },

    /// A new sample was read from the probe (valid or not).
    SampleTaken(TemperatureSample),

    /// The FSM transitioned between states.
    StateChanged(Transition),

    /// The current sample is unusable; emitted every tick it persists.
    SensorFault(SensorFault),

    /// A valid sample followed one or more faulted ticks.
    SensorRecovered,

    /// The operator selected a different mode.
    ModeChanged { from: Mode, to: Mode },

    /// A new configuration was accepted.
    ConfigUpdated,

    /// Point-in-time telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryData {
    pub state: SafetyState,
    pub mode: Mode,
    /// Latest reading, `None` before the first sample.
    pub temperature_c: Option<f32>,
    pub sample_age_secs: Option<u64>,
    pub target_temp_c: f32,
    pub heater_on: bool,
    pub status: Option<StatusLabel>,
    /// Time since Heating was entered, while the window is open.
    pub heating_elapsed_secs: Option<u64>,
    pub sensor_fault: Option<SensorFault>,
}
