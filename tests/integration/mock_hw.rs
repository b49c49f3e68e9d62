//! Mock hardware adapter for integration tests.
//!
//! Replays a [`ScriptedSensor`] and records every heater and display call so
//! tests can assert on the full output history without real GPIO.

use heatguard::app::events::AppEvent;
use heatguard::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use heatguard::fsm::StatusLabel;
use heatguard::sensors::ScriptedSensor;

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    Heater(bool),
    Status(StatusLabel),
    Temperature(f32),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    sensor: ScriptedSensor,
    pub calls: Vec<OutputCall>,
}

#[allow(dead_code)]
impl MockHardware {
    /// Probe that returns `readings` in order, then repeats the last one.
    pub fn new(readings: impl IntoIterator<Item = f32>) -> Self {
        Self {
            sensor: ScriptedSensor::new(readings),
            calls: Vec::new(),
        }
    }

    /// Queue the next probe value.
    pub fn push_reading(&mut self, celsius: f32) {
        self.sensor.push(celsius);
    }

    /// Sensor reads so far.
    pub fn reads(&self) -> u32 {
        self.sensor.reads()
    }

    /// Last heater level written, `None` if never written.
    pub fn heater(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            OutputCall::Heater(on) => Some(*on),
            _ => None,
        })
    }

    /// Last status written, `None` if never written.
    pub fn status(&self) -> Option<StatusLabel> {
        self.calls.iter().rev().find_map(|c| match c {
            OutputCall::Status(s) => Some(*s),
            _ => None,
        })
    }

    pub fn heater_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, OutputCall::Heater(_)))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl SensorPort for MockHardware {
    fn read_celsius(&mut self) -> f32 {
        self.sensor.read_celsius()
    }
}

impl ActuatorPort for MockHardware {
    fn set_heater(&mut self, on: bool) {
        self.calls.push(OutputCall::Heater(on));
    }
}

impl DisplayPort for MockHardware {
    fn set_status(&mut self, label: StatusLabel) {
        self.calls.push(OutputCall::Status(label));
    }

    fn show_temperature(&mut self, celsius: f32) {
        self.calls.push(OutputCall::Temperature(celsius));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
