//! Host-side sensor sources.
//!
//! - [`ScriptedSensor`] replays a fixed list of readings (tests, demos).
//! - [`ThermalPlant`] is a first-order room model heated by the relay and
//!   losing heat to ambient, driven by a [`SimClock`].  It implements both
//!   [`SensorPort`] and [`ActuatorPort`] so the simulation binary can close
//!   the loop without hardware.

use std::collections::VecDeque;

use core::time::Duration;

use crate::adapters::time::SimClock;
use crate::app::ports::{ActuatorPort, ClockPort, SensorPort};

// ═══════════════════════════════════════════════════════════════
//  Scripted sensor
// ═══════════════════════════════════════════════════════════════

/// Returns queued readings in order, then repeats the last one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSensor {
    queue: VecDeque<f32>,
    last: Option<f32>,
    reads: u32,
}

impl ScriptedSensor {
    pub fn new(readings: impl IntoIterator<Item = f32>) -> Self {
        Self {
            queue: readings.into_iter().collect(),
            last: None,
            reads: 0,
        }
    }

    /// Append a reading to the end of the script.
    pub fn push(&mut self, celsius: f32) {
        self.queue.push_back(celsius);
    }

    /// Number of times the sensor has been read.
    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl SensorPort for ScriptedSensor {
    fn read_celsius(&mut self) -> f32 {
        self.reads += 1;
        if let Some(next) = self.queue.pop_front() {
            self.last = Some(next);
        }
        // An empty script behaves like an unplugged probe.
        self.last.unwrap_or(f32::NAN)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Thermal plant
// ═══════════════════════════════════════════════════════════════

/// Lumped thermal model of a heated room.
///
/// `dT/dt = gain * heater - loss * (T - ambient)`, integrated exactly
/// between port calls with the heater level held constant.
#[derive(Debug, Clone)]
pub struct ThermalPlant {
    clock: SimClock,
    temperature_c: f32,
    ambient_c: f32,
    /// Heating rate with the relay closed, °C per hour.
    gain_c_per_hour: f32,
    /// Fraction of the gap to ambient lost per hour.
    loss_per_hour: f32,
    heater_on: bool,
    synced_at: Duration,
}

impl ThermalPlant {
    pub fn new(clock: SimClock, start_c: f32, ambient_c: f32) -> Self {
        let synced_at = clock.now();
        Self {
            clock,
            temperature_c: start_c,
            ambient_c,
            gain_c_per_hour: 2.0,
            loss_per_hour: 0.1,
            heater_on: false,
            synced_at,
        }
    }

    pub fn with_rates(mut self, gain_c_per_hour: f32, loss_per_hour: f32) -> Self {
        self.gain_c_per_hour = gain_c_per_hour;
        self.loss_per_hour = loss_per_hour;
        self
    }

    /// Current modelled temperature, integrated up to the clock's now.
    pub fn temperature_c(&mut self) -> f32 {
        self.sync();
        self.temperature_c
    }

    pub fn heater_on(&self) -> bool {
        self.heater_on
    }

    fn sync(&mut self) {
        let now = self.clock.now();
        let hours = now.saturating_sub(self.synced_at).as_secs_f32() / 3600.0;
        self.synced_at = now;
        if hours <= 0.0 {
            return;
        }

        let gain = if self.heater_on { self.gain_c_per_hour } else { 0.0 };
        if self.loss_per_hour > 0.0 {
            let equilibrium = self.ambient_c + gain / self.loss_per_hour;
            let decay = (-self.loss_per_hour * hours).exp();
            self.temperature_c = equilibrium + (self.temperature_c - equilibrium) * decay;
        } else {
            self.temperature_c += gain * hours;
        }
    }
}

impl SensorPort for ThermalPlant {
    fn read_celsius(&mut self) -> f32 {
        self.temperature_c()
    }
}

impl ActuatorPort for ThermalPlant {
    fn set_heater(&mut self, on: bool) {
        // Integrate the old level up to now before switching.
        self.sync();
        self.heater_on = on;
    }
}
