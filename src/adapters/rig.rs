//! Composite hardware adapter.
//!
//! The service takes one `hw` value that satisfies every port it drives.
//! [`Rig`] bundles a probe, a heater output and a display behind the
//! three port traits.  With a [`ThermalPlant`](crate::sensors::ThermalPlant)
//! as both probe and heater it closes the loop for simulation; with a
//! real probe driver and a [`RelayHeater`](super::relay::RelayHeater) it
//! is the production wiring.

use crate::app::ports::{ActuatorPort, DisplayPort, SensorPort};
use crate::fsm::StatusLabel;

/// Probe, heater and display bundled behind the port traits.
pub struct Rig<S, A, D> {
    pub sensor: S,
    pub heater: A,
    pub display: D,
}

impl<S, A, D> Rig<S, A, D> {
    pub fn new(sensor: S, heater: A, display: D) -> Self {
        Self {
            sensor,
            heater,
            display,
        }
    }
}

/// Shorthand for a rig whose probe and heater are the same object.
pub struct PlantRig<P, D> {
    pub plant: P,
    pub display: D,
}

impl<P, D> PlantRig<P, D> {
    pub fn new(plant: P, display: D) -> Self {
        Self { plant, display }
    }
}

// ── Rig ───────────────────────────────────────────────────────

impl<S: SensorPort, A, D> SensorPort for Rig<S, A, D> {
    fn read_celsius(&mut self) -> f32 {
        self.sensor.read_celsius()
    }
}

impl<S, A: ActuatorPort, D> ActuatorPort for Rig<S, A, D> {
    fn set_heater(&mut self, on: bool) {
        self.heater.set_heater(on);
    }
}

impl<S, A, D: DisplayPort> DisplayPort for Rig<S, A, D> {
    fn set_status(&mut self, label: StatusLabel) {
        self.display.set_status(label);
    }

    fn show_temperature(&mut self, celsius: f32) {
        self.display.show_temperature(celsius);
    }
}

// ── PlantRig ──────────────────────────────────────────────────

impl<P: SensorPort, D> SensorPort for PlantRig<P, D> {
    fn read_celsius(&mut self) -> f32 {
        self.plant.read_celsius()
    }
}

impl<P: ActuatorPort, D> ActuatorPort for PlantRig<P, D> {
    fn set_heater(&mut self, on: bool) {
        self.plant.set_heater(on);
    }
}

impl<P, D: DisplayPort> DisplayPort for PlantRig<P, D> {
    fn set_status(&mut self, label: StatusLabel) {
        self.display.set_status(label);
    }

    fn show_temperature(&mut self, celsius: f32) {
        self.display.show_temperature(celsius);
    }
}
