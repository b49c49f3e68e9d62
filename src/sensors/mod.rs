//! Sensor subsystem — the sample type and host-side sensor sources.
//!
//! Real probe acquisition is an external collaborator reached through
//! [`SensorPort`](crate::app::ports::SensorPort).  The sources here stand
//! in for it on the host: a scripted sequence for tests and a thermal
//! plant model for the simulation binary.

pub mod simulated;
pub mod temperature;

pub use simulated::{ScriptedSensor, ThermalPlant};
pub use temperature::TemperatureSample;
