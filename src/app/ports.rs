//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (probe, heater relay, status display, event sinks,
//! clocks) implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! Every output port is fire-and-forget and level-set: writing the same
//! value twice is harmless, and there is no acknowledgement.

use core::time::Duration;

use crate::fsm::StatusLabel;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per sampling interval.
pub trait SensorPort {
    /// Read the probe in degrees Celsius.
    ///
    /// A failed read is reported in-band, either as the configured
    /// error sentinel or as NaN.  Both are treated identically.
    fn read_celsius(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single heater output.
pub trait ActuatorPort {
    /// Drive the heater relay.  Level-set, not edge-triggered.
    fn set_heater(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → status display / log)
// ───────────────────────────────────────────────────────────────

/// Status display.  Last write wins; nothing is queued.
pub trait DisplayPort {
    fn set_status(&mut self, label: StatusLabel);

    /// Show a fresh probe reading.  Optional for displays without a
    /// numeric field.
    fn show_temperature(&mut self, _celsius: f32) {}
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: monotonic time source)
// ───────────────────────────────────────────────────────────────

/// Monotonic elapsed time since the controller started.
///
/// Must never go backwards.  The duration guard and the sampling
/// schedule are both plain comparisons against this value.
pub trait ClockPort {
    fn now(&self) -> Duration;
}
