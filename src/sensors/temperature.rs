//! Temperature samples.
//!
//! A [`TemperatureSample`] is captured once per sampling interval from the
//! raw Celsius value a [`SensorPort`](crate::app::ports::SensorPort)
//! returns.  Validity is decided at capture time: the sensor's reserved
//! error value and NaN are both invalid, and the two are indistinguishable
//! to everything downstream of the health monitor.

use core::time::Duration;

use crate::error::SensorFault;

/// One captured reading.  Immutable; superseded by the next capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSample {
    pub celsius: f32,
    /// Monotonic time of capture.
    pub taken_at: Duration,
    pub valid: bool,
}

impl TemperatureSample {
    pub fn capture(celsius: f32, taken_at: Duration, sentinel: f32) -> Self {
        Self {
            celsius,
            taken_at,
            valid: SensorFault::classify(celsius, sentinel).is_none(),
        }
    }

    /// Age of this sample at `now`.
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.taken_at)
    }
}
