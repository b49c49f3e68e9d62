//! Sensor health monitor.
//!
//! The monitor runs **every tick before the FSM** and decides whether the
//! latest sample may be used at all.  A faulted outcome has precedence
//! over every other control decision: the service forces `Idle`, turns
//! the heater off, shows "Sensor Error", and skips the FSM for that tick.
//!
//! ## Fault lifecycle
//!
//! 1. The probe returns the error sentinel or NaN (or nothing yet).
//! 2. [`HealthMonitor::check`] reports `Faulted` for every tick that
//!    still uses that sample.  There is no retry counter.
//! 3. The next valid sample yields `Healthy` immediately.  Nothing is
//!    latched beyond the current tick.
//!
//! The monitor only remembers the previous outcome so that the log shows
//! one line when a fault appears and one when it clears.

use crate::error::SensorFault;
use crate::sensors::TemperatureSample;
use log::{error, info};

/// Result of one health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    Healthy,
    Faulted(SensorFault),
}

impl HealthOutcome {
    pub fn is_faulted(self) -> bool {
        matches!(self, Self::Faulted(_))
    }
}

/// Sensor health monitor.
pub struct HealthMonitor {
    sentinel: f32,
    /// Fault seen on the previous check, for edge logging.
    active: Option<SensorFault>,
    /// Consecutive faulted checks.
    consecutive: u32,
}

impl HealthMonitor {
    pub fn new(sentinel: f32) -> Self {
        Self {
            sentinel,
            active: None,
            consecutive: 0,
        }
    }

    /// Evaluate the latest sample.  `None` means nothing has been captured.
    pub fn check(&mut self, sample: Option<&TemperatureSample>) -> HealthOutcome {
        let fault = match sample {
            None => Some(SensorFault::Absent),
            Some(s) => SensorFault::classify(s.celsius, self.sentinel)
                .or((!s.valid).then_some(SensorFault::Absent)),
        };

        match fault {
            Some(fault) => {
                if self.active != Some(fault) {
                    error!("SENSOR FAULT: {fault}");
                }
                self.active = Some(fault);
                self.consecutive = self.consecutive.saturating_add(1);
                HealthOutcome::Faulted(fault)
            }
            None => {
                if let Some(prev) = self.active.take() {
                    info!(
                        "SENSOR FAULT CLEARED: {prev} (after {} checks)",
                        self.consecutive
                    );
                }
                self.consecutive = 0;
                HealthOutcome::Healthy
            }
        }
    }

    /// Fault reported by the most recent check, if any.
    pub fn active_fault(&self) -> Option<SensorFault> {
        self.active
    }

    /// Number of consecutive faulted checks (0 when healthy).
    pub fn consecutive_faults(&self) -> u32 {
        self.consecutive
    }

    /// Change the sentinel (after a config reload).
    pub fn set_sentinel(&mut self, sentinel: f32) {
        self.sentinel = sentinel;
    }
}
