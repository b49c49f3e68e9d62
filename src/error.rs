//! Unified error types for the heater controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level error handling uniform.  All variants are `Copy` so they can
//! be passed through the health monitor and service without allocation.
//!
//! Sensor faults and over-temperature are *not* surfaced to callers as
//! errors during operation: the former is absorbed by the
//! [`HealthMonitor`](crate::health::HealthMonitor), the latter is a
//! first-class [`SafetyState`](crate::fsm::SafetyState).  A configuration
//! violation is returned as `Err` and prevents the controller from being
//! constructed at all.  A heater relay that cannot be opened at startup
//! is the only other `Err`.

use core::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration violates a startup invariant.
    Config(ConfigError),
    /// The heater output could not be driven.
    Actuator(ActuatorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A [`ControlConfig`](crate::config::ControlConfig) field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The safety ceiling must be strictly above the target temperature.
    CeilingNotAboveTarget,
    /// The comfort threshold must be strictly below the safety ceiling.
    ComfortNotBelowCeiling,
    /// A temperature field is NaN or infinite.  Carries the field name.
    NonFinite(&'static str),
    /// A hysteresis margin is zero or negative.  Carries the field name.
    NonPositiveMargin(&'static str),
    /// A duration is zero.  Carries the field name.
    ZeroDuration(&'static str),
    /// The control tick must not be slower than the sampling interval.
    TickSlowerThanSampling,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CeilingNotAboveTarget => write!(f, "safety ceiling must exceed target"),
            Self::ComfortNotBelowCeiling => {
                write!(f, "comfort threshold must be below safety ceiling")
            }
            Self::NonFinite(field) => write!(f, "{field} must be finite"),
            Self::NonPositiveMargin(field) => write!(f, "{field} must be positive"),
            Self::ZeroDuration(field) => write!(f, "{field} must be non-zero"),
            Self::TickSlowerThanSampling => {
                write!(f, "tick interval must not exceed sample interval")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// Why a temperature sample was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorFault {
    /// The sensor returned its reserved error value (disconnected probe).
    ErrorSentinel,
    /// The sensor returned NaN.
    NotANumber,
    /// No sample has been captured, or the sample was flagged invalid.
    Absent,
}

impl SensorFault {
    /// Classify a raw reading.  `None` means the value is usable.
    pub fn classify(celsius: f32, sentinel: f32) -> Option<Self> {
        if celsius.is_nan() {
            Some(Self::NotANumber)
        } else if celsius == sentinel {
            Some(Self::ErrorSentinel)
        } else {
            None
        }
    }
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ErrorSentinel => write!(f, "error sentinel reading"),
            Self::NotANumber => write!(f, "reading is NaN"),
            Self::Absent => write!(f, "no valid reading"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl core::error::Error for ActuatorError {}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
