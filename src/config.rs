//! Controller configuration parameters
//!
//! Every threshold and timing constant of the controller lives here.
//! The defaults reproduce the fixed constants of the reference heater
//! (22 °C comfort threshold, 24 °C target, 30 °C ceiling, 1 h sampling,
//! 7 h maximum continuous heating).  A config must pass [`validate`]
//! before a controller is built from it.
//!
//! [`validate`]: ControlConfig::validate

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Reading reported by a disconnected DS18B20 probe.
pub const DS18B20_DISCONNECTED_C: f32 = -127.0;

/// What happens to the heater when the operator leaves Eco mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeHandoff {
    /// Command the heater OFF and show "IDLE" once on the way out of Eco.
    #[default]
    ForceOff,
    /// Leave the last Eco command in place for the next mode's owner.
    Retain,
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    // --- Setpoints ---
    /// Operator-set target temperature (°C)
    pub target_temp_c: f32,
    /// Idle → Heating when the reading drops below this (°C)
    pub comfort_threshold_c: f32,
    /// Heating → Stabilizing at `target - margin` (°C)
    pub stabilize_margin_c: f32,

    // --- Safety ---
    /// Absolute ceiling; Heating → Overheat at or above it (°C)
    pub safety_ceiling_c: f32,
    /// Overheat → Idle below `target - margin` (°C)
    pub overheat_recovery_margin_c: f32,
    /// Raw value the sensor reports when it cannot read (°C)
    pub sensor_error_c: f32,
    /// Upper bound on one heating window (milliseconds)
    pub max_heat_duration_ms: u64,

    // --- Timing ---
    /// Sensor read interval (milliseconds)
    pub sample_interval_ms: u64,
    /// Control loop interval (milliseconds)
    pub tick_interval_ms: u64,

    // --- Modes ---
    pub mode_handoff: ModeHandoff,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            // Setpoints
            target_temp_c: 24.0,
            comfort_threshold_c: 22.0,
            stabilize_margin_c: 0.5,

            // Safety
            safety_ceiling_c: 30.0,
            overheat_recovery_margin_c: 2.0,
            sensor_error_c: DS18B20_DISCONNECTED_C,
            max_heat_duration_ms: 7 * 60 * 60 * 1000, // 7 h

            // Timing
            sample_interval_ms: 60 * 60 * 1000, // 1 h
            tick_interval_ms: 1000,             // 1 Hz

            mode_handoff: ModeHandoff::ForceOff,
        }
    }
}

impl ControlConfig {
    /// Check every startup invariant.  A config that fails here must never
    /// reach the state machine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("target_temp_c", self.target_temp_c),
            ("comfort_threshold_c", self.comfort_threshold_c),
            ("stabilize_margin_c", self.stabilize_margin_c),
            ("safety_ceiling_c", self.safety_ceiling_c),
            ("overheat_recovery_margin_c", self.overheat_recovery_margin_c),
            ("sensor_error_c", self.sensor_error_c),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
        }

        if self.safety_ceiling_c <= self.target_temp_c {
            return Err(ConfigError::CeilingNotAboveTarget);
        }
        if self.comfort_threshold_c >= self.safety_ceiling_c {
            return Err(ConfigError::ComfortNotBelowCeiling);
        }
        if self.stabilize_margin_c <= 0.0 {
            return Err(ConfigError::NonPositiveMargin("stabilize_margin_c"));
        }
        if self.overheat_recovery_margin_c <= 0.0 {
            return Err(ConfigError::NonPositiveMargin("overheat_recovery_margin_c"));
        }

        for (field, value) in [
            ("max_heat_duration_ms", self.max_heat_duration_ms),
            ("sample_interval_ms", self.sample_interval_ms),
            ("tick_interval_ms", self.tick_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDuration(field));
            }
        }
        if self.tick_interval_ms > self.sample_interval_ms {
            return Err(ConfigError::TickSlowerThanSampling);
        }

        Ok(())
    }

    /// Copy of this config with a new target, validated.
    pub fn with_target(&self, target_temp_c: f32) -> Result<Self, ConfigError> {
        let cfg = Self {
            target_temp_c,
            ..self.clone()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Heating → Stabilizing threshold.
    pub fn stabilize_at_c(&self) -> f32 {
        self.target_temp_c - self.stabilize_margin_c
    }

    /// Overheat → Idle threshold (strictly below).
    pub fn overheat_recovery_below_c(&self) -> f32 {
        self.target_temp_c - self.overheat_recovery_margin_c
    }

    pub fn max_heat_duration(&self) -> Duration {
        Duration::from_millis(self.max_heat_duration_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
