//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (mode selector,
//! operator panel, config loader) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::config::ControlConfig;
use crate::fsm::Mode;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Switch operating mode.  Only Eco runs the state machine.
    SetMode(Mode),

    /// Change the operator setpoint.  Rejected if it breaks an invariant.
    SetTarget(f32),

    /// Replace the whole configuration.  Validated before it is applied.
    UpdateConfig(ControlConfig),

    /// Read the probe on the next tick instead of waiting for the interval.
    RequestSample,
}
