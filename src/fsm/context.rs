//! Values threaded through every FSM handler.
//!
//! The controller carries exactly one piece of state between ticks, the
//! [`ControllerState`] record.  Handlers receive it alongside a read-only
//! [`TickInput`] and the engine returns the successor in an
//! [`Evaluation`].  Nothing here is global; the caller owns the record.

use core::time::Duration;

use serde::Serialize;

use super::{SafetyState, StatusLabel};
use crate::config::ControlConfig;

// ---------------------------------------------------------------------------
// Heating window
// ---------------------------------------------------------------------------

/// Span tracked from entering Heating, bounding time spent heating
/// and stabilizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatingWindow {
    /// Monotonic time at which Heating was entered.
    pub start: Duration,
}

impl HeatingWindow {
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start)
    }
}

// ---------------------------------------------------------------------------
// Carried state
// ---------------------------------------------------------------------------

/// The controller's authoritative state.
///
/// `window` is `Some` exactly while `safety` is Heating or Stabilizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ControllerState {
    pub safety: SafetyState,
    pub window: Option<HeatingWindow>,
}

impl ControllerState {
    /// A state record in `safety` with no heating window.
    pub fn at(safety: SafetyState) -> Self {
        Self {
            safety,
            window: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-tick input
// ---------------------------------------------------------------------------

/// Read-only inputs for one evaluation.  The temperature is always from a
/// sample the health monitor accepted.
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    pub temperature_c: f32,
    /// Monotonic time of this tick.
    pub now: Duration,
    pub config: &'a ControlConfig,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Binary heater command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HeaterCommand {
    On,
    #[default]
    Off,
}

impl HeaterCommand {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// A single applied transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: SafetyState,
    pub to: SafetyState,
    /// Monotonic time of the tick that applied it.
    pub at: Duration,
}

/// Result of one engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Successor state record.
    pub state: ControllerState,
    pub heater: HeaterCommand,
    pub status: StatusLabel,
    /// `Some` iff the step changed `state.safety`.
    pub transition: Option<Transition>,
}
