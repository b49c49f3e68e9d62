//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern in Rust:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                           │
//! │  ┌─────────────┬─────────────┬────────┬──────────┬──────────────────┐ │
//! │  │ SafetyState │ status      │ heater │ on_enter │ on_update        │ │
//! │  ├─────────────┼─────────────┼────────┼──────────┼──────────────────┤ │
//! │  │ Idle        │ IDLE        │ OFF    │ fn       │ fn -> Option<>   │ │
//! │  │ Heating     │ HEATING     │ ON     │ fn       │ fn -> Option<>   │ │
//! │  │ Stabilizing │ STABILIZING │ ON     │ fn       │ fn -> Option<>   │ │
//! │  │ Overheat    │ OVERHEAT    │ OFF    │ fn       │ fn -> Option<>   │ │
//! │  └─────────────┴─────────────┴────────┴──────────┴──────────────────┘ │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next.  The engine holds no
//! mutable state of its own: [`Fsm::evaluate`] takes the carried
//! [`ControllerState`] by value and returns its successor, so the same
//! inputs always produce the same [`Evaluation`].
//!
//! Outputs (heater level and status label) are a property of the state
//! *after* the step, so a newly entered state's output takes effect on
//! the tick that entered it.

pub mod context;
pub mod states;

use core::fmt;

use context::{ControllerState, Evaluation, HeaterCommand, TickInput, Transition};
use log::info;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// The controller's safety state.  Exactly one is active at a time.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(u8)]
pub enum SafetyState {
    #[default]
    Idle = 0,
    Heating = 1,
    Stabilizing = 2,
    Overheat = 3,
}

impl SafetyState {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [Self::Idle, Self::Heating, Self::Stabilizing, Self::Overheat];

    /// Convert a table index back to `SafetyState`.  Panics on out-of-range
    /// in debug builds; returns `Idle` (heater off) in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Heating,
            2 => Self::Stabilizing,
            3 => Self::Overheat,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Operating mode
// ---------------------------------------------------------------------------

/// Operator-selected mode.  Only Eco runs the autonomous state machine;
/// Comfort and Manual are owned by collaborators outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Eco,
    Comfort,
    Manual,
}

// ---------------------------------------------------------------------------
// Status labels
// ---------------------------------------------------------------------------

/// The fixed set of strings the status display can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusLabel {
    Idle,
    Heating,
    Stabilizing,
    Overheat,
    SensorError,
}

impl StatusLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Heating => "HEATING",
            Self::Stabilizing => "STABILIZING",
            Self::Overheat => "OVERHEAT",
            Self::SensorError => "Sensor Error",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut ControllerState, &TickInput<'_>);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&ControllerState, &TickInput<'_>) -> Option<SafetyState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: SafetyState,
    pub name: &'static str,
    /// Status label shown while in this state.
    pub status: StatusLabel,
    /// Heater level held while in this state.
    pub heater: HeaterCommand,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]).
pub struct Fsm {
    /// Fixed-size table indexed by `SafetyState as usize`.
    table: [StateDescriptor; SafetyState::COUNT],
}

impl Default for Fsm {
    fn default() -> Self {
        Self::new(states::build_state_table())
    }
}

impl Fsm {
    pub fn new(table: [StateDescriptor; SafetyState::COUNT]) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self { table }
    }

    /// Run the initial `on_enter` for `initial`.
    /// Call once before the first `evaluate()`.
    pub fn start(&self, initial: SafetyState, input: &TickInput<'_>) -> Evaluation {
        info!("FSM starting in state: {}", self.table[initial as usize].name);
        let mut state = ControllerState::at(initial);
        if let Some(enter) = self.table[initial as usize].on_enter {
            enter(&mut state, input);
        }
        self.settle(state, None)
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → `on_enter(next)`.
    /// 3. Report the outputs of the resulting state.
    pub fn evaluate(&self, state: ControllerState, input: &TickInput<'_>) -> Evaluation {
        match (self.descriptor(state.safety).on_update)(&state, input) {
            Some(next) if next != state.safety => self.transition(state, next, input),
            _ => self.settle(state, None),
        }
    }

    /// Force an immediate transition, bypassing `on_update` (used by the
    /// health override to jump to `Idle` regardless of the table).
    pub fn force_transition(
        &self,
        state: ControllerState,
        next: SafetyState,
        input: &TickInput<'_>,
    ) -> Evaluation {
        if next == state.safety {
            self.settle(state, None)
        } else {
            self.transition(state, next, input)
        }
    }

    /// Outputs held while in `id`.
    pub fn outputs(&self, id: SafetyState) -> (HeaterCommand, StatusLabel) {
        let d = self.descriptor(id);
        (d.heater, d.status)
    }

    pub fn descriptor(&self, id: SafetyState) -> &StateDescriptor {
        &self.table[id as usize]
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(
        &self,
        mut state: ControllerState,
        next: SafetyState,
        input: &TickInput<'_>,
    ) -> Evaluation {
        let from = state.safety;

        info!(
            "FSM transition: {} -> {}",
            self.descriptor(from).name,
            self.descriptor(next).name
        );

        if let Some(exit) = self.descriptor(from).on_exit {
            exit(&mut state, input);
        }

        state.safety = next;

        if let Some(enter) = self.descriptor(next).on_enter {
            enter(&mut state, input);
        }

        self.settle(
            state,
            Some(Transition {
                from,
                to: next,
                at: input.now,
            }),
        )
    }

    fn settle(&self, state: ControllerState, transition: Option<Transition>) -> Evaluation {
        let (heater, status) = self.outputs(state.safety);
        Evaluation {
            state,
            heater,
            status,
            transition,
        }
    }
}
