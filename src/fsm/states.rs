//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  IDLE ──[T < comfort]──▶ HEATING ──[T ≥ target − margin]──▶ STABILIZING
//!    ▲                        │                                   │
//!    │                  [T ≥ ceiling]                 [window > max duration]
//!    │                        ▼                                   │
//!    ├──[T < target − 2]── OVERHEAT                               │
//!    └────────────────────────────────────────────────────────────┘
//! ```
//!
//! In HEATING the ceiling check runs first: when a reading satisfies both
//! the ceiling and the stabilizing condition, OVERHEAT wins.

use super::context::{ControllerState, HeaterCommand, HeatingWindow, TickInput};
use super::{SafetyState, StateDescriptor, StatusLabel};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; SafetyState::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: SafetyState::Idle,
            name: "Idle",
            status: StatusLabel::Idle,
            heater: HeaterCommand::Off,
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Heating
        StateDescriptor {
            id: SafetyState::Heating,
            name: "Heating",
            status: StatusLabel::Heating,
            heater: HeaterCommand::On,
            on_enter: Some(heating_enter),
            on_exit: None,
            on_update: heating_update,
        },
        // Index 2 — Stabilizing (heater stays on from Heating)
        StateDescriptor {
            id: SafetyState::Stabilizing,
            name: "Stabilizing",
            status: StatusLabel::Stabilizing,
            heater: HeaterCommand::On,
            on_enter: Some(stabilizing_enter),
            on_exit: None,
            on_update: stabilizing_update,
        },
        // Index 3 — Overheat
        StateDescriptor {
            id: SafetyState::Overheat,
            name: "Overheat",
            status: StatusLabel::Overheat,
            heater: HeaterCommand::Off,
            on_enter: Some(overheat_enter),
            on_exit: Some(overheat_exit),
            on_update: overheat_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(state: &mut ControllerState, _input: &TickInput<'_>) {
    state.window = None;
    info!("IDLE: heater off");
}

fn idle_update(_state: &ControllerState, input: &TickInput<'_>) -> Option<SafetyState> {
    if input.temperature_c < input.config.comfort_threshold_c {
        return Some(SafetyState::Heating);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  HEATING state — relay closed, warming towards target
// ═══════════════════════════════════════════════════════════════════════════

fn heating_enter(state: &mut ControllerState, input: &TickInput<'_>) {
    state.window = Some(HeatingWindow { start: input.now });
    info!(
        "HEATING: {:.1}\u{00b0}C < {:.1}\u{00b0}C comfort threshold, heater on",
        input.temperature_c, input.config.comfort_threshold_c
    );
}

fn heating_update(_state: &ControllerState, input: &TickInput<'_>) -> Option<SafetyState> {
    let cfg = input.config;

    // Guard: absolute ceiling beats the comfort logic
    if input.temperature_c >= cfg.safety_ceiling_c {
        warn!(
            "HEATING: {:.1}\u{00b0}C at or above {:.1}\u{00b0}C ceiling",
            input.temperature_c, cfg.safety_ceiling_c
        );
        return Some(SafetyState::Overheat);
    }

    if input.temperature_c >= cfg.stabilize_at_c() {
        return Some(SafetyState::Stabilizing);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  STABILIZING state — near target, bounded by the heating window
// ═══════════════════════════════════════════════════════════════════════════

fn stabilizing_enter(_state: &mut ControllerState, input: &TickInput<'_>) {
    info!(
        "STABILIZING: reached {:.1}\u{00b0}C (target {:.1}\u{00b0}C)",
        input.temperature_c, input.config.target_temp_c
    );
}

fn stabilizing_update(state: &ControllerState, input: &TickInput<'_>) -> Option<SafetyState> {
    let Some(window) = state.window else {
        // Only reachable through a forced transition; fail towards off.
        warn!("STABILIZING: no heating window, returning to Idle");
        return Some(SafetyState::Idle);
    };

    let elapsed = window.elapsed(input.now);
    if elapsed > input.config.max_heat_duration() {
        info!(
            "STABILIZING: heating window {}s exceeded {}s limit",
            elapsed.as_secs(),
            input.config.max_heat_duration().as_secs()
        );
        return Some(SafetyState::Idle);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  OVERHEAT state — ceiling tripped, heater off until well below target
// ═══════════════════════════════════════════════════════════════════════════

fn overheat_enter(state: &mut ControllerState, input: &TickInput<'_>) {
    state.window = None;
    warn!(
        "OVERHEAT: heater off, waiting for < {:.1}\u{00b0}C",
        input.config.overheat_recovery_below_c()
    );
}

fn overheat_exit(_state: &mut ControllerState, input: &TickInput<'_>) {
    info!("OVERHEAT: cleared at {:.1}\u{00b0}C", input.temperature_c);
}

fn overheat_update(_state: &ControllerState, input: &TickInput<'_>) -> Option<SafetyState> {
    if input.temperature_c < input.config.overheat_recovery_below_c() {
        return Some(SafetyState::Idle);
    }

    None
}
