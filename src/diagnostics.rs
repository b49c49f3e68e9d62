//! Runtime diagnostics.
//!
//! Counters for ticks, samples, faults and transitions, plus a small
//! fixed-capacity ring of the most recent transitions.  Everything is
//! in-memory and lost on reset; the controller keeps no state across
//! power loss.

use heapless::Deque;
use serde::Serialize;

use crate::fsm::SafetyState;
use crate::fsm::context::Transition;

/// Capacity of the recent-transition ring.
pub const TRANSITION_RING_SLOTS: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuntimeMetrics {
    pub ticks: u64,
    pub samples: u64,
    /// Ticks on which the health monitor reported a fault.
    pub sensor_fault_ticks: u64,
    pub transitions: u64,
    pub overheat_trips: u64,
    /// Stabilizing → Idle by the heating-window limit.
    pub duration_cutoffs: u64,
    /// Transitions to Idle forced by a sensor fault.
    pub forced_idles: u64,
    /// Ticks on which the core commanded the heater on.
    pub heater_on_ticks: u64,
}

/// Snapshot for serialization (metrics plus the transition ring, oldest first).
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub metrics: RuntimeMetrics,
    pub recent_transitions: heapless::Vec<Transition, TRANSITION_RING_SLOTS>,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    metrics: RuntimeMetrics,
    recent: Deque<Transition, TRANSITION_RING_SLOTS>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&mut self, heater_on: bool) {
        self.metrics.ticks += 1;
        if heater_on {
            self.metrics.heater_on_ticks += 1;
        }
    }

    pub fn record_sample(&mut self) {
        self.metrics.samples += 1;
    }

    pub fn record_sensor_fault(&mut self) {
        self.metrics.sensor_fault_ticks += 1;
    }

    /// Record a transition chosen by the state table.
    pub fn record_transition(&mut self, t: Transition) {
        match (t.from, t.to) {
            (_, SafetyState::Overheat) => self.metrics.overheat_trips += 1,
            (SafetyState::Stabilizing, SafetyState::Idle) => self.metrics.duration_cutoffs += 1,
            _ => {}
        }
        self.push(t);
    }

    /// Record a transition forced by the health override.
    pub fn record_forced_idle(&mut self, t: Transition) {
        self.metrics.forced_idles += 1;
        self.push(t);
    }

    pub fn metrics(&self) -> RuntimeMetrics {
        self.metrics
    }

    /// Recent transitions, oldest first.
    pub fn recent_transitions(&self) -> impl Iterator<Item = &Transition> {
        self.recent.iter()
    }

    pub fn report(&self) -> DiagnosticsReport {
        let mut recent_transitions = heapless::Vec::new();
        for t in self.recent.iter() {
            // Same capacity as the ring, cannot overflow.
            let _ = recent_transitions.push(*t);
        }
        DiagnosticsReport {
            metrics: self.metrics,
            recent_transitions,
        }
    }

    fn push(&mut self, t: Transition) {
        self.metrics.transitions += 1;
        if self.recent.is_full() {
            self.recent.pop_front();
        }
        let _ = self.recent.push_back(t);
    }
}
