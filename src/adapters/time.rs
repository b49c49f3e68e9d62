//! Time adapters.
//!
//! Both types implement [`ClockPort`] for monotonic time and
//! [`DelayNs`] for the inter-tick wait used by
//! [`TickDriver`](crate::scheduler::TickDriver).
//!
//! - [`MonotonicClock`] wraps `std::time::Instant` and really sleeps.
//! - [`SimClock`] is a shared virtual clock.  Delays advance it instead
//!   of blocking, so hours of controller time run in milliseconds.
//!   Clones share the same timeline, which lets a simulated plant and
//!   the driver observe one clock.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::app::ports::ClockPort;

// ---------------------------------------------------------------------------
// Wall clock
// ---------------------------------------------------------------------------

/// Monotonic time since construction, backed by `Instant`.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl ClockPort for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

impl DelayNs for MonotonicClock {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

// ---------------------------------------------------------------------------
// Virtual clock
// ---------------------------------------------------------------------------

/// Virtual monotonic clock starting at zero.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now: Rc<Cell<Duration>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to `at`.  Ignored if `at` is in the past.
    pub fn set(&self, at: Duration) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl ClockPort for SimClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(Duration::from_millis(u64::from(ms)));
    }
}
