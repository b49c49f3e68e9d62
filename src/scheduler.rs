//! Sampling schedule and tick driver.
//!
//! Sampling and control run at different cadences:
//!
//! ```text
//!   tick ─┬─ tick ─┬─ tick ─┬─ ... ─┬─ tick ─┬─ tick
//!         │        │        │       │        │
//!   sample│        │        │       │  sample│            (every sample_interval)
//!         ▼        ▼        ▼       ▼        ▼
//!       evaluate evaluate evaluate evaluate evaluate      (every tick)
//! ```
//!
//! The [`SampleScheduler`] decides whether a tick acquires a new sample;
//! the control evaluation always runs, against the most recent one, so
//! timers such as the heating-window guard are checked between sensor
//! refreshes.  The [`TickDriver`] owns the clock and the inter-tick
//! delay, which is the only blocking point in the loop.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::app::ports::{ActuatorPort, ClockPort, DisplayPort, EventSink, SensorPort};
use crate::app::service::{AppService, TickOutput};

// ═══════════════════════════════════════════════════════════════
//  Sample scheduler
// ═══════════════════════════════════════════════════════════════

/// Fixed-interval sampling with an immediate first sample.
#[derive(Debug, Clone)]
pub struct SampleScheduler {
    interval: Duration,
    last_sample: Option<Duration>,
    /// Set by an explicit request; consumed by the next sample.
    requested: bool,
}

impl SampleScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sample: None,
            requested: false,
        }
    }

    /// Whether a tick at `now` should read the sensor.
    pub fn is_due(&self, now: Duration) -> bool {
        if self.requested {
            return true;
        }
        match self.last_sample {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        }
    }

    pub fn mark_sampled(&mut self, now: Duration) {
        self.last_sample = Some(now);
        self.requested = false;
    }

    /// Sample on the next tick regardless of the interval.
    pub fn request(&mut self) {
        self.requested = true;
    }

    pub fn set_interval(&mut self, interval: Duration) {
        if interval != self.interval {
            info!(
                "Scheduler: sample interval {}s -> {}s",
                self.interval.as_secs(),
                interval.as_secs()
            );
            self.interval = interval;
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time of the next scheduled sample, or `None` if one is due now.
    pub fn next_due(&self, now: Duration) -> Option<Duration> {
        match self.last_sample {
            Some(last) if !self.is_due(now) => Some(last + self.interval),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tick driver
// ═══════════════════════════════════════════════════════════════

/// Runs the control loop: `now → tick → delay`, one tick to completion
/// before the next.
///
/// `T` supplies both the monotonic time and the inter-tick delay.  On the
/// host that is a wall clock and `thread::sleep`; in simulation the delay
/// advances a virtual clock instead of sleeping.  The delay length is
/// read from the service's live config on every tick, so a runtime
/// `tick_interval_ms` change applies from the next wait.
pub struct TickDriver<T> {
    timer: T,
}

impl<T: ClockPort + DelayNs> TickDriver<T> {
    pub fn new(timer: T) -> Self {
        Self { timer }
    }

    /// Run exactly `ticks` ticks.  Returns the output of the last one.
    pub fn run_ticks<H, S>(
        &mut self,
        service: &mut AppService,
        hw: &mut H,
        sink: &mut S,
        ticks: u64,
    ) -> Option<TickOutput>
    where
        H: SensorPort + ActuatorPort + DisplayPort,
        S: EventSink,
    {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step(service, hw, sink));
        }
        last
    }

    /// Run until the clock has advanced by at least `span`.
    pub fn run_for<H, S>(
        &mut self,
        service: &mut AppService,
        hw: &mut H,
        sink: &mut S,
        span: Duration,
    ) -> u64
    where
        H: SensorPort + ActuatorPort + DisplayPort,
        S: EventSink,
    {
        let until = self.timer.now() + span;
        let mut ticks = 0;
        while self.timer.now() < until {
            self.step(service, hw, sink);
            ticks += 1;
        }
        debug!("TickDriver: ran {ticks} ticks");
        ticks
    }

    /// One tick followed by the inter-tick delay.
    pub fn step<H, S>(&mut self, service: &mut AppService, hw: &mut H, sink: &mut S) -> TickOutput
    where
        H: SensorPort + ActuatorPort + DisplayPort,
        S: EventSink,
    {
        let now = self.timer.now();
        let out = service.tick(now, hw, sink);
        self.wait(service.config().tick_interval());
        out
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// `DelayNs` takes `u32` milliseconds; longer waits go out in chunks.
    fn wait(&mut self, interval: Duration) {
        let mut ms = interval.as_millis();
        while ms > 0 {
            let chunk = u32::try_from(ms).unwrap_or(u32::MAX);
            self.timer.delay_ms(chunk);
            ms -= u128::from(chunk);
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
