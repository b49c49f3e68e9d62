//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  Faults go out at `warn`, everything else at
//! `info`.  Samples go out at `debug`.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} mode={:?} | T={} target={:.1}\u{00b0}C | heater={} | \
                     window={}s | fault={:?}",
                    t.state,
                    t.mode,
                    t.temperature_c
                        .map_or_else(|| "--".to_string(), |c| format!("{c:.1}")),
                    t.target_temp_c,
                    if t.heater_on { "ON" } else { "OFF" },
                    t.heating_elapsed_secs.unwrap_or(0),
                    t.sensor_fault,
                );
            }
            AppEvent::SampleTaken(s) => {
                debug!(
                    "SAMPLE | {:.2}\u{00b0}C at {}s{}",
                    s.celsius,
                    s.taken_at.as_secs(),
                    if s.valid { "" } else { " (invalid)" }
                );
            }
            AppEvent::StateChanged(t) => {
                info!("STATE | {:?} -> {:?} at {}s", t.from, t.to, t.at.as_secs());
            }
            AppEvent::SensorFault(fault) => {
                warn!("FAULT | sensor: {fault}");
            }
            AppEvent::SensorRecovered => {
                info!("FAULT | sensor recovered");
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {:?} -> {:?}", from, to);
            }
            AppEvent::ConfigUpdated => {
                info!("CONFIG | updated");
            }
            AppEvent::Started { state, mode } => {
                info!("START | initial_state={:?} mode={:?}", state, mode);
            }
        }
    }
}
