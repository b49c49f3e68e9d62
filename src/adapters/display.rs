//! Status display adapter.
//!
//! [`LogDisplay`] stands in for the panel: it keeps the last label and
//! reading, and logs only when the label changes so a steady state does
//! not flood the console.

use log::info;

use crate::app::ports::DisplayPort;
use crate::fsm::StatusLabel;

#[derive(Debug, Default)]
pub struct LogDisplay {
    status: Option<StatusLabel>,
    temperature_c: Option<f32>,
    writes: u32,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label currently shown, `None` before the first write.
    pub fn status(&self) -> Option<StatusLabel> {
        self.status
    }

    pub fn temperature_c(&self) -> Option<f32> {
        self.temperature_c
    }

    /// Total status writes, including repeats.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl DisplayPort for LogDisplay {
    fn set_status(&mut self, label: StatusLabel) {
        self.writes = self.writes.saturating_add(1);
        if self.status != Some(label) {
            info!("[Display] Status: {label}");
        }
        self.status = Some(label);
    }

    fn show_temperature(&mut self, celsius: f32) {
        self.temperature_c = Some(celsius);
        info!("[Display] Temp: {celsius:.1} C");
    }
}
