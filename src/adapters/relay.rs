//! Heater relay driver.
//!
//! Drives the relay coil through any `embedded-hal` [`OutputPin`].  The
//! pin is active-high by default; boards that sink the coil current can
//! flip it with [`RelayHeater::active_low`].
//!
//! The relay defaults to **open** (heater off) on construction, so a
//! controller that never ticks never heats.

use embedded_hal::digital::OutputPin;
use log::{error, info};

use crate::app::ports::ActuatorPort;
use crate::error::{ActuatorError, Error};

pub struct RelayHeater<P> {
    pin: P,
    active_low: bool,
    on: bool,
    write_failures: u32,
}

impl<P: OutputPin> RelayHeater<P> {
    /// Take ownership of `pin` and open the relay.  Fails if the pin
    /// cannot be driven, so a controller is never wired to a relay whose
    /// state is unknown.
    pub fn new(pin: P) -> Result<Self, Error> {
        let mut relay = Self {
            pin,
            active_low: false,
            on: false,
            write_failures: 0,
        };
        relay.drive(false)?;
        Ok(relay)
    }

    /// Invert the pin level (coil energised on LOW).
    pub fn active_low(mut self) -> Result<Self, Error> {
        self.active_low = true;
        self.drive(false)?;
        Ok(self)
    }

    /// Set the relay.  The cached level only changes if the write succeeds.
    pub fn drive(&mut self, on: bool) -> Result<(), ActuatorError> {
        let high = on != self.active_low;
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;

        if on != self.on {
            info!("Heater relay {}", if on { "CLOSED" } else { "OPEN" });
        }
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Writes that returned an error since construction.
    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> ActuatorPort for RelayHeater<P> {
    fn set_heater(&mut self, on: bool) {
        // Fire-and-forget port: report and carry on, the next tick rewrites
        // the level anyway.
        if let Err(e) = self.drive(on) {
            self.write_failures = self.write_failures.saturating_add(1);
            error!("Heater relay: {e} (wanted {})", if on { "ON" } else { "OFF" });
        }
    }
}
