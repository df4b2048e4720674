//! Pump enable output driver.
//!
//! A single digital enable line to the pump contactor, active HIGH.
//!
//! ## Safety contract
//!
//! The interlock decides when the pump may run; this driver is a dumb
//! actuator. It does expose [`force_line_low`](PumpDriver::force_line_low)
//! so the interlock can hold the physical line low while a hazard is
//! latched, independent of the commanded state.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpLine {
    Disabled,
    Enabled,
}

pub struct PumpDriver {
    line: PumpLine,
}

impl PumpDriver {
    /// The line starts disabled; the interlock raises it only when safe.
    pub fn new() -> Self {
        hw_init::gpio_write(pins::PUMP_ENABLE_GPIO, false);
        Self {
            line: PumpLine::Disabled,
        }
    }

    pub fn set_enabled(&mut self, on: bool) {
        hw_init::gpio_write(pins::PUMP_ENABLE_GPIO, on);
        self.line = if on {
            PumpLine::Enabled
        } else {
            PumpLine::Disabled
        };
    }

    /// Drive the line low unconditionally. Called every evaluation while a
    /// hazard is latched, regardless of the tracked state.
    pub fn force_line_low(&mut self) {
        hw_init::gpio_write(pins::PUMP_ENABLE_GPIO, false);
        self.line = PumpLine::Disabled;
    }

    pub fn line(&self) -> PumpLine {
        self.line
    }

    pub fn is_enabled(&self) -> bool {
        self.line == PumpLine::Enabled
    }
}
