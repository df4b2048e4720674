//! Pump interlock state machine.
//!
//! Two states, evaluated once per loop iteration as a pure function of the
//! hazard gate and the tank fill percentage:
//!
//! ```text
//!  PUMP_OFF ──[safe && fill < on_below]──▶ PUMP_ON
//!  PUMP_ON ──[safe && fill > off_above]──▶ PUMP_OFF
//!  PUMP_ON ──[!safe, unconditional]──────▶ PUMP_OFF
//! ```
//!
//! Inside the hysteresis band the previous state holds. While unsafe the
//! command additionally requests the output line be driven low directly,
//! independent of the commanded boolean — a second enforcement layer at
//! the hardware adapter.

use log::info;

use crate::config::SystemConfig;

/// Pump interlock states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    PumpOff,
    PumpOn,
}

/// Outcome of one interlock evaluation. Always defined — there are no
/// error conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpCommand {
    /// Commanded enable state for the pump output (active high).
    pub pump_on: bool,
    /// Drive the output line low regardless of `pump_on`. Set whenever the
    /// hazard gate is closed.
    pub force_output_low: bool,
}

/// The interlock state machine.
pub struct PumpInterlock {
    state: PumpState,
    on_below_percent: u8,
    off_above_percent: u8,
}

impl PumpInterlock {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: PumpState::PumpOff,
            on_below_percent: config.pump_on_below_percent,
            off_above_percent: config.pump_off_above_percent,
        }
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state == PumpState::PumpOn
    }

    /// Advance the state machine by one evaluation.
    ///
    /// `safe` is the hazard gate (`HazardLatches::is_safe`); `fill_percent`
    /// is the current tank fill 0-100.
    pub fn evaluate(&mut self, safe: bool, fill_percent: u8) -> PumpCommand {
        if !safe {
            if self.state == PumpState::PumpOn {
                info!("Pump off (hazard latched)");
            }
            self.state = PumpState::PumpOff;
            return PumpCommand {
                pump_on: false,
                force_output_low: true,
            };
        }

        match self.state {
            PumpState::PumpOff if fill_percent < self.on_below_percent => {
                info!("Pump on (fill {fill_percent}%)");
                self.state = PumpState::PumpOn;
            }
            PumpState::PumpOn if fill_percent > self.off_above_percent => {
                info!("Pump off (fill {fill_percent}%)");
                self.state = PumpState::PumpOff;
            }
            // Hysteresis band: hold the previous state.
            _ => {}
        }

        PumpCommand {
            pump_on: self.state == PumpState::PumpOn,
            force_output_low: false,
        }
    }
}
