//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the pump driver, exposing them through
//! [`SensorPort`] and [`PumpPort`]. This is the only module in the system
//! that touches actual hardware. On non-espidf targets, the underlying
//! drivers use cfg-gated simulation stubs.

use crate::app::ports::{PumpPort, SensorPort};
use crate::drivers::pump::PumpDriver;
use crate::sensors::{SensorHub, SensorSnapshot};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    pump: PumpDriver,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, pump: PumpDriver) -> Self {
        Self { sensor_hub, pump }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_all(&mut self) -> SensorSnapshot {
        self.sensor_hub.read_all()
    }
}

// ── PumpPort implementation ───────────────────────────────────

impl PumpPort for HardwareAdapter {
    fn set_pump_enabled(&mut self, on: bool) {
        self.pump.set_enabled(on);
    }

    fn force_pump_line_low(&mut self) {
        self.pump.force_line_low();
    }

    fn is_pump_enabled(&self) -> bool {
        self.pump.is_enabled()
    }
}
