//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns both sensor drivers and produces a [`SensorSnapshot`] each
//! loop iteration. The snapshot also carries the ISR-maintained hazard line
//! signals so the controller sees one coherent view of its inputs.

pub mod climate;
pub mod water_level;

use crate::alerts;
use climate::ClimateSensor;
use water_level::WaterLevelSensor;

/// A point-in-time view of every controller input.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    /// Pump temperature (°C).
    pub temperature_c: f32,
    /// Relative humidity (%). Read alongside temperature; logged, not published.
    pub humidity_pct: f32,

    /// Raw analog level reading (0..=configured max).
    pub level_raw: u16,
    /// Normalised tank fill 0-100.
    pub fill_percent: u8,

    /// Instantaneous overheat signal (`temperature_c >= threshold`).
    pub over_temp: bool,

    /// Emergency-stop line has signalled since boot (set-only, from ISR).
    pub estop_signalled: bool,
    /// High-water line has signalled since boot (set-only, from ISR).
    pub high_water_signalled: bool,
    /// Stop command arrived on the remote-stop topic (set-only, from callback).
    pub remote_stop_signalled: bool,
}

/// Aggregates the sensor drivers and the ISR signal flags.
pub struct SensorHub {
    pub climate: ClimateSensor,
    pub water_level: WaterLevelSensor,
}

impl SensorHub {
    /// Construct a new hub. Pass in pre-built drivers (built in main where
    /// peripheral ownership is established).
    pub fn new(climate: ClimateSensor, water_level: WaterLevelSensor) -> Self {
        Self {
            climate,
            water_level,
        }
    }

    /// Read every input and return a unified snapshot.
    pub fn read_all(&mut self) -> SensorSnapshot {
        let climate = self.climate.read();
        let level = self.water_level.read();

        SensorSnapshot {
            temperature_c: climate.temperature_c,
            humidity_pct: climate.humidity_pct,
            level_raw: level.raw,
            fill_percent: level.fill_percent,
            over_temp: climate.over_temp,
            estop_signalled: alerts::estop_signalled(),
            high_water_signalled: alerts::high_water_signalled(),
            remote_stop_signalled: alerts::remote_stop_signalled(),
        }
    }
}
