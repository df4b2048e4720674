//! Analog water-level sensor.
//!
//! A resistive probe read through ADC1 yields a raw value in `0..=max`
//! (10-bit full scale by default). The fill percentage is
//! `round(raw / max * 100)`, reported as an integer 0-100.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the ADC channel via hw_init helpers.
//! On host/test: reads from a static AtomicU16 for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_LEVEL_RAW: AtomicU16 = AtomicU16::new(512);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level_raw(raw: u16) {
    SIM_LEVEL_RAW.store(raw, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
pub struct WaterLevelReading {
    pub raw: u16,
    /// Normalised fill 0-100, rounded to the nearest integer.
    pub fill_percent: u8,
}

pub struct WaterLevelSensor {
    raw_max: u16,
}

impl WaterLevelSensor {
    pub fn new(raw_max: u16) -> Self {
        Self {
            raw_max: raw_max.max(1),
        }
    }

    pub fn read(&mut self) -> WaterLevelReading {
        // Clamp: a miswired probe must not report >100 %.
        let raw = self.read_adc().min(self.raw_max);
        WaterLevelReading {
            raw,
            fill_percent: self.to_percent(raw),
        }
    }

    fn to_percent(&self, raw: u16) -> u8 {
        (f32::from(raw) / f32::from(self.raw_max) * 100.0).round() as u8
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_LEVEL)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_LEVEL_RAW.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tank_is_zero_percent() {
        let sensor = WaterLevelSensor::new(1023);
        assert_eq!(sensor.to_percent(0), 0);
    }

    #[test]
    fn full_scale_is_hundred_percent() {
        let sensor = WaterLevelSensor::new(1023);
        assert_eq!(sensor.to_percent(1023), 100);
    }

    #[test]
    fn half_scale_rounds_to_fifty() {
        let sensor = WaterLevelSensor::new(1023);
        assert_eq!(sensor.to_percent(511), 50);
        assert_eq!(sensor.to_percent(512), 50);
    }

    #[test]
    fn rounds_to_nearest_integer() {
        let sensor = WaterLevelSensor::new(1000);
        assert_eq!(sensor.to_percent(4), 0); // 0.4 -> 0
        assert_eq!(sensor.to_percent(5), 1); // 0.5 -> 1
        assert_eq!(sensor.to_percent(994), 99); // 99.4 -> 99
        assert_eq!(sensor.to_percent(996), 100); // 99.6 -> 100
    }

    #[test]
    fn alternate_full_scale_from_config() {
        let sensor = WaterLevelSensor::new(4095);
        assert_eq!(sensor.to_percent(4095), 100);
        assert_eq!(sensor.to_percent(2048), 50);
    }

    #[cfg(not(target_os = "espidf"))]
    #[test]
    fn read_clamps_out_of_range_raw() {
        let mut sensor = WaterLevelSensor::new(100);
        sim_set_level_raw(65_000);
        let reading = sensor.read();
        assert_eq!(reading.raw, 100);
        assert_eq!(reading.fill_percent, 100);
        sim_set_level_raw(512);
    }
}
