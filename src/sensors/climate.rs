//! AHT20 temperature/humidity sensor (I2C, address 0x38).
//!
//! The sensor feeds the overheat check, so its absence at boot is fatal:
//! [`ClimateSensor::probe`] fails and the caller halts the device rather
//! than run the interlock on a defaulted reading.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: talks to the real device through `embedded_hal::i2c::I2c`
//! (implemented by `esp_idf_hal::i2c::I2cDriver`).
//! On host/test: reads from static atomics for injection.

use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
const AHT20_ADDR: u8 = 0x38;
#[cfg(target_os = "espidf")]
const CMD_INITIALISE: u8 = 0xBE;
#[cfg(target_os = "espidf")]
const CMD_MEASURE: u8 = 0xAC;
#[cfg(target_os = "espidf")]
const STATUS_BUSY: u8 = 0x80;
#[cfg(target_os = "espidf")]
const STATUS_CALIBRATED: u8 = 0x08;

/// 2^20 — full scale of the 20-bit humidity and temperature words.
const FULL_SCALE: f32 = 1_048_576.0;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(21.5f32.to_bits());
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_BITS: AtomicU32 = AtomicU32::new(40.0f32.to_bits());

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temperature_c(celsius: f32) {
    SIM_TEMP_BITS.store(celsius.to_bits(), Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_humidity_pct(percent: f32) {
    SIM_HUMIDITY_BITS.store(percent.to_bits(), Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    /// Instantaneous overheat signal; the latch lives in the controller.
    pub over_temp: bool,
}

pub struct ClimateSensor {
    overheat_threshold_c: f32,
    #[cfg(target_os = "espidf")]
    bus: esp_idf_hal::i2c::I2cDriver<'static>,
    #[cfg(target_os = "espidf")]
    last_temperature_c: f32,
    #[cfg(target_os = "espidf")]
    last_humidity_pct: f32,
}

#[cfg(target_os = "espidf")]
impl ClimateSensor {
    /// Probe the sensor and run its calibration command if needed.
    /// Failure here means the device is absent or miswired.
    pub fn probe(
        mut bus: esp_idf_hal::i2c::I2cDriver<'static>,
        overheat_threshold_c: f32,
    ) -> Result<Self, SensorError> {
        use embedded_hal::i2c::I2c;
        use esp_idf_hal::delay::FreeRtos;

        // Datasheet: 40 ms power-on settle before the first status read.
        FreeRtos::delay_ms(40);

        let mut status = [0u8; 1];
        bus.read(AHT20_ADDR, &mut status)
            .map_err(|_| SensorError::NotDetected)?;

        if status[0] & STATUS_CALIBRATED == 0 {
            bus.write(AHT20_ADDR, &[CMD_INITIALISE, 0x08, 0x00])
                .map_err(|_| SensorError::NotDetected)?;
            FreeRtos::delay_ms(10);
        }

        Ok(Self {
            overheat_threshold_c,
            bus,
            last_temperature_c: 0.0,
            last_humidity_pct: 0.0,
        })
    }

    /// Trigger one measurement and read it back.
    ///
    /// A failed transaction is logged and the previous good values are
    /// retained — one flaky read must not wobble the safety interlock.
    pub fn read(&mut self) -> ClimateReading {
        use embedded_hal::i2c::I2c;
        use esp_idf_hal::delay::FreeRtos;

        match self.bus.write(AHT20_ADDR, &[CMD_MEASURE, 0x33, 0x00]) {
            Ok(()) => {
                FreeRtos::delay_ms(80);
                let mut frame = [0u8; 7];
                match self.bus.read(AHT20_ADDR, &mut frame) {
                    Ok(()) if frame[0] & STATUS_BUSY == 0 => {
                        let (temperature_c, humidity_pct) = decode_measurement(&frame);
                        self.last_temperature_c = temperature_c;
                        self.last_humidity_pct = humidity_pct;
                    }
                    Ok(()) => warn!("climate: measurement still busy, keeping last values"),
                    Err(_) => warn!("climate: I2C read failed, keeping last values"),
                }
            }
            Err(_) => warn!("climate: I2C write failed, keeping last values"),
        }

        ClimateReading {
            temperature_c: self.last_temperature_c,
            humidity_pct: self.last_humidity_pct,
            over_temp: self.last_temperature_c >= self.overheat_threshold_c,
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl ClimateSensor {
    /// Simulation probe — always present.
    pub fn probe(overheat_threshold_c: f32) -> Result<Self, SensorError> {
        Ok(Self {
            overheat_threshold_c,
        })
    }

    pub fn read(&mut self) -> ClimateReading {
        let temperature_c = f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed));
        let humidity_pct = f32::from_bits(SIM_HUMIDITY_BITS.load(Ordering::Relaxed));
        ClimateReading {
            temperature_c,
            humidity_pct,
            over_temp: temperature_c >= self.overheat_threshold_c,
        }
    }
}

/// Unpack the 7-byte AHT20 frame: `[status, h19..12, h11..4, h3..0|t19..16,
/// t15..8, t7..0, crc]`. Returns `(temperature_c, humidity_pct)`.
#[allow(dead_code)] // referenced only by the espidf read path and tests
fn decode_measurement(frame: &[u8; 7]) -> (f32, f32) {
    let raw_h =
        (u32::from(frame[1]) << 12) | (u32::from(frame[2]) << 4) | (u32::from(frame[3]) >> 4);
    let raw_t =
        ((u32::from(frame[3]) & 0x0F) << 16) | (u32::from(frame[4]) << 8) | u32::from(frame[5]);

    let humidity_pct = raw_h as f32 / FULL_SCALE * 100.0;
    let temperature_c = raw_t as f32 / FULL_SCALE * 200.0 - 50.0;
    (temperature_c, humidity_pct)
}
