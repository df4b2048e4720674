//! GPIO / peripheral pin assignments for the TowerWatch main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Safety inputs (pulled up, falling-edge interrupts)
// ---------------------------------------------------------------------------

/// Emergency-stop mushroom button. Wired normally-open to ground; the
/// internal pull-up holds the line HIGH until pressed.
pub const ESTOP_GPIO: i32 = 6;

/// High-water float switch at the overflow mark. Same wiring as the e-stop.
pub const HIGH_WATER_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Pump enable output
// ---------------------------------------------------------------------------

/// Digital output to the pump contactor driver. Active HIGH = pump enabled.
/// The interlock drives this line LOW directly when any hazard is latched.
pub const PUMP_ENABLE_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Resistive water-level probe via voltage divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const LEVEL_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// I2C bus (AHT20 temperature/humidity sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;

/// I2C bus clock (AHT20 supports up to 400 kHz; 100 kHz leaves margin
/// for the long cable run up the tower).
pub const I2C_BAUDRATE_HZ: u32 = 100_000;
