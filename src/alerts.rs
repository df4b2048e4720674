//! Hazard latches.
//!
//! Four hazard sources can stop the pump: the emergency-stop input, the
//! high-water input, the overheat check, and the remote stop command. Each
//! is **latched**: once tripped it stays tripped until the device restarts.
//! There is deliberately no in-software reset path.
//!
//! ## Interrupt boundary
//!
//! The two GPIO ISRs and the broker message callback run outside the main
//! loop. They communicate through the set-only atomics below and perform no
//! other work. Because the flags are monotonic (false→true, never cleared),
//! the loop may observe a trip one iteration late at worst and no locking
//! is needed.

use core::sync::atomic::{AtomicBool, Ordering};

use log::warn;

// ---------------------------------------------------------------------------
// Hazard identity
// ---------------------------------------------------------------------------

/// One hazard source, doubling as its bit in the latch mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Hazard {
    /// Emergency-stop input tripped (falling edge).
    EmergencyStop = 0b0000_0001,
    /// High-water float switch tripped (falling edge).
    HighWater = 0b0000_0010,
    /// Pump temperature reached the overheat threshold.
    Overheat = 0b0000_0100,
    /// Stop command received on the remote-stop topic.
    RemoteStop = 0b0000_1000,
}

impl Hazard {
    /// Return the bitmask for this hazard.
    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// Every hazard source, for iteration in diagnostics and tests.
    pub const ALL: [Hazard; 4] = [
        Hazard::EmergencyStop,
        Hazard::HighWater,
        Hazard::Overheat,
        Hazard::RemoteStop,
    ];
}

impl core::fmt::Display for Hazard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmergencyStop => write!(f, "emergency stop"),
            Self::HighWater => write!(f, "high water"),
            Self::Overheat => write!(f, "overheat"),
            Self::RemoteStop => write!(f, "remote stop"),
        }
    }
}

// ---------------------------------------------------------------------------
// ISR / callback signal flags (lock-free, set-only)
// ---------------------------------------------------------------------------

static ESTOP_SIGNAL: AtomicBool = AtomicBool::new(false);
static HIGH_WATER_SIGNAL: AtomicBool = AtomicBool::new(false);
static REMOTE_STOP_SIGNAL: AtomicBool = AtomicBool::new(false);

/// Called from the emergency-stop GPIO ISR. Lock-free, no I/O.
pub fn trip_estop_from_isr() {
    ESTOP_SIGNAL.store(true, Ordering::Release);
}

/// Called from the high-water GPIO ISR. Lock-free, no I/O.
pub fn trip_high_water_from_isr() {
    HIGH_WATER_SIGNAL.store(true, Ordering::Release);
}

/// Called from the broker message callback on a stop command.
pub fn trip_remote_stop() {
    REMOTE_STOP_SIGNAL.store(true, Ordering::Release);
}

/// Polled by the sensor hub each loop iteration.
pub fn estop_signalled() -> bool {
    ESTOP_SIGNAL.load(Ordering::Acquire)
}

pub fn high_water_signalled() -> bool {
    HIGH_WATER_SIGNAL.load(Ordering::Acquire)
}

pub fn remote_stop_signalled() -> bool {
    REMOTE_STOP_SIGNAL.load(Ordering::Acquire)
}

// ---------------------------------------------------------------------------
// Latch state
// ---------------------------------------------------------------------------

/// Accumulated hazard latches, owned by the tower controller.
///
/// `trip` is the only mutating operation; the mask can only grow.
#[derive(Debug, Default)]
pub struct HazardLatches {
    latched: u8,
}

impl HazardLatches {
    pub fn new() -> Self {
        Self { latched: 0 }
    }

    /// Latch a hazard. Returns `true` the first time the hazard trips so
    /// callers can emit a one-shot event; re-trips are silent.
    pub fn trip(&mut self, hazard: Hazard) -> bool {
        if self.latched & hazard.mask() != 0 {
            return false;
        }
        warn!("HAZARD LATCHED: {hazard} (pump locked out until restart)");
        self.latched |= hazard.mask();
        true
    }

    /// True while no hazard has ever tripped this run.
    pub fn is_safe(&self) -> bool {
        self.latched == 0
    }

    pub fn is_latched(&self, hazard: Hazard) -> bool {
        self.latched & hazard.mask() != 0
    }

    /// Raw latch bitmask for diagnostics.
    pub fn mask(&self) -> u8 {
        self.latched
    }
}
