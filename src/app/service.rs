//! Application service — the hexagonal core.
//!
//! [`TowerService`] owns the hazard latches, the pump interlock, and the
//! report cadence. It exposes a clean, hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                 │        TowerService        │
//!    PumpPort ◀── │  latches · interlock ·     │
//!                 │  report cadence            │
//!                 └────────────────────────────┘
//! ```

use crate::alerts::{Hazard, HazardLatches};
use crate::config::SystemConfig;
use crate::interlock::PumpInterlock;
use crate::scheduler::ReportCadence;
use crate::sensors::SensorSnapshot;

use super::events::{AppEvent, StatusReport};
use super::ports::{EventSink, PumpPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// TowerService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct TowerService {
    hazards: HazardLatches,
    interlock: PumpInterlock,
    cadence: ReportCadence,
    last: SensorSnapshot,
    tick_count: u64,
}

impl TowerService {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            hazards: HazardLatches::new(),
            interlock: PumpInterlock::new(config),
            cadence: ReportCadence::new(config.report_interval_secs),
            last: SensorSnapshot::default(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Command the pump to its defined initial state (off) and announce
    /// the start. Call once before the first `tick()`.
    pub fn start(&mut self, hw: &mut impl PumpPort, sink: &mut impl EventSink) {
        hw.set_pump_enabled(false);
        sink.emit(&AppEvent::Started);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: read inputs → latch hazards → interlock →
    /// pump output.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`PumpPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit. Must run before any step of the loop
    /// that can block, so the pump reaches its safe state even when the
    /// network is down.
    pub fn tick(&mut self, hw: &mut (impl SensorPort + PumpPort), sink: &mut impl EventSink) {
        self.tick_count += 1;

        // 1. Read sensors and ISR signals via SensorPort
        let snapshot = hw.read_all();
        self.last = snapshot;

        // 2. Absorb the monotonic signals into the latches
        if snapshot.estop_signalled {
            self.trip(Hazard::EmergencyStop, sink);
        }
        if snapshot.high_water_signalled {
            self.trip(Hazard::HighWater, sink);
        }
        if snapshot.remote_stop_signalled {
            self.trip(Hazard::RemoteStop, sink);
        }
        if snapshot.over_temp {
            self.trip(Hazard::Overheat, sink);
        }

        // 3. Interlock evaluation (pure; always defined)
        let was_on = self.interlock.is_on();
        let cmd = self
            .interlock
            .evaluate(self.hazards.is_safe(), snapshot.fill_percent);

        // 4. Apply via PumpPort; forced-low is the hardware-level backstop
        hw.set_pump_enabled(cmd.pump_on);
        if cmd.force_output_low {
            hw.force_pump_line_low();
        }

        // 5. Emit on transitions only
        if cmd.pump_on != was_on {
            sink.emit(&AppEvent::PumpChanged { on: cmd.pump_on });
        }
    }

    // ── Reporting ─────────────────────────────────────────────

    /// Ask the cadence whether a status burst is due at the given elapsed
    /// wall-clock seconds; if so, build the report from the latest inputs.
    pub fn report_due(&mut self, elapsed_secs: u64) -> Option<StatusReport> {
        if self.cadence.poll(elapsed_secs) {
            Some(self.build_report())
        } else {
            None
        }
    }

    /// Snapshot the publishable state.
    pub fn build_report(&self) -> StatusReport {
        StatusReport {
            temperature_c: self.last.temperature_c,
            humidity_pct: self.last.humidity_pct,
            fill_percent: self.last.fill_percent,
            estop: self.hazards.is_latched(Hazard::EmergencyStop),
            high_water: self.hazards.is_latched(Hazard::HighWater),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn pump_on(&self) -> bool {
        self.interlock.is_on()
    }

    pub fn hazards(&self) -> &HazardLatches {
        &self.hazards
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn trip(&mut self, hazard: Hazard, sink: &mut impl EventSink) {
        if self.hazards.trip(hazard) {
            sink.emit(&AppEvent::HazardTripped(hazard));
        }
    }
}
