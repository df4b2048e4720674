//! Outbound application events.
//!
//! [`TowerService`](super::service::TowerService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — log to serial, record in a test sink.

use crate::alerts::Hazard;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The tower controller has started (pump commanded to its safe
    /// initial state).
    Started,

    /// The interlock switched the pump on or off.
    PumpChanged { on: bool },

    /// A hazard latched for the first time. There is no corresponding
    /// "cleared" event: latches hold until restart.
    HazardTripped(Hazard),

    /// A status burst was handed to the publisher.
    StatusPublished(StatusReport),
}

/// One status burst: the four published values plus humidity, which is
/// read alongside temperature and logged but not published.
#[derive(Debug, Clone, Copy)]
pub struct StatusReport {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub fill_percent: u8,
    /// Emergency-stop latch state at report time.
    pub estop: bool,
    /// High-water latch state at report time.
    pub high_water: bool,
}
