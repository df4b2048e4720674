//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TowerService (domain)
//! ```
//!
//! Driven adapters (sensors, the pump line, the broker client, event sinks)
//! implement these traits. [`TowerService`](super::service::TowerService)
//! consumes them via generics, so the domain core never touches hardware or
//! the network directly.

use crate::error::CommsError;
use crate::sensors::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain its inputs.
pub trait SensorPort {
    /// Read every sensor and ISR signal, returning a unified snapshot.
    fn read_all(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Pump port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain commands the pump-enable line through this.
pub trait PumpPort {
    /// Command the enable line (active high).
    fn set_pump_enabled(&mut self, on: bool);

    /// Drive the physical line low regardless of the commanded state.
    /// Second enforcement layer, invoked every evaluation while unsafe.
    fn force_pump_line_low(&mut self);

    /// Last commanded state of the enable line.
    fn is_pump_enabled(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, broker,
/// test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Broker port (driven adapter: domain ↔ MQTT client)
// ───────────────────────────────────────────────────────────────

/// Topic-based publish/subscribe client. Delivery is best-effort,
/// at-most-once; payloads are ASCII text.
pub trait BrokerPort {
    /// Whether a broker session is currently established.
    fn is_connected(&self) -> bool;

    /// Publish `payload` to `topic`.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError>;

    /// Subscribe to `topic`; inbound messages surface during [`poll`](Self::poll).
    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError>;

    /// Service the client: dispatch any queued inbound messages. Runs
    /// synchronously inside the monitor loop — no callback thread races
    /// with the loop body.
    fn poll(&mut self);
}
