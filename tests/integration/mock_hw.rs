//! Mock hardware adapter for integration tests.
//!
//! Records every pump-line call so tests can assert on the full command
//! history without touching real GPIO, and lets each test drive the sensor
//! snapshot directly (no process-global simulation state).

use towerwatch::app::events::AppEvent;
use towerwatch::app::ports::{BrokerPort, EventSink, PumpPort, SensorPort};
use towerwatch::error::CommsError;
use towerwatch::sensors::SensorSnapshot;

// ── Pump call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpCall {
    SetEnabled(bool),
    ForceLow,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Snapshot returned by the next `read_all` calls; tests mutate freely.
    pub snapshot: SensorSnapshot,
    pub calls: Vec<PumpCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            snapshot: SensorSnapshot {
                temperature_c: 21.5,
                humidity_pct: 40.0,
                level_raw: 512,
                fill_percent: 50,
                ..SensorSnapshot::default()
            },
            calls: Vec::new(),
        }
    }

    /// Effective line state after the recorded call history.
    pub fn pump_enabled(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                PumpCall::SetEnabled(on) => Some(*on),
                PumpCall::ForceLow => Some(false),
            })
            .unwrap_or(false)
    }

    pub fn force_low_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PumpCall::ForceLow))
            .count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.snapshot
    }
}

impl PumpPort for MockHardware {
    fn set_pump_enabled(&mut self, on: bool) {
        self.calls.push(PumpCall::SetEnabled(on));
    }

    fn force_pump_line_low(&mut self) {
        self.calls.push(PumpCall::ForceLow);
    }

    fn is_pump_enabled(&self) -> bool {
        self.pump_enabled()
    }
}

// ── SimBroker ─────────────────────────────────────────────────

pub struct SimBroker {
    pub connected: bool,
    pub fail_publishes: bool,
    pub published: Vec<(String, String)>,
    pub subscriptions: Vec<String>,
}

#[allow(dead_code)]
impl SimBroker {
    pub fn new() -> Self {
        Self {
            connected: true,
            fail_publishes: false,
            published: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    pub fn payloads_for(&self, topic: &str) -> Vec<&str> {
        self.published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.as_str())
            .collect()
    }
}

impl Default for SimBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerPort for SimBroker {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::BrokerDisconnected);
        }
        if self.fail_publishes {
            return Err(CommsError::PublishFailed);
        }
        self.published.push((
            topic.to_owned(),
            String::from_utf8(payload.to_vec()).expect("payloads are ASCII"),
        ));
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        self.subscriptions.push(topic.to_owned());
        Ok(())
    }

    fn poll(&mut self) {}
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<String>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.contains(needle))
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}
