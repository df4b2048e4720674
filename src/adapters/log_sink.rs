//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | monitoring water tower, pump off");
            }
            AppEvent::PumpChanged { on } => {
                info!("PUMP  | {}", if *on { "on" } else { "off" });
            }
            AppEvent::HazardTripped(hazard) => {
                warn!("ALERT | {hazard} latched");
            }
            AppEvent::StatusPublished(r) => {
                info!(
                    "STATUS | T={:.2}\u{00b0}C RH={:.0}% | fill={}% | estop={} high_water={}",
                    r.temperature_c,
                    r.humidity_pct,
                    r.fill_percent,
                    if r.estop { "Yes" } else { "No" },
                    if r.high_water { "Yes" } else { "No" },
                );
            }
        }
    }
}
