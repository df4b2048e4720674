//! Status publisher.
//!
//! Formats one [`StatusReport`] into the four fixed topic writes and hands
//! them to the [`BrokerPort`]. Payloads are plain ASCII: a two-decimal
//! float for temperature, a bare integer for fill, and `"Yes"`/`"No"` for
//! the two latch states.

use core::fmt::Write;

use crate::config::Topics;
use crate::error::CommsError;

use super::events::StatusReport;
use super::ports::BrokerPort;

pub struct StatusPublisher {
    topics: Topics,
}

impl StatusPublisher {
    pub fn new(topics: Topics) -> Self {
        Self { topics }
    }

    /// Publish one status burst (four messages). Stops at the first
    /// failure; the next cadence boundary retries the full burst.
    pub fn publish(
        &self,
        broker: &mut impl BrokerPort,
        report: &StatusReport,
    ) -> Result<(), CommsError> {
        let mut value: heapless::String<16> = heapless::String::new();
        let _ = write!(value, "{:.2}", report.temperature_c);
        broker.publish(self.topics.pump_temperature.as_str(), value.as_bytes())?;

        value.clear();
        let _ = write!(value, "{}", report.fill_percent);
        broker.publish(self.topics.tank_level.as_str(), value.as_bytes())?;

        broker.publish(self.topics.emergency_stop.as_str(), yes_no(report.estop))?;
        broker.publish(self.topics.high_water.as_str(), yes_no(report.high_water))?;
        Ok(())
    }

    /// Boot-time announcement: write a clearing `"0"` to the remote-stop
    /// topic so a stale retained stop command does not outlive a restart.
    pub fn announce_boot(&self, broker: &mut impl BrokerPort) -> Result<(), CommsError> {
        broker.publish(self.topics.remote_stop.as_str(), b"0")
    }
}

fn yes_no(value: bool) -> &'static [u8] {
    if value {
        b"Yes"
    } else {
        b"No"
    }
}
