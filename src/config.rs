//! System configuration parameters
//!
//! All tunable parameters for the TowerWatch monitor. The device has no
//! provisioning, CLI, or persistence path — values are compiled-in defaults,
//! and the whole structure is passed at initialisation so tests can inject
//! alternates.

use core::fmt::Write;

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Pump interlock ---
    /// Fill percentage below which the pump switches on (0-100%)
    pub pump_on_below_percent: u8,
    /// Fill percentage above which the pump switches off (0-100%)
    pub pump_off_above_percent: u8,

    // --- Safety ---
    /// Temperature (Celsius) at or above which the overheat hazard latches
    pub overheat_threshold_c: f32,

    // --- Water level ---
    /// Full-scale raw reading of the analog level sensor
    pub level_raw_max: u16,

    // --- Reporting ---
    /// Status publish interval (seconds of wall-clock time)
    pub report_interval_secs: u64,
    /// Topic prefix shared by every publish/subscribe topic
    pub topic_prefix: heapless::String<48>,

    // --- Connectivity ---
    /// WiFi station SSID
    pub wifi_ssid: heapless::String<32>,
    /// WiFi station password (empty = open network)
    pub wifi_password: heapless::String<64>,
    /// Broker hostname or IP
    pub broker_host: heapless::String<64>,
    /// Broker TCP port
    pub broker_port: u16,
    /// Delay between WiFi connect attempts (milliseconds)
    pub wifi_retry_delay_ms: u32,
    /// Delay between broker connect attempts (milliseconds)
    pub broker_retry_delay_ms: u32,

    // --- Timing ---
    /// Main loop pacing delay (milliseconds)
    pub loop_delay_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Pump interlock (hysteresis band between the thresholds)
            pump_on_below_percent: 5,
            pump_off_above_percent: 95,

            // Safety
            overheat_threshold_c: 30.0,

            // Water level (10-bit ADC full scale)
            level_raw_max: 1023,

            // Reporting
            report_interval_secs: 5,
            topic_prefix: fixed("towerwatch/site1"),

            // Connectivity
            wifi_ssid: fixed("towerwatch-net"),
            wifi_password: fixed("change-me-please"),
            broker_host: fixed("broker.hivemq.com"),
            broker_port: 1883,
            wifi_retry_delay_ms: 500,
            broker_retry_delay_ms: 5000,

            // Timing
            loop_delay_ms: 50,
        }
    }
}

/// Build a fixed-capacity string from a literal. Truncates silently if the
/// literal exceeds the capacity, which compiled-in defaults never do.
fn fixed<const N: usize>(value: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let _ = out.push_str(value);
    out
}

// ---------------------------------------------------------------------------
// Broker topics
// ---------------------------------------------------------------------------

/// The fixed topic set, built once from the configured prefix.
#[derive(Debug, Clone)]
pub struct Topics {
    /// Published: pump temperature, float as decimal string.
    pub pump_temperature: heapless::String<64>,
    /// Published: tank fill percentage, integer 0-100 as string.
    pub tank_level: heapless::String<64>,
    /// Published: emergency-stop latch, "Yes"/"No".
    pub emergency_stop: heapless::String<64>,
    /// Published: high-water latch, "Yes"/"No".
    pub high_water: heapless::String<64>,
    /// Subscribed: remote stop command channel.
    pub remote_stop: heapless::String<64>,
}

impl Topics {
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            pump_temperature: topic(prefix, "pumpTemperature"),
            tank_level: topic(prefix, "waterTankLevel"),
            emergency_stop: topic(prefix, "emergencyStop"),
            high_water: topic(prefix, "highWaterWarning"),
            remote_stop: topic(prefix, "remoteStop"),
        }
    }
}

fn topic(prefix: &str, suffix: &str) -> heapless::String<64> {
    let mut out = heapless::String::new();
    let _ = write!(out, "{prefix}/{suffix}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.pump_on_below_percent < c.pump_off_above_percent);
        assert!(c.pump_off_above_percent <= 100);
        assert!(c.overheat_threshold_c > 0.0);
        assert!(c.level_raw_max > 0);
        assert!(c.report_interval_secs > 0);
        assert!(c.loop_delay_ms > 0);
        assert!(!c.wifi_ssid.is_empty());
        assert!(!c.broker_host.is_empty());
    }

    #[test]
    fn hysteresis_band_exists() {
        let c = SystemConfig::default();
        assert!(
            c.pump_on_below_percent < c.pump_off_above_percent,
            "on threshold must be below off threshold to prevent oscillation"
        );
    }

    #[test]
    fn loop_is_faster_than_report_cadence() {
        let c = SystemConfig::default();
        assert!(
            u64::from(c.loop_delay_ms) < c.report_interval_secs * 1000,
            "loop must iterate several times per publish window"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.pump_on_below_percent, c2.pump_on_below_percent);
        assert_eq!(c.pump_off_above_percent, c2.pump_off_above_percent);
        assert!((c.overheat_threshold_c - c2.overheat_threshold_c).abs() < 0.001);
        assert_eq!(c.broker_port, c2.broker_port);
        assert_eq!(c.topic_prefix, c2.topic_prefix);
    }

    #[test]
    fn topics_built_from_prefix() {
        let t = Topics::from_prefix("towerwatch/site1");
        assert_eq!(t.pump_temperature.as_str(), "towerwatch/site1/pumpTemperature");
        assert_eq!(t.tank_level.as_str(), "towerwatch/site1/waterTankLevel");
        assert_eq!(t.emergency_stop.as_str(), "towerwatch/site1/emergencyStop");
        assert_eq!(t.high_water.as_str(), "towerwatch/site1/highWaterWarning");
        assert_eq!(t.remote_stop.as_str(), "towerwatch/site1/remoteStop");
    }

    #[test]
    fn topics_follow_injected_prefix() {
        let t = Topics::from_prefix("test/alt");
        assert_eq!(t.remote_stop.as_str(), "test/alt/remoteStop");
    }
}
