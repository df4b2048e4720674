//! Integration tests for the TowerService → interlock → pump pipeline and
//! the publish cadence.
//!
//! These run on the host (x86_64) and verify the full control chain from a
//! sensor snapshot down to recorded pump-line calls and broker messages,
//! without any real hardware.

use crate::mock_hw::{LogSink, MockHardware, PumpCall, SimBroker};

use towerwatch::app::publisher::StatusPublisher;
use towerwatch::app::service::TowerService;
use towerwatch::config::{SystemConfig, Topics};

fn make_service() -> (TowerService, MockHardware, LogSink) {
    let config = SystemConfig::default();
    let mut service = TowerService::new(&config);
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    service.start(&mut hw, &mut sink);
    (service, hw, sink)
}

// ── Pump interlock through the full pipeline ─────────────────

#[test]
fn starts_with_pump_commanded_off() {
    let (service, hw, sink) = make_service();
    assert!(!service.pump_on());
    assert_eq!(hw.calls, vec![PumpCall::SetEnabled(false)]);
    assert!(sink.contains("Started"));
}

#[test]
fn low_fill_switches_pump_on() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.snapshot.fill_percent = 3;
    service.tick(&mut hw, &mut sink);

    assert!(service.pump_on());
    assert!(hw.pump_enabled());
    assert!(sink.contains("PumpChanged { on: true }"));
}

#[test]
fn pump_holds_through_hysteresis_band() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.snapshot.fill_percent = 3;
    service.tick(&mut hw, &mut sink);
    assert!(service.pump_on());

    for fill in [5, 20, 50, 80, 95] {
        hw.snapshot.fill_percent = fill;
        service.tick(&mut hw, &mut sink);
        assert!(service.pump_on(), "pump must hold at {fill}%");
    }
}

#[test]
fn high_fill_switches_pump_off() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.snapshot.fill_percent = 3;
    service.tick(&mut hw, &mut sink);
    hw.snapshot.fill_percent = 97;
    service.tick(&mut hw, &mut sink);

    assert!(!service.pump_on());
    assert!(!hw.pump_enabled());
    assert!(sink.contains("PumpChanged { on: false }"));
}

// ── Hazard latching ──────────────────────────────────────────

#[test]
fn estop_blocks_pump_and_forces_line_low() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.snapshot.fill_percent = 3;
    hw.snapshot.estop_signalled = true;
    service.tick(&mut hw, &mut sink);

    assert!(!service.pump_on());
    assert!(!hw.pump_enabled());
    assert_eq!(hw.force_low_count(), 1);
    assert!(sink.contains("HazardTripped(EmergencyStop)"));
}

#[test]
fn estop_cuts_running_pump_immediately() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.snapshot.fill_percent = 3;
    service.tick(&mut hw, &mut sink);
    assert!(service.pump_on());

    hw.snapshot.fill_percent = 50;
    hw.snapshot.estop_signalled = true;
    service.tick(&mut hw, &mut sink);

    assert!(!service.pump_on());
    assert_eq!(hw.force_low_count(), 1);
}

#[test]
fn hazards_stay_latched_after_signal_clears() {
    let (mut service, mut hw, mut sink) = make_service();

    // One-iteration pulse on the high-water line.
    hw.snapshot.high_water_signalled = true;
    service.tick(&mut hw, &mut sink);
    hw.snapshot.high_water_signalled = false;

    // Tank then empties; a latched hazard must still hold the pump off.
    hw.snapshot.fill_percent = 1;
    for _ in 0..10 {
        service.tick(&mut hw, &mut sink);
        assert!(!service.pump_on());
    }
    assert!(hw.force_low_count() >= 10);
}

#[test]
fn overheat_latch_survives_cooldown() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.snapshot.temperature_c = 31.0;
    hw.snapshot.over_temp = true;
    service.tick(&mut hw, &mut sink);

    hw.snapshot.temperature_c = 22.0;
    hw.snapshot.over_temp = false;
    hw.snapshot.fill_percent = 2;
    service.tick(&mut hw, &mut sink);

    assert!(!service.pump_on(), "overheat latch must survive cooldown");
    assert!(sink.contains("HazardTripped(Overheat)"));
}

#[test]
fn remote_stop_signal_latches() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.snapshot.remote_stop_signalled = true;
    hw.snapshot.fill_percent = 2;
    service.tick(&mut hw, &mut sink);

    assert!(!service.pump_on());
    assert!(sink.contains("HazardTripped(RemoteStop)"));
}

#[test]
fn hazard_events_fire_once_per_source() {
    let (mut service, mut hw, mut sink) = make_service();

    hw.snapshot.estop_signalled = true;
    for _ in 0..5 {
        service.tick(&mut hw, &mut sink);
    }

    let trips = sink
        .events
        .iter()
        .filter(|e| e.contains("HazardTripped"))
        .count();
    assert_eq!(trips, 1, "latch events must be one-shot");
}

// ── Publish cadence + publisher ──────────────────────────────

#[test]
fn three_bursts_across_fifteen_seconds() {
    let (mut service, mut hw, mut sink) = make_service();
    let publisher = StatusPublisher::new(Topics::from_prefix("towerwatch/site1"));
    let mut broker = SimBroker::new();

    // Simulate 15 seconds of wall clock with many loop iterations per second.
    for sec in 0u64..15 {
        for _ in 0..25 {
            service.tick(&mut hw, &mut sink);
            if let Some(report) = service.report_due(sec) {
                publisher.publish(&mut broker, &report).unwrap();
            }
        }
    }

    // Bursts at 0, 5, 10 — four messages each.
    assert_eq!(broker.published.len(), 12);
    assert_eq!(
        broker.payloads_for("towerwatch/site1/waterTankLevel"),
        vec!["50", "50", "50"]
    );
}

#[test]
fn burst_reports_latched_alerts_as_yes() {
    let (mut service, mut hw, mut sink) = make_service();
    let publisher = StatusPublisher::new(Topics::from_prefix("t"));
    let mut broker = SimBroker::new();

    hw.snapshot.estop_signalled = true;
    service.tick(&mut hw, &mut sink);

    let report = service.report_due(0).expect("boundary second");
    publisher.publish(&mut broker, &report).unwrap();

    assert_eq!(broker.payloads_for("t/emergencyStop"), vec!["Yes"]);
    assert_eq!(broker.payloads_for("t/highWaterWarning"), vec!["No"]);
}

#[test]
fn burst_carries_latest_sensor_values() {
    let (mut service, mut hw, mut sink) = make_service();
    let publisher = StatusPublisher::new(Topics::from_prefix("t"));
    let mut broker = SimBroker::new();

    hw.snapshot.temperature_c = 27.25;
    hw.snapshot.fill_percent = 64;
    service.tick(&mut hw, &mut sink);

    let report = service.report_due(5).expect("boundary second");
    publisher.publish(&mut broker, &report).unwrap();

    assert_eq!(broker.payloads_for("t/pumpTemperature"), vec!["27.25"]);
    assert_eq!(broker.payloads_for("t/waterTankLevel"), vec!["64"]);
}

#[test]
fn failed_burst_is_retried_at_next_boundary() {
    let (mut service, mut hw, mut sink) = make_service();
    let publisher = StatusPublisher::new(Topics::from_prefix("t"));
    let mut broker = SimBroker::new();

    service.tick(&mut hw, &mut sink);

    broker.fail_publishes = true;
    let report = service.report_due(0).expect("boundary second");
    assert!(publisher.publish(&mut broker, &report).is_err());

    // Guard still consumed this boundary; next burst happens at 5 s.
    assert!(service.report_due(0).is_none());
    broker.fail_publishes = false;
    let report = service.report_due(5).expect("next boundary");
    publisher.publish(&mut broker, &report).unwrap();
    assert_eq!(broker.published.len(), 4);
}
