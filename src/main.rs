//! TowerWatch Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative monitor loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LogEventSink    WifiAdapter    MqttAdapter │
//! │  (Sensor+Pump)      (EventSink)     (Link)         (Broker)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              TowerService (pure logic)                 │    │
//! │  │  Hazard latches · Pump interlock · Report cadence      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ConnectionSupervisor ×2 (WiFi, broker) · Watchdog             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loop order is deliberate: the interlock tick runs before the
//! connectivity steps, so the pump reaches its safe state even when a
//! reconnect blocks for the rest of the iteration.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use towerwatch::adapters::device_id;
use towerwatch::adapters::hardware::HardwareAdapter;
use towerwatch::adapters::log_sink::LogEventSink;
use towerwatch::adapters::mqtt::MqttAdapter;
use towerwatch::adapters::time::UptimeClock;
use towerwatch::adapters::wifi::WifiAdapter;
use towerwatch::app::events::AppEvent;
use towerwatch::app::ports::{BrokerPort, EventSink};
use towerwatch::app::publisher::StatusPublisher;
use towerwatch::app::service::TowerService;
use towerwatch::config::{SystemConfig, Topics};
use towerwatch::connectivity::{ConnectionSupervisor, RetryPolicy};
use towerwatch::drivers::hw_init;
use towerwatch::drivers::pump::PumpDriver;
use towerwatch::drivers::watchdog::Watchdog;
use towerwatch::pins;
use towerwatch::power;
use towerwatch::sensors::climate::ClimateSensor;
use towerwatch::sensors::water_level::WaterLevelSensor;
use towerwatch::sensors::SensorHub;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!(
        "TowerWatch v{} — water tower monitor",
        env!("CARGO_PKG_VERSION")
    );

    let config = SystemConfig::default();
    let topics = Topics::from_prefix(config.topic_prefix.as_str());

    // ── 2. Peripherals and safety inputs ──────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {e} — halting");
        power::halt_indefinitely();
    }
    if let Err(e) = hw_init::init_isr_service() {
        // The interrupt lines are the safety inputs; running without them
        // would silently mask hazards.
        error!("ISR service init failed: {e} — halting");
        power::halt_indefinitely();
    }
    let watchdog = Watchdog::new(10_000);

    // ── 3. Device identity ────────────────────────────────────
    let mac = device_id::read_mac();
    info!("Device ID: {}", device_id::device_id(&mac));

    // ── 4. Sensors (climate probe failure is fatal) ───────────
    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        // SAFETY: the pin numbers come from pins.rs and are not claimed by
        // any other driver; hw_init only configures the safety GPIOs.
        unsafe { AnyIOPin::new(pins::I2C_SDA_GPIO) },
        unsafe { AnyIOPin::new(pins::I2C_SCL_GPIO) },
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUDRATE_HZ)),
    )?;
    let climate = match ClimateSensor::probe(i2c, config.overheat_threshold_c) {
        Ok(sensor) => sensor,
        Err(e) => {
            error!("Could not find climate sensor ({e}) — check wiring; halting");
            power::halt_indefinitely();
        }
    };
    let sensor_hub = SensorHub::new(climate, WaterLevelSensor::new(config.level_raw_max));
    let mut hw = HardwareAdapter::new(sensor_hub, PumpDriver::new());

    // ── 5. Connectivity adapters + supervisors ────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let mut wifi = WifiAdapter::new(BlockingWifi::wrap(esp_wifi, sysloop)?);
    wifi.set_credentials(config.wifi_ssid.as_str(), config.wifi_password.as_str())?;
    let mut wifi_link =
        ConnectionSupervisor::new(RetryPolicy::unbounded(config.wifi_retry_delay_ms));

    let mut broker = MqttAdapter::new(&config, &topics, device_id::client_id(&mac));
    let mut broker_link =
        ConnectionSupervisor::new(RetryPolicy::unbounded(config.broker_retry_delay_ms));

    // ── 6. Domain service ─────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut service = TowerService::new(&config);
    let publisher = StatusPublisher::new(topics);
    let clock = UptimeClock::new();
    service.start(&mut hw, &mut sink);

    // ── 7. Initial connect (blocking, unbounded retries) ──────
    wifi_link.ensure_connected(&mut wifi, |ms| {
        watchdog.feed();
        FreeRtos::delay_ms(ms);
    })?;
    broker_link.ensure_connected(&mut broker, |ms| {
        watchdog.feed();
        FreeRtos::delay_ms(ms);
    })?;
    if let Err(e) = publisher.announce_boot(&mut broker) {
        warn!("boot announcement failed: {e}");
    }

    info!("Monitoring water tower...");

    // ── 8. Monitor loop ───────────────────────────────────────
    loop {
        // Safety first: evaluate hazards and the interlock before any step
        // that can block on the network.
        service.tick(&mut hw, &mut sink);

        wifi_link.ensure_connected(&mut wifi, |ms| {
            watchdog.feed();
            FreeRtos::delay_ms(ms);
        })?;
        broker_link.ensure_connected(&mut broker, |ms| {
            watchdog.feed();
            FreeRtos::delay_ms(ms);
        })?;
        broker.poll();

        if let Some(report) = service.report_due(clock.uptime_secs()) {
            match publisher.publish(&mut broker, &report) {
                Ok(()) => sink.emit(&AppEvent::StatusPublished(report)),
                Err(e) => warn!("status publish failed: {e}"),
            }
        }

        watchdog.feed();
        FreeRtos::delay_ms(config.loop_delay_ms);
    }
}
