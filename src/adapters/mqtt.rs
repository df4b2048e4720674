//! MQTT broker adapter.
//!
//! Implements [`BrokerPort`] for status publishing and the remote-stop
//! subscription, and [`Link`] so the connection supervisor can drive the
//! session with the broker retry policy.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//!   The client's event callback runs on the MQTT task, so it only stores
//!   to the set-only alert atomics and two session flags; the monitor loop
//!   observes those on its next tick.
//! - **all other targets**: in-memory simulation with an injectable inbound
//!   queue for host-side tests.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicBool, Ordering};

use log::info;
#[cfg(not(target_os = "espidf"))]
use log::warn;

use crate::adapters::device_id::ClientIdString;
use crate::app::commands::RemoteCommand;
use crate::app::ports::BrokerPort;
use crate::config::{SystemConfig, Topics};
use crate::connectivity::Link;
use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Session flags (espidf: written from the MQTT task callback)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static BROKER_CONNECTED: AtomicBool = AtomicBool::new(false);
/// Cleared on every disconnect; the remote-stop subscription must be
/// re-established per session.
#[cfg(target_os = "espidf")]
static SESSION_SUBSCRIBED: AtomicBool = AtomicBool::new(false);

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

pub struct MqttAdapter {
    remote_stop_topic: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    broker_url: heapless::String<96>,
    #[cfg(target_os = "espidf")]
    client_id: ClientIdString,
    #[cfg(target_os = "espidf")]
    client: Option<esp_idf_svc::mqtt::client::EspMqttClient<'static>>,

    #[cfg(not(target_os = "espidf"))]
    connected: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_connect_counter: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_first: u32,
    #[cfg(not(target_os = "espidf"))]
    subscriptions: Vec<String>,
    #[cfg(not(target_os = "espidf"))]
    published: Vec<(String, Vec<u8>)>,
    #[cfg(not(target_os = "espidf"))]
    inbound: std::collections::VecDeque<(String, Vec<u8>)>,
}

impl MqttAdapter {
    pub fn new(config: &SystemConfig, topics: &Topics, client_id: ClientIdString) -> Self {
        #[cfg(target_os = "espidf")]
        {
            use core::fmt::Write;

            let mut broker_url: heapless::String<96> = heapless::String::new();
            let _ = write!(
                broker_url,
                "mqtt://{}:{}",
                config.broker_host, config.broker_port
            );
            Self {
                remote_stop_topic: topics.remote_stop.clone(),
                broker_url,
                client_id,
                client: None,
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let _ = (config, &client_id);
            Self {
                remote_stop_topic: topics.remote_stop.clone(),
                connected: false,
                sim_connect_counter: 0,
                sim_fail_first: 0,
                subscriptions: Vec::new(),
                published: Vec::new(),
                inbound: std::collections::VecDeque::new(),
            }
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    /// Construct the ESP-IDF client once. Construction starts the session
    /// in the background; the supervisor polls [`Link::try_connect`] until
    /// the callback reports the session up.
    #[cfg(target_os = "espidf")]
    fn ensure_client(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration};

        if self.client.is_some() {
            return Ok(());
        }

        let conf = MqttClientConfiguration {
            client_id: Some(self.client_id.as_str()),
            ..Default::default()
        };

        let remote_stop = self.remote_stop_topic.clone();
        let client = EspMqttClient::new_cb(self.broker_url.as_str(), &conf, move |event| {
            match event.payload() {
                EventPayload::Connected(_) => {
                    BROKER_CONNECTED.store(true, Ordering::Release);
                    SESSION_SUBSCRIBED.store(false, Ordering::Release);
                }
                EventPayload::Disconnected => {
                    BROKER_CONNECTED.store(false, Ordering::Release);
                    SESSION_SUBSCRIBED.store(false, Ordering::Release);
                }
                EventPayload::Received { topic, data, .. } => {
                    // Runs on the MQTT task: set-only atomic store, no I/O.
                    if topic == Some(remote_stop.as_str())
                        && RemoteCommand::parse(data) == Some(RemoteCommand::Stop)
                    {
                        crate::alerts::trip_remote_stop();
                    }
                }
                _ => {}
            }
        })
        .map_err(|_| CommsError::BrokerConnectFailed)?;

        info!(
            "MQTT: client '{}' created for {}",
            self.client_id, self.broker_url
        );
        self.client = Some(client);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        BROKER_CONNECTED.load(Ordering::Acquire)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.connected
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation helpers (host targets)
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl MqttAdapter {
    /// Test hook: make the next `n` connect attempts fail.
    pub fn sim_set_fail_first(&mut self, n: u32) {
        self.sim_fail_first = n;
        self.sim_connect_counter = 0;
    }

    /// Test hook: queue an inbound message, delivered on the next `poll()`.
    pub fn sim_inject(&mut self, topic: &str, payload: &[u8]) {
        self.inbound.push_back((topic.to_owned(), payload.to_vec()));
    }

    /// Test hook: everything published so far.
    pub fn sim_published(&self) -> &[(String, Vec<u8>)] {
        &self.published
    }
}

// ───────────────────────────────────────────────────────────────
// Link
// ───────────────────────────────────────────────────────────────

impl Link for MqttAdapter {
    fn label(&self) -> &'static str {
        "broker"
    }

    #[cfg(target_os = "espidf")]
    fn try_connect(&mut self) -> Result<(), CommsError> {
        self.ensure_client()?;
        if !self.platform_is_connected() {
            return Err(CommsError::BrokerConnectFailed);
        }
        // Session is up: (re-)establish the remote-stop subscription once.
        if !SESSION_SUBSCRIBED.load(Ordering::Acquire) {
            let topic = self.remote_stop_topic.clone();
            self.subscribe(topic.as_str())?;
            SESSION_SUBSCRIBED.store(true, Ordering::Release);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn try_connect(&mut self) -> Result<(), CommsError> {
        if self.connected {
            return Ok(());
        }
        self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
        if self.sim_connect_counter <= self.sim_fail_first {
            return Err(CommsError::BrokerConnectFailed);
        }
        self.connected = true;
        info!("MQTT(sim): connected (attempt {})", self.sim_connect_counter);
        let topic = self.remote_stop_topic.clone();
        self.subscribe(topic.as_str())
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }
}

// ───────────────────────────────────────────────────────────────
// BrokerPort
// ───────────────────────────────────────────────────────────────

impl BrokerPort for MqttAdapter {
    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    #[cfg(target_os = "espidf")]
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::QoS;

        if !self.platform_is_connected() {
            return Err(CommsError::BrokerDisconnected);
        }
        let client = self.client.as_mut().ok_or(CommsError::BrokerDisconnected)?;
        // At-most-once matches the monitor's best-effort delivery contract.
        client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|_| CommsError::PublishFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::BrokerDisconnected);
        }
        self.published.push((topic.to_owned(), payload.to_vec()));
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::QoS;

        let client = self.client.as_mut().ok_or(CommsError::BrokerDisconnected)?;
        client
            .subscribe(topic, QoS::AtMostOnce)
            .map(|_| ())
            .map_err(|_| CommsError::SubscribeFailed)?;
        info!("MQTT: subscribed to '{topic}'");
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        if !self.subscriptions.iter().any(|t| t == topic) {
            self.subscriptions.push(topic.to_owned());
        }
        info!("MQTT(sim): subscribed to '{topic}'");
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn poll(&mut self) {
        // Inbound dispatch happens on the MQTT task callback; the loop
        // picks the alert atomics up on its next tick. Nothing to do here.
    }

    #[cfg(not(target_os = "espidf"))]
    fn poll(&mut self) {
        while let Some((topic, payload)) = self.inbound.pop_front() {
            if !self.subscriptions.iter().any(|t| *t == topic) {
                continue;
            }
            if topic == self.remote_stop_topic.as_str()
                && RemoteCommand::parse(&payload) == Some(RemoteCommand::Stop)
            {
                warn!("MQTT(sim): remote stop received");
                crate::alerts::trip_remote_stop();
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
