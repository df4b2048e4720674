//! WiFi station-mode adapter.
//!
//! Implements [`Link`] so the connection supervisor can drive the station
//! through its `{Disconnected, Connecting, Connected}` states. Retry
//! pacing lives in the supervisor's policy, not here.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via
//!   `esp_idf_svc::wifi::BlockingWifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use log::info;

use crate::connectivity::Link;
use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Credential validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), CommsError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(CommsError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(CommsError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CommsError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CommsError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
    #[cfg(target_os = "espidf")]
    started: bool,
    #[cfg(not(target_os = "espidf"))]
    connected: bool,
    /// Simulation: counts platform_connect() calls for deterministic failures.
    #[cfg(not(target_os = "espidf"))]
    sim_connect_counter: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_first: u32,
}

#[cfg(target_os = "espidf")]
impl WifiAdapter {
    /// Wrap a configured `BlockingWifi` handle built in `main` where
    /// peripheral ownership (the modem) is established.
    pub fn new(
        wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
    ) -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            wifi,
            started: false,
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            connected: false,
            sim_connect_counter: 0,
            sim_fail_first: 0,
        }
    }

    /// Test hook: make the next `n` connect attempts fail.
    pub fn sim_set_fail_first(&mut self, n: u32) {
        self.sim_fail_first = n;
        self.sim_connect_counter = 0;
    }
}

impl WifiAdapter {
    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), CommsError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid
            .push_str(ssid)
            .map_err(|()| CommsError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| CommsError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            ..Default::default()
        };
        self.wifi
            .set_configuration(&Configuration::Client(client))
            .map_err(|_| CommsError::WifiConnectFailed)?;

        if !self.started {
            self.wifi
                .start()
                .map_err(|_| CommsError::WifiConnectFailed)?;
            self.started = true;
        }

        self.wifi
            .connect()
            .map_err(|_| CommsError::WifiConnectFailed)?;
        self.wifi
            .wait_netif_up()
            .map_err(|_| CommsError::WifiConnectFailed)?;
        info!("WiFi: station up (SSID='{}')", self.ssid);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
        if self.sim_connect_counter <= self.sim_fail_first {
            return Err(CommsError::WifiConnectFailed);
        }
        self.connected = true;
        info!(
            "WiFi(sim): connected to '{}' (attempt {})",
            self.ssid, self.sim_connect_counter
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.connected
    }
}

// ───────────────────────────────────────────────────────────────
// Link
// ───────────────────────────────────────────────────────────────

impl Link for WifiAdapter {
    fn label(&self) -> &'static str {
        "wifi"
    }

    fn try_connect(&mut self) -> Result<(), CommsError> {
        if self.ssid.is_empty() {
            return Err(CommsError::NoCredentials);
        }
        if self.platform_is_connected() {
            return Ok(());
        }
        self.platform_connect()
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_ssid() {
        let mut a = WifiAdapter::new();
        assert_eq!(
            a.set_credentials("", "password123"),
            Err(CommsError::InvalidSsid)
        );
    }

    #[test]
    fn rejects_short_password() {
        let mut a = WifiAdapter::new();
        assert_eq!(
            a.set_credentials("MyNet", "short"),
            Err(CommsError::InvalidPassword)
        );
    }

    #[test]
    fn accepts_open_network() {
        let mut a = WifiAdapter::new();
        assert!(a.set_credentials("OpenTower", "").is_ok());
    }

    #[test]
    fn accepts_valid_wpa2() {
        let mut a = WifiAdapter::new();
        assert!(a.set_credentials("TowerNet", "mysecret8").is_ok());
    }

    #[test]
    fn connect_without_credentials_fails() {
        let mut a = WifiAdapter::new();
        assert_eq!(a.try_connect(), Err(CommsError::NoCredentials));
    }

    #[test]
    fn sim_connects_after_injected_failures() {
        let mut a = WifiAdapter::new();
        a.set_credentials("TowerNet", "password1").unwrap();
        a.sim_set_fail_first(2);

        assert_eq!(a.try_connect(), Err(CommsError::WifiConnectFailed));
        assert_eq!(a.try_connect(), Err(CommsError::WifiConnectFailed));
        assert!(a.try_connect().is_ok());
        assert!(a.is_connected());
    }

    #[test]
    fn connected_try_connect_is_idempotent() {
        let mut a = WifiAdapter::new();
        a.set_credentials("TowerNet", "password1").unwrap();
        a.try_connect().unwrap();
        let before = a.sim_connect_counter;
        a.try_connect().unwrap();
        assert_eq!(a.sim_connect_counter, before);
    }
}
