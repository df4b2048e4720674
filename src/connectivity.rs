//! Link connection supervision.
//!
//! Both links the monitor depends on (WiFi station, MQTT broker) share the
//! same recovery behaviour: block, retry on a fixed delay, never give up.
//! [`ConnectionSupervisor`] models that as an explicit state machine
//!
//! ```text
//!  DISCONNECTED ──▶ CONNECTING ──[try_connect ok]──▶ CONNECTED
//!        ▲              │ ▲                              │
//!        │              └─┘ fixed delay per attempt      │
//!        └──────────────[link lost, observed by poll]────┘
//! ```
//!
//! driven by a [`RetryPolicy`]. Production policies are unbounded (an
//! unattended device has nobody to notify of permanent failure); tests use
//! a bounded policy and an injected delay so no real time passes.

use log::{info, warn};

use crate::error::CommsError;

/// Connection state of one supervised link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Retry behaviour for one link. No backoff — the interval is fixed.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Delay between connect attempts (milliseconds).
    pub retry_delay_ms: u32,
    /// Give up after this many attempts; `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// The production policy: retry forever on a fixed delay.
    pub const fn unbounded(retry_delay_ms: u32) -> Self {
        Self {
            retry_delay_ms,
            max_attempts: None,
        }
    }

    /// Bounded policy for tests and probes.
    pub const fn bounded(retry_delay_ms: u32, max_attempts: u32) -> Self {
        Self {
            retry_delay_ms,
            max_attempts: Some(max_attempts),
        }
    }
}

/// One connectable link (WiFi adapter, broker adapter).
pub trait Link {
    /// Short name for diagnostics ("wifi", "broker").
    fn label(&self) -> &'static str;

    /// Attempt to bring the link up. Must be cheap to call repeatedly.
    fn try_connect(&mut self) -> Result<(), CommsError>;

    /// Whether the link is currently up.
    fn is_connected(&self) -> bool;
}

/// Per-link connection state machine.
pub struct ConnectionSupervisor {
    state: LinkState,
    policy: RetryPolicy,
}

impl ConnectionSupervisor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            state: LinkState::Disconnected,
            policy,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Re-check a link believed connected; drop to `Disconnected` if the
    /// session died underneath us.
    pub fn refresh(&mut self, link: &impl Link) {
        if self.state == LinkState::Connected && !link.is_connected() {
            warn!("{}: connection lost", link.label());
            self.state = LinkState::Disconnected;
        }
    }

    /// Drive the link to `Connected`, blocking through `delay` between
    /// attempts. With an unbounded policy this only returns `Ok`; a bounded
    /// policy returns [`CommsError::RetriesExhausted`] once spent.
    pub fn ensure_connected(
        &mut self,
        link: &mut impl Link,
        mut delay: impl FnMut(u32),
    ) -> Result<(), CommsError> {
        self.refresh(link);
        if self.state == LinkState::Connected {
            return Ok(());
        }

        info!("{}: connecting...", link.label());
        self.state = LinkState::Connecting;
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match link.try_connect() {
                Ok(()) => {
                    info!("{}: connected (attempt {attempts})", link.label());
                    self.state = LinkState::Connected;
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "{}: connect failed ({e}), retrying in {} ms",
                        link.label(),
                        self.policy.retry_delay_ms
                    );
                    if let Some(max) = self.policy.max_attempts {
                        if attempts >= max {
                            self.state = LinkState::Disconnected;
                            return Err(CommsError::RetriesExhausted);
                        }
                    }
                    delay(self.policy.retry_delay_ms);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Link that fails a set number of attempts before succeeding.
    struct FlakyLink {
        fail_first: u32,
        attempts: u32,
        up: bool,
    }

    impl FlakyLink {
        fn new(fail_first: u32) -> Self {
            Self {
                fail_first,
                attempts: 0,
                up: false,
            }
        }
    }

    impl Link for FlakyLink {
        fn label(&self) -> &'static str {
            "flaky"
        }

        fn try_connect(&mut self) -> Result<(), CommsError> {
            self.attempts += 1;
            if self.attempts <= self.fail_first {
                Err(CommsError::BrokerConnectFailed)
            } else {
                self.up = true;
                Ok(())
            }
        }

        fn is_connected(&self) -> bool {
            self.up
        }
    }

    #[test]
    fn connects_first_try_without_delay() {
        let mut link = FlakyLink::new(0);
        let mut sup = ConnectionSupervisor::new(RetryPolicy::unbounded(5000));
        let mut delays = 0;
        sup.ensure_connected(&mut link, |_| delays += 1).unwrap();
        assert_eq!(sup.state(), LinkState::Connected);
        assert_eq!(delays, 0);
    }

    #[test]
    fn retries_with_fixed_delay_until_success() {
        let mut link = FlakyLink::new(3);
        let mut sup = ConnectionSupervisor::new(RetryPolicy::unbounded(5000));
        let mut delays = Vec::new();
        sup.ensure_connected(&mut link, |ms| delays.push(ms)).unwrap();
        assert_eq!(sup.state(), LinkState::Connected);
        // One delay per failed attempt, all at the fixed interval.
        assert_eq!(delays, vec![5000, 5000, 5000]);
    }

    #[test]
    fn bounded_policy_exhausts() {
        let mut link = FlakyLink::new(10);
        let mut sup = ConnectionSupervisor::new(RetryPolicy::bounded(1, 4));
        let err = sup
            .ensure_connected(&mut link, |_| {})
            .unwrap_err();
        assert_eq!(err, CommsError::RetriesExhausted);
        assert_eq!(sup.state(), LinkState::Disconnected);
        assert_eq!(link.attempts, 4);
    }

    #[test]
    fn already_connected_is_a_no_op() {
        let mut link = FlakyLink::new(0);
        let mut sup = ConnectionSupervisor::new(RetryPolicy::unbounded(5000));
        sup.ensure_connected(&mut link, |_| {}).unwrap();
        let attempts_before = link.attempts;
        sup.ensure_connected(&mut link, |_| {}).unwrap();
        assert_eq!(link.attempts, attempts_before);
    }

    #[test]
    fn refresh_detects_lost_link() {
        let mut link = FlakyLink::new(0);
        let mut sup = ConnectionSupervisor::new(RetryPolicy::unbounded(5000));
        sup.ensure_connected(&mut link, |_| {}).unwrap();

        link.up = false;
        sup.refresh(&link);
        assert_eq!(sup.state(), LinkState::Disconnected);

        // ensure_connected reconnects after the drop.
        sup.ensure_connected(&mut link, |_| {}).unwrap();
        assert_eq!(sup.state(), LinkState::Connected);
    }
}
