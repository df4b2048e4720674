//! Inbound remote commands.
//!
//! The remote-stop topic is the monitor's only inbound channel. Payloads
//! are a single ASCII byte; everything after the first byte is ignored.

/// Commands the broker can deliver to the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Latch the remote-stop hazard. No inverse command exists — clearing
    /// the latch requires a device restart.
    Stop,
}

impl RemoteCommand {
    /// Decode a raw payload. Only a leading `b'1'` means anything; all
    /// other payloads (including the boot-time `"0"` announcement echoed
    /// back by the broker) are ignored.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        match payload.first() {
            Some(b'1') => Some(Self::Stop),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_requests_stop() {
        assert_eq!(RemoteCommand::parse(b"1"), Some(RemoteCommand::Stop));
    }

    #[test]
    fn zero_is_ignored() {
        assert_eq!(RemoteCommand::parse(b"0"), None);
    }

    #[test]
    fn empty_payload_is_ignored() {
        assert_eq!(RemoteCommand::parse(b""), None);
    }

    #[test]
    fn only_first_byte_matters() {
        assert_eq!(RemoteCommand::parse(b"100"), Some(RemoteCommand::Stop));
        assert_eq!(RemoteCommand::parse(b"01"), None);
    }

    #[test]
    fn arbitrary_bytes_are_ignored() {
        assert_eq!(RemoteCommand::parse(b"stop"), None);
        assert_eq!(RemoteCommand::parse(&[0xFF, b'1']), None);
    }
}
