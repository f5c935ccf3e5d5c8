//! Wireless link configuration

use benchlink_hal::radio::{HOSTNAME_MAX_LEN, PASSWORD_MAX_LEN, SSID_MAX_LEN};
use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::board::BoardConfig;

/// Link parameters kept across reconnect attempts
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Network name; must be non-empty to connect
    pub ssid: String<SSID_MAX_LEN>,
    /// Credential; empty for an open network
    pub password: String<PASSWORD_MAX_LEN>,
    pub hostname: String<HOSTNAME_MAX_LEN>,
    pub connect_timeout_ms: u32,
    pub reconnect_delay_ms: u32,
    pub auto_reconnect: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            hostname: String::new(),
            connect_timeout_ms: 30_000,
            reconnect_delay_ms: 5_000,
            auto_reconnect: true,
        }
    }
}

impl LinkConfig {
    /// Defaults from the board table, no credentials
    pub fn from_board(board: &BoardConfig) -> Self {
        let mut hostname = String::new();
        push_truncated(&mut hostname, board.hostname);
        Self {
            hostname,
            connect_timeout_ms: board.connect_timeout_ms,
            reconnect_delay_ms: board.reconnect_delay_ms,
            ..Self::default()
        }
    }

    /// Replace the stored credentials
    ///
    /// Values longer than the 802.11 limits are truncated.
    pub fn set_credentials(&mut self, ssid: &str, password: &str) {
        self.ssid.clear();
        push_truncated(&mut self.ssid, ssid);
        self.password.clear();
        push_truncated(&mut self.password, password);
    }

    /// Check if a connection may be attempted
    pub fn has_ssid(&self) -> bool {
        !self.ssid.is_empty()
    }
}

/// Append as much of `s` as fits, never splitting a UTF-8 sequence
pub(crate) fn push_truncated<const N: usize>(dst: &mut String<N>, s: &str) {
    for c in s.chars() {
        if dst.push(c).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::board::PICO_W;

    #[test]
    fn test_from_board() {
        let config = LinkConfig::from_board(&PICO_W);
        assert_eq!(config.hostname.as_str(), "pico-diagnostic-rig");
        assert_eq!(config.connect_timeout_ms, 30_000);
        assert_eq!(config.reconnect_delay_ms, 5_000);
        assert!(config.auto_reconnect);
        assert!(!config.has_ssid());
    }

    #[test]
    fn test_credentials_truncated() {
        let mut config = LinkConfig::default();
        let long = "x".repeat(40);
        config.set_credentials(&long, "pw");
        assert_eq!(config.ssid.len(), SSID_MAX_LEN);
        assert_eq!(config.password.as_str(), "pw");
        assert!(config.has_ssid());
    }

    #[test]
    fn test_truncation_keeps_utf8_boundary() {
        let mut s: String<4> = String::new();
        push_truncated(&mut s, "abcé");
        assert_eq!(s.as_str(), "abc");
    }
}
