//! Wireless station abstraction
//!
//! Models the subset of a Wi-Fi chip driver the link manager needs: a
//! blocking join bounded by a timeout, teardown, link-status polling,
//! signal strength and a one-shot network scan.

use core::net::Ipv4Addr;

use heapless::{String, Vec};

/// Maximum SSID length in bytes (802.11)
pub const SSID_MAX_LEN: usize = 32;

/// Maximum WPA2 passphrase length in bytes
pub const PASSWORD_MAX_LEN: usize = 64;

/// Maximum hostname length used for DHCP
pub const HOSTNAME_MAX_LEN: usize = 32;

/// Maximum networks reported by one scan
pub const MAX_SCAN_RESULTS: usize = 16;

/// Authentication used when joining
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AuthMode {
    /// Open network, no credential
    Open,
    /// WPA2 personal (AES/CCMP)
    Wpa2AesPsk,
}

impl AuthMode {
    /// Pick the auth mode implied by a credential
    ///
    /// An empty password means an open network.
    pub fn for_password(password: &str) -> Self {
        if password.is_empty() {
            AuthMode::Open
        } else {
            AuthMode::Wpa2AesPsk
        }
    }
}

/// Link status as reported by the radio
///
/// Mirrors the station states exposed by CYW43-style drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Not associated
    Down,
    /// Association in progress
    Joining,
    /// Associated, no address yet
    NoIp,
    /// Associated with an address
    Up,
    /// Association failed
    Fail,
    /// Network not found
    NoNetwork,
    /// Credential rejected
    BadAuth,
}

impl LinkStatus {
    /// Check if the link carries traffic
    pub fn is_up(&self) -> bool {
        matches!(self, LinkStatus::Up)
    }
}

/// Reasons a join can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JoinError {
    /// No answer within the connect timeout
    Timeout,
    /// Access point not found
    NoNetwork,
    /// Credential rejected
    BadAuth,
    /// Any other driver failure
    Failed,
}

/// Errors from non-join radio operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// Radio not powered or firmware not loaded
    NotReady,
    /// Another operation is in progress
    Busy,
    /// Driver reported a failure
    Failed,
}

/// One network seen during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanResult {
    /// Network name
    pub ssid: String<SSID_MAX_LEN>,
    /// Access point MAC address
    pub bssid: [u8; 6],
    /// Received signal strength (dBm)
    pub rssi: i16,
    /// 2.4 GHz channel number
    pub channel: u8,
    /// Advertised security
    pub auth: AuthMode,
}

/// Wireless station interface
pub trait Radio {
    /// Join a network, blocking for at most `timeout_ms`
    ///
    /// On success returns the address assigned to the station.
    fn join(
        &mut self,
        ssid: &str,
        password: &str,
        auth: AuthMode,
        timeout_ms: u32,
    ) -> Result<Ipv4Addr, JoinError>;

    /// Tear down the current association
    fn leave(&mut self);

    /// Poll the current link status
    fn link_status(&mut self) -> LinkStatus;

    /// Current signal strength in dBm, if associated
    fn rssi(&mut self) -> Option<i16>;

    /// Set the DHCP hostname
    fn set_hostname(&mut self, hostname: &str);

    /// Enumerate visible networks
    ///
    /// Blocks until the scan completes. Networks beyond the capacity of
    /// `results` are discarded by the implementation.
    fn scan(&mut self, results: &mut Vec<ScanResult, MAX_SCAN_RESULTS>) -> Result<(), RadioError>;
}

impl<R: Radio + ?Sized> Radio for &mut R {
    fn join(
        &mut self,
        ssid: &str,
        password: &str,
        auth: AuthMode,
        timeout_ms: u32,
    ) -> Result<Ipv4Addr, JoinError> {
        (**self).join(ssid, password, auth, timeout_ms)
    }

    fn leave(&mut self) {
        (**self).leave()
    }

    fn link_status(&mut self) -> LinkStatus {
        (**self).link_status()
    }

    fn rssi(&mut self) -> Option<i16> {
        (**self).rssi()
    }

    fn set_hostname(&mut self, hostname: &str) {
        (**self).set_hostname(hostname)
    }

    fn scan(&mut self, results: &mut Vec<ScanResult, MAX_SCAN_RESULTS>) -> Result<(), RadioError> {
        (**self).scan(results)
    }
}
