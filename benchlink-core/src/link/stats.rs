//! Link statistics snapshot

use core::net::Ipv4Addr;

use benchlink_hal::radio::SSID_MAX_LEN;
use heapless::String;

/// Point-in-time copy of link counters for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    /// Join attempts since creation, manual and automatic
    pub attempts: u32,
    /// Automatic retries issued by the reconnect policy
    pub reconnects: u32,
    pub connected: bool,
    /// Signal strength (dBm) at the last poll
    pub rssi: Option<i16>,
    /// Time since the current session was established, 0 when down
    pub uptime_ms: u64,
    pub ssid: String<SSID_MAX_LEN>,
    pub address: Option<Ipv4Addr>,
}
