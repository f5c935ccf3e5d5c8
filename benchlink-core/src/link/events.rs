//! Events published on link state transitions

use core::net::Ipv4Addr;

use benchlink_hal::JoinError;

/// Why the link ended up disconnected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisconnectReason {
    /// Never connected, or the caller asked to leave
    #[default]
    Requested,
    /// Connected session dropped unexpectedly
    LinkLost,
}

/// Notification sent to the registered observer on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// Join started
    Connecting,
    /// Join succeeded with this address
    Connected(Ipv4Addr),
    /// Teardown started
    Disconnecting,
    /// Association gone
    Disconnected(DisconnectReason),
    /// Join failed
    ConnectionFailed(JoinError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinkEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            LinkEvent::Connecting => defmt::write!(f, "Connecting"),
            LinkEvent::Connected(addr) => {
                let [a, b, c, d] = addr.octets();
                defmt::write!(f, "Connected({}.{}.{}.{})", a, b, c, d)
            }
            LinkEvent::Disconnecting => defmt::write!(f, "Disconnecting"),
            LinkEvent::Disconnected(reason) => defmt::write!(f, "Disconnected({})", reason),
            LinkEvent::ConnectionFailed(err) => defmt::write!(f, "ConnectionFailed({})", err),
        }
    }
}
