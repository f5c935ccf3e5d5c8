//! Dashboard channel
//!
//! Carries the JSON line protocol over a serial transport: device messages
//! go out as one line each, incoming bytes are framed into lines and decoded
//! as client commands.

use alloc::string::{String, ToString};
use core::fmt;

use benchlink_hal::{Clock, UartHardware};
use benchlink_protocol::{
    decode_client, encode_line, ClientMessage, DeviceMessage, LineFramer, LogLevel,
    ProtocolError, StatusReport,
};

use crate::link::LinkStats;
use crate::serial::{SerialError, SerialTransport};

/// Errors from sending on the dashboard channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DashboardError {
    Serial(SerialError),
    Protocol(ProtocolError),
}

impl From<SerialError> for DashboardError {
    fn from(err: SerialError) -> Self {
        DashboardError::Serial(err)
    }
}

impl From<ProtocolError> for DashboardError {
    fn from(err: ProtocolError) -> Self {
        DashboardError::Protocol(err)
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Serial(err) => write!(f, "serial: {}", err),
            DashboardError::Protocol(err) => write!(f, "protocol: {}", err),
        }
    }
}

/// Dashboard connection over one serial port
pub struct DashboardChannel<'t, H, C, const N: usize> {
    port: &'t SerialTransport<H, C, N>,
    framer: LineFramer,
    timeout_ms: u32,
    rejected: u32,
}

impl<'t, H: UartHardware, C: Clock, const N: usize> DashboardChannel<'t, H, C, N> {
    /// Channel over `port`, bounding sends by the port's timeout
    pub fn new(port: &'t SerialTransport<H, C, N>) -> Self {
        Self {
            port,
            framer: LineFramer::new(),
            timeout_ms: port.timeout_ms(),
            rejected: 0,
        }
    }

    /// Bound for sending one message (ms)
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Lines dropped as overlong or undecodable
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Send one message as a JSON line
    pub fn send(&self, msg: &DeviceMessage) -> Result<(), DashboardError> {
        let line = encode_line(msg)?;
        self.port.transmit(&line, self.timeout_ms)?;
        Ok(())
    }

    pub fn send_log(
        &self,
        level: LogLevel,
        category: &str,
        message: &str,
    ) -> Result<(), DashboardError> {
        self.send(&DeviceMessage::Log {
            level,
            category: String::from(category),
            message: String::from(message),
        })
    }

    pub fn send_channel_data(
        &self,
        channel: u8,
        voltage: f32,
        current: f32,
    ) -> Result<(), DashboardError> {
        self.send(&DeviceMessage::ChannelData {
            channel,
            voltage,
            current,
        })
    }

    pub fn send_status(&self, stats: &LinkStats) -> Result<(), DashboardError> {
        self.send(&DeviceMessage::Status(status_report(stats)))
    }

    /// Read whatever has arrived and return the next complete command
    ///
    /// Never waits for bytes that are not already available. Lines that are
    /// too long or do not decode are logged, counted and skipped. Bytes
    /// after a returned command stay queued for the next call.
    pub fn poll(&mut self) -> Option<ClientMessage> {
        while self.port.available() > 0 {
            let Ok(byte) = self.port.receive_byte(0) else {
                break;
            };

            match self.framer.feed(byte) {
                Ok(None) => {}
                Ok(Some(line)) => match decode_client(&line) {
                    Ok(msg) => return Some(msg),
                    Err(err) => {
                        warn!("dashboard: dropped line: {}", err);
                        self.rejected = self.rejected.saturating_add(1);
                    }
                },
                Err(err) => {
                    warn!("dashboard: {}", err);
                    self.rejected = self.rejected.saturating_add(1);
                }
            }
        }
        None
    }
}

fn status_report(stats: &LinkStats) -> StatusReport {
    StatusReport {
        connected: stats.connected,
        ssid: String::from(stats.ssid.as_str()),
        address: stats.address.map(|addr| addr.to_string()),
        rssi: stats.rssi,
        uptime_ms: stats.uptime_ms,
        attempts: stats.attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchlink_hal::mock::{MockClock, MockUart};
    use benchlink_hal::UartConfig;
    use core::net::Ipv4Addr;

    use crate::config::board::{PICO_W, UART_DEBUG};

    type TestPort<'a> = SerialTransport<&'a MockUart, &'a MockClock, 64>;

    fn port<'a>(uart: &'a MockUart, clock: &'a MockClock) -> TestPort<'a> {
        let t = SerialTransport::new(UART_DEBUG, PICO_W.uart[UART_DEBUG], uart, clock);
        t.init(&UartConfig::new(115_200)).unwrap();
        t
    }

    fn sent(uart: &MockUart) -> std::string::String {
        std::string::String::from_utf8(uart.tx_data().to_vec()).unwrap()
    }

    #[test]
    fn test_send_log_line() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let port = port(&uart, &clock);
        let dashboard = DashboardChannel::new(&port);

        dashboard
            .send_log(LogLevel::Warn, "wifi", "link lost")
            .unwrap();
        assert_eq!(
            sent(&uart),
            "{\"type\":\"log\",\"level\":\"warn\",\"category\":\"wifi\",\"message\":\"link lost\"}\n"
        );
    }

    #[test]
    fn test_send_status_from_stats() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let port = port(&uart, &clock);
        let dashboard = DashboardChannel::new(&port);

        let mut ssid = heapless::String::new();
        ssid.push_str("lab").unwrap();
        let stats = LinkStats {
            attempts: 2,
            reconnects: 1,
            connected: true,
            rssi: Some(-61),
            uptime_ms: 4200,
            ssid,
            address: Some(Ipv4Addr::new(10, 0, 0, 9)),
        };
        dashboard.send_status(&stats).unwrap();

        let out = sent(&uart);
        assert!(out.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["type"], "status");
        assert_eq!(value["address"], "10.0.0.9");
        assert_eq!(value["rssi"], -61);
        assert_eq!(value["attempts"], 2);
    }

    #[test]
    fn test_send_times_out_on_stalled_port() {
        let uart = MockUart::new();
        let clock = MockClock::with_auto_advance(5);
        let port = port(&uart, &clock);
        let dashboard = DashboardChannel::new(&port).with_timeout(20);

        uart.set_writable(false);
        assert_eq!(
            dashboard.send_channel_data(1, 3.3, 0.25),
            Err(DashboardError::Serial(SerialError::Timeout))
        );
    }

    #[test]
    fn test_send_bounded_by_port_timeout() {
        let uart = MockUart::new();
        let clock = MockClock::with_auto_advance(1);
        let port: TestPort<'_> =
            SerialTransport::new(UART_DEBUG, PICO_W.uart[UART_DEBUG], &uart, &clock)
                .with_timeout(30);
        port.init(&UartConfig::new(115_200)).unwrap();
        let dashboard = DashboardChannel::new(&port);

        uart.set_writable(false);
        let start = clock.now_ms();
        assert_eq!(
            dashboard.send_log(LogLevel::Info, "rig", "boot"),
            Err(DashboardError::Serial(SerialError::Timeout))
        );
        assert!(clock.now_ms() - start <= 35);
    }

    #[test]
    fn test_send_on_uninitialized_port() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let port: TestPort<'_> =
            SerialTransport::new(UART_DEBUG, PICO_W.uart[UART_DEBUG], &uart, &clock);
        let dashboard = DashboardChannel::new(&port);

        assert_eq!(
            dashboard.send_channel_data(0, 1.0, 1.0),
            Err(DashboardError::Serial(SerialError::NotInitialized))
        );
    }

    #[test]
    fn test_poll_decodes_commands_in_order() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let port = port(&uart, &clock);
        let mut dashboard = DashboardChannel::new(&port);

        assert!(dashboard.poll().is_none());

        uart.inject_rx(b"{\"type\":\"command\",\"command\":\"ping\"}\r\n");
        uart.inject_rx(b"{\"type\":\"command\",\"command\":\"emergency_stop\"}\n");

        let first = dashboard.poll().unwrap();
        assert_eq!(first.command(), "ping");
        let second = dashboard.poll().unwrap();
        assert!(second.is_emergency_stop());
        assert!(dashboard.poll().is_none());
    }

    #[test]
    fn test_poll_keeps_partial_line() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let port = port(&uart, &clock);
        let mut dashboard = DashboardChannel::new(&port);

        uart.inject_rx(b"{\"type\":\"command\",");
        assert!(dashboard.poll().is_none());

        uart.inject_rx(b"\"command\":\"ping\"}\n");
        assert_eq!(dashboard.poll().unwrap().command(), "ping");
    }

    #[test]
    fn test_poll_skips_bad_lines() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let port = port(&uart, &clock);
        let mut dashboard = DashboardChannel::new(&port);

        uart.inject_rx(b"not json\n{\"type\":\"command\",\"command\":\"ping\"}\n");
        assert_eq!(dashboard.poll().unwrap().command(), "ping");
        assert_eq!(dashboard.rejected(), 1);
    }

    #[test]
    fn test_poll_recovers_from_overlong_line() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let port = port(&uart, &clock);
        let mut dashboard = DashboardChannel::new(&port);

        let junk = [b'x'; 200];
        for _ in 0..3 {
            uart.inject_rx(&junk);
            assert!(dashboard.poll().is_none());
        }
        assert_eq!(dashboard.rejected(), 1);

        uart.inject_rx(b"\n{\"type\":\"command\",\"command\":\"ping\"}\n");
        assert_eq!(dashboard.poll().unwrap().command(), "ping");
        assert_eq!(dashboard.rejected(), 1);
    }
}
