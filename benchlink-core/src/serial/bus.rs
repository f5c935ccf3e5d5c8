//! Port registry
//!
//! Owns one transport per hardware UART and addresses them by port id, the
//! way firmware that only knows "port 0" and "port 1" wants to call them.

use benchlink_hal::{Clock, UartConfig, UartHardware};

use super::error::SerialError;
use super::transport::SerialTransport;
use crate::config::board::{BoardConfig, UART_PORT_COUNT};

/// All UART ports of a board
pub struct SerialBus<H, C, const N: usize> {
    ports: [SerialTransport<H, C, N>; UART_PORT_COUNT],
}

impl<H, C: Clone, const N: usize> SerialBus<H, C, N> {
    /// Build transports from the board table, one per hardware peripheral
    ///
    /// `hw[i]` must be the peripheral wired to `board.uart[i]`. Every port
    /// takes the board's serial timeout.
    pub fn new(board: &BoardConfig, hw: [H; UART_PORT_COUNT], clock: C) -> Self {
        let [uart0, uart1] = hw;
        let timeout_ms = board.serial_timeout_ms;
        Self {
            ports: [
                SerialTransport::new(0, board.uart[0], uart0, clock.clone())
                    .with_timeout(timeout_ms),
                SerialTransport::new(1, board.uart[1], uart1, clock).with_timeout(timeout_ms),
            ],
        }
    }
}

impl<H, C, const N: usize> SerialBus<H, C, N> {
    /// Transport for `port`
    pub fn port(&self, port: usize) -> Result<&SerialTransport<H, C, N>, SerialError> {
        self.ports.get(port).ok_or(SerialError::InvalidPort)
    }
}

impl<H: UartHardware, C: Clock, const N: usize> SerialBus<H, C, N> {
    pub fn init(&self, port: usize, config: &UartConfig) -> Result<(), SerialError> {
        self.port(port)?.init(config)
    }

    /// Initialize `port` with the board's default baud rate, 8N1
    pub fn init_default(&self, port: usize) -> Result<(), SerialError> {
        let transport = self.port(port)?;
        transport.init(&transport.pins().default_config())
    }

    pub fn deinit(&self, port: usize) -> Result<(), SerialError> {
        self.port(port)?.deinit()
    }

    pub fn transmit(&self, port: usize, data: &[u8], timeout_ms: u32) -> Result<(), SerialError> {
        self.port(port)?.transmit(data, timeout_ms)
    }

    pub fn receive(
        &self,
        port: usize,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> Result<usize, SerialError> {
        self.port(port)?.receive(buf, timeout_ms)
    }

    /// Approximate bytes ready on `port`; 0 for an unknown port
    pub fn available(&self, port: usize) -> usize {
        self.port(port).map_or(0, |t| t.available())
    }

    pub fn flush(&self, port: usize) -> Result<(), SerialError> {
        self.port(port)?.flush()
    }

    /// Dispatch a receive interrupt to `port`
    pub fn on_interrupt(&self, port: usize) {
        if let Ok(transport) = self.port(port) {
            transport.on_rx_interrupt();
        }
    }
}
