//! Board configuration tables
//!
//! Read-only pin assignments and connectivity defaults, resolved once when
//! a transport or link is created.

use benchlink_hal::UartConfig;

/// Hardware UART ports per board
pub const UART_PORT_COUNT: usize = 2;

/// Port used for debug output and the dashboard bridge
pub const UART_DEBUG: usize = 0;

/// Port wired to the external connector
pub const UART_EXT: usize = 1;

/// Pin assignment and default speed of one UART port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartPort {
    pub tx_pin: u8,
    pub rx_pin: u8,
    /// Default baud rate (8N1)
    pub baudrate: u32,
}

impl UartPort {
    pub const fn new(tx_pin: u8, rx_pin: u8, baudrate: u32) -> Self {
        Self {
            tx_pin,
            rx_pin,
            baudrate,
        }
    }

    /// Default 8N1 configuration at this port's baud rate
    pub const fn default_config(&self) -> UartConfig {
        UartConfig::new(self.baudrate)
    }
}

/// Static description of a supported board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    pub uart: [UartPort; UART_PORT_COUNT],
    /// Bound for serial waits that take no explicit timeout (ms)
    pub serial_timeout_ms: u32,
    /// DHCP hostname
    pub hostname: &'static str,
    /// Upper bound for one join attempt (ms)
    pub connect_timeout_ms: u32,
    /// Delay between automatic reconnect attempts (ms)
    pub reconnect_delay_ms: u32,
}

/// Raspberry Pi Pico W
pub const PICO_W: BoardConfig = BoardConfig {
    uart: [UartPort::new(0, 1, 115_200), UartPort::new(4, 5, 9_600)],
    serial_timeout_ms: 1000,
    hostname: "pico-diagnostic-rig",
    connect_timeout_ms: 30_000,
    reconnect_delay_ms: 5_000,
};

/// STM32 Nucleo-F446RE (USART2 on the ST-Link VCP, USART1 external; all on GPIOA)
pub const NUCLEO_F446RE: BoardConfig = BoardConfig {
    uart: [UartPort::new(2, 3, 115_200), UartPort::new(9, 10, 9_600)],
    serial_timeout_ms: 1000,
    hostname: "nucleo-diagnostic-rig",
    connect_timeout_ms: 30_000,
    reconnect_delay_ms: 5_000,
};

impl BoardConfig {
    /// Port assignment, if `port` exists on this board
    pub fn uart_port(&self, port: usize) -> Option<&UartPort> {
        self.uart.get(port)
    }
}
