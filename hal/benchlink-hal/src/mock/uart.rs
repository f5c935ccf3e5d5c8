use core::cell::RefCell;

use heapless::{Deque, Vec};

use crate::uart::{FrameFormat, PinError, UartHardware};

/// Receive FIFO depth of the simulated peripheral
const RX_FIFO_LEN: usize = 256;

/// Transmit log capacity
const TX_LOG_LEN: usize = 1024;

#[derive(Debug)]
struct State {
    enabled: bool,
    baudrate: u32,
    max_baudrate: u32,
    format: Option<FrameFormat>,
    pins: Option<(u8, u8)>,
    reject_pins: bool,
    rx_irq: bool,
    writable: bool,
    /// Writes left before the transmit FIFO reports full
    tx_space: Option<usize>,
    tx_idle: bool,
    rx_fifo: Deque<u8, RX_FIFO_LEN>,
    tx_log: Vec<u8, TX_LOG_LEN>,
    enable_calls: u32,
    readable_polls: u32,
    writable_polls: u32,
}

/// Simulated UART peripheral
///
/// Starts ready: every byte is accepted instantly and the transmitter is
/// idle. Tests script stalls with [`set_writable`](Self::set_writable) and
/// [`set_tx_idle`](Self::set_tx_idle), and feed the hardware receive FIFO
/// with [`inject_rx`](Self::inject_rx).
///
/// ```
/// use benchlink_hal::mock::MockUart;
/// use benchlink_hal::UartHardware;
///
/// let uart = MockUart::new();
/// uart.inject_rx(b"OK");
/// assert!(uart.is_readable());
/// assert_eq!(uart.read_byte(), b'O');
/// ```
#[derive(Debug)]
pub struct MockUart {
    state: RefCell<State>,
}

impl MockUart {
    /// Create an always-ready UART
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                enabled: false,
                baudrate: 0,
                max_baudrate: 921_600,
                format: None,
                pins: None,
                reject_pins: false,
                rx_irq: false,
                writable: true,
                tx_space: None,
                tx_idle: true,
                rx_fifo: Deque::new(),
                tx_log: Vec::new(),
                enable_calls: 0,
                readable_polls: 0,
                writable_polls: 0,
            }),
        }
    }

    /// Reject any baud rate above `max`
    pub fn set_max_baudrate(&self, max: u32) {
        self.state.borrow_mut().max_baudrate = max;
    }

    /// Make pin binding fail
    pub fn set_reject_pins(&self, reject: bool) {
        self.state.borrow_mut().reject_pins = reject;
    }

    /// Script transmit FIFO readiness
    pub fn set_writable(&self, writable: bool) {
        self.state.borrow_mut().writable = writable;
    }

    /// Accept `bytes` more writes, then report the transmit FIFO full
    pub fn set_tx_space(&self, bytes: usize) {
        self.state.borrow_mut().tx_space = Some(bytes);
    }

    /// Script transmitter idle flag
    pub fn set_tx_idle(&self, idle: bool) {
        self.state.borrow_mut().tx_idle = idle;
    }

    /// Place bytes in the hardware receive FIFO
    ///
    /// Bytes beyond the FIFO depth are lost, as on real hardware.
    pub fn inject_rx(&self, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        for &byte in data {
            if state.rx_fifo.push_back(byte).is_err() {
                break;
            }
        }
    }

    /// Bytes written so far
    pub fn tx_data(&self) -> Vec<u8, TX_LOG_LEN> {
        self.state.borrow().tx_log.clone()
    }

    /// Forget logged transmit bytes
    pub fn clear_tx(&self) {
        self.state.borrow_mut().tx_log.clear();
    }

    /// Bytes still waiting in the hardware receive FIFO
    pub fn rx_pending(&self) -> usize {
        self.state.borrow().rx_fifo.len()
    }

    /// Peripheral is enabled
    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    /// Baud rate last programmed
    pub fn baudrate(&self) -> u32 {
        self.state.borrow().baudrate
    }

    /// Frame format last programmed
    pub fn format(&self) -> Option<FrameFormat> {
        self.state.borrow().format
    }

    /// Pins last bound as (tx, rx)
    pub fn pins(&self) -> Option<(u8, u8)> {
        self.state.borrow().pins
    }

    /// Receive interrupt armed
    pub fn rx_interrupt_enabled(&self) -> bool {
        self.state.borrow().rx_irq
    }

    /// Number of successful `enable` calls
    pub fn enable_calls(&self) -> u32 {
        self.state.borrow().enable_calls
    }

    /// Number of `is_readable` polls
    pub fn readable_polls(&self) -> u32 {
        self.state.borrow().readable_polls
    }

    /// Number of `is_writable` polls
    pub fn writable_polls(&self) -> u32 {
        self.state.borrow().writable_polls
    }
}

impl Default for MockUart {
    fn default() -> Self {
        Self::new()
    }
}

impl UartHardware for MockUart {
    fn enable(&self, baudrate: u32) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        if baudrate == 0 || baudrate > state.max_baudrate {
            return None;
        }
        state.enabled = true;
        state.baudrate = baudrate;
        state.enable_calls += 1;
        Some(baudrate)
    }

    fn set_format(&self, format: FrameFormat) {
        self.state.borrow_mut().format = Some(format);
    }

    fn bind_pins(&self, tx_pin: u8, rx_pin: u8) -> Result<(), PinError> {
        let mut state = self.state.borrow_mut();
        if state.reject_pins {
            return Err(PinError::WrongFunction);
        }
        state.pins = Some((tx_pin, rx_pin));
        Ok(())
    }

    fn set_rx_interrupt(&self, enabled: bool) {
        self.state.borrow_mut().rx_irq = enabled;
    }

    fn disable(&self) {
        let mut state = self.state.borrow_mut();
        state.enabled = false;
        state.rx_irq = false;
        state.pins = None;
    }

    fn is_writable(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.writable_polls += 1;
        state.writable && state.tx_space != Some(0)
    }

    fn write_byte(&self, byte: u8) {
        let mut state = self.state.borrow_mut();
        if let Some(space) = state.tx_space.as_mut() {
            *space = space.saturating_sub(1);
        }
        let _ = state.tx_log.push(byte);
    }

    fn is_readable(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.readable_polls += 1;
        !state.rx_fifo.is_empty()
    }

    fn read_byte(&self) -> u8 {
        self.state.borrow_mut().rx_fifo.pop_front().unwrap_or(0)
    }

    fn is_tx_idle(&self) -> bool {
        self.state.borrow().tx_idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_excessive_baud() {
        let uart = MockUart::new();
        uart.set_max_baudrate(115_200);
        assert_eq!(uart.enable(230_400), None);
        assert!(!uart.is_enabled());
        assert_eq!(uart.enable(9_600), Some(9_600));
        assert!(uart.is_enabled());
    }

    #[test]
    fn test_rx_fifo_order() {
        let uart = MockUart::new();
        uart.inject_rx(b"abc");
        assert_eq!(uart.read_byte(), b'a');
        assert_eq!(uart.read_byte(), b'b');
        assert_eq!(uart.read_byte(), b'c');
        assert!(!uart.is_readable());
    }

    #[test]
    fn test_tx_log() {
        let uart = MockUart::new();
        uart.write_byte(b'A');
        uart.write_byte(b'T');
        assert_eq!(uart.tx_data().as_slice(), b"AT");
        uart.clear_tx();
        assert!(uart.tx_data().is_empty());
    }

    #[test]
    fn test_tx_space_fills_up() {
        let uart = MockUart::new();
        uart.set_tx_space(2);
        assert!(uart.is_writable());
        uart.write_byte(1);
        uart.write_byte(2);
        assert!(!uart.is_writable());
    }
}
