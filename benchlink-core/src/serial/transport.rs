//! Serial transport for one UART port
//!
//! Receive is interrupt driven: the handler drains the hardware FIFO into
//! the port's [`RingBuffer`] and the application reads from there. Transmit
//! is a bounded busy-poll on the hardware's writable flag.
//!
//! Every method takes `&self` so a transport can live in a `static` that
//! both the interrupt handler and the main loop reach. All waits are
//! measured against the injected [`Clock`] and end with a deterministic
//! status once their timeout has elapsed.

use core::fmt;

use benchlink_hal::{Clock, UartConfig, UartHardware};
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use super::error::SerialError;
use super::ring::RingBuffer;
use crate::config::board::UartPort;

/// Bound for [`SerialTransport::send_byte`] (ms)
pub const SEND_BYTE_TIMEOUT_MS: u32 = 100;

/// Bound for waits that take no explicit timeout (ms)
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

/// One UART port with interrupt-fed receive buffering
pub struct SerialTransport<H, C, const N: usize> {
    port: usize,
    pins: UartPort,
    hw: H,
    clock: C,
    rx: RingBuffer<N>,
    initialized: AtomicBool,
    /// Baud rate achieved by the hardware divider, 0 while uninitialized
    baudrate: AtomicU32,
    /// Set on the first dropped byte, cleared by the next successful push
    overflowing: AtomicBool,
    /// Bound for waits that take no explicit timeout (ms)
    timeout_ms: u32,
}

impl<H, C, const N: usize> SerialTransport<H, C, N> {
    /// Create an uninitialized transport
    ///
    /// `pins` comes from the board table; its baud rate is only a default
    /// and is not applied until [`init`](Self::init).
    pub const fn new(port: usize, pins: UartPort, hw: H, clock: C) -> Self {
        Self {
            port,
            pins,
            hw,
            clock,
            rx: RingBuffer::new(),
            initialized: AtomicBool::new(false),
            baudrate: AtomicU32::new(0),
            overflowing: AtomicBool::new(false),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Replace the [`DEFAULT_TIMEOUT_MS`] bound used by flush, debug
    /// output and the `embedded-io` adapters
    pub const fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Bound for waits that take no explicit timeout (ms)
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Hardware port identifier
    pub fn port(&self) -> usize {
        self.port
    }

    /// Board pin assignment
    pub fn pins(&self) -> &UartPort {
        &self.pins
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Baud rate actually negotiated, 0 if uninitialized
    ///
    /// May differ from the requested rate by the divider's rounding.
    pub fn baudrate(&self) -> u32 {
        self.baudrate.load(Ordering::Relaxed)
    }

    /// Bytes dropped because the receive buffer was full
    pub fn dropped(&self) -> u32 {
        self.rx.dropped()
    }

    /// Receive buffer capacity
    pub const fn rx_capacity(&self) -> usize {
        N
    }

    /// Simulated peripheral, for host tests
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    fn ensure_initialized(&self) -> Result<(), SerialError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(SerialError::NotInitialized)
        }
    }
}

impl<H: UartHardware, C: Clock, const N: usize> SerialTransport<H, C, N> {
    /// Configure the port and arm the receive interrupt
    ///
    /// Calling this on an initialized port succeeds without reconfiguring.
    pub fn init(&self, config: &UartConfig) -> Result<(), SerialError> {
        if self.is_initialized() {
            return Ok(());
        }

        // Reject bad framing before touching hardware
        let format = config.format().ok_or(SerialError::InvalidConfig)?;

        let actual = match self.hw.enable(config.baudrate) {
            Some(baud) => baud,
            None => {
                warn!("uart{}: baud {} rejected", self.port, config.baudrate);
                return Err(SerialError::InitFailed);
            }
        };
        self.hw.set_format(format);
        if self.hw.bind_pins(self.pins.tx_pin, self.pins.rx_pin).is_err() {
            warn!(
                "uart{}: cannot bind tx={} rx={}",
                self.port, self.pins.tx_pin, self.pins.rx_pin
            );
            self.hw.disable();
            return Err(SerialError::InitFailed);
        }

        self.rx.clear();
        self.overflowing.store(false, Ordering::Relaxed);
        self.baudrate.store(actual, Ordering::Relaxed);
        // Flag first: the handler ignores interrupts on an uninitialized port
        self.initialized.store(true, Ordering::Release);
        self.hw.set_rx_interrupt(true);

        info!("uart{}: initialized at {} baud", self.port, actual);
        Ok(())
    }

    /// Disarm the interrupt and release the hardware
    ///
    /// Calling this on an uninitialized port is a no-op.
    pub fn deinit(&self) -> Result<(), SerialError> {
        if !self.is_initialized() {
            return Ok(());
        }

        // Interrupt off before the buffer goes away
        self.hw.set_rx_interrupt(false);
        self.initialized.store(false, Ordering::Release);
        self.hw.disable();
        self.rx.clear();
        self.baudrate.store(0, Ordering::Relaxed);

        info!("uart{}: deinitialized", self.port);
        Ok(())
    }

    /// Receive interrupt body
    ///
    /// Moves every byte the hardware holds into the receive buffer without
    /// blocking. Bytes that do not fit are dropped.
    pub fn on_rx_interrupt(&self) {
        if !self.is_initialized() {
            return;
        }

        while self.hw.is_readable() {
            let byte = self.hw.read_byte();
            if self.rx.push(byte) {
                self.overflowing.store(false, Ordering::Relaxed);
            } else if !self.overflowing.swap(true, Ordering::Relaxed) {
                warn!("uart{}: rx buffer full, dropping", self.port);
            }
        }
    }

    /// Send every byte of `data`, waiting at most `timeout_ms` in total
    ///
    /// On timeout the remaining bytes stay unsent; bytes already handed to
    /// the hardware are not recalled.
    pub fn transmit(&self, data: &[u8], timeout_ms: u32) -> Result<(), SerialError> {
        self.ensure_initialized()?;
        if data.is_empty() {
            return Err(SerialError::InvalidParam);
        }
        self.send_bytes(data, timeout_ms).1
    }

    /// Hand bytes to the hardware until done or the deadline passes
    ///
    /// Returns how many bytes went out along with the final status.
    pub(crate) fn send_bytes(
        &self,
        data: &[u8],
        timeout_ms: u32,
    ) -> (usize, Result<(), SerialError>) {
        let start = self.clock.now_ms();
        for (sent, &byte) in data.iter().enumerate() {
            if self.wait_for(start, timeout_ms, || self.hw.is_writable()).is_err() {
                debug!("uart{}: tx timeout after {} bytes", self.port, sent);
                return (sent, Err(SerialError::Timeout));
            }
            self.hw.write_byte(byte);
        }
        (data.len(), Ok(()))
    }

    /// Fill `buf`, waiting at most `timeout_ms` for bytes not yet buffered
    ///
    /// Buffered bytes are taken first without waiting. Returns the number
    /// of bytes read; a partial read counts as success and only an empty
    /// read on timeout is an error.
    pub fn receive(&self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, SerialError> {
        self.ensure_initialized()?;
        if buf.is_empty() {
            return Err(SerialError::InvalidParam);
        }

        let start = self.clock.now_ms();
        let mut count = self.drain_buffered(buf);

        while count < buf.len() {
            let ready = self.wait_for(start, timeout_ms, || {
                !self.rx.is_empty() || self.hw.is_readable()
            });
            if ready.is_err() {
                break;
            }

            buf[count] = match self.take_byte() {
                Some(byte) => byte,
                None => continue,
            };
            count += 1;
            count += self.drain_buffered(&mut buf[count..]);
        }

        if count == 0 {
            debug!("uart{}: rx timeout", self.port);
            return Err(SerialError::Timeout);
        }
        Ok(count)
    }

    /// Bytes ready to read, approximately
    ///
    /// The buffered count plus one if the hardware FIFO holds anything the
    /// interrupt has not drained yet. The FIFO may hold more than one byte,
    /// so this is a lower bound, not an exact count.
    pub fn available(&self) -> usize {
        if !self.is_initialized() {
            return 0;
        }
        self.rx.available() + usize::from(self.hw.is_readable())
    }

    /// Wait for the transmitter to go idle, then discard all received data
    ///
    /// Receive data is discarded even if the transmitter does not go idle
    /// within the port's [timeout](Self::timeout_ms), in which case
    /// `Timeout` is returned.
    pub fn flush(&self) -> Result<(), SerialError> {
        self.ensure_initialized()?;

        let idle = self.wait_tx_idle(self.timeout_ms);

        self.hw.set_rx_interrupt(false);
        while self.rx.pop().is_some() {}
        while self.hw.is_readable() {
            let _ = self.hw.read_byte();
        }
        self.hw.set_rx_interrupt(true);

        idle
    }

    /// Send one byte with a short fixed timeout
    pub fn send_byte(&self, byte: u8) -> Result<(), SerialError> {
        self.transmit(&[byte], SEND_BYTE_TIMEOUT_MS)
    }

    /// Receive one byte
    pub fn receive_byte(&self, timeout_ms: u32) -> Result<u8, SerialError> {
        let mut byte = [0u8; 1];
        self.receive(&mut byte, timeout_ms)?;
        Ok(byte[0])
    }

    /// Formatted debug output
    ///
    /// Best effort: silently does nothing on an uninitialized port and
    /// gives up on a line once the port's [timeout](Self::timeout_ms)
    /// elapses. Lets
    /// `write!(transport, ...)` work on a shared reference.
    pub fn write_fmt(&self, args: fmt::Arguments<'_>) -> fmt::Result {
        if !self.is_initialized() {
            return Ok(());
        }
        let mut writer = DebugWriter {
            transport: self,
            start: self.clock.now_ms(),
        };
        fmt::Write::write_fmt(&mut writer, args)
    }

    /// Block until every queued byte has left the shift register
    pub(crate) fn wait_tx_idle(&self, timeout_ms: u32) -> Result<(), SerialError> {
        let start = self.clock.now_ms();
        self.wait_for(start, timeout_ms, || self.hw.is_tx_idle())
    }

    pub(crate) fn is_writable(&self) -> bool {
        self.is_initialized() && self.hw.is_writable()
    }

    /// Next received byte, from the buffer or straight from the FIFO
    ///
    /// The FIFO is checked and read with the receive interrupt masked, so
    /// the handler cannot empty it between the two.
    fn take_byte(&self) -> Option<u8> {
        if let Some(byte) = self.rx.pop() {
            return Some(byte);
        }

        self.hw.set_rx_interrupt(false);
        // The handler may have run just before the mask went on
        let byte = match self.rx.pop() {
            Some(byte) => Some(byte),
            None if self.hw.is_readable() => Some(self.hw.read_byte()),
            None => None,
        };
        self.hw.set_rx_interrupt(true);
        byte
    }

    fn drain_buffered(&self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        while count < buf.len() {
            match self.rx.pop() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Poll `ready` until it holds or more than `timeout_ms` has passed since `start`
    ///
    /// The deadline is checked before readiness: once the bound has passed
    /// the wait fails even if the hardware is ready.
    fn wait_for(
        &self,
        start: u64,
        timeout_ms: u32,
        mut ready: impl FnMut() -> bool,
    ) -> Result<(), SerialError> {
        loop {
            if self.clock.elapsed_ms(start) > u64::from(timeout_ms) {
                return Err(SerialError::Timeout);
            }
            if ready() {
                return Ok(());
            }
            core::hint::spin_loop();
        }
    }
}

/// `fmt::Write` adapter sharing one deadline across a formatted line
struct DebugWriter<'a, H, C, const N: usize> {
    transport: &'a SerialTransport<H, C, N>,
    start: u64,
}

impl<H: UartHardware, C: Clock, const N: usize> fmt::Write for DebugWriter<'_, H, C, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let t = self.transport;
        for &byte in s.as_bytes() {
            if t
                .wait_for(self.start, t.timeout_ms, || t.hw.is_writable())
                .is_err()
            {
                return Err(fmt::Error);
            }
            t.hw.write_byte(byte);
        }
        Ok(())
    }
}
