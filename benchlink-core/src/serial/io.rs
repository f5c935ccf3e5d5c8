//! `embedded-io` adapters
//!
//! Implemented on `&SerialTransport` so a transport in a `static` can be
//! handed to generic byte-stream code.

use benchlink_hal::{Clock, UartHardware};
use embedded_io::{ErrorType, Read, ReadReady, Write, WriteReady};

use super::error::SerialError;
use super::transport::SerialTransport;

impl<H, C, const N: usize> ErrorType for &SerialTransport<H, C, N> {
    type Error = SerialError;
}

impl<H: UartHardware, C: Clock, const N: usize> Read for &SerialTransport<H, C, N> {
    /// Waits up to the port's timeout for at least one byte
    ///
    /// Nothing arriving in that time is a `Timeout` error.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.receive(buf, self.timeout_ms())
    }
}

impl<H: UartHardware, C: Clock, const N: usize> ReadReady for &SerialTransport<H, C, N> {
    fn read_ready(&mut self) -> Result<bool, SerialError> {
        if !self.is_initialized() {
            return Err(SerialError::NotInitialized);
        }
        Ok(self.available() > 0)
    }
}

impl<H: UartHardware, C: Clock, const N: usize> Write for &SerialTransport<H, C, N> {
    /// Sends as much of `buf` as the port's timeout allows
    ///
    /// A timeout after some bytes went out is a short write; only a timeout
    /// before the first byte is an error.
    fn write(&mut self, buf: &[u8]) -> Result<usize, SerialError> {
        if !self.is_initialized() {
            return Err(SerialError::NotInitialized);
        }
        if buf.is_empty() {
            return Ok(0);
        }
        match self.send_bytes(buf, self.timeout_ms()) {
            (0, Err(err)) => Err(err),
            (sent, _) => Ok(sent),
        }
    }

    /// Waits for the transmitter only; unlike
    /// [`SerialTransport::flush`] nothing received is discarded.
    fn flush(&mut self) -> Result<(), SerialError> {
        if !self.is_initialized() {
            return Err(SerialError::NotInitialized);
        }
        self.wait_tx_idle(self.timeout_ms())
    }
}

impl<H: UartHardware, C: Clock, const N: usize> WriteReady for &SerialTransport<H, C, N> {
    fn write_ready(&mut self) -> Result<bool, SerialError> {
        if !self.is_initialized() {
            return Err(SerialError::NotInitialized);
        }
        Ok(self.is_writable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchlink_hal::mock::{MockClock, MockUart};
    use benchlink_hal::UartConfig;

    use crate::config::board::{PICO_W, UART_EXT};

    #[test]
    fn test_write_all_and_read() {
        let uart = MockUart::new();
        let clock = MockClock::with_auto_advance(1);
        let transport: SerialTransport<_, _, 32> =
            SerialTransport::new(UART_EXT, PICO_W.uart[UART_EXT], &uart, &clock);
        transport.init(&UartConfig::new(9_600)).unwrap();

        let mut port = &transport;
        port.write_all(b"PING\n").unwrap();
        Write::flush(&mut port).unwrap();
        assert_eq!(uart.tx_data().as_slice(), b"PING\n");

        assert!(!port.read_ready().unwrap());
        uart.inject_rx(b"PONG");
        transport.on_rx_interrupt();
        assert!(port.read_ready().unwrap());

        let mut buf = [0u8; 8];
        let n = port.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"PONG");
    }

    #[test]
    fn test_flush_keeps_received_bytes() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let transport: SerialTransport<_, _, 8> =
            SerialTransport::new(UART_EXT, PICO_W.uart[UART_EXT], &uart, &clock);
        transport.init(&UartConfig::default()).unwrap();

        uart.inject_rx(b"keep");
        transport.on_rx_interrupt();

        let mut port = &transport;
        Write::flush(&mut port).unwrap();
        assert_eq!(transport.available(), 4);
    }

    #[test]
    fn test_uninitialized_reports_not_ready() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let transport: SerialTransport<_, _, 8> =
            SerialTransport::new(UART_EXT, PICO_W.uart[UART_EXT], &uart, &clock);

        let mut port = &transport;
        assert_eq!(port.write_ready(), Err(SerialError::NotInitialized));
        assert_eq!(port.write(b"x"), Err(SerialError::NotInitialized));
        assert_eq!(port.write(b""), Err(SerialError::NotInitialized));
    }

    #[test]
    fn test_stalled_read_times_out() {
        let uart = MockUart::new();
        let clock = MockClock::with_auto_advance(1);
        let transport: SerialTransport<_, _, 8> =
            SerialTransport::new(UART_EXT, PICO_W.uart[UART_EXT], &uart, &clock)
                .with_timeout(30);
        transport.init(&UartConfig::default()).unwrap();

        let mut port = &transport;
        let mut buf = [0u8; 4];
        assert_eq!(port.read(&mut buf), Err(SerialError::Timeout));
        assert_eq!(port.read(&mut []), Ok(0));
    }

    #[test]
    fn test_write_reports_short_write() {
        let uart = MockUart::new();
        let clock = MockClock::new();
        let transport: SerialTransport<_, _, 8> =
            SerialTransport::new(UART_EXT, PICO_W.uart[UART_EXT], &uart, &clock)
                .with_timeout(25);
        transport.init(&UartConfig::default()).unwrap();

        let mut port = &transport;
        assert_eq!(port.write(b"abc"), Ok(3));

        // Three more bytes fit in the FIFO, then it stays full
        uart.clear_tx();
        uart.set_tx_space(3);
        clock.set_step(1);
        assert_eq!(port.write(b"abcdef"), Ok(3));
        assert_eq!(uart.tx_data().as_slice(), b"abc");

        // Nothing goes out at all: an error, not Ok(0)
        assert_eq!(port.write(b"x"), Err(SerialError::Timeout));
    }
}
