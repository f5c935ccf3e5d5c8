//! Serial transport
//!
//! Interrupt-fed receive buffering and timeout-bounded blocking transmit
//! and receive over [`benchlink_hal::UartHardware`].

pub mod bus;
pub mod error;
mod io;
pub mod ring;
pub mod transport;

pub use bus::SerialBus;
pub use error::SerialError;
pub use ring::RingBuffer;
pub use transport::{SerialTransport, DEFAULT_TIMEOUT_MS, SEND_BYTE_TIMEOUT_MS};
