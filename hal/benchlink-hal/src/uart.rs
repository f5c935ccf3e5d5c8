//! UART serial communication abstractions
//!
//! The transport in `benchlink-core` busy-polls readiness flags, so the
//! hardware surface is register-shaped rather than buffer-shaped: one byte
//! in, one byte out, and a handful of status bits.
//!
//! All methods take `&self`. The receive interrupt handler and the main loop
//! both reach the same peripheral, and real implementations are thin
//! wrappers around memory-mapped registers.

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    /// Map a numeric bit count to a supported setting
    pub fn from_count(bits: u8) -> Option<Self> {
        match bits {
            5 => Some(DataBits::Five),
            6 => Some(DataBits::Six),
            7 => Some(DataBits::Seven),
            8 => Some(DataBits::Eight),
            _ => None,
        }
    }

    /// Number of data bits
    pub fn count(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    /// Map a numeric stop bit count to a supported setting
    pub fn from_count(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(StopBits::One),
            2 => Some(StopBits::Two),
            _ => None,
        }
    }
}

/// Validated character framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameFormat {
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self {
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// UART configuration as requested by the application
///
/// Bit counts are kept numeric so that unsupported values coming from a
/// caller can be rejected with a proper error instead of being
/// unrepresentable. Use [`UartConfig::format`] to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Data bits per character (5-8)
    pub data_bits: u8,
    /// Stop bits (1 or 2)
    pub stop_bits: u8,
    /// Parity mode
    pub parity: Parity,
}

impl UartConfig {
    /// 8N1 at the given baud rate
    pub const fn new(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: 8,
            stop_bits: 1,
            parity: Parity::None,
        }
    }

    /// Validate the framing fields
    ///
    /// Returns `None` if any of data bits or stop bits is outside the
    /// supported set.
    pub fn format(&self) -> Option<FrameFormat> {
        Some(FrameFormat {
            data_bits: DataBits::from_count(self.data_bits)?,
            parity: self.parity,
            stop_bits: StopBits::from_count(self.stop_bits)?,
        })
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::new(115_200)
    }
}

/// Pin function binding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number does not exist on this chip
    InvalidPin,
    /// Pin cannot be muxed to this UART
    WrongFunction,
}

/// Register-level access to one UART peripheral
pub trait UartHardware {
    /// Enable the peripheral at the requested baud rate
    ///
    /// Returns the baud rate actually achieved by the clock divider, or
    /// `None` if the rate cannot be produced.
    fn enable(&self, baudrate: u32) -> Option<u32>;

    /// Program the character framing
    fn set_format(&self, format: FrameFormat);

    /// Route the given GPIOs to this UART
    fn bind_pins(&self, tx_pin: u8, rx_pin: u8) -> Result<(), PinError>;

    /// Enable or disable the receive interrupt
    fn set_rx_interrupt(&self, enabled: bool);

    /// Disable the peripheral
    fn disable(&self);

    /// Transmit FIFO can accept another byte
    fn is_writable(&self) -> bool;

    /// Push one byte into the transmit FIFO
    ///
    /// Only valid after [`is_writable`](Self::is_writable) returned true.
    fn write_byte(&self, byte: u8);

    /// Receive FIFO holds at least one byte
    fn is_readable(&self) -> bool;

    /// Pop one byte from the receive FIFO
    ///
    /// Only valid after [`is_readable`](Self::is_readable) returned true.
    fn read_byte(&self) -> u8;

    /// Transmitter has shifted out every queued byte
    fn is_tx_idle(&self) -> bool;
}

impl<T: UartHardware + ?Sized> UartHardware for &T {
    fn enable(&self, baudrate: u32) -> Option<u32> {
        (**self).enable(baudrate)
    }

    fn set_format(&self, format: FrameFormat) {
        (**self).set_format(format)
    }

    fn bind_pins(&self, tx_pin: u8, rx_pin: u8) -> Result<(), PinError> {
        (**self).bind_pins(tx_pin, rx_pin)
    }

    fn set_rx_interrupt(&self, enabled: bool) {
        (**self).set_rx_interrupt(enabled)
    }

    fn disable(&self) {
        (**self).disable()
    }

    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }

    fn write_byte(&self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn is_readable(&self) -> bool {
        (**self).is_readable()
    }

    fn read_byte(&self) -> u8 {
        (**self).read_byte()
    }

    fn is_tx_idle(&self) -> bool {
        (**self).is_tx_idle()
    }
}
