use core::fmt;

/// Serial transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Malformed caller input (empty buffer or zero-length request)
    InvalidParam,
    /// Port identifier out of range
    InvalidPort,
    /// Unsupported data bits, stop bits or parity
    InvalidConfig,
    /// Hardware rejected the configuration
    InitFailed,
    /// Operation on a port that has not been initialized
    NotInitialized,
    /// Bounded wait exceeded; progress made before the deadline stands
    Timeout,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::InvalidParam => write!(f, "invalid parameter"),
            SerialError::InvalidPort => write!(f, "invalid port"),
            SerialError::InvalidConfig => write!(f, "unsupported frame format"),
            SerialError::InitFailed => write!(f, "hardware initialization failed"),
            SerialError::NotInitialized => write!(f, "port not initialized"),
            SerialError::Timeout => write!(f, "timed out"),
        }
    }
}

impl embedded_io::Error for SerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            SerialError::InvalidParam | SerialError::InvalidPort => {
                embedded_io::ErrorKind::InvalidInput
            }
            SerialError::InvalidConfig => embedded_io::ErrorKind::Unsupported,
            SerialError::InitFailed | SerialError::NotInitialized => {
                embedded_io::ErrorKind::NotConnected
            }
            SerialError::Timeout => embedded_io::ErrorKind::TimedOut,
        }
    }
}
