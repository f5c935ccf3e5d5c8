use core::fmt;

use benchlink_hal::RadioError;

/// Link manager errors
///
/// A failed join is not an error here: it is reported as the
/// `ConnectionFailed` state and event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Malformed caller input, e.g. an empty SSID
    InvalidParam,
    /// Manager not initialized
    NotInitialized,
    /// Radio reported a failure outside of a join
    Radio(RadioError),
}

impl From<RadioError> for LinkError {
    fn from(err: RadioError) -> Self {
        LinkError::Radio(err)
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::InvalidParam => write!(f, "invalid parameter"),
            LinkError::NotInitialized => write!(f, "link not initialized"),
            LinkError::Radio(err) => write!(f, "radio error: {:?}", err),
        }
    }
}
