//! Line framing for the dashboard protocol.
//!
//! Frame format:
//! - One JSON object encoded as UTF-8
//! - Terminated by `\n` (a preceding `\r` is tolerated and stripped)
//! - Empty lines are ignored
//! - Lines longer than [`MAX_LINE_LEN`] are discarded up to the next newline

use alloc::vec::Vec as AllocVec;
use core::fmt;

use heapless::Vec;

use crate::messages::{ClientMessage, DeviceMessage};

/// Line terminator
pub const LINE_END: u8 = b'\n';

/// Maximum accepted line length in bytes, excluding the terminator
pub const MAX_LINE_LEN: usize = 512;

/// Errors that can occur while splitting the byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Line exceeded [`MAX_LINE_LEN`] and was dropped
    LineTooLong,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::LineTooLong => write!(f, "line exceeds {} bytes", MAX_LINE_LEN),
        }
    }
}

/// Errors from message encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Stream framing failed
    Frame(FrameError),
    /// Line is not a valid client message
    Malformed,
    /// Message could not be serialized
    Encode,
}

impl From<FrameError> for ProtocolError {
    fn from(err: FrameError) -> Self {
        ProtocolError::Frame(err)
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Frame(err) => write!(f, "framing error: {}", err),
            ProtocolError::Malformed => write!(f, "malformed message"),
            ProtocolError::Encode => write!(f, "message encoding failed"),
        }
    }
}

/// One complete line without its terminator
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Splits an incoming byte stream into lines
#[derive(Debug, Clone, Default)]
pub struct LineFramer {
    buffer: Line,
    discarding: bool,
}

impl LineFramer {
    /// Create a new framer
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held for the line in progress
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the framer
    ///
    /// Returns `Ok(Some(line))` when a non-empty line completes, `Ok(None)`
    /// when more bytes are needed. An overlong line yields
    /// `Err(LineTooLong)` once, when its first excess byte arrives; the rest
    /// of it is skipped silently.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, FrameError> {
        if byte == LINE_END {
            let was_discarding = self.discarding;
            self.discarding = false;
            if was_discarding {
                return Ok(None);
            }

            let mut line = core::mem::take(&mut self.buffer);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() {
                return Ok(None);
            }
            return Ok(Some(line));
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(FrameError::LineTooLong);
        }
        Ok(None)
    }

    /// Feed multiple bytes to the framer
    ///
    /// Returns the first complete line found and how many bytes were
    /// consumed. Bytes after the line are left for the next call.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Result<Option<Line>, FrameError>) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                other => return (i + 1, other),
            }
        }
        (bytes.len(), Ok(None))
    }
}

/// Decode one framed line as a client message
pub fn decode_client(line: &[u8]) -> Result<ClientMessage, ProtocolError> {
    serde_json::from_slice(line).map_err(|_| ProtocolError::Malformed)
}

/// Encode a device message as a newline-terminated JSON line
pub fn encode_line(msg: &DeviceMessage) -> Result<AllocVec<u8>, ProtocolError> {
    let mut out = serde_json::to_vec(msg).map_err(|_| ProtocolError::Encode)?;
    out.push(LINE_END);
    Ok(out)
}
