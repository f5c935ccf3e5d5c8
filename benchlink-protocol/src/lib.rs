//! Dashboard Communication Protocol
//!
//! This crate defines the messages exchanged between the diagnostic rig and
//! the browser dashboard, and how they are framed on a byte stream.
//!
//! # Protocol Overview
//!
//! Every message is one JSON object terminated by a newline:
//! ```text
//! {"type":"command","command":"ping","params":{},"timestamp":1712}\n
//! {"type":"channel_data","channel":2,"voltage":3.3,"current":0.012}\n
//! ```
//!
//! The `type` field selects the variant. The dashboard only ever sends
//! `command`; the rig sends `status`, `channel_data`, `log` and `error`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod frame;
pub mod messages;

pub use frame::{decode_client, encode_line, FrameError, LineFramer, ProtocolError, MAX_LINE_LEN};
pub use messages::{ClientMessage, DeviceMessage, LogLevel, StatusReport};
