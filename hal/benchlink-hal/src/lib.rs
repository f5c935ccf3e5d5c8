//! Benchlink Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware interfaces the connectivity layer
//! talks to. Chip-specific crates (RP2040 today) implement them; the
//! `mock` feature provides simulated implementations for host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  benchlink-core (transport, link)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  benchlink-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ benchlink-hal-│       │  mock (host   │
//! │    rp2040     │       │    tests)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartHardware`] - Register-level serial port access
//! - [`radio::Radio`] - Wireless station interface (join, status, scan)
//! - [`time::Clock`] - Monotonic millisecond time base

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "mock")]
pub mod mock;
pub mod radio;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use radio::{AuthMode, JoinError, LinkStatus, Radio, RadioError, ScanResult};
pub use time::Clock;
pub use uart::{DataBits, FrameFormat, Parity, PinError, StopBits, UartConfig, UartHardware};
