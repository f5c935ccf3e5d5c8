//! Safety monitoring
//!
//! Detects conditions under which the rig must de-energize its outputs.

pub mod monitor;

pub use monitor::{FaultKind, SafetyMonitor, SafetyStatus};
