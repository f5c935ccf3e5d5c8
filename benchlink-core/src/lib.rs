//! Board-agnostic connectivity layer for the benchlink diagnostic rig
//!
//! This crate contains all logic that does not depend on a specific chip:
//!
//! - Interrupt-fed serial transport over a lock-free ring buffer
//! - Wireless link state machine with automatic reconnection
//! - Observer registration for link transitions and scan results
//! - Dashboard channel speaking the JSON line protocol
//! - Safety monitoring and the link status LED
//! - Board and link configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod dashboard;
pub mod indicator;
pub mod link;
pub mod safety;
pub mod serial;
