//! Wireless link management
//!
//! - [`machine`] - Connection states and the transition table
//! - [`manager`] - [`LinkManager`], which drives the radio through the machine
//! - [`reconnect`] - Fixed-delay automatic retry policy
//! - [`notify`] - Observer traits for transitions and scan results

mod error;
mod events;
pub mod machine;
pub mod manager;
pub mod notify;
pub mod reconnect;
mod stats;

pub use error::LinkError;
pub use events::{DisconnectReason, LinkEvent};
pub use machine::{LinkState, Trigger};
pub use manager::LinkManager;
pub use notify::{LinkObserver, ScanObserver};
pub use reconnect::ReconnectPolicy;
pub use stats::LinkStats;
