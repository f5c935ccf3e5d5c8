//! Configuration types
//!
//! Static board tables and the runtime link configuration.

pub mod board;
pub mod link;

pub use board::*;
pub use link::*;
