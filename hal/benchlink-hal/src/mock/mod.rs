//! Simulated hardware for host tests
//!
//! Each mock keeps its state behind `Cell`/`RefCell` so it can be shared by
//! reference between the code under test and the test body, which scripts
//! readiness flags and inspects what was written.

mod clock;
mod radio;
mod uart;

pub use clock::MockClock;
pub use radio::{JoinRequest, MockRadio};
pub use uart::MockUart;
