use core::cell::Cell;

use crate::time::Clock;

/// Manually driven clock
///
/// With auto-advance enabled every `now_ms` call moves time forward by a
/// fixed step, which lets busy-wait loops reach their deadline.
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<u64>,
    step: Cell<u64>,
}

impl MockClock {
    /// Clock frozen at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that advances `step_ms` on every read
    pub fn with_auto_advance(step_ms: u64) -> Self {
        Self {
            now: Cell::new(0),
            step: Cell::new(step_ms),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    /// Change the auto-advance step (0 freezes the clock)
    pub fn set_step(&self, step_ms: u64) {
        self.step.set(step_ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step.get());
        now
    }
}
