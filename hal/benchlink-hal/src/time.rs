//! Monotonic time base
//!
//! Bounded waits in the transport and the reconnect delay in the link
//! manager are measured against this trait, so host tests can drive them
//! with a simulated clock.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (normally boot)
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `since`
    ///
    /// Saturates to zero if `since` lies in the future.
    fn elapsed_ms(&self, since: u64) -> u64 {
        self.now_ms().saturating_sub(since)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
