//! Observer registration
//!
//! The link manager holds at most one event observer and one scan observer.
//! Registering replaces the previous one and hands it back. Observers run
//! synchronously inside the manager call that caused the notification and
//! must not block.
//!
//! An application that needs several consumers combines them explicitly,
//! e.g. registering `(&led, &safety)` as one observer.

use benchlink_hal::ScanResult;

use super::events::LinkEvent;

/// Receives link state transitions
pub trait LinkObserver {
    fn on_link_event(&self, event: &LinkEvent);
}

/// Receives scan results, one call per network
pub trait ScanObserver {
    /// `is_last` marks the final result of a scan
    fn on_scan_result(&self, result: &ScanResult, is_last: bool);
}

impl<F: Fn(&LinkEvent)> LinkObserver for F {
    fn on_link_event(&self, event: &LinkEvent) {
        self(event)
    }
}

impl<F: Fn(&ScanResult, bool)> ScanObserver for F {
    fn on_scan_result(&self, result: &ScanResult, is_last: bool) {
        self(result, is_last)
    }
}

impl<A: LinkObserver + ?Sized, B: LinkObserver + ?Sized> LinkObserver for (&A, &B) {
    fn on_link_event(&self, event: &LinkEvent) {
        self.0.on_link_event(event);
        self.1.on_link_event(event);
    }
}

/// Single-subscriber slot
pub(crate) struct Slot<'a, T: ?Sized> {
    subscriber: Option<&'a T>,
}

impl<'a, T: ?Sized> Slot<'a, T> {
    pub(crate) const fn empty() -> Self {
        Self { subscriber: None }
    }

    /// Install `subscriber`, returning the one it replaces
    pub(crate) fn replace(&mut self, subscriber: Option<&'a T>) -> Option<&'a T> {
        core::mem::replace(&mut self.subscriber, subscriber)
    }

    pub(crate) fn get(&self) -> Option<&'a T> {
        self.subscriber
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Counter(Cell<u32>);

    impl LinkObserver for Counter {
        fn on_link_event(&self, _event: &LinkEvent) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_slot_returns_previous() {
        let first = Counter(Cell::new(0));
        let second = Counter(Cell::new(0));
        let mut slot: Slot<'_, dyn LinkObserver> = Slot::empty();

        assert!(slot.replace(Some(&first)).is_none());
        let previous = slot.replace(Some(&second)).unwrap();
        previous.on_link_event(&LinkEvent::Connecting);
        assert_eq!(first.0.get(), 1);

        slot.get().unwrap().on_link_event(&LinkEvent::Connecting);
        assert_eq!(second.0.get(), 1);

        assert!(slot.replace(None).is_some());
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_closure_and_pair_observers() {
        let hits = Cell::new(0);
        let counter = Counter(Cell::new(0));
        let closure = |_: &LinkEvent| hits.set(hits.get() + 1);
        let pair = (&closure, &counter);

        pair.on_link_event(&LinkEvent::Disconnecting);
        assert_eq!(hits.get(), 1);
        assert_eq!(counter.0.get(), 1);
    }
}
