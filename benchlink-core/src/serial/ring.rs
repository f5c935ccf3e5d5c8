//! Interrupt-safe receive buffer
//!
//! Single-producer single-consumer byte queue. The receive interrupt is
//! the only producer and owns the write index; the application is the only
//! consumer and owns the read index. `count` is the one field both sides
//! modify, always through an atomic read-modify-write, so neither side
//! can observe an index that moved without its count (or the reverse).
//!
//! When full, new bytes are dropped rather than overwriting old ones.

use portable_atomic::{AtomicU32, AtomicU8, AtomicUsize, Ordering};

/// Fixed-capacity SPSC byte queue
pub struct RingBuffer<const N: usize> {
    storage: [AtomicU8; N],
    /// Next slot to write (producer only)
    head: AtomicUsize,
    /// Next slot to read (consumer only)
    tail: AtomicUsize,
    count: AtomicUsize,
    dropped: AtomicU32,
}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty buffer
    ///
    /// `const` so a buffer can be placed in a `static` shared with an
    /// interrupt handler.
    pub const fn new() -> Self {
        Self {
            storage: [const { AtomicU8::new(0) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            count: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Append a byte (producer side)
    ///
    /// Returns false, and drops the byte, if the buffer is full.
    pub fn push(&self, byte: u8) -> bool {
        if self.count.load(Ordering::Acquire) >= N {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let head = self.head.load(Ordering::Relaxed);
        self.storage[head].store(byte, Ordering::Relaxed);
        self.head.store((head + 1) % N, Ordering::Relaxed);

        // Publishes the slot write to the consumer
        self.count.fetch_add(1, Ordering::Release);
        true
    }

    /// Remove the oldest byte (consumer side)
    pub fn pop(&self) -> Option<u8> {
        if self.count.load(Ordering::Acquire) == 0 {
            return None;
        }

        let tail = self.tail.load(Ordering::Relaxed);
        let byte = self.storage[tail].load(Ordering::Relaxed);
        self.tail.store((tail + 1) % N, Ordering::Relaxed);

        // Hands the slot back to the producer
        self.count.fetch_sub(1, Ordering::Release);
        Some(byte)
    }

    /// Number of buffered bytes
    pub fn available(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.available() == 0
    }

    pub fn is_full(&self) -> bool {
        self.available() >= N
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes lost to a full buffer since creation or the last [`clear`](Self::clear)
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset both indices and discard buffered data
    ///
    /// Only valid while the producer is quiescent (receive interrupt
    /// masked). For draining while the interrupt is live, pop instead.
    pub fn clear(&self) {
        self.head.store(0, Ordering::Relaxed);
        self.tail.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Release);
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_pop() {
        let ring = RingBuffer::<4>::new();
        assert_eq!(ring.pop(), None);
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 4);
    }

    #[test]
    fn test_full_drops_newest() {
        let ring = RingBuffer::<3>::new();
        assert!(ring.push(1));
        assert!(ring.push(2));
        assert!(ring.push(3));
        assert!(ring.is_full());
        assert!(!ring.push(4));
        assert_eq!(ring.dropped(), 1);

        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_wraparound() {
        let ring = RingBuffer::<4>::new();
        for round in 0..10u8 {
            assert!(ring.push(round));
            assert!(ring.push(round.wrapping_add(100)));
            assert_eq!(ring.pop(), Some(round));
            assert_eq!(ring.pop(), Some(round.wrapping_add(100)));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_clear_resets() {
        let ring = RingBuffer::<4>::new();
        for b in 0..6 {
            ring.push(b);
        }
        ring.clear();
        assert_eq!(ring.available(), 0);
        assert_eq!(ring.dropped(), 0);
        assert_eq!(ring.pop(), None);
        assert!(ring.push(9));
        assert_eq!(ring.pop(), Some(9));
    }

    #[test]
    fn test_concurrent_producer_consumer() {
        const TOTAL: usize = 20_000;
        let ring = RingBuffer::<64>::new();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..TOTAL {
                    while !ring.push(i as u8) {
                        std::hint::spin_loop();
                    }
                }
            });

            let mut expected = 0usize;
            while expected < TOTAL {
                if let Some(byte) = ring.pop() {
                    assert_eq!(byte, expected as u8);
                    expected += 1;
                }
            }
        });

        assert!(ring.is_empty());
    }

    proptest! {
        #[test]
        fn prop_fifo_order(data in proptest::collection::vec(any::<u8>(), 0..=32)) {
            let ring = RingBuffer::<32>::new();
            for &b in &data {
                prop_assert!(ring.push(b));
            }
            prop_assert_eq!(ring.available(), data.len());

            let popped: Vec<u8> = core::iter::from_fn(|| ring.pop()).collect();
            prop_assert_eq!(popped, data);
        }

        #[test]
        fn prop_overflow_drops_excess(data in proptest::collection::vec(any::<u8>(), 0..100)) {
            let ring = RingBuffer::<16>::new();
            let mut accepted = 0usize;
            for &b in &data {
                if ring.push(b) {
                    accepted += 1;
                }
                prop_assert!(ring.available() <= 16);
            }

            let kept = data.len().min(16);
            prop_assert_eq!(accepted, kept);
            prop_assert_eq!(ring.dropped() as usize, data.len() - kept);

            let popped: Vec<u8> = core::iter::from_fn(|| ring.pop()).collect();
            prop_assert_eq!(&popped[..], &data[..kept]);
        }

        #[test]
        fn prop_interleaved_matches_model(ops in proptest::collection::vec(any::<Option<u8>>(), 0..200)) {
            let ring = RingBuffer::<8>::new();
            let mut model = std::collections::VecDeque::new();
            for op in ops {
                match op {
                    Some(b) => {
                        let accepted = ring.push(b);
                        prop_assert_eq!(accepted, model.len() < 8);
                        if accepted {
                            model.push_back(b);
                        }
                    }
                    None => prop_assert_eq!(ring.pop(), model.pop_front()),
                }
                prop_assert_eq!(ring.available(), model.len());
            }
        }
    }
}
