//! Accepted-event counter shared with reader threads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic count of events the book has accepted.
///
/// Cloning yields another handle to the same counter, so a UI thread can
/// poll replay position while the writer keeps mutating the book.
///
/// ```
/// use replay_book::orderbook::MessageCounter;
///
/// let counter = MessageCounter::new();
/// let reader = counter.clone();
/// counter.increment();
/// assert_eq!(reader.get(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageCounter(Arc<AtomicU64>);

impl MessageCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Record one accepted event, returning the new count
    #[inline]
    pub fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}
