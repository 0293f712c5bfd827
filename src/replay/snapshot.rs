//! Published book snapshots for reader threads.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::BookSnapshot;

/// Latest [`BookSnapshot`] published by the replay driver.
///
/// Clones share the same slot. The driver is the only writer; readers take
/// a copy and never hold the lock across their own work.
///
/// ```
/// use replay_book::replay::SnapshotHandle;
/// use replay_book::types::BookSnapshot;
///
/// let handle = SnapshotHandle::new();
/// let reader = handle.clone();
/// handle.publish(BookSnapshot { message_count: 3, ..Default::default() });
/// assert_eq!(reader.latest().message_count, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotHandle(Arc<RwLock<BookSnapshot>>);

impl SnapshotHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published snapshot
    pub fn publish(&self, snapshot: BookSnapshot) {
        *self.0.write() = snapshot;
    }

    /// Copy of the most recent snapshot
    pub fn latest(&self) -> BookSnapshot {
        self.0.read().clone()
    }

    /// Read the snapshot in place
    pub fn with<T>(&self, f: impl FnOnce(&BookSnapshot) -> T) -> T {
        f(&self.0.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LevelQuote;

    #[test]
    fn test_publish_visible_to_other_thread() {
        let handle = SnapshotHandle::new();
        let reader = handle.clone();

        let writer = std::thread::spawn(move || {
            handle.publish(BookSnapshot {
                timestamp: 9,
                best_bid: Some(LevelQuote { price: 100, size: 5, order_count: 1 }),
                ..Default::default()
            });
        });
        writer.join().unwrap();

        assert_eq!(reader.latest().timestamp, 9);
        assert_eq!(reader.with(|s| s.best_bid_price()), Some(100));
    }
}
