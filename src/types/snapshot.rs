//! Immutable book snapshots for cross-thread readers.
//!
//! The writer publishes these by value; readers never see live book
//! internals.

use serde::{Deserialize, Serialize};

/// Top of one side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelQuote {
    /// Level price in fixed-point ticks
    pub price: u64,

    /// Aggregate resting size at the level
    pub size: u64,

    /// Number of resting orders at the level
    pub order_count: usize,
}

/// Point-in-time view of the inside market.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Feed timestamp of the last applied event (nanoseconds)
    pub timestamp: u64,

    /// Accepted events at the time of the snapshot
    pub message_count: u64,

    /// Best bid level, `None` when the bid side is empty
    pub best_bid: Option<LevelQuote>,

    /// Best ask level, `None` when the ask side is empty
    pub best_ask: Option<LevelQuote>,

    /// Resting bid orders
    pub bid_count: usize,

    /// Resting ask orders
    pub ask_count: usize,
}

impl BookSnapshot {
    /// Best bid price, if any
    pub fn best_bid_price(&self) -> Option<u64> {
        self.best_bid.map(|q| q.price)
    }

    /// Best ask price, if any
    pub fn best_ask_price(&self) -> Option<u64> {
        self.best_ask.map(|q| q.price)
    }

    /// Ask minus bid, `None` if either side is empty or the book is crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    /// Total resting orders
    pub fn order_count(&self) -> usize {
        self.bid_count + self.ask_count
    }
}
