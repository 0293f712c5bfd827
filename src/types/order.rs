//! Order types for the reconstructed book.
//!
//! ## Fixed-Point Representation
//!
//! `price` is stored as u64 ticks scaled by 10^8 (see [`super::price::SCALE`]).
//! `size` is the remaining resting quantity in feed units.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Side enum
// ============================================================================

/// Book side of a resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy interest
    #[serde(alias = "b", alias = "buy")]
    Bid,
    /// Sell interest
    #[serde(alias = "a", alias = "s", alias = "sell", alias = "offer")]
    Ask,
}

impl Side {
    /// Convert to u8 for hashing and compact encodings
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }

    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Bid),
            1 => Some(Side::Ask),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Map a feed's boolean "is bid" flag onto a side.
    pub fn from_is_bid(is_bid: bool) -> Self {
        if is_bid {
            Side::Bid
        } else {
            Side::Ask
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.pad("bid"),
            Side::Ask => f.pad("ask"),
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting limit order.
///
/// `id` and `side` never change once the order is in the book. `price`,
/// `size` and `timestamp` are updated in place by modify and partial trades.
///
/// ```
/// use replay_book::types::{Order, Side};
///
/// let order = Order::new(1, Side::Bid, 10_000_000_000, 25, 1_700_000_000_000_000_000);
/// assert_eq!(order.side, Side::Bid);
/// assert!(!order.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Feed-assigned order identifier
    pub id: u64,

    /// Book side
    pub side: Side,

    /// Price in fixed-point ticks
    pub price: u64,

    /// Remaining resting quantity
    pub size: u64,

    /// Feed timestamp of the last add or modify (nanoseconds)
    pub timestamp: u64,
}

impl Order {
    /// Create a new order
    pub fn new(id: u64, side: Side, price: u64, size: u64, timestamp: u64) -> Self {
        Self {
            id,
            side,
            price,
            size,
            timestamp,
        }
    }

    /// Check if nothing remains to rest
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Reduce the resting size by a traded quantity.
    ///
    /// # Returns
    ///
    /// The quantity actually consumed, never more than what was resting.
    #[inline]
    pub fn consume(&mut self, quantity: u64) -> u64 {
        let taken = quantity.min(self.size);
        self.size -= taken;
        taken
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_conversion() {
        assert_eq!(Side::Bid.to_u8(), 0);
        assert_eq!(Side::Ask.to_u8(), 1);
        assert_eq!(Side::from_u8(0), Some(Side::Bid));
        assert_eq!(Side::from_u8(1), Some(Side::Ask));
        assert_eq!(Side::from_u8(2), None);
        assert_eq!(Side::from_is_bid(true), Side::Bid);
        assert_eq!(Side::from_is_bid(false), Side::Ask);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
    }

    #[test]
    fn test_side_serde_aliases() {
        let side: Side = serde_json::from_str("\"bid\"").unwrap();
        assert_eq!(side, Side::Bid);
        let side: Side = serde_json::from_str("\"sell\"").unwrap();
        assert_eq!(side, Side::Ask);
        assert_eq!(serde_json::to_string(&Side::Ask).unwrap(), "\"ask\"");
    }

    #[test]
    fn test_order_consume() {
        let mut order = Order::new(1, Side::Ask, 9_900_000_000, 5, 0);

        assert_eq!(order.consume(3), 3);
        assert_eq!(order.size, 2);
        assert!(!order.is_empty());

        // Over-consumption is clamped to what was resting
        assert_eq!(order.consume(10), 2);
        assert_eq!(order.size, 0);
        assert!(order.is_empty());
    }
}
