//! Market-by-order events consumed by the book.
//!
//! Every event carries the same five fields regardless of action; which of
//! them are inputs and which are integrity redundancy depends on the action
//! (see [`crate::orderbook::OrderBook::apply`]).

use serde::{Deserialize, Serialize};

use super::order::Side;

/// What an event does to the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// New resting limit order
    #[serde(alias = "A", alias = "a")]
    Add,
    /// Price and/or size change of a resting order
    #[serde(alias = "M", alias = "m")]
    Modify,
    /// Execution against a resting order (partial or full)
    #[serde(alias = "T", alias = "t", alias = "F", alias = "f", alias = "fill")]
    Trade,
    /// Cancel / delete of a resting order
    #[serde(alias = "C", alias = "c", alias = "cancel", alias = "R", alias = "delete")]
    Remove,
}

/// One timestamped order event from the historical feed.
///
/// ```
/// use replay_book::types::{Action, MarketEvent, Side};
///
/// let event = MarketEvent::new(Action::Add, 7, Side::Bid, 10_000_000_000, 10, 1_000);
/// assert_eq!(event.action, Action::Add);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Event kind
    pub action: Action,

    /// Feed-assigned order identifier
    pub order_id: u64,

    /// Book side
    pub side: Side,

    /// Price in fixed-point ticks
    pub price: u64,

    /// Quantity: resting size for add/modify, traded or cancelled size otherwise
    pub size: u64,

    /// Feed timestamp (nanoseconds since epoch)
    pub timestamp: u64,
}

impl MarketEvent {
    /// Create a new event
    pub fn new(
        action: Action,
        order_id: u64,
        side: Side,
        price: u64,
        size: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            action,
            order_id,
            side,
            price,
            size,
            timestamp,
        }
    }

    /// Shorthand for an add event
    pub fn add(order_id: u64, side: Side, price: u64, size: u64, timestamp: u64) -> Self {
        Self::new(Action::Add, order_id, side, price, size, timestamp)
    }

    /// Shorthand for a modify event
    pub fn modify(order_id: u64, side: Side, price: u64, size: u64, timestamp: u64) -> Self {
        Self::new(Action::Modify, order_id, side, price, size, timestamp)
    }

    /// Shorthand for a trade event
    pub fn trade(order_id: u64, side: Side, price: u64, size: u64, timestamp: u64) -> Self {
        Self::new(Action::Trade, order_id, side, price, size, timestamp)
    }

    /// Shorthand for a remove event
    pub fn remove(order_id: u64, side: Side, price: u64, size: u64, timestamp: u64) -> Self {
        Self::new(Action::Remove, order_id, side, price, size, timestamp)
    }
}
