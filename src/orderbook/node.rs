//! Order node stored in the order pool.
//!
//! ## Design
//!
//! `OrderNode` wraps an [`Order`] with doubly-linked list handles for its
//! price level queue, plus the handle of the level itself. Both let the book
//! unlink any order in O(1) from nothing more than its id.
//!
//! ## Linked List
//!
//! Orders at the same price level form a doubly-linked list:
//! - `next`: the next (newer) order in the level
//! - `prev`: the previous (older) order in the level

use crate::orderbook::pool::{LevelHandle, OrderHandle};
use crate::types::{Order, Side};

/// Order node stored in the [`OrderPool`](crate::orderbook::OrderPool).
///
/// The links are pool handles, not references.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The order data
    pub order: Order,

    /// Level this order rests at
    pub level: LevelHandle,

    /// Next order in the level queue, `None` at the tail (newest)
    pub next: Option<OrderHandle>,

    /// Previous order in the level queue, `None` at the head (oldest)
    pub prev: Option<OrderHandle>,
}

impl OrderNode {
    /// Create a new, unlinked node
    #[inline]
    pub fn new(order: Order, level: LevelHandle) -> Self {
        Self {
            order,
            level,
            next: None,
            prev: None,
        }
    }

    /// Check if this node has no queue neighbours
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.order.side
    }

    /// Remaining resting size
    #[inline]
    pub fn size(&self) -> u64 {
        self.order.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::pool::LimitPool;
    use crate::orderbook::PriceLevel;

    #[test]
    fn test_order_node_new() {
        let mut levels = LimitPool::with_capacity(1);
        let lh = levels.acquire(PriceLevel::new(Side::Bid, 10_000_000_000));
        let order = Order::new(42, Side::Bid, 10_000_000_000, 7, 0);
        let node = OrderNode::new(order.clone(), lh);

        assert_eq!(node.order, order);
        assert_eq!(node.level, lh);
        assert!(node.is_unlinked());
        assert_eq!(node.order_id(), 42);
        assert_eq!(node.price(), 10_000_000_000);
        assert_eq!(node.side(), Side::Bid);
        assert_eq!(node.size(), 7);
    }
}
