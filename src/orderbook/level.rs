//! Price level: the FIFO queue of orders resting at one (side, price).
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New and re-queued orders are appended at the tail
//! - Trades consume the head first
//! - Any order can be unlinked in O(1) using its pool handle
//!
//! The order data lives in the [`OrderPool`]; a level only holds the queue
//! metadata and the incrementally maintained aggregates.

use crate::orderbook::pool::{OrderHandle, OrderPool};
use crate::types::{LevelQuote, Order, Side};

/// All resting orders at a single (side, price).
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Book side of every order at this level
    pub side: Side,

    /// Level price (fixed-point ticks)
    pub price: u64,

    /// Sum of member order sizes
    pub total_size: u64,

    /// Head of the queue (oldest order, first in line)
    pub head: Option<OrderHandle>,

    /// Tail of the queue (newest order)
    pub tail: Option<OrderHandle>,

    /// Queue length
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(side: Side, price: u64) -> Self {
        Self {
            side,
            price,
            total_size: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Append an order at the tail, behind everything already queued.
    ///
    /// # Panics
    ///
    /// Panics if a handle is not held by `pool`
    pub fn push_back(&mut self, handle: OrderHandle, pool: &mut OrderPool) {
        let node = &mut pool[handle];
        let size = node.size();
        node.prev = self.tail;
        node.next = None;

        match self.tail {
            Some(tail) => pool[tail].next = Some(handle),
            None => self.head = Some(handle),
        }

        self.tail = Some(handle);
        self.order_count += 1;
        self.total_size += size;
    }

    /// Unlink an order from anywhere in the queue.
    ///
    /// # Returns
    ///
    /// The size the order carried out of the level
    ///
    /// # Panics
    ///
    /// Panics if a handle is not held by `pool`
    pub fn unlink(&mut self, handle: OrderHandle, pool: &mut OrderPool) -> u64 {
        let node = &mut pool[handle];
        let size = node.size();
        let prev = node.prev.take();
        let next = node.next.take();

        match prev {
            Some(p) => pool[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => pool[n].prev = prev,
            None => self.tail = prev,
        }

        self.order_count -= 1;
        self.total_size -= size;
        size
    }

    /// Account for a member order shrinking in place
    #[inline]
    pub fn reduce(&mut self, quantity: u64) {
        self.total_size -= quantity;
    }

    /// Account for a member order growing in place
    #[inline]
    pub fn grow(&mut self, quantity: u64) {
        self.total_size += quantity;
    }

    /// Head order's handle (next in line to trade)
    #[inline]
    pub fn peek_head(&self) -> Option<OrderHandle> {
        self.head
    }

    /// Iterate the queue oldest-first
    pub fn iter<'a>(&self, pool: &'a OrderPool) -> LevelIter<'a> {
        LevelIter {
            pool,
            next: self.head,
            remaining: self.order_count,
        }
    }

    /// Aggregates for snapshots
    #[inline]
    pub fn quote(&self) -> LevelQuote {
        LevelQuote {
            price: self.price,
            size: self.total_size,
            order_count: self.order_count,
        }
    }
}

/// Oldest-first iterator over a level's orders.
#[derive(Debug, Clone)]
pub struct LevelIter<'a> {
    pool: &'a OrderPool,
    next: Option<OrderHandle>,
    remaining: usize,
}

impl<'a> LevelIter<'a> {
    /// Iterator that yields nothing
    pub fn empty(pool: &'a OrderPool) -> Self {
        Self {
            pool,
            next: None,
            remaining: 0,
        }
    }
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<&'a Order> {
        let handle = self.next?;
        let pool = self.pool;
        let node = pool.get(handle)?;
        self.next = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.order)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for LevelIter<'_> {}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::pool::{LevelHandle, LimitPool};
    use crate::orderbook::OrderNode;

    const PX: u64 = 10_000_000_000;

    struct Fixture {
        orders: OrderPool,
        lh: LevelHandle,
        level: PriceLevel,
    }

    fn fixture() -> Fixture {
        let mut levels = LimitPool::with_capacity(1);
        let level = PriceLevel::new(Side::Bid, PX);
        let lh = levels.acquire(level.clone());
        Fixture {
            orders: OrderPool::with_capacity(10),
            lh,
            level,
        }
    }

    fn push(f: &mut Fixture, id: u64, size: u64) -> OrderHandle {
        let h = f.orders.acquire(OrderNode::new(Order::new(id, Side::Bid, PX, size, 0), f.lh));
        f.level.push_back(h, &mut f.orders);
        h
    }

    fn ids(f: &Fixture) -> Vec<u64> {
        f.level.iter(&f.orders).map(|o| o.id).collect()
    }

    #[test]
    fn test_price_level_new() {
        let level = PriceLevel::new(Side::Ask, PX);

        assert_eq!(level.side, Side::Ask);
        assert_eq!(level.price, PX);
        assert_eq!(level.total_size, 0);
        assert!(level.head.is_none());
        assert!(level.tail.is_none());
        assert!(level.is_empty());
    }

    #[test]
    fn test_push_back_preserves_arrival_order() {
        let mut f = fixture();
        let h1 = push(&mut f, 1, 10);
        let h2 = push(&mut f, 2, 20);
        let h3 = push(&mut f, 3, 30);

        assert_eq!(f.level.order_count, 3);
        assert_eq!(f.level.total_size, 60);
        assert_eq!(f.level.head, Some(h1));
        assert_eq!(f.level.tail, Some(h3));
        assert_eq!(ids(&f), vec![1, 2, 3]);

        assert_eq!(f.orders[h2].prev, Some(h1));
        assert_eq!(f.orders[h2].next, Some(h3));
    }

    #[test]
    fn test_unlink_middle_head_and_tail() {
        let mut f = fixture();
        let h1 = push(&mut f, 1, 10);
        let h2 = push(&mut f, 2, 20);
        let h3 = push(&mut f, 3, 30);

        assert_eq!(f.level.unlink(h2, &mut f.orders), 20);
        assert_eq!(ids(&f), vec![1, 3]);
        assert!(f.orders[h2].is_unlinked());
        assert_eq!(f.level.total_size, 40);

        f.level.unlink(h1, &mut f.orders);
        assert_eq!(f.level.head, Some(h3));
        assert_eq!(f.level.tail, Some(h3));
        assert!(f.orders[h3].is_unlinked());

        f.level.unlink(h3, &mut f.orders);
        assert!(f.level.is_empty());
        assert_eq!(f.level.total_size, 0);
        assert!(f.level.head.is_none());
        assert!(f.level.tail.is_none());
    }

    #[test]
    fn test_requeue_moves_to_tail() {
        let mut f = fixture();
        let h1 = push(&mut f, 1, 10);
        push(&mut f, 2, 20);

        f.level.unlink(h1, &mut f.orders);
        f.level.push_back(h1, &mut f.orders);

        assert_eq!(ids(&f), vec![2, 1]);
        assert_eq!(f.level.total_size, 30);
        assert_eq!(f.level.order_count, 2);
    }

    #[test]
    fn test_reduce_and_grow() {
        let mut f = fixture();
        push(&mut f, 1, 10);

        f.level.reduce(4);
        assert_eq!(f.level.total_size, 6);
        f.level.grow(9);
        assert_eq!(f.level.total_size, 15);
    }

    #[test]
    fn test_iter_len_and_quote() {
        let mut f = fixture();
        assert_eq!(f.level.iter(&f.orders).len(), 0);
        assert!(f.level.peek_head().is_none());

        let h1 = push(&mut f, 1, 10);
        push(&mut f, 2, 5);

        assert_eq!(f.level.iter(&f.orders).len(), 2);
        assert_eq!(f.level.peek_head(), Some(h1));
        assert_eq!(
            f.level.quote(),
            LevelQuote { price: PX, size: 15, order_count: 2 }
        );
    }
}
