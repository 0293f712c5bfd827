//! Pooled storage for orders and price levels.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - `Slab::with_capacity(n)` pre-allocates n slots
//! - Keys are reused after `slab.remove()`
//! - O(1) insert, remove, and lookup
//!
//! Keys are wrapped in [`OrderHandle`] / [`LevelHandle`] so an order key can
//! never be used to index the level pool or vice versa. A handle is only
//! valid while its slot is held; the book releases a slot exactly once, when
//! the entity leaves both indices.

use std::ops::{Index, IndexMut};

use slab::Slab;

use crate::orderbook::{OrderNode, PriceLevel};

/// Handle to an order slot in an [`OrderPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderHandle(usize);

/// Handle to a level slot in a [`LimitPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelHandle(usize);

/// Allocation counters for a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Slots handed out over the pool's lifetime
    pub acquired: u64,

    /// Slots returned over the pool's lifetime
    pub released: u64,

    /// Largest number of slots held at once
    pub high_water: usize,
}

impl PoolStats {
    #[inline]
    fn on_acquire(&mut self, live: usize) {
        self.acquired += 1;
        self.high_water = self.high_water.max(live);
    }
}

// ============================================================================
// OrderPool
// ============================================================================

/// Reusable storage for [`OrderNode`]s.
#[derive(Debug, Default)]
pub struct OrderPool {
    slots: Slab<OrderNode>,
    stats: PoolStats,
}

impl OrderPool {
    /// Create a pool with `capacity` pre-allocated slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Slab::with_capacity(capacity),
            stats: PoolStats::default(),
        }
    }

    /// Place a node into a free slot
    #[inline]
    pub fn acquire(&mut self, node: OrderNode) -> OrderHandle {
        let key = self.slots.insert(node);
        self.stats.on_acquire(self.slots.len());
        OrderHandle(key)
    }

    /// Return a slot to the pool, yielding its node
    ///
    /// # Panics
    ///
    /// Panics if the handle's slot is not held
    #[inline]
    pub fn release(&mut self, handle: OrderHandle) -> OrderNode {
        self.stats.released += 1;
        self.slots.remove(handle.0)
    }

    #[inline]
    pub fn get(&self, handle: OrderHandle) -> Option<&OrderNode> {
        self.slots.get(handle.0)
    }

    /// Slots currently held
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocated slots, held or free
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[inline]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Release every slot, keeping the allocation
    pub fn clear(&mut self) {
        self.stats.released += self.slots.len() as u64;
        self.slots.clear();
    }
}

impl Index<OrderHandle> for OrderPool {
    type Output = OrderNode;

    #[inline]
    fn index(&self, handle: OrderHandle) -> &OrderNode {
        &self.slots[handle.0]
    }
}

impl IndexMut<OrderHandle> for OrderPool {
    #[inline]
    fn index_mut(&mut self, handle: OrderHandle) -> &mut OrderNode {
        &mut self.slots[handle.0]
    }
}

// ============================================================================
// LimitPool
// ============================================================================

/// Reusable storage for [`PriceLevel`]s.
#[derive(Debug, Default)]
pub struct LimitPool {
    slots: Slab<PriceLevel>,
    stats: PoolStats,
}

impl LimitPool {
    /// Create a pool with `capacity` pre-allocated slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Slab::with_capacity(capacity),
            stats: PoolStats::default(),
        }
    }

    /// Place a level into a free slot
    #[inline]
    pub fn acquire(&mut self, level: PriceLevel) -> LevelHandle {
        let key = self.slots.insert(level);
        self.stats.on_acquire(self.slots.len());
        LevelHandle(key)
    }

    /// Return a slot to the pool, yielding its level
    ///
    /// # Panics
    ///
    /// Panics if the handle's slot is not held
    #[inline]
    pub fn release(&mut self, handle: LevelHandle) -> PriceLevel {
        self.stats.released += 1;
        self.slots.remove(handle.0)
    }

    #[inline]
    pub fn get(&self, handle: LevelHandle) -> Option<&PriceLevel> {
        self.slots.get(handle.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[inline]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Release every slot, keeping the allocation
    pub fn clear(&mut self) {
        self.stats.released += self.slots.len() as u64;
        self.slots.clear();
    }
}

impl Index<LevelHandle> for LimitPool {
    type Output = PriceLevel;

    #[inline]
    fn index(&self, handle: LevelHandle) -> &PriceLevel {
        &self.slots[handle.0]
    }
}

impl IndexMut<LevelHandle> for LimitPool {
    #[inline]
    fn index_mut(&mut self, handle: LevelHandle) -> &mut PriceLevel {
        &mut self.slots[handle.0]
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Order, Side};

    fn node(id: u64, level: LevelHandle) -> OrderNode {
        OrderNode::new(Order::new(id, Side::Ask, 9_900_000_000, 5, 0), level)
    }

    #[test]
    fn test_order_pool_reuses_released_slots() {
        let mut levels = LimitPool::with_capacity(1);
        let lh = levels.acquire(PriceLevel::new(Side::Ask, 9_900_000_000));

        let mut pool = OrderPool::with_capacity(4);
        let a = pool.acquire(node(1, lh));
        let b = pool.acquire(node(2, lh));
        assert_eq!(pool.len(), 2);

        let released = pool.release(a);
        assert_eq!(released.order_id(), 1);
        assert!(pool.get(a).is_none());

        // The freed slot is handed out again
        let c = pool.acquire(node(3, lh));
        assert_eq!(c, a);
        assert_eq!(pool[c].order_id(), 3);
        assert_eq!(pool[b].order_id(), 2);

        let stats = pool.stats();
        assert_eq!(stats.acquired, 3);
        assert_eq!(stats.released, 1);
        assert_eq!(stats.high_water, 2);
    }

    #[test]
    fn test_order_pool_capacity_is_stable_under_churn() {
        let mut levels = LimitPool::with_capacity(1);
        let lh = levels.acquire(PriceLevel::new(Side::Ask, 9_900_000_000));
        let mut pool = OrderPool::with_capacity(8);
        let initial = pool.capacity();

        for i in 0..10_000 {
            let h = pool.acquire(node(i, lh));
            pool.release(h);
        }

        assert_eq!(pool.capacity(), initial);
        assert!(pool.is_empty());
        assert_eq!(pool.stats().high_water, 1);
    }

    #[test]
    fn test_limit_pool_acquire_release() {
        let mut pool = LimitPool::with_capacity(2);
        let h = pool.acquire(PriceLevel::new(Side::Bid, 100));

        assert_eq!(pool[h].price, 100);
        pool[h].total_size = 7;
        assert_eq!(pool.get(h).map(|l| l.total_size), Some(7));

        let level = pool.release(h);
        assert_eq!(level.side, Side::Bid);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_clear_counts_releases() {
        let mut pool = LimitPool::with_capacity(4);
        pool.acquire(PriceLevel::new(Side::Bid, 1));
        pool.acquire(PriceLevel::new(Side::Bid, 2));
        pool.clear();

        assert!(pool.is_empty());
        assert_eq!(pool.stats().released, 2);
    }
}
