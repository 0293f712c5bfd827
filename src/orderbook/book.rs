//! Market-by-order book reconstruction.
//!
//! ## Architecture
//!
//! - **OrderPool / LimitPool**: Slab-backed storage, addressed by handle
//! - **order_index**: order id → order handle, for modify/trade/remove
//! - **level_index**: (side, price) → level handle, for add
//! - **BTreeMap per side**: sorted levels for best bid/ask
//!
//! ## Price Ordering
//!
//! - **Bids**: keyed by `Reverse(price)`, so the first entry is the highest bid
//! - **Asks**: keyed by `price`, so the first entry is the lowest ask
//!
//! ## Rejections
//!
//! Every mutation validates the event against the indexed order before
//! touching anything. A returned [`BookError`] therefore means the book is
//! exactly as it was before the call.
//!
//! ## Example
//!
//! ```
//! use replay_book::{OrderBook, Side};
//!
//! let mut book = OrderBook::with_capacity(1_000);
//! book.add_limit_order(1, 10_000_000_000, 10, Side::Bid, 0).unwrap();
//! book.add_limit_order(2, 10_100_000_000, 4, Side::Ask, 0).unwrap();
//!
//! assert_eq!(book.get_best_bid_price(), Some(10_000_000_000));
//! assert_eq!(book.get_best_ask_price(), Some(10_100_000_000));
//!
//! let trade = book.trade_order(2, 10_100_000_000, 4, Side::Ask).unwrap();
//! assert!(trade.removed);
//! assert_eq!(book.get_best_ask_price(), None);
//! ```

use std::cmp::Reverse;
use std::collections::BTreeMap;

use ahash::AHashMap;
use sha2::{Digest, Sha256};
use tracing::{debug, trace, warn};

use crate::config::BookConfig;
use crate::error::{BookError, Result};
use crate::orderbook::pool::{LevelHandle, LimitPool, OrderHandle, OrderPool, PoolStats};
use crate::orderbook::{LevelIter, MessageCounter, OrderNode, PriceLevel};
use crate::types::{Action, BookSnapshot, LevelQuote, MarketEvent, Order, Side, TradePrint};

/// How a modify changed the resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyOutcome {
    /// Moved to a new price level, at the back of its queue
    Repriced { old_price: u64 },

    /// Same price, new size; `requeued` if it lost its queue position
    Resized { old_size: u64, requeued: bool },

    /// Same price and size; only the timestamp moved
    Unchanged,

    /// New size was zero, so the order left the book
    Removed,
}

/// Result of replaying a trade against a resting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOutcome {
    pub order_id: u64,
    pub side: Side,
    pub price: u64,

    /// Quantity taken from the order (clamped to what was resting)
    pub traded: u64,

    /// Size left on the order afterwards
    pub remaining: u64,

    /// Whether the order was fully consumed and removed
    pub removed: bool,

    /// Trade quantity in excess of the resting size, discarded by clamping
    pub overfill: u64,
}

impl TradeOutcome {
    /// Trade print for presentation consumers
    pub fn print(&self, timestamp: u64) -> TradePrint {
        TradePrint::new(timestamp, self.order_id, self.side, self.price, self.traded)
    }
}

/// What [`OrderBook::apply`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Added,
    Modified(ModifyOutcome),
    Traded(TradeOutcome),
    Removed(Order),
}

/// Limit order book rebuilt from a market-by-order event stream.
///
/// The book exclusively owns every order and level slot. Mutation is
/// single-writer; only [`MessageCounter`] is meant to be shared.
#[derive(Debug)]
pub struct OrderBook {
    config: BookConfig,

    /// Order storage
    orders: OrderPool,

    /// Price level storage
    levels: LimitPool,

    /// Order id → order slot
    order_index: AHashMap<u64, OrderHandle>,

    /// (side, price) → level slot
    level_index: AHashMap<(Side, u64), LevelHandle>,

    /// Bid levels, best (highest) first
    bids: BTreeMap<Reverse<u64>, LevelHandle>,

    /// Ask levels, best (lowest) first
    asks: BTreeMap<u64, LevelHandle>,

    bid_count: usize,
    ask_count: usize,

    /// Accepted events
    message_count: MessageCounter,

    /// Timestamp of the last accepted event
    last_timestamp: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a book with the default configuration
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    /// Create a book with `order_capacity` pre-allocated order slots
    ///
    /// ```
    /// use replay_book::OrderBook;
    ///
    /// let book = OrderBook::with_capacity(100_000);
    /// assert!(book.order_capacity() >= 100_000);
    /// ```
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self::with_config(BookConfig::new(order_capacity))
    }

    pub fn with_config(config: BookConfig) -> Self {
        Self {
            orders: OrderPool::with_capacity(config.order_capacity),
            levels: LimitPool::with_capacity(config.level_capacity),
            order_index: AHashMap::with_capacity(config.order_capacity),
            level_index: AHashMap::with_capacity(config.level_capacity),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            bid_count: 0,
            ask_count: 0,
            message_count: MessageCounter::new(),
            last_timestamp: 0,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    // ========================================================================
    // Event dispatch
    // ========================================================================

    /// Apply one feed event through the matching mutation operation.
    pub fn apply(&mut self, event: &MarketEvent) -> Result<EventOutcome> {
        trace!(
            action = ?event.action,
            order_id = event.order_id,
            side = %event.side,
            price = event.price,
            size = event.size,
            "apply event"
        );

        let outcome = match event.action {
            Action::Add => {
                self.add_limit_order(
                    event.order_id,
                    event.price,
                    event.size,
                    event.side,
                    event.timestamp,
                )?;
                EventOutcome::Added
            }
            Action::Modify => EventOutcome::Modified(self.modify_order(
                event.order_id,
                event.price,
                event.size,
                event.side,
                event.timestamp,
            )?),
            Action::Trade => EventOutcome::Traded(self.trade_order(
                event.order_id,
                event.price,
                event.size,
                event.side,
            )?),
            Action::Remove => EventOutcome::Removed(self.remove_order(
                event.order_id,
                event.price,
                event.size,
                event.side,
            )?),
        };

        self.last_timestamp = event.timestamp;
        Ok(outcome)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Rest a new order at the back of its price level.
    ///
    /// # Errors
    ///
    /// - [`BookError::DuplicateOrder`] if `id` is already resting
    /// - [`BookError::ZeroSize`] if `size` is zero
    /// - [`BookError::SizeOverflow`] if the level's total would exceed `u64::MAX`
    pub fn add_limit_order(
        &mut self,
        id: u64,
        price: u64,
        size: u64,
        side: Side,
        timestamp: u64,
    ) -> Result<()> {
        if self.order_index.contains_key(&id) {
            return Err(BookError::DuplicateOrder { id });
        }
        if size == 0 {
            return Err(BookError::ZeroSize { id });
        }
        self.check_level_room(id, side, price, 0, size)?;

        let lh = self.get_or_insert_limit(side, price);
        let oh = self
            .orders
            .acquire(OrderNode::new(Order::new(id, side, price, size, timestamp), lh));
        self.levels[lh].push_back(oh, &mut self.orders);
        self.order_index.insert(id, oh);
        *self.side_count_mut(side) += 1;

        self.accept(timestamp);
        Ok(())
    }

    /// Change a resting order's price and/or size.
    ///
    /// A price change re-queues at the back of the new level. A same-price
    /// size change keeps or loses position according to
    /// [`BookConfig::modify_priority`]. A new size of zero removes the order.
    ///
    /// # Errors
    ///
    /// - [`BookError::UnknownOrder`] if `id` is not resting
    /// - [`BookError::SideMismatch`] if `side` differs from the resting side
    /// - [`BookError::SizeOverflow`] if the target level's total would exceed `u64::MAX`
    pub fn modify_order(
        &mut self,
        id: u64,
        new_price: u64,
        new_size: u64,
        side: Side,
        timestamp: u64,
    ) -> Result<ModifyOutcome> {
        let oh = self.lookup(id)?;
        self.check_side(oh, side)?;

        let (old_price, old_size) = {
            let order = &self.orders[oh].order;
            (order.price, order.size)
        };
        if new_price != old_price {
            self.check_level_room(id, side, new_price, 0, new_size)?;
        } else if new_size > old_size {
            self.check_level_room(id, side, new_price, old_size, new_size)?;
        }

        let outcome = if new_size == 0 {
            debug!(order_id = id, "modify to zero size, removing order");
            self.discard(oh);
            ModifyOutcome::Removed
        } else if new_price != old_price {
            self.detach(oh);
            let lh = self.get_or_insert_limit(side, new_price);
            let node = &mut self.orders[oh];
            node.level = lh;
            node.order.price = new_price;
            node.order.size = new_size;
            node.order.timestamp = timestamp;
            self.levels[lh].push_back(oh, &mut self.orders);
            ModifyOutcome::Repriced { old_price }
        } else if new_size == old_size {
            self.orders[oh].order.timestamp = timestamp;
            ModifyOutcome::Unchanged
        } else {
            let lh = self.orders[oh].level;
            let requeued = self.config.modify_priority.requeues(old_size, new_size);
            let level = &mut self.levels[lh];

            if requeued {
                level.unlink(oh, &mut self.orders);
                let order = &mut self.orders[oh].order;
                order.size = new_size;
                order.timestamp = timestamp;
                level.push_back(oh, &mut self.orders);
            } else {
                if new_size > old_size {
                    level.grow(new_size - old_size);
                } else {
                    level.reduce(old_size - new_size);
                }
                let order = &mut self.orders[oh].order;
                order.size = new_size;
                order.timestamp = timestamp;
            }
            ModifyOutcome::Resized { old_size, requeued }
        };

        self.accept(timestamp);
        Ok(outcome)
    }

    /// Replay an execution against a resting order.
    ///
    /// A trade at least as large as the resting size removes the order; any
    /// excess is clamped and reported in [`TradeOutcome::overfill`]. A
    /// partial trade keeps the order's queue position.
    ///
    /// # Errors
    ///
    /// - [`BookError::UnknownOrder`] if `id` is not resting
    /// - [`BookError::SideMismatch`] / [`BookError::PriceMismatch`] if the
    ///   event disagrees with the resting order
    pub fn trade_order(&mut self, id: u64, price: u64, size: u64, side: Side) -> Result<TradeOutcome> {
        let oh = self.lookup(id)?;
        self.check_side(oh, side)?;
        self.check_price(oh, price)?;

        let resting = self.orders[oh].size();
        let traded = size.min(resting);
        let overfill = size - traded;
        let removed = traded == resting;

        if overfill > 0 {
            warn!(order_id = id, resting, size, "trade exceeds resting size, clamped");
        }

        if removed {
            self.discard(oh);
        } else if traded > 0 {
            let node = &mut self.orders[oh];
            node.order.consume(traded);
            let lh = node.level;
            self.levels[lh].reduce(traded);
        }

        self.accept(self.last_timestamp);
        Ok(TradeOutcome {
            order_id: id,
            side,
            price,
            traded,
            remaining: resting - traded,
            removed,
            overfill,
        })
    }

    /// Remove a resting order regardless of its size (cancel / delete).
    ///
    /// `price` and `side` must match the resting order. `size` is only a
    /// redundancy hint; a disagreement is logged, not rejected.
    ///
    /// # Errors
    ///
    /// - [`BookError::UnknownOrder`] if `id` is not resting
    /// - [`BookError::SideMismatch`] / [`BookError::PriceMismatch`] if the
    ///   event disagrees with the resting order
    pub fn remove_order(&mut self, id: u64, price: u64, size: u64, side: Side) -> Result<Order> {
        let oh = self.lookup(id)?;
        self.check_side(oh, side)?;
        self.check_price(oh, price)?;

        let resting = self.orders[oh].size();
        if resting != size {
            debug!(order_id = id, resting, size, "remove size differs from resting size");
        }

        let order = self.discard(oh);
        self.accept(self.last_timestamp);
        Ok(order)
    }

    /// Drop every order and level, keeping pool capacity.
    ///
    /// The message counter is not reset; it tracks replay position.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.levels.clear();
        self.order_index.clear();
        self.level_index.clear();
        self.bids.clear();
        self.asks.clear();
        self.bid_count = 0;
        self.ask_count = 0;
    }

    // ========================================================================
    // Index maintenance
    // ========================================================================

    /// The only place levels are created: returns the existing level for
    /// (side, price) or allocates and indexes an empty one.
    ///
    /// Callers must push an order onto the returned level before returning,
    /// or the no-empty-levels invariant breaks.
    fn get_or_insert_limit(&mut self, side: Side, price: u64) -> LevelHandle {
        if let Some(&lh) = self.level_index.get(&(side, price)) {
            return lh;
        }

        let lh = self.levels.acquire(PriceLevel::new(side, price));
        self.level_index.insert((side, price), lh);
        match side {
            Side::Bid => self.bids.insert(Reverse(price), lh),
            Side::Ask => self.asks.insert(price, lh),
        };
        debug!(%side, price, "price level created");
        lh
    }

    /// Remove an emptied level from both indices and return its slot.
    fn release_level(&mut self, lh: LevelHandle) {
        let level = self.levels.release(lh);
        self.level_index.remove(&(level.side, level.price));
        match level.side {
            Side::Bid => self.bids.remove(&Reverse(level.price)),
            Side::Ask => self.asks.remove(&level.price),
        };
        debug!(side = %level.side, price = level.price, "price level released");
    }

    /// Unlink an order from its level, releasing the level if it empties.
    /// The order keeps its slot and index entry.
    fn detach(&mut self, oh: OrderHandle) {
        let lh = self.orders[oh].level;
        let level = &mut self.levels[lh];
        level.unlink(oh, &mut self.orders);
        if level.is_empty() {
            self.release_level(lh);
        }
    }

    /// Take an order out of the book entirely.
    fn discard(&mut self, oh: OrderHandle) -> Order {
        self.detach(oh);
        let node = self.orders.release(oh);
        self.order_index.remove(&node.order.id);
        *self.side_count_mut(node.order.side) -= 1;
        node.order
    }

    #[inline]
    fn lookup(&self, id: u64) -> Result<OrderHandle> {
        self.order_index
            .get(&id)
            .copied()
            .ok_or(BookError::UnknownOrder { id })
    }

    #[inline]
    fn check_side(&self, oh: OrderHandle, side: Side) -> Result<()> {
        let order = &self.orders[oh].order;
        if order.side != side {
            return Err(BookError::SideMismatch {
                id: order.id,
                expected: order.side,
                actual: side,
            });
        }
        Ok(())
    }

    #[inline]
    fn check_price(&self, oh: OrderHandle, price: u64) -> Result<()> {
        let order = &self.orders[oh].order;
        if order.price != price {
            return Err(BookError::PriceMismatch {
                id: order.id,
                expected: order.price,
                actual: price,
            });
        }
        Ok(())
    }

    /// Reject before mutating if swapping `leaving` for `arriving` at the
    /// (side, price) level would overflow its total size.
    fn check_level_room(&self, id: u64, side: Side, price: u64, leaving: u64, arriving: u64) -> Result<()> {
        let total = self.level(side, price).map_or(0, |level| level.total_size);
        match (total - leaving).checked_add(arriving) {
            Some(_) => Ok(()),
            None => Err(BookError::SizeOverflow { id, price }),
        }
    }

    #[inline]
    fn side_count_mut(&mut self, side: Side) -> &mut usize {
        match side {
            Side::Bid => &mut self.bid_count,
            Side::Ask => &mut self.ask_count,
        }
    }

    #[inline]
    fn accept(&mut self, timestamp: u64) {
        self.last_timestamp = timestamp;
        self.message_count.increment();
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Highest bid level, `None` if there are no bids
    #[inline]
    pub fn get_best_bid(&self) -> Option<&PriceLevel> {
        self.bids.values().next().map(|&lh| &self.levels[lh])
    }

    /// Lowest ask level, `None` if there are no asks
    #[inline]
    pub fn get_best_ask(&self) -> Option<&PriceLevel> {
        self.asks.values().next().map(|&lh| &self.levels[lh])
    }

    #[inline]
    pub fn get_best_bid_price(&self) -> Option<u64> {
        self.bids.keys().next().map(|r| r.0)
    }

    #[inline]
    pub fn get_best_ask_price(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    /// Best ask minus best bid, `None` if a side is empty or the book is crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.get_best_bid_price(), self.get_best_ask_price()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    // ========================================================================
    // Counts and lookup
    // ========================================================================

    /// Total resting orders across both sides
    #[inline]
    pub fn get_count(&self) -> usize {
        self.bid_count + self.ask_count
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bid_count
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.ask_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_index.is_empty()
    }

    /// Number of bid price levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask price levels
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    #[inline]
    pub fn contains_order(&self, id: u64) -> bool {
        self.order_index.contains_key(&id)
    }

    #[inline]
    pub fn get_order(&self, id: u64) -> Option<&Order> {
        self.order_index.get(&id).map(|&oh| &self.orders[oh].order)
    }

    /// The level at (side, price), if any orders rest there
    #[inline]
    pub fn level(&self, side: Side, price: u64) -> Option<&PriceLevel> {
        self.level_index.get(&(side, price)).map(|&lh| &self.levels[lh])
    }

    /// Orders at (side, price), oldest first
    pub fn level_orders(&self, side: Side, price: u64) -> LevelIter<'_> {
        match self.level(side, price) {
            Some(level) => level.iter(&self.orders),
            None => LevelIter::empty(&self.orders),
        }
    }

    /// Levels on one side, best first
    pub fn iter_levels(&self, side: Side) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.level_handles(side).map(move |(_, lh)| &self.levels[lh])
    }

    /// Top `n` levels on one side, best first
    pub fn depth(&self, side: Side, n: usize) -> Vec<LevelQuote> {
        self.iter_levels(side).take(n).map(PriceLevel::quote).collect()
    }

    fn level_handles(&self, side: Side) -> Box<dyn Iterator<Item = (u64, LevelHandle)> + '_> {
        match side {
            Side::Bid => Box::new(self.bids.iter().map(|(Reverse(price), &lh)| (*price, lh))),
            Side::Ask => Box::new(self.asks.iter().map(|(&price, &lh)| (price, lh))),
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Shareable handle to the accepted-event counter
    pub fn message_counter(&self) -> MessageCounter {
        self.message_count.clone()
    }

    #[inline]
    pub fn message_count(&self) -> u64 {
        self.message_count.get()
    }

    #[inline]
    pub fn last_timestamp(&self) -> u64 {
        self.last_timestamp
    }

    /// Allocated order slots
    #[inline]
    pub fn order_capacity(&self) -> usize {
        self.orders.capacity()
    }

    pub fn order_pool_stats(&self) -> PoolStats {
        self.orders.stats()
    }

    pub fn level_pool_stats(&self) -> PoolStats {
        self.levels.stats()
    }

    /// Immutable top-of-book view for other threads
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            timestamp: self.last_timestamp,
            message_count: self.message_count.get(),
            best_bid: self.get_best_bid().map(PriceLevel::quote),
            best_ask: self.get_best_ask().map(PriceLevel::quote),
            bid_count: self.bid_count,
            ask_count: self.ask_count,
        }
    }

    /// SHA-256 over the canonical book contents.
    ///
    /// Covers every level (side, price, aggregates) in price order and every
    /// order (id, size) in queue order. Timestamps and the message counter
    /// are excluded, so two books holding the same orders in the same
    /// priority hash identically.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.bid_count as u64).to_le_bytes());
        hasher.update((self.ask_count as u64).to_le_bytes());

        for side in [Side::Bid, Side::Ask] {
            for level in self.iter_levels(side) {
                hasher.update([side.to_u8()]);
                hasher.update(level.price.to_le_bytes());
                hasher.update(level.total_size.to_le_bytes());
                hasher.update((level.order_count as u64).to_le_bytes());
                for order in level.iter(&self.orders) {
                    hasher.update(order.id.to_le_bytes());
                    hasher.update(order.size.to_le_bytes());
                }
            }
        }

        hasher.finalize().into()
    }

    /// [`state_root`](Self::state_root) as lowercase hex
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }

    /// Audit every index and aggregate.
    ///
    /// O(n) in resting orders; meant for tests and debugging.
    ///
    /// # Errors
    ///
    /// [`BookError::Inconsistent`] describing the first violation found
    pub fn validate(&self) -> Result<()> {
        let mut seen_orders = 0usize;

        for side in [Side::Bid, Side::Ask] {
            let mut side_orders = 0usize;

            for (price, lh) in self.level_handles(side) {
                let level = self.levels.get(lh).ok_or_else(|| {
                    BookError::Inconsistent(format!("{side} level {price} has no pool slot"))
                })?;
                if level.side != side || level.price != price {
                    return Err(BookError::Inconsistent(format!(
                        "{side} level keyed at {price} holds {} {}",
                        level.side, level.price
                    )));
                }
                if level.is_empty() {
                    return Err(BookError::Inconsistent(format!(
                        "empty {side} level {price} still indexed"
                    )));
                }
                if self.level_index.get(&(side, price)) != Some(&lh) {
                    return Err(BookError::Inconsistent(format!(
                        "{side} level {price} missing from level index"
                    )));
                }

                let mut count = 0usize;
                let mut total = 0u64;
                let mut prev: Option<OrderHandle> = None;
                let mut cursor = level.head;

                while let Some(oh) = cursor {
                    let node = self.orders.get(oh).ok_or_else(|| {
                        BookError::Inconsistent(format!("{side} level {price} links a free slot"))
                    })?;
                    if node.prev != prev {
                        return Err(BookError::Inconsistent(format!(
                            "order {} has a broken back link",
                            node.order_id()
                        )));
                    }
                    if node.level != lh || node.side() != side || node.price() != price {
                        return Err(BookError::Inconsistent(format!(
                            "order {} queued at {side} {price} but records {} {}",
                            node.order_id(),
                            node.side(),
                            node.price()
                        )));
                    }
                    if node.size() == 0 {
                        return Err(BookError::Inconsistent(format!(
                            "order {} rests with zero size",
                            node.order_id()
                        )));
                    }
                    if self.order_index.get(&node.order_id()) != Some(&oh) {
                        return Err(BookError::Inconsistent(format!(
                            "order {} missing from order index",
                            node.order_id()
                        )));
                    }

                    count += 1;
                    total += node.size();
                    prev = Some(oh);
                    cursor = node.next;

                    if count > self.orders.len() {
                        return Err(BookError::Inconsistent(format!(
                            "{side} level {price} queue has a cycle"
                        )));
                    }
                }

                if level.tail != prev {
                    return Err(BookError::Inconsistent(format!(
                        "{side} level {price} tail does not match its last order"
                    )));
                }
                if count != level.order_count || total != level.total_size {
                    return Err(BookError::Inconsistent(format!(
                        "{side} level {price} aggregates ({}, {}) disagree with queue ({count}, {total})",
                        level.order_count, level.total_size
                    )));
                }
                side_orders += count;
            }

            let expected = match side {
                Side::Bid => self.bid_count,
                Side::Ask => self.ask_count,
            };
            if side_orders != expected {
                return Err(BookError::Inconsistent(format!(
                    "{side} count is {expected} but {side_orders} orders are queued"
                )));
            }
            seen_orders += side_orders;
        }

        if seen_orders != self.order_index.len() || seen_orders != self.orders.len() {
            return Err(BookError::Inconsistent(format!(
                "{seen_orders} queued orders, {} indexed, {} pooled",
                self.order_index.len(),
                self.orders.len()
            )));
        }
        let ordered_levels = self.bids.len() + self.asks.len();
        if ordered_levels != self.level_index.len() || ordered_levels != self.levels.len() {
            return Err(BookError::Inconsistent(format!(
                "{ordered_levels} ordered levels, {} indexed, {} pooled",
                self.level_index.len(),
                self.levels.len()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
