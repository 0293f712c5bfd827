//! Order book reconstruction for an MBO feed.
//!
//! ## Architecture
//!
//! The book replays individual order events (add, modify, trade, remove)
//! into a price-time view of resting liquidity:
//!
//! - **Slab-based storage**: orders and levels live in pools, addressed by handle
//! - **Price levels**: one FIFO queue per (side, price), sorted by BTreeMap
//! - **Hash indices**: order id and (side, price) lookups in O(1)
//!
//! ## Components
//!
//! - [`OrderNode`]: `Order` plus its queue links and owning level
//! - [`PriceLevel`]: queue and aggregates at a single price point
//! - [`OrderPool`] / [`LimitPool`]: slot reuse for orders and levels
//! - [`MessageCounter`]: accepted-event count, shareable across threads
//! - [`OrderBook`]: the reconstructed book
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add order (existing level) | O(1) |
//! | Add order (new level) | O(log L) |
//! | Modify / trade / remove | O(1), O(log L) if a level is created or released |
//! | Best bid/ask | O(log L) |
//!
//! L is the number of price levels on a side.

pub mod book;
pub mod counter;
pub mod level;
pub mod node;
pub mod pool;

pub use book::{EventOutcome, ModifyOutcome, OrderBook, TradeOutcome};
pub use counter::MessageCounter;
pub use level::{LevelIter, PriceLevel};
pub use node::OrderNode;
pub use pool::{LevelHandle, LimitPool, OrderHandle, OrderPool, PoolStats};
