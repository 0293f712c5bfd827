//! # Replay Book
//!
//! Market-by-order limit order book reconstruction from historical event
//! streams.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Order, MarketEvent, TradePrint, BookSnapshot)
//! - **OrderBook**: Price-time book with slab-pooled orders and levels
//! - **Replay**: Event sources, the replay driver and presentation hooks
//!
//! ## Design Principles
//!
//! 1. **Determinism**: The same event stream always rebuilds the same book
//! 2. **No Floating Point**: Prices are fixed-point ticks (10^8 scaling) inside the book
//! 3. **Pre-allocated Memory**: Slab pools for orders and price levels
//! 4. **Synchronous Execution**: Single writer, no locks on the hot path
//!
//! ## Example
//!
//! ```
//! use replay_book::config::ReplayConfig;
//! use replay_book::replay::{ReplayDriver, SyntheticConfig, SyntheticSource};
//! use replay_book::OrderBook;
//!
//! let source = SyntheticSource::new(SyntheticConfig::new(1, 1_000));
//! let mut driver = ReplayDriver::new(source, OrderBook::new(), ReplayConfig::default());
//!
//! let summary = driver.run().unwrap();
//! assert_eq!(summary.events_applied, 1_000);
//! driver.book().validate().unwrap();
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, MarketEvent, TradePrint, BookSnapshot
pub mod types;

/// Order book: slab-pooled levels and orders with dual indices
pub mod orderbook;

/// Error types for the book, sources and replay
pub mod error;

/// Book and replay configuration
pub mod config;

/// Historical replay: sources, driver, observers
pub mod replay;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{BookConfig, ErrorPolicy, ModifyPriorityPolicy, ReplayConfig};
pub use error::{BookError, ReplayError, SourceError};
pub use orderbook::{EventOutcome, ModifyOutcome, OrderBook, PriceLevel, TradeOutcome};
pub use replay::{HistoricalDataSource, ReplayDriver, ReplayObserver, ReplaySummary};
pub use types::{Action, BookSnapshot, MarketEvent, Order, Side, TradePrint};
