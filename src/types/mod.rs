//! Core data types for the replay book.
//!
//! All prices use fixed-point representation (u64 ticks scaled by 10^8).
//!
//! ## Types
//!
//! - [`Order`]: A resting limit order
//! - [`Side`]: Bid or Ask
//! - [`MarketEvent`] / [`Action`]: One feed event
//! - [`TradePrint`]: A replayed execution for trade logs
//! - [`BookSnapshot`]: Immutable top-of-book view for reader threads

mod event;
mod order;
mod snapshot;
mod trade;
pub mod price;

pub use event::{Action, MarketEvent};
pub use order::{Order, Side};
pub use snapshot::{BookSnapshot, LevelQuote};
pub use trade::TradePrint;
