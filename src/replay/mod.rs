//! Historical replay: sources, the driver, and the presentation seams.
//!
//! ## Components
//!
//! - [`HistoricalDataSource`]: cursor-addressed event feed
//! - [`VecSource`] / [`JsonLinesSource`]: in-memory and newline-delimited JSON feeds
//! - [`SyntheticSource`]: seeded generator of a self-consistent stream
//! - [`ReplayDriver`]: applies events to an [`OrderBook`](crate::OrderBook) under an error policy
//! - [`ReplayObserver`]: trade, snapshot, progress and error callbacks
//! - [`SnapshotHandle`] / [`ReplayControl`]: cross-thread read and stop

mod driver;
mod snapshot;
mod source;
mod synthetic;

pub use driver::{NullObserver, ReplayControl, ReplayDriver, ReplayObserver, ReplaySummary};
pub use snapshot::SnapshotHandle;
pub use source::{HistoricalDataSource, JsonLinesSource, VecSource};
pub use synthetic::{SyntheticConfig, SyntheticSource};
