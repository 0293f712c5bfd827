//! Replay driver: pulls events from a source and pushes them into the book.
//!
//! ## Flow
//!
//! ```text
//! HistoricalDataSource ──next_event──> ReplayDriver ──apply──> OrderBook
//!                                           │
//!                                           ├── on_trade / on_progress / on_error ──> ReplayObserver
//!                                           └── publish ──> SnapshotHandle (reader threads)
//! ```
//!
//! Events are applied strictly in source order on the calling thread. A
//! [`ReplayControl`] lets another thread request a stop, which takes effect
//! between events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::{ErrorPolicy, ReplayConfig};
use crate::error::{ReplayError, SourceError};
use crate::orderbook::{EventOutcome, OrderBook};
use crate::replay::{HistoricalDataSource, SnapshotHandle};
use crate::types::{BookSnapshot, TradePrint};

// ============================================================================
// Control
// ============================================================================

/// Stop switch shared between the driver and its controllers.
#[derive(Debug, Clone, Default)]
pub struct ReplayControl(Arc<AtomicBool>);

impl ReplayControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the driver to stop before the next event
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear a previous stop so `run` can continue from the current cursor
    pub fn resume(&self) {
        self.0.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ============================================================================
// Observer
// ============================================================================

/// Presentation hooks. Every method defaults to a no-op.
///
/// Observers run on the replay thread; they see the book only through the
/// values they are handed.
pub trait ReplayObserver {
    /// A replayed execution with non-zero traded size
    fn on_trade(&mut self, _trade: &TradePrint) {}

    /// A snapshot was published
    fn on_snapshot(&mut self, _snapshot: &BookSnapshot) {}

    /// Replay position changed to a new whole percent (needs a length hint)
    fn on_progress(&mut self, _percent: u8) {}

    /// An event was rejected or the source failed
    fn on_error(&mut self, _error: &ReplayError) {}

    /// The run ended normally or by stop request
    fn on_finished(&mut self, _summary: &ReplaySummary) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ReplayObserver for NullObserver {}

// ============================================================================
// Summary
// ============================================================================

/// Counters for one call to [`ReplayDriver::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Records pulled from the source, good or bad
    pub events_read: u64,

    /// Events the book accepted
    pub events_applied: u64,

    /// Records skipped under [`ErrorPolicy::SkipAndContinue`]
    pub events_rejected: u64,

    /// Trades with non-zero traded size
    pub trades: u64,

    /// Sum of traded sizes
    pub traded_volume: u64,

    /// Trades that exceeded the resting size and were clamped
    pub overfills: u64,

    /// Whether the run ended on a stop request
    pub stopped: bool,

    /// Source cursor after the run
    pub final_cursor: u64,

    /// Book state at the end of the run
    pub snapshot: BookSnapshot,

    /// [`OrderBook::state_root`] at the end of the run
    pub state_root: [u8; 32],
}

impl ReplaySummary {
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Owns a source and a book and replays one into the other.
///
/// ```
/// use replay_book::{OrderBook, Side};
/// use replay_book::config::ReplayConfig;
/// use replay_book::replay::{ReplayDriver, VecSource};
/// use replay_book::types::MarketEvent;
///
/// let source = VecSource::new(vec![
///     MarketEvent::add(1, Side::Ask, 10_100_000_000, 5, 1),
///     MarketEvent::trade(1, Side::Ask, 10_100_000_000, 2, 2),
/// ]);
/// let mut driver = ReplayDriver::new(source, OrderBook::new(), ReplayConfig::default());
///
/// let summary = driver.run().unwrap();
/// assert_eq!(summary.events_applied, 2);
/// assert_eq!(driver.book().get_order(1).unwrap().size, 3);
/// ```
#[derive(Debug)]
pub struct ReplayDriver<S> {
    source: S,
    book: OrderBook,
    config: ReplayConfig,
    control: ReplayControl,
    snapshots: SnapshotHandle,
}

impl<S: HistoricalDataSource> ReplayDriver<S> {
    pub fn new(source: S, book: OrderBook, config: ReplayConfig) -> Self {
        Self {
            source,
            book,
            config,
            control: ReplayControl::new(),
            snapshots: SnapshotHandle::new(),
        }
    }

    /// Handle for stopping the replay from another thread
    pub fn control(&self) -> ReplayControl {
        self.control.clone()
    }

    /// Handle for reading published snapshots from another thread
    pub fn snapshots(&self) -> SnapshotHandle {
        self.snapshots.clone()
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Reposition the source. The book is not rewound.
    pub fn seek(&mut self, cursor: u64) -> Result<(), ReplayError> {
        self.source.seek(cursor)?;
        Ok(())
    }

    /// Replay to the end of the source or a stop request, without an observer.
    pub fn run(&mut self) -> Result<ReplaySummary, ReplayError> {
        self.run_with(&mut NullObserver)
    }

    /// Replay to the end of the source or a stop request.
    ///
    /// # Errors
    ///
    /// Under [`ErrorPolicy::Abort`], the first rejected event or bad record.
    /// An I/O failure of the source is returned under either policy.
    pub fn run_with<O>(&mut self, observer: &mut O) -> Result<ReplaySummary, ReplayError>
    where
        O: ReplayObserver + ?Sized,
    {
        let total = self.source.len_hint().filter(|&n| n > 0);
        let interval = self.config.snapshot_interval;
        let mut summary = ReplaySummary::default();
        let mut last_percent: Option<u8> = None;

        info!(
            cursor = self.source.cursor(),
            total = ?total,
            policy = ?self.config.error_policy,
            "replay started"
        );

        loop {
            if self.control.is_stopped() {
                summary.stopped = true;
                info!(cursor = self.source.cursor(), "replay stop requested");
                break;
            }

            let cursor = self.source.cursor();
            let record = match self.source.next_event() {
                Some(record) => record,
                None => break,
            };
            summary.events_read += 1;

            match record {
                Ok(event) => match self.book.apply(&event) {
                    Ok(outcome) => {
                        summary.events_applied += 1;
                        if let EventOutcome::Traded(trade) = &outcome {
                            if trade.overfill > 0 {
                                summary.overfills += 1;
                            }
                            if trade.traded > 0 {
                                summary.trades += 1;
                                summary.traded_volume = summary.traded_volume.saturating_add(trade.traded);
                                observer.on_trade(&trade.print(event.timestamp));
                            }
                        }
                        if interval > 0 && summary.events_applied % interval == 0 {
                            self.publish(observer);
                        }
                    }
                    Err(source) => {
                        self.reject(ReplayError::Book { cursor, source }, &mut summary, observer)?
                    }
                },
                Err(err) => self.reject(ReplayError::Source(err), &mut summary, observer)?,
            }

            if let Some(total) = total {
                let done = self.source.cursor().min(total);
                let percent = (done * 100 / total) as u8;
                if last_percent != Some(percent) {
                    last_percent = Some(percent);
                    observer.on_progress(percent);
                }
            }
        }

        self.publish(observer);
        summary.final_cursor = self.source.cursor();
        summary.snapshot = self.book.snapshot();
        summary.state_root = self.book.state_root();

        info!(
            read = summary.events_read,
            applied = summary.events_applied,
            rejected = summary.events_rejected,
            trades = summary.trades,
            orders = self.book.get_count(),
            stopped = summary.stopped,
            "replay finished"
        );
        observer.on_finished(&summary);
        Ok(summary)
    }

    fn publish<O: ReplayObserver + ?Sized>(&self, observer: &mut O) {
        let snapshot = self.book.snapshot();
        observer.on_snapshot(&snapshot);
        self.snapshots.publish(snapshot);
    }

    fn reject<O: ReplayObserver + ?Sized>(
        &self,
        err: ReplayError,
        summary: &mut ReplaySummary,
        observer: &mut O,
    ) -> Result<(), ReplayError> {
        let fatal = matches!(err, ReplayError::Source(SourceError::Io(_)));
        observer.on_error(&err);

        if fatal || self.config.error_policy == ErrorPolicy::Abort {
            error!(%err, "replay aborted");
            self.publish(observer);
            return Err(err);
        }

        warn!(%err, "event skipped");
        summary.events_rejected += 1;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
