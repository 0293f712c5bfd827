//! Replay Book - Binary Entry Point
//!
//! Replays a seeded synthetic MBO stream through the driver and prints the
//! resulting book. Set `RUST_LOG` to change verbosity (default `info`).

use std::time::Instant;

use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use replay_book::config::{BookConfig, ReplayConfig};
use replay_book::replay::{ReplayDriver, ReplayObserver, ReplaySummary, SyntheticConfig, SyntheticSource};
use replay_book::types::price;
use replay_book::{BookSnapshot, OrderBook, ReplayError, Side, TradePrint};

const DEMO_SEED: u64 = 42;
const DEMO_EVENTS: u64 = 250_000;

/// Observer that forwards driver callbacks to the log.
#[derive(Default)]
struct LogObserver {
    trades: u64,
    errors: u64,
}

impl ReplayObserver for LogObserver {
    fn on_trade(&mut self, trade: &TradePrint) {
        self.trades += 1;
        debug!(
            ts = trade.timestamp,
            side = %trade.side,
            price = %price::from_fixed_trimmed(trade.price),
            size = trade.size,
            "trade"
        );
    }

    fn on_snapshot(&mut self, snapshot: &BookSnapshot) {
        debug!(
            messages = snapshot.message_count,
            bid = ?snapshot.best_bid_price(),
            ask = ?snapshot.best_ask_price(),
            "snapshot"
        );
    }

    fn on_progress(&mut self, percent: u8) {
        if percent % 10 == 0 {
            info!(percent, "replay progress");
        }
    }

    fn on_error(&mut self, error: &ReplayError) {
        self.errors += 1;
        warn!(%error, "replay error");
    }

    fn on_finished(&mut self, summary: &ReplaySummary) {
        info!(trades = self.trades, errors = self.errors, root = %summary.state_root_hex(), "replay done");
    }
}

fn print_side(book: &OrderBook, side: Side, levels: usize) {
    for quote in book.depth(side, levels) {
        println!(
            "  {:<4} {:>14} x {:>8}  ({} orders)",
            side,
            price::from_fixed_trimmed(quote.price),
            quote.size,
            quote.order_count
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("===========================================");
    println!("  Replay Book - MBO Reconstruction");
    println!("===========================================");
    println!();

    let stream = SyntheticConfig::new(DEMO_SEED, DEMO_EVENTS)
        .with_depth(25)
        .with_invalid_ratio(0.0005);
    let book_config = BookConfig::new(1 << 14).with_level_capacity(64);
    let replay_config = ReplayConfig::default().with_snapshot_interval(10_000);

    let mut observer = LogObserver::default();
    let mut driver = ReplayDriver::new(
        SyntheticSource::new(stream.clone()),
        OrderBook::with_config(book_config.clone()),
        replay_config.clone(),
    );

    let start = Instant::now();
    let summary = driver.run_with(&mut observer)?;
    let elapsed = start.elapsed();
    driver.book().validate()?;

    let book = driver.book();
    println!("Replayed {} events in {:.3?}", summary.events_read, elapsed);
    println!(
        "  Throughput: {:.0} events/sec",
        summary.events_read as f64 / elapsed.as_secs_f64()
    );
    println!("  Applied:    {}", summary.events_applied);
    println!("  Rejected:   {}", summary.events_rejected);
    println!("  Trades:     {} ({} volume, {} clamped)", summary.trades, summary.traded_volume, summary.overfills);
    println!();
    println!(
        "Book: {} orders ({} bids / {} asks) across {} + {} levels",
        book.get_count(),
        book.bid_count(),
        book.ask_count(),
        book.bid_levels(),
        book.ask_levels()
    );
    if let Some(spread) = book.spread() {
        println!("  Spread: {}", price::from_fixed_trimmed(spread));
    }
    print_side(book, Side::Ask, 5);
    print_side(book, Side::Bid, 5);
    println!();
    println!("State root: {}", summary.state_root_hex());

    // Replaying the same stream must land on the same book
    let mut again = ReplayDriver::new(
        SyntheticSource::new(stream),
        OrderBook::with_config(book_config),
        replay_config,
    );
    let second = again.run()?;
    println!(
        "Determinism: {}",
        if second.state_root == summary.state_root { "OK" } else { "MISMATCH" }
    );

    Ok(())
}
