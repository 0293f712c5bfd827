//! Stress tests for the replay book.
//!
//! These tests verify:
//! 1. Replay throughput targets are met in release builds
//! 2. The book stays consistent under long random streams
//! 3. Determinism is preserved across runs
//! 4. Pool memory stays bounded under churn
//!
//! ## Running Stress Tests
//!
//! ```bash
//! # Run all stress tests (release mode recommended)
//! cargo test --release --test stress_test -- --nocapture
//!
//! # Run specific test
//! cargo test --release --test stress_test stress_1m_events -- --nocapture
//! ```

use std::time::Instant;

use replay_book::config::{BookConfig, ReplayConfig};
use replay_book::replay::{ReplayDriver, SyntheticConfig, SyntheticSource};
use replay_book::{HistoricalDataSource, OrderBook, Side};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Number of events for the 1M stress test
const STRESS_EVENT_COUNT: u64 = 1_000_000;

/// Target throughput (events per second), checked in release builds only
const TARGET_THROUGHPUT: f64 = 500_000.0;

/// Maximum allowed time for 1M events (seconds), checked in release builds only
const MAX_TIME_SECONDS: f64 = 10.0;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Replay a seeded synthetic stream and return the final state root.
fn run_deterministic_sequence(seed: u64, count: u64) -> [u8; 32] {
    let source = SyntheticSource::new(SyntheticConfig::new(seed, count));
    let mut driver = ReplayDriver::new(source, OrderBook::new(), ReplayConfig::default());
    let summary = driver.run().expect("synthetic stream replays cleanly");
    summary.state_root
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Main stress test: replay 1 million events.
///
/// # Verification
/// - No rejections on a self-consistent stream
/// - Book agrees with the generator's own order count
/// - Full invariant audit passes at the end
#[test]
fn stress_1m_events() {
    println!("\n=== STRESS TEST: 1 Million Events ===\n");

    let config = SyntheticConfig::new(42, STRESS_EVENT_COUNT).with_max_orders(50_000);
    let mut source = SyntheticSource::new(config);
    let mut book = OrderBook::with_config(BookConfig::new(1 << 16).with_level_capacity(128));

    println!("Replaying {} events (seed=42)...", STRESS_EVENT_COUNT);
    let start = Instant::now();
    let mut trades = 0u64;
    while let Some(record) = source.next_event() {
        let event = record.expect("synthetic source never fails");
        if let replay_book::EventOutcome::Traded(_) = book.apply(&event).expect("event accepted") {
            trades += 1;
        }
    }
    let elapsed = start.elapsed();

    let throughput = STRESS_EVENT_COUNT as f64 / elapsed.as_secs_f64();
    let avg_latency_us = elapsed.as_secs_f64() * 1_000_000.0 / STRESS_EVENT_COUNT as f64;

    println!("\n=== RESULTS ===");
    println!("  Events processed:  {:>12}", STRESS_EVENT_COUNT);
    println!("  Trades replayed:   {:>12}", trades);
    println!("  Final book size:   {:>12}", book.get_count());
    println!("  Bid count:         {:>12}", book.bid_count());
    println!("  Ask count:         {:>12}", book.ask_count());
    println!();
    println!("  Elapsed time:      {:>12.2?}", elapsed);
    println!("  Throughput:        {:>12.0} events/sec", throughput);
    println!("  Avg latency:       {:>12.2} μs/event", avg_latency_us);
    println!();
    println!("  State root:        {}", book.state_root_hex());

    assert_eq!(book.message_count(), STRESS_EVENT_COUNT);
    assert_eq!(book.get_count(), source.live_orders());
    assert!(trades > 0, "Expected some trades in the stream");
    book.validate().expect("book consistent after stress run");

    if !cfg!(debug_assertions) {
        assert!(
            throughput >= TARGET_THROUGHPUT,
            "Throughput {:.0}/sec below target {:.0}/sec",
            throughput,
            TARGET_THROUGHPUT
        );
        assert!(
            elapsed.as_secs_f64() <= MAX_TIME_SECONDS,
            "Took {:.2}s, limit {:.1}s",
            elapsed.as_secs_f64(),
            MAX_TIME_SECONDS
        );
    }

    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Same seed, same book. Different seed, different book.
#[test]
fn verify_determinism() {
    println!("\n=== DETERMINISM TEST ===\n");

    const TEST_COUNT: u64 = 50_000;
    const SEED: u64 = 12345;

    let root1 = run_deterministic_sequence(SEED, TEST_COUNT);
    let root2 = run_deterministic_sequence(SEED, TEST_COUNT);
    println!("  Run 1 state root: {}", hex::encode(root1));
    println!("  Run 2 state root: {}", hex::encode(root2));
    assert_eq!(root1, root2, "State roots must match for determinism");

    let root3 = run_deterministic_sequence(SEED + 1, TEST_COUNT);
    println!("  Different seed:   {}", hex::encode(root3));
    assert_ne!(root1, root3, "Different seeds should produce different roots");

    println!("\n=== DETERMINISM VERIFIED ===\n");
}

/// Throughput at increasing stream lengths.
#[test]
fn stress_scaling() {
    println!("\n=== SCALING TEST ===\n");

    println!("{:>12} {:>12} {:>14} {:>12}", "Events", "Time", "Throughput", "Orders");
    println!("{:-<12} {:-<12} {:-<14} {:-<12}", "", "", "", "");

    for &count in &[10_000u64, 50_000, 100_000, 250_000] {
        let events = SyntheticSource::new(SyntheticConfig::new(7, count)).into_events();
        let mut book = OrderBook::with_capacity(16_384);

        let start = Instant::now();
        for event in &events {
            book.apply(event).expect("event accepted");
        }
        let elapsed = start.elapsed();

        println!(
            "{:>12} {:>12.2?} {:>14.0} {:>12}",
            count,
            elapsed,
            count as f64 / elapsed.as_secs_f64(),
            book.get_count()
        );
        assert_eq!(book.message_count(), count);
    }

    println!("\n=== SCALING TEST COMPLETE ===\n");
}

/// Cancel-heavy stream: every add is followed by its remove.
#[test]
fn stress_cancellations() {
    println!("\n=== CANCELLATION STRESS TEST ===\n");

    const ORDERS: u64 = 200_000;
    let mut book = OrderBook::with_capacity(1_024);
    let base: u64 = 10_000_000_000;

    let start = Instant::now();
    for id in 0..ORDERS {
        let side = if id % 2 == 0 { Side::Bid } else { Side::Ask };
        let price = match side {
            Side::Bid => base - (id % 100) * 1_000_000,
            Side::Ask => base + (id % 100 + 1) * 1_000_000,
        };
        book.add_limit_order(id, price, 10, side, id).expect("add accepted");
        if id >= 500 {
            // Cancel the order placed 500 events ago
            let old = id - 500;
            let order = book.get_order(old).cloned().expect("old order still resting");
            book.remove_order(old, order.price, order.size, order.side)
                .expect("remove accepted");
        }
    }
    let elapsed = start.elapsed();

    println!("  Orders placed:     {:>12}", ORDERS);
    println!("  Final book size:   {:>12}", book.get_count());
    println!("  Elapsed time:      {:>12.2?}", elapsed);

    assert_eq!(book.get_count(), 500);
    book.validate().expect("book consistent after cancellations");

    println!("\n=== CANCELLATION TEST PASSED ===\n");
}

/// Pool memory stays bounded under churn: freed slots are reused.
#[test]
fn stress_memory_stability() {
    println!("\n=== MEMORY STABILITY TEST ===\n");

    const EVENTS: u64 = 200_000;
    const MAX_ORDERS: usize = 2_000;

    let config = SyntheticConfig::new(42, EVENTS).with_max_orders(MAX_ORDERS);
    let mut source = SyntheticSource::new(config);
    let mut book = OrderBook::with_capacity(MAX_ORDERS);
    let initial_capacity = book.order_capacity();

    let mut max_size_seen = 0;
    while let Some(record) = source.next_event() {
        book.apply(&record.expect("synthetic source never fails"))
            .expect("event accepted");
        max_size_seen = max_size_seen.max(book.get_count());
    }

    let orders = book.order_pool_stats();
    let levels = book.level_pool_stats();
    println!("  Events:            {:>12}", EVENTS);
    println!("  Max book size:     {:>12}", max_size_seen);
    println!("  Order slots used:  {:>12}", orders.high_water);
    println!("  Level slots used:  {:>12}", levels.high_water);
    println!("  Orders released:   {:>12}", orders.released);

    assert!(max_size_seen <= MAX_ORDERS);
    assert_eq!(orders.high_water, max_size_seen);
    assert_eq!(book.order_capacity(), initial_capacity);
    // Two sides, 50 levels each
    assert!(levels.high_water <= 100);
    assert!(orders.released > 0);

    println!("\n=== MEMORY STABILITY PASSED ===\n");
}
