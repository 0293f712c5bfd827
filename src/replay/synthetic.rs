//! Seeded synthetic MBO feed.
//!
//! Generates a self-consistent event stream: the generator keeps its own
//! record of resting orders, so every modify, trade and remove it emits
//! refers to an order that a correct book still holds. Rejections only
//! appear when `invalid_ratio` is non-zero.
//!
//! Uses a seeded RNG for reproducibility. Same seed = same events.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::replay::HistoricalDataSource;
use crate::types::{MarketEvent, Side};

/// Shape of a synthetic stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// RNG seed
    pub seed: u64,

    /// Events to emit
    pub events: u64,

    /// Centre price in ticks; bids rest below, asks above
    pub mid_price: u64,

    /// Price increment between levels, in ticks
    pub tick: u64,

    /// Levels per side that prices are drawn from
    pub depth: u64,

    /// Largest order size
    pub max_size: u64,

    /// No adds are emitted while this many orders rest
    pub max_orders: usize,

    /// Probability an event is an add (when the book is not empty)
    pub add_ratio: f64,

    /// Probability a trade exceeds the resting size
    pub overfill_ratio: f64,

    /// Probability an event targets an order id that was never added
    pub invalid_ratio: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            events: 100_000,
            mid_price: 10_000_000_000,
            tick: 1_000_000,
            depth: 50,
            max_size: 1_000,
            max_orders: 10_000,
            add_ratio: 0.45,
            overfill_ratio: 0.01,
            invalid_ratio: 0.0,
        }
    }
}

impl SyntheticConfig {
    pub fn new(seed: u64, events: u64) -> Self {
        Self {
            seed,
            events,
            ..Self::default()
        }
    }

    pub fn with_depth(mut self, depth: u64) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_max_orders(mut self, max_orders: usize) -> Self {
        self.max_orders = max_orders;
        self
    }

    pub fn with_add_ratio(mut self, ratio: f64) -> Self {
        self.add_ratio = ratio;
        self
    }

    pub fn with_overfill_ratio(mut self, ratio: f64) -> Self {
        self.overfill_ratio = ratio;
        self
    }

    pub fn with_invalid_ratio(mut self, ratio: f64) -> Self {
        self.invalid_ratio = ratio;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct LiveOrder {
    id: u64,
    side: Side,
    price: u64,
    size: u64,
}

/// [`HistoricalDataSource`] over a generated stream. Seeking regenerates
/// from the seed, so it supports any cursor up to `events`.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    config: SyntheticConfig,
    rng: ChaCha8Rng,
    live: Vec<LiveOrder>,
    next_id: u64,
    emitted: u64,
    timestamp: u64,
}

impl SyntheticSource {
    pub fn new(mut config: SyntheticConfig) -> Self {
        config.tick = config.tick.max(1);
        config.depth = config.depth.max(1);
        config.max_size = config.max_size.max(1);
        config.max_orders = config.max_orders.max(1);

        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            live: Vec::with_capacity(config.max_orders.min(1 << 16)),
            next_id: 1,
            emitted: 0,
            timestamp: 0,
            config,
        }
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Orders a correct book holds after the events emitted so far
    pub fn live_orders(&self) -> usize {
        self.live.len()
    }

    /// Drain the whole stream into memory
    pub fn into_events(mut self) -> Vec<MarketEvent> {
        let mut events = Vec::with_capacity(self.config.events as usize);
        while let Some(Ok(event)) = self.next_event() {
            events.push(event);
        }
        events
    }

    fn chance(&mut self, probability: f64) -> bool {
        probability > 0.0 && self.rng.gen_bool(probability.min(1.0))
    }

    fn random_side(&mut self) -> Side {
        Side::from_is_bid(self.rng.gen_bool(0.5))
    }

    fn random_price(&mut self, side: Side) -> u64 {
        let offset = self.config.tick * self.rng.gen_range(1..=self.config.depth);
        match side {
            Side::Bid => self.config.mid_price.saturating_sub(offset).max(self.config.tick),
            Side::Ask => self.config.mid_price + offset,
        }
    }

    fn random_size(&mut self) -> u64 {
        self.rng.gen_range(1..=self.config.max_size)
    }

    fn generate(&mut self) -> MarketEvent {
        self.timestamp += self.rng.gen_range(1..=1_000);
        let ts = self.timestamp;

        if self.chance(self.config.invalid_ratio) {
            let side = self.random_side();
            let price = self.random_price(side);
            return MarketEvent::remove(u64::MAX - self.emitted, side, price, 1, ts);
        }

        let can_add = self.live.len() < self.config.max_orders;
        if self.live.is_empty() || (can_add && self.chance(self.config.add_ratio)) {
            return self.add(ts);
        }

        let index = self.rng.gen_range(0..self.live.len());
        match self.rng.gen_range(0..3) {
            0 => self.modify(index, ts),
            1 => self.trade(index, ts),
            _ => self.remove(index, ts),
        }
    }

    fn add(&mut self, ts: u64) -> MarketEvent {
        let id = self.next_id;
        self.next_id += 1;
        let side = self.random_side();
        let price = self.random_price(side);
        let size = self.random_size();
        self.live.push(LiveOrder { id, side, price, size });
        MarketEvent::add(id, side, price, size, ts)
    }

    fn modify(&mut self, index: usize, ts: u64) -> MarketEvent {
        let LiveOrder { id, side, price, .. } = self.live[index];
        let price = if self.rng.gen_bool(0.5) {
            self.random_price(side)
        } else {
            price
        };
        let size = self.random_size();

        let order = &mut self.live[index];
        order.price = price;
        order.size = size;
        MarketEvent::modify(id, side, price, size, ts)
    }

    fn trade(&mut self, index: usize, ts: u64) -> MarketEvent {
        let LiveOrder { id, side, price, size } = self.live[index];
        let traded = if self.chance(self.config.overfill_ratio) {
            size + self.random_size()
        } else {
            self.rng.gen_range(1..=size)
        };

        if traded >= size {
            self.live.swap_remove(index);
        } else {
            self.live[index].size -= traded;
        }
        MarketEvent::trade(id, side, price, traded, ts)
    }

    fn remove(&mut self, index: usize, ts: u64) -> MarketEvent {
        let LiveOrder { id, side, price, size } = self.live.swap_remove(index);
        MarketEvent::remove(id, side, price, size, ts)
    }
}

impl HistoricalDataSource for SyntheticSource {
    fn next_event(&mut self) -> Option<Result<MarketEvent, SourceError>> {
        if self.emitted >= self.config.events {
            return None;
        }
        let event = self.generate();
        self.emitted += 1;
        Some(Ok(event))
    }

    fn cursor(&self) -> u64 {
        self.emitted
    }

    fn seek(&mut self, cursor: u64) -> Result<(), SourceError> {
        if cursor > self.config.events {
            return Err(SourceError::SeekUnsupported { cursor });
        }
        if cursor < self.emitted {
            *self = Self::new(self.config.clone());
        }
        while self.emitted < cursor {
            self.generate();
            self.emitted += 1;
        }
        Ok(())
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.config.events)
    }
}
