//! Trade prints forwarded to presentation consumers.
//!
//! The book never matches; a print is the replayed record of an execution
//! that already happened upstream against a resting order.

use serde::{Deserialize, Serialize};

use super::order::Side;
use super::price::fixed_to_f64;

/// An executed trade as seen by a trade log or chart.
///
/// `side` is the side of the resting order that was consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePrint {
    /// Feed timestamp of the trade event (nanoseconds)
    pub timestamp: u64,

    /// Resting order that was hit
    pub order_id: u64,

    /// Side of the resting order
    pub side: Side,

    /// Execution price in fixed-point ticks
    pub price: u64,

    /// Executed quantity (after clamping to the resting size)
    pub size: u64,
}

impl TradePrint {
    /// Create a new trade print
    pub fn new(timestamp: u64, order_id: u64, side: Side, price: u64, size: u64) -> Self {
        Self {
            timestamp,
            order_id,
            side,
            price,
            size,
        }
    }

    /// Price times size in raw fixed-point units (scaled by 10^8).
    pub fn notional_raw(&self) -> u128 {
        (self.price as u128) * (self.size as u128)
    }

    /// Price as a float, for plotting only.
    pub fn price_f64(&self) -> f64 {
        fixed_to_f64(self.price)
    }
}
