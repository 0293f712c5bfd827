//! Fixed-point price and quantity conversion at the feed boundary.
//!
//! ## Overview
//!
//! Prices inside the book are `u64` ticks scaled by 10^8. Feeds hand us
//! decimal strings or `f64` values; both are converted here, once, so that
//! level keys compare exactly and hash consistently.
//!
//! ## Examples
//!
//! ```
//! use replay_book::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("100.25").unwrap();
//! assert_eq!(price, 10_025_000_000);
//! assert_eq!(from_fixed(price), "100.25000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point prices: 10^8
pub const SCALE: u64 = 100_000_000;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point ticks.
///
/// Returns `None` for unparseable, negative or out-of-range input.
///
/// ```
/// use replay_book::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-3"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s.trim()).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert an `f64` feed price to fixed-point ticks.
///
/// The value is rounded to the nearest tick, so `99.99` and
/// `99.99000000000001` land on the same level.
///
/// ```
/// use replay_book::types::price::from_f64;
///
/// assert_eq!(from_f64(99.99), Some(9_999_000_000));
/// assert_eq!(from_f64(f64::NAN), None);
/// ```
pub fn from_f64(value: f64) -> Option<u64> {
    if !value.is_finite() {
        return None;
    }
    let decimal = Decimal::from_f64(value)?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point ticks.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    let rounded = scaled.round_dp(0);
    rounded.to_u64()
}

/// Convert fixed-point ticks back to a Decimal.
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Lossy conversion for plotting and log output.
pub fn fixed_to_f64(value: u64) -> f64 {
    fixed_to_decimal(value).to_f64().unwrap_or(f64::NAN)
}

/// Convert fixed-point ticks to a string with 8 decimal places.
///
/// ```
/// use replay_book::types::price::from_fixed;
///
/// assert_eq!(from_fixed(100_000_000), "1.00000000");
/// ```
pub fn from_fixed(value: u64) -> String {
    let decimal = fixed_to_decimal(value);
    format!("{:.8}", decimal)
}

/// Convert fixed-point ticks to a string with trailing zeros trimmed.
///
/// ```
/// use replay_book::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    let decimal = fixed_to_decimal(value);
    format!("{}", decimal.normalize())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_basic() {
        assert_eq!(to_fixed("1"), Some(100_000_000));
        assert_eq!(to_fixed("0.5"), Some(50_000_000));
        assert_eq!(to_fixed(" 100.25 "), Some(10_025_000_000));
        assert_eq!(to_fixed("50000.12345678"), Some(5_000_012_345_678));
    }

    #[test]
    fn test_to_fixed_edge_cases() {
        assert_eq!(to_fixed("0"), Some(0));
        assert_eq!(to_fixed("-0"), Some(0));
        assert_eq!(to_fixed("-1.0"), None);
        assert_eq!(to_fixed("abc"), None);
        assert_eq!(to_fixed(""), None);
    }

    #[test]
    fn test_sub_tick_rounding() {
        // 9 decimal places rounds to the nearest 10^-8 tick
        assert_eq!(to_fixed("1.000000004"), Some(100_000_000));
        assert_eq!(to_fixed("1.000000006"), Some(100_000_001));
    }

    #[test]
    fn test_from_f64_matches_string_form() {
        for (f, s) in [(99.99, "99.99"), (0.1, "0.1"), (4577.25, "4577.25")] {
            assert_eq!(from_f64(f), to_fixed(s), "mismatch for {}", s);
        }
        // Accumulated float drift still lands on the same tick
        assert_eq!(from_f64(0.1 + 0.2), to_fixed("0.3"));
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert_eq!(from_f64(f64::INFINITY), None);
        assert_eq!(from_f64(f64::NAN), None);
        assert_eq!(from_f64(-2.5), None);
    }

    #[test]
    fn test_from_fixed() {
        assert_eq!(from_fixed(1), "0.00000001");
        assert_eq!(from_fixed(5_000_012_345_678), "50000.12345678");
        assert_eq!(from_fixed(0), "0.00000000");
        assert_eq!(from_fixed_trimmed(100_000_000), "1");
        assert_eq!(from_fixed_trimmed(123_456_789), "1.23456789");
    }

    #[test]
    fn test_fixed_to_f64() {
        assert_eq!(fixed_to_f64(10_025_000_000), 100.25);
    }
}
