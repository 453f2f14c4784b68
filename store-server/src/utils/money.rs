//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done in `Decimal` internally and converted to
//! `f64` only at storage/serialization boundaries.

use rust_decimal::prelude::*;
use shared::models::CartLine;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
///
/// Catalog prices are validated non-finite-free at the write boundary. If
/// NaN/Infinity somehow reaches here, logs an error and returns ZERO to
/// avoid silent corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp from bounded catalog prices is
        // always within f64 representable range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Total of a set of cart lines: Σ quantity × price, rounded to 2 decimals
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    let total: Decimal = lines
        .iter()
        .map(|line| Decimal::from(line.quantity) * to_decimal(line.price))
        .sum();
    total.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Compare two monetary values within the 0.01 absolute tolerance.
///
/// A difference of exactly 0.01 still matches; anything beyond is a
/// mismatch.
pub fn money_matches(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff <= MONEY_TOLERANCE
}
