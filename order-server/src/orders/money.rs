//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done with `Decimal` internally, then
//! converted back to `f64` for storage and serialization. Never add or
//! multiply the raw `f64` values directly.

use rust_decimal::prelude::*;
use shared::order::OrderLine;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round a raw f64 amount to 2 decimal places
pub fn round(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Line total = unit price × quantity
pub fn line_total(unit_price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Order totals derived from line items.
///
/// Tax is flat zero for now; the shape stays so a tax model can slot in
/// without touching callers. Returns `(subtotal, tax, total)`.
pub fn order_totals(lines: &[OrderLine]) -> (f64, f64, f64) {
    let subtotal: Decimal = lines.iter().map(|line| to_decimal(line.line_total)).sum();
    let tax = Decimal::ZERO;
    let total = subtotal + tax;
    (to_f64(subtotal), to_f64(tax), to_f64(total))
}
