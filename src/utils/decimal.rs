//! Decimal arithmetic utilities for quote figures.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Round a decimal to a specific number of decimal places.
pub fn round_to_precision(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp(decimals)
}

/// Arithmetic mean of two values.
pub fn mean(a: Decimal, b: Decimal) -> Decimal {
    (a + b) / dec!(2)
}

/// Format a percentage-point value rounded to two decimals, e.g. "15.46%".
pub fn format_pct(value: Decimal) -> String {
    format!("{:.2}%", round_to_precision(value, 2))
}

/// Format a price in rupees, trimming trailing zeros ("₹320.5").
pub fn format_inr(value: Decimal) -> String {
    format!("₹{}", value.normalize())
}
