// src/utils/precision.rs
use rust_decimal::Decimal;

/// Rounds a quantity DOWN to the nearest multiple of `step_size`.
/// Example: amount=10.999, step=1.0 -> 10.0
///
/// A zero or negative step leaves the amount untouched.
pub fn normalize_quantity(amount: Decimal, step_size: Decimal) -> Decimal {
    if step_size <= Decimal::ZERO {
        return amount;
    }
    (amount / step_size).floor() * step_size
}
