// ============================================================================
// Numeric Module
// Price and quantity representations shared by the book and the policies
// ============================================================================
//
// Prices are exact decimals so that interpolated and averaged transaction
// prices are reproducible across runs. Quantities are whole units.

use rust_decimal::Decimal;

/// Limit and transaction price
pub type Price = Decimal;

/// Order volume in whole units
pub type Quantity = u32;

/// Linear interpolation `k * weighted + (1 - k) * other`.
///
/// With `k` in `[0, 1]` and non-negative prices the result always lies
/// between the two inputs, including prices near `Decimal::MAX`.
#[inline]
pub fn interpolate(k: Decimal, weighted: Price, other: Price) -> Price {
    other + k * (weighted - other)
}

/// Midpoint of two non-negative prices, computed as an offset from the
/// lower one so that prices near `Decimal::MAX` cannot overflow.
#[inline]
pub fn midpoint(a: Price, b: Price) -> Price {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    low + (high - low) / Decimal::TWO
}

/// Whether `k` is a valid interpolation weight
#[inline]
pub fn is_unit_interval(k: Decimal) -> bool {
    k >= Decimal::ZERO && k <= Decimal::ONE
}

/// Clamp `price` into `[low, high]`
#[inline]
pub fn clamp(price: Price, low: Price, high: Price) -> Price {
    price.max(low).min(high)
}
