//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done with `Decimal` internally, then
//! converted to `f64` for storage/serialization, rounded to 2 decimal
//! places half-up.

use crate::utils::{AppError, AppResult};
use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: f64 = 0.01;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;

fn to_decimal(value: f64, field: &str) -> AppResult<Decimal> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::validation(format!("{field} is not representable: {value}")))
}

fn round_money(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Unit price snapshot: `price × (1 − discount/100)`, rounded to cents.
///
/// The result is recorded on the order at creation time and never
/// re-derived from the live product.
pub fn discounted_unit_price(price: f64, discount: f64) -> AppResult<f64> {
    let price_dec = to_decimal(price, "price")?;
    if price < 0.0 {
        return Err(AppError::validation(format!(
            "price must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    let discount_dec = to_decimal(discount, "discount")?;
    if !(0.0..=100.0).contains(&discount) {
        return Err(AppError::validation(format!(
            "discount must be between 0 and 100, got {discount}"
        )));
    }
    let factor = Decimal::ONE - discount_dec / Decimal::ONE_HUNDRED;
    Ok(round_money(price_dec * factor))
}

/// Order total: `unit_price × quantity`. Quantity is integral, so the
/// product of a 2-dp unit price stays exact in decimal.
pub fn order_total(unit_price: f64, quantity: i64) -> AppResult<f64> {
    let unit_dec = to_decimal(unit_price, "unit_price")?;
    Ok(round_money(unit_dec * Decimal::from(quantity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_discount_keeps_price() {
        assert_eq!(discounted_unit_price(19.99, 0.0).unwrap(), 19.99);
    }

    #[test]
    fn discount_rounds_half_up_to_cents() {
        // 19.99 × 0.85 = 16.9915 → 16.99
        assert_eq!(discounted_unit_price(19.99, 15.0).unwrap(), 16.99);
        // 10.00 × 0.675 = 6.75
        assert_eq!(discounted_unit_price(10.0, 32.5).unwrap(), 6.75);
        // 0.10 × 0.95 = 0.095 → 0.10 (half-up)
        assert_eq!(discounted_unit_price(0.10, 5.0).unwrap(), 0.10);
    }

    #[test]
    fn full_discount_is_free() {
        assert_eq!(discounted_unit_price(42.0, 100.0).unwrap(), 0.0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(discounted_unit_price(-1.0, 0.0).is_err());
        assert!(discounted_unit_price(10.0, -5.0).is_err());
        assert!(discounted_unit_price(10.0, 101.0).is_err());
        assert!(discounted_unit_price(f64::NAN, 0.0).is_err());
        assert!(discounted_unit_price(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn total_is_unit_price_times_quantity() {
        assert_eq!(order_total(16.99, 3).unwrap(), 50.97);
        assert_eq!(order_total(0.0, 5).unwrap(), 0.0);
    }
}
