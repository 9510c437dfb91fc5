//! Currency amounts

use super::error::{Result, ValidationError};
use rust_decimal::{Decimal, RoundingStrategy};

/// Digits kept after the decimal point
pub const CURRENCY_SCALE: u32 = 2;

/// Round to cents, halves away from zero
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a client-supplied price into a rounded, non-negative amount
pub fn currency_from_f64(field: &str, amount: f64) -> Result<Decimal> {
    let value = Decimal::try_from(amount)
        .map_err(|_| ValidationError::field(field, "not a representable amount"))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::field(field, "must not be negative").into());
    }
    Ok(round_currency(value))
}
