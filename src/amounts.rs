//! Amounts
//!
//! Prices travel over the wire as major-unit numbers (rupees) that may be
//! missing, `null`, non-finite or negative. Everything past this module works
//! in non-negative minor units (paise), so a malformed field can never make a
//! total unrenderable.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

/// The currency every cart amount is denominated in.
pub const CURRENCY: &Currency = iso::INR;

/// Normalize a raw major-unit amount into minor units.
///
/// Missing, NaN, infinite and negative values become `0`. Finite values are
/// rounded half away from zero to the nearest minor unit.
pub fn normalize_amount(value: Option<f64>) -> u64 {
    let Some(value) = value else {
        return 0;
    };

    let Some(major) = Decimal::from_f64(value) else {
        return 0;
    };

    if major.is_sign_negative() {
        return 0;
    }

    major
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_u64())
        .unwrap_or(0)
}

/// Normalize a raw quantity. Fractions are truncated; anything unusable is `0`.
pub fn normalize_quantity(value: Option<f64>) -> u32 {
    value
        .filter(|quantity| quantity.is_finite() && *quantity > 0.0)
        .and_then(|quantity| Decimal::from_f64(quantity.trunc()))
        .and_then(|quantity| quantity.to_u32())
        .unwrap_or(0)
}

/// Convert minor units back into a major-unit decimal for request parameters.
pub fn to_major(minor: u64) -> Decimal {
    Decimal::from(minor) / Decimal::ONE_HUNDRED
}

/// Wrap minor units as displayable money.
pub fn to_money(minor: u64) -> Money<'static, Currency> {
    Money::from_minor(i64::try_from(minor).unwrap_or(i64::MAX), CURRENCY)
}
