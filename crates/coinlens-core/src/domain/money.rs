use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serializer;

use crate::ValidationError;

/// Decimal places shown for every monetary value and percentage.
pub const DISPLAY_SCALE: u32 = 2;

/// Round half away from zero to two places and pin the scale, so `650`
/// renders as `650.00`.
pub fn round_display(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);
    rounded
}

/// Convert an upstream JSON float into a non-negative decimal price.
pub fn price_from_f64(field: &'static str, value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Decimal::from_f64(value).ok_or(ValidationError::NonFiniteValue { field })
}

/// `serialize_with` hook that applies [`round_display`] at the output boundary.
pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&round_display(*value).to_string())
}
