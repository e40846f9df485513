//! Major/minor currency unit conversion.
//!
//! PayMongo works in integer centavos, UISP in decimal pesos. All currencies
//! handled here have two decimal places.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Smallest checkout amount accepted by default (one full major unit).
pub const DEFAULT_MINIMUM_MINOR: i64 = 100;

const MINOR_UNIT_SCALE: u32 = 2;

/// Converts a major-unit amount to integer minor units.
///
/// Rounds half away from zero at the second decimal place. Returns `None`
/// when the result does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Converts integer minor units back to a major-unit amount with two decimals.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}
