//! Rounding and rate helpers shared by the calculation steps.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary value to cents, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(416.665)), dec!(416.67));
/// assert_eq!(round_half_up(dec!(416.664)), dec!(416.66));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides `part` by `whole`, yielding zero when `whole` is not positive.
///
/// The result is an unrounded fraction.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::ratio;
///
/// assert_eq!(ratio(dec!(5900), dec!(20000)), dec!(0.295));
/// assert_eq!(ratio(dec!(10), dec!(0)), dec!(0));
/// ```
pub fn ratio(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        part / whole
    }
}

/// Converts a fractional rate to a percentage rounded to two places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::percentage;
///
/// assert_eq!(percentage(dec!(0.1333)), dec!(13.33));
/// assert_eq!(percentage(dec!(0.196666)), dec!(19.67));
/// ```
pub fn percentage(rate: Decimal) -> Decimal {
    round_half_up(rate * Decimal::ONE_HUNDRED)
}
