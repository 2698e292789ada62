//! Shared arithmetic helpers for budget calculations.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Rounds to cents, with exact midpoints rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(2900.625)), dec!(2900.63));
/// assert_eq!(round_half_up(dec!(2900.624)), dec!(2900.62));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides `numerator` by `denominator`, returning `None` for a zero
/// denominator.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::ratio;
///
/// assert_eq!(ratio(dec!(30), dec!(120)), Some(dec!(0.25)));
/// assert_eq!(ratio(dec!(30), dec!(0)), None);
/// ```
pub fn ratio(
    numerator: Decimal,
    denominator: Decimal,
) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator.checked_div(denominator)
}

/// Sums `values`. A total that overflows is logged and treated as zero.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .unwrap_or_else(|| {
            warn!("total overflows; treated as zero");
            Decimal::ZERO
        })
}

/// Multiplies `a` by `b`. A product that overflows is logged and treated as
/// zero.
pub fn checked_product(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        warn!(a = %a, b = %b, "product overflows; treated as zero");
        Decimal::ZERO
    })
}
