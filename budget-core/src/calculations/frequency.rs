//! Converts recurring amounts to annual amounts.

use rust_decimal::Decimal;

use crate::calculations::common::checked_product;
use crate::models::{Frequency, MonetaryInput};

/// Annualizes `amount`. An unrecognized frequency (`None`) or an annual
/// amount too large to represent contributes zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::Frequency;
/// use budget_core::calculations::frequency::normalize;
///
/// assert_eq!(normalize(dec!(100), Some(Frequency::Monthly)), dec!(1200));
/// assert_eq!(normalize(dec!(100), None), dec!(0));
/// ```
pub fn normalize(
    amount: Decimal,
    frequency: Option<Frequency>,
) -> Decimal {
    match frequency {
        Some(frequency) => checked_product(amount, frequency.periods_per_year()),
        None => Decimal::ZERO,
    }
}

/// Annualizes raw form text. Unparseable amounts and unknown frequencies
/// contribute zero.
pub fn normalize_text(
    amount: &str,
    frequency: &str,
) -> Decimal {
    MonetaryInput::from_text(amount, frequency).annualized()
}

impl MonetaryInput {
    /// The annual equivalent of this input.
    pub fn annualized(&self) -> Decimal {
        normalize(self.amount, self.frequency)
    }
}
