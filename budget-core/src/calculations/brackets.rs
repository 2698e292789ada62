//! Progressive bracket tax.
//!
//! Each slice of income is taxed at the rate of the bracket it falls in.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::TaxBracket;
//! use budget_core::calculations::brackets::calculate_tax;
//!
//! let brackets = [
//!     TaxBracket::new(dec!(50000), dec!(0.15)),
//!     TaxBracket::unbounded(dec!(0.25)),
//! ];
//!
//! // 50,000 × 15% + 20,000 × 25%
//! assert_eq!(calculate_tax(&brackets, dec!(70000)), dec!(12500.00));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::models::TaxBracket;

/// Orders brackets ascending with the unbounded bracket last.
fn sorted(brackets: &[TaxBracket]) -> Vec<&TaxBracket> {
    let mut sorted: Vec<&TaxBracket> = brackets.iter().collect();
    sorted.sort_by(|a, b| a.cmp_by_limit(b));
    sorted
}

/// Tax owed on `taxable_income`.
///
/// Returns zero for non-positive income and for an empty table. Income
/// above the last bounded limit is untaxed when the table has no unbounded
/// bracket.
pub fn calculate_tax(
    brackets: &[TaxBracket],
    taxable_income: Decimal,
) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    let mut previous_limit = Decimal::ZERO;
    for bracket in sorted(brackets) {
        if taxable_income <= previous_limit {
            break;
        }
        let top = match bracket.upper_limit {
            Some(limit) => taxable_income.min(limit),
            None => taxable_income,
        };
        tax += (top - previous_limit) * bracket.rate;
        match bracket.upper_limit {
            Some(limit) => previous_limit = limit,
            None => break,
        }
    }

    round_half_up(tax)
}

/// Rate applied to the next dollar above `taxable_income`.
///
/// Returns zero for an empty table.
pub fn marginal_rate(
    brackets: &[TaxBracket],
    taxable_income: Decimal,
) -> Decimal {
    let income = taxable_income.max(Decimal::ZERO);
    sorted(brackets)
        .into_iter()
        .find(|bracket| bracket.upper_limit.is_none_or(|limit| income < limit))
        .map(|bracket| bracket.rate)
        .unwrap_or(Decimal::ZERO)
}
