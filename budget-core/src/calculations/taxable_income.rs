//! Taxable income per jurisdiction.
//!
//! Gross income is adjusted by region before deductions:
//!
//! | Region | Capital gains | Excluded |
//! |--------|---------------|----------|
//! | CAN    | 50%           | gambling winnings, tax-free income |
//! | USA    | 100%          | alimony, tax-free income |
//! | NONE   | 0%            | tax-free income |
//!
//! Taxable income is then resolved twice, once against the region-level
//! deduction and once against the subregion's, and floored at zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::models::{IncomeField, IncomeProfile, IncomeTreatment, Region};

const CANADA_CAPITAL_GAINS_INCLUSION: Decimal = dec!(0.5);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxableIncome {
    /// Gross income after regional exclusions and inclusion rates.
    pub adjusted_gross: Decimal,

    /// Annual capital gains before any inclusion rate.
    pub capital_gains: Decimal,

    /// Basic personal amount (CAN) or standard deduction (USA).
    pub regional_deduction: Decimal,

    pub subregional_deduction: Decimal,

    /// `ANNUALTAXABLEINCOME`.
    pub regional: Decimal,

    /// `ANNUALSUBREGIONALTAXABLEINCOME`.
    pub subregional: Decimal,
}

/// Fraction of an income line included in adjusted gross income.
fn inclusion_rate(
    region: Region,
    treatment: IncomeTreatment,
) -> Decimal {
    match (region, treatment) {
        (_, IncomeTreatment::TaxFree) => Decimal::ZERO,
        (Region::Canada, IncomeTreatment::GamblingWinnings) => Decimal::ZERO,
        (Region::Canada, IncomeTreatment::CapitalGains) => CANADA_CAPITAL_GAINS_INCLUSION,
        (Region::Usa, IncomeTreatment::Alimony) => Decimal::ZERO,
        (Region::None, IncomeTreatment::CapitalGains) => Decimal::ZERO,
        _ => Decimal::ONE,
    }
}

/// Sum of annual income lines after the region's exclusions.
pub fn adjusted_gross_income(
    income: &IncomeProfile,
    region: Region,
) -> Decimal {
    let total: Decimal = IncomeField::ALL
        .iter()
        .map(|field| income.get(*field).annualized() * inclusion_rate(region, field.treatment()))
        .sum();
    round_half_up(total)
}

/// Income less a deduction, never negative.
pub fn taxable_after_deduction(
    adjusted_gross: Decimal,
    deduction: Decimal,
) -> Decimal {
    (adjusted_gross - deduction).max(Decimal::ZERO)
}

/// Resolves regional and subregional taxable income.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::{IncomeField, IncomeProfile, MonetaryInput, Region};
/// use budget_core::calculations::taxable_income::resolve;
///
/// let income = IncomeProfile::new()
///     .with(IncomeField::SalaryWages, MonetaryInput::annual(dec!(60000)))
///     .with(IncomeField::GamblingWinnings, MonetaryInput::annual(dec!(5000)));
///
/// let taxable = resolve(&income, Region::Canada, dec!(15705), dec!(12580));
///
/// assert_eq!(taxable.regional, dec!(44295));
/// assert_eq!(taxable.subregional, dec!(47420));
/// ```
pub fn resolve(
    income: &IncomeProfile,
    region: Region,
    regional_deduction: Decimal,
    subregional_deduction: Decimal,
) -> TaxableIncome {
    let adjusted_gross = adjusted_gross_income(income, region);
    let capital_gains = round_half_up(income.get(IncomeField::CapitalGainsLosses).annualized());

    let regional = taxable_after_deduction(adjusted_gross, regional_deduction);
    let subregional = taxable_after_deduction(adjusted_gross, subregional_deduction);

    debug!(
        region = %region,
        adjusted_gross = %adjusted_gross,
        regional = %regional,
        subregional = %subregional,
        "taxable income resolved"
    );

    TaxableIncome {
        adjusted_gross,
        capital_gains,
        regional_deduction,
        subregional_deduction,
        regional,
        subregional,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::MonetaryInput;

    fn income_with(
        field: IncomeField,
        amount: Decimal,
    ) -> IncomeProfile {
        IncomeProfile::new()
            .with(IncomeField::SalaryWages, MonetaryInput::annual(dec!(50000)))
            .with(field, MonetaryInput::annual(amount))
    }

    // =========================================================================
    // adjusted_gross_income tests
    // =========================================================================

    #[test]
    fn adjusted_gross_excludes_gambling_winnings_in_canada_only() {
        let income = income_with(IncomeField::GamblingWinnings, dec!(10000));

        assert_eq!(adjusted_gross_income(&income, Region::Canada), dec!(50000));
        assert_eq!(adjusted_gross_income(&income, Region::Usa), dec!(60000));
    }

    #[test]
    fn adjusted_gross_excludes_alimony_in_usa_only() {
        let income = income_with(IncomeField::Alimony, dec!(12000));

        assert_eq!(adjusted_gross_income(&income, Region::Usa), dec!(50000));
        assert_eq!(adjusted_gross_income(&income, Region::Canada), dec!(62000));
    }

    #[test]
    fn adjusted_gross_applies_capital_gains_inclusion_rate() {
        let income = income_with(IncomeField::CapitalGainsLosses, dec!(20000));

        assert_eq!(adjusted_gross_income(&income, Region::Canada), dec!(60000));
        assert_eq!(adjusted_gross_income(&income, Region::Usa), dec!(70000));
        assert_eq!(adjusted_gross_income(&income, Region::None), dec!(50000));
    }

    #[test]
    fn adjusted_gross_always_excludes_tax_free_income() {
        let income = income_with(IncomeField::TaxFreeIncome, dec!(7000));

        for region in [Region::Canada, Region::Usa, Region::None] {
            assert_eq!(adjusted_gross_income(&income, region), dec!(50000));
        }
    }

    // =========================================================================
    // resolve tests
    // =========================================================================

    #[test]
    fn resolve_never_goes_negative() {
        let income = IncomeProfile::new()
            .with(IncomeField::SalaryWages, MonetaryInput::annual(dec!(9000)));

        let taxable = resolve(&income, Region::Usa, dec!(14600), dec!(0));

        assert_eq!(taxable.regional, dec!(0));
        assert_eq!(taxable.subregional, dec!(9000));
    }

    #[test]
    fn resolve_differs_by_region_for_same_inputs() {
        let income = income_with(IncomeField::GamblingWinnings, dec!(10000))
            .with(IncomeField::Alimony, MonetaryInput::annual(dec!(6000)));

        let canada = resolve(&income, Region::Canada, dec!(15000), dec!(0));
        let usa = resolve(&income, Region::Usa, dec!(15000), dec!(0));

        assert_eq!(canada.regional, dec!(41000));
        assert_eq!(usa.regional, dec!(45000));
    }

    #[test]
    fn resolve_reports_raw_capital_gains() {
        let income = income_with(IncomeField::CapitalGainsLosses, dec!(20000));

        let taxable = resolve(&income, Region::Canada, dec!(0), dec!(0));

        assert_eq!(taxable.capital_gains, dec!(20000));
        assert_eq!(taxable.adjusted_gross, dec!(60000));
    }
}
