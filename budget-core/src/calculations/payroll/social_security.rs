//! US Social Security tax.
//!
//! Self-employment income is first reduced to its net earnings base
//! (92.35% of gross) and then taxed at twice the employee rate to cover the
//! employer share. The combined base is capped at the maximum taxable
//! earnings and the cap is shared proportionally between both sides.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PayrollConfigError, check_positive, check_rate, income_or_zero};
use crate::calculations::common::round_half_up;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSecurityConfig {
    /// Employee rate (6.2%). Self-employment pays double.
    pub rate: Decimal,

    pub max_taxable_earnings: Decimal,

    /// Share of self-employment income subject to tax (92.35%).
    pub net_earnings_factor: Decimal,
}

impl Default for SocialSecurityConfig {
    fn default() -> Self {
        Self {
            rate: dec!(0.062),
            max_taxable_earnings: dec!(142800),
            net_earnings_factor: dec!(0.9235),
        }
    }
}

impl SocialSecurityConfig {
    pub fn validate(&self) -> Result<(), PayrollConfigError> {
        check_rate("Social Security rate", self.rate)?;
        check_positive("Social Security maximum taxable earnings", self.max_taxable_earnings)?;
        check_rate("net earnings factor", self.net_earnings_factor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityResult {
    /// Combined base after the cap.
    pub taxable_earnings: Decimal,

    /// Tax on the employed share (`TOTALSOCIALSECURITYE`).
    pub employed: Decimal,

    /// Tax on the self-employed share (`TOTALSOCIALSECURITYSE`).
    pub self_employed: Decimal,

    /// `TOTALSOCIALSECURITY`.
    pub total: Decimal,
}

#[derive(Debug, Clone)]
pub struct SocialSecurityCalculator {
    config: SocialSecurityConfig,
}

impl SocialSecurityCalculator {
    pub fn new(config: SocialSecurityConfig) -> Self {
        Self { config }
    }

    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use budget_core::calculations::payroll::{SocialSecurityCalculator, SocialSecurityConfig};
    ///
    /// let result = SocialSecurityCalculator::new(SocialSecurityConfig::default())
    ///     .calculate(dec!(200000), dec!(0))
    ///     .unwrap();
    ///
    /// assert_eq!(result.employed, dec!(8853.60));
    /// assert_eq!(result.self_employed, dec!(0));
    /// ```
    pub fn calculate(
        &self,
        employed_income: Decimal,
        self_employed_income: Decimal,
    ) -> Result<SocialSecurityResult, PayrollConfigError> {
        self.config.validate()?;

        let employed_base = income_or_zero("employed income", employed_income);
        let self_employed_base = self.self_employment_base(income_or_zero(
            "self-employed income",
            self_employed_income,
        ));
        let combined = employed_base + self_employed_base;
        if combined.is_zero() {
            return Ok(SocialSecurityResult::default());
        }

        let taxable_earnings = combined.min(self.config.max_taxable_earnings);
        let employed_taxable = taxable_earnings * employed_base / combined;
        let self_employed_taxable = taxable_earnings * self_employed_base / combined;

        let employed = round_half_up(employed_taxable * self.config.rate);
        let self_employed = round_half_up(self_employed_taxable * self.self_employed_rate());

        debug!(
            taxable = %taxable_earnings,
            employed = %employed,
            self_employed = %self_employed,
            "Social Security tax"
        );

        Ok(SocialSecurityResult {
            taxable_earnings,
            employed,
            self_employed,
            total: employed + self_employed,
        })
    }

    /// Net earnings from self-employment subject to tax.
    fn self_employment_base(
        &self,
        self_employed_income: Decimal,
    ) -> Decimal {
        self_employed_income * self.config.net_earnings_factor
    }

    /// Employer and employee shares combined.
    fn self_employed_rate(&self) -> Decimal {
        self.config.rate * Decimal::TWO
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn calculator() -> SocialSecurityCalculator {
        SocialSecurityCalculator::new(SocialSecurityConfig::default())
    }

    #[test]
    fn calculate_caps_pure_employment_income() {
        let result = calculator().calculate(dec!(200000), dec!(0)).unwrap();

        assert_eq!(result.taxable_earnings, dec!(142800));
        assert_eq!(result.employed, dec!(8853.60));
        assert_eq!(result.self_employed, dec!(0));
        assert_eq!(result.total, dec!(8853.60));
    }

    #[test]
    fn calculate_self_employment_uses_net_earnings_and_double_rate() {
        let result = calculator().calculate(dec!(0), dec!(100000)).unwrap();

        // 100,000 × 92.35% × 12.4%
        assert_eq!(result.taxable_earnings, dec!(92350));
        assert_eq!(result.self_employed, dec!(11451.40));
    }

    #[test]
    fn calculate_mixed_income_below_cap_taxes_each_side_fully() {
        let result = calculator().calculate(dec!(50000), dec!(30000)).unwrap();

        assert_eq!(result.employed, dec!(3100.00));
        assert_eq!(result.self_employed, dec!(3435.42));
    }

    #[test]
    fn calculate_mixed_income_above_cap_splits_proportionally() {
        let result = calculator().calculate(dec!(100000), dec!(100000)).unwrap();

        assert_eq!(result.taxable_earnings, dec!(142800));
        assert_eq!(result.employed, dec!(4602.86));
        assert_eq!(result.self_employed, dec!(8501.48));
    }

    #[test]
    fn calculate_zero_income_is_zero() {
        assert_eq!(
            calculator().calculate(dec!(0), dec!(0)).unwrap(),
            SocialSecurityResult::default()
        );
    }
}
