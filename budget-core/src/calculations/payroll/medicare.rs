//! US Medicare tax with the additional surtax on high earners.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PayrollConfigError, check_non_negative, check_rate, income_or_zero};
use crate::calculations::common::round_half_up;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicareConfig {
    pub employee_rate: Decimal,

    pub self_employed_rate: Decimal,

    /// Surtax rate on combined income above `additional_threshold`.
    pub additional_rate: Decimal,

    pub additional_threshold: Decimal,
}

impl Default for MedicareConfig {
    fn default() -> Self {
        Self {
            employee_rate: dec!(0.0145),
            self_employed_rate: dec!(0.029),
            additional_rate: dec!(0.009),
            additional_threshold: dec!(200000),
        }
    }
}

impl MedicareConfig {
    pub fn validate(&self) -> Result<(), PayrollConfigError> {
        check_rate("Medicare employee rate", self.employee_rate)?;
        check_rate("Medicare self-employed rate", self.self_employed_rate)?;
        check_rate("additional Medicare rate", self.additional_rate)?;
        check_non_negative("additional Medicare threshold", self.additional_threshold)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicareResult {
    pub employed: Decimal,
    pub self_employed: Decimal,
    pub additional: Decimal,
    /// `TOTALMEDICARE`.
    pub total: Decimal,
}

#[derive(Debug, Clone)]
pub struct MedicareCalculator {
    config: MedicareConfig,
}

impl MedicareCalculator {
    pub fn new(config: MedicareConfig) -> Self {
        Self { config }
    }

    /// Base rates apply to all income with no cap; the surtax applies to the
    /// combined amount above the threshold.
    pub fn calculate(
        &self,
        employed_income: Decimal,
        self_employed_income: Decimal,
    ) -> Result<MedicareResult, PayrollConfigError> {
        self.config.validate()?;

        let employed_income = income_or_zero("employed income", employed_income);
        let self_employed_income = income_or_zero("self-employed income", self_employed_income);

        let employed = round_half_up(employed_income * self.config.employee_rate);
        let self_employed = round_half_up(self_employed_income * self.config.self_employed_rate);
        let additional = self.additional_tax(employed_income + self_employed_income);

        debug!(
            employed = %employed,
            self_employed = %self_employed,
            additional = %additional,
            "Medicare tax"
        );

        Ok(MedicareResult {
            employed,
            self_employed,
            additional,
            total: employed + self_employed + additional,
        })
    }

    fn additional_tax(
        &self,
        combined_income: Decimal,
    ) -> Decimal {
        let excess = (combined_income - self.config.additional_threshold).max(Decimal::ZERO);
        round_half_up(excess * self.config.additional_rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn calculator() -> MedicareCalculator {
        MedicareCalculator::new(MedicareConfig::default())
    }

    #[test]
    fn calculate_employee_rate() {
        let result = calculator().calculate(dec!(100000), dec!(0)).unwrap();

        assert_eq!(result.employed, dec!(1450.00));
        assert_eq!(result.additional, dec!(0));
        assert_eq!(result.total, dec!(1450.00));
    }

    #[test]
    fn calculate_self_employed_rate() {
        let result = calculator().calculate(dec!(0), dec!(100000)).unwrap();

        assert_eq!(result.self_employed, dec!(2900.00));
    }

    #[test]
    fn calculate_applies_surtax_above_threshold() {
        let result = calculator().calculate(dec!(250000), dec!(0)).unwrap();

        assert_eq!(result.employed, dec!(3625.00));
        assert_eq!(result.additional, dec!(450.00));
        assert_eq!(result.total, dec!(4075.00));
    }

    #[test]
    fn calculate_surtax_uses_combined_income() {
        let result = calculator().calculate(dec!(150000), dec!(100000)).unwrap();

        assert_eq!(result.total, dec!(5525.00));
    }

    #[test]
    fn calculate_has_no_base_cap() {
        let result = calculator().calculate(dec!(1000000), dec!(0)).unwrap();

        assert_eq!(result.employed, dec!(14500.00));
    }
}
