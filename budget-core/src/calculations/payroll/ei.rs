//! Employment Insurance premiums (Canada only).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PayrollConfigError, check_non_negative, check_positive, check_rate, income_or_zero};
use crate::calculations::common::round_half_up;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EiConfig {
    /// Premium rate (1.64%).
    pub rate: Decimal,

    /// Maximum insurable earnings.
    pub max_insurable_earnings: Decimal,

    pub max_premium: Decimal,
}

impl Default for EiConfig {
    fn default() -> Self {
        Self {
            rate: dec!(0.0164),
            max_insurable_earnings: dec!(65700),
            max_premium: dec!(1077.48),
        }
    }
}

impl EiConfig {
    pub fn validate(&self) -> Result<(), PayrollConfigError> {
        check_rate("EI rate", self.rate)?;
        check_positive("EI maximum insurable earnings", self.max_insurable_earnings)?;
        check_non_negative("EI maximum premium", self.max_premium)
    }
}

#[derive(Debug, Clone)]
pub struct EiCalculator {
    config: EiConfig,
}

impl EiCalculator {
    pub fn new(config: EiConfig) -> Self {
        Self { config }
    }

    /// Annual EI premium on combined employed and self-employed income.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use budget_core::calculations::payroll::{EiCalculator, EiConfig};
    ///
    /// let premium = EiCalculator::new(EiConfig::default())
    ///     .calculate(dec!(100000), dec!(0))
    ///     .unwrap();
    ///
    /// assert_eq!(premium, dec!(1077.48));
    /// ```
    pub fn calculate(
        &self,
        employed_income: Decimal,
        self_employed_income: Decimal,
    ) -> Result<Decimal, PayrollConfigError> {
        self.config.validate()?;

        let insurable = (income_or_zero("employed income", employed_income)
            + income_or_zero("self-employed income", self_employed_income))
        .min(self.config.max_insurable_earnings);
        let premium = round_half_up((insurable * self.config.rate).min(self.config.max_premium));

        debug!(insurable = %insurable, premium = %premium, "EI premium");
        Ok(premium)
    }
}
