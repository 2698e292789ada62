//! Canada Pension Plan contributions.
//!
//! Pensionable earnings are capped at the year's maximum pensionable
//! earnings (YMPE). The basic exemption is removed once, and the remaining
//! contributory earnings are split between employment and self-employment
//! in proportion to each side's share of total income.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::calculations::payroll::{CppCalculator, CppConfig};
//!
//! let calculator = CppCalculator::new(CppConfig::default());
//! let result = calculator.calculate(dec!(68500), dec!(0)).unwrap();
//!
//! assert_eq!(result.employed, dec!(3867.50));
//! assert_eq!(result.self_employed, dec!(0));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PayrollConfigError, check_non_negative, check_positive, check_rate, income_or_zero};
use crate::calculations::common::round_half_up;

/// CPP rates and limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CppConfig {
    /// Employee contribution rate (5.95%).
    pub employee_rate: Decimal,

    /// Self-employed contribution rate, employer and employee shares combined (11.90%).
    pub self_employed_rate: Decimal,

    /// Year's maximum pensionable earnings.
    pub ympe: Decimal,

    /// Basic exemption removed before contributions apply.
    pub basic_exemption: Decimal,

    pub employee_max: Decimal,

    pub self_employed_max: Decimal,
}

impl Default for CppConfig {
    fn default() -> Self {
        Self {
            employee_rate: dec!(0.0595),
            self_employed_rate: dec!(0.119),
            ympe: dec!(68500),
            basic_exemption: dec!(3500),
            employee_max: dec!(3867.50),
            self_employed_max: dec!(7735),
        }
    }
}

impl CppConfig {
    /// # Errors
    ///
    /// Returns [`PayrollConfigError`] if a rate is outside [0, 1], the YMPE
    /// is not positive, or the exemption or a maximum is negative.
    pub fn validate(&self) -> Result<(), PayrollConfigError> {
        check_rate("CPP employee rate", self.employee_rate)?;
        check_rate("CPP self-employed rate", self.self_employed_rate)?;
        check_positive("YMPE", self.ympe)?;
        check_non_negative("CPP basic exemption", self.basic_exemption)?;
        check_non_negative("CPP employee maximum", self.employee_max)?;
        check_non_negative("CPP self-employed maximum", self.self_employed_max)
    }
}

/// CPP contributions for one year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppResult {
    /// Total income capped at the YMPE.
    pub pensionable_earnings: Decimal,

    /// Pensionable earnings less the basic exemption.
    pub contributory_earnings: Decimal,

    /// Contribution on employment income (`CPPPAYABLEEMPLOYED`).
    pub employed: Decimal,

    /// Contribution on self-employment income (`CPPPAYABLESELFEMPLOYED`).
    pub self_employed: Decimal,

    /// Sum of both sides (`ANNUALCPP`).
    pub total: Decimal,
}

#[derive(Debug, Clone)]
pub struct CppCalculator {
    config: CppConfig,
}

impl CppCalculator {
    pub fn new(config: CppConfig) -> Self {
        Self { config }
    }

    /// Calculates employed and self-employed CPP contributions.
    ///
    /// When total income exceeds the YMPE and there is self-employment
    /// income, the self-employed side becomes the self-employed maximum less
    /// the employed contribution.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollConfigError`] if the configuration is invalid.
    pub fn calculate(
        &self,
        employed_income: Decimal,
        self_employed_income: Decimal,
    ) -> Result<CppResult, PayrollConfigError> {
        self.config.validate()?;

        let employed_income = income_or_zero("employed income", employed_income);
        let self_employed_income = income_or_zero("self-employed income", self_employed_income);
        let total_income = employed_income + self_employed_income;

        if total_income.is_zero() {
            return Ok(CppResult::default());
        }

        let pensionable_earnings = self.pensionable_earnings(total_income);
        let contributory_earnings = self.contributory_earnings(pensionable_earnings);

        let (employed, self_employed) = if employed_income.is_zero() {
            (Decimal::ZERO, self.self_employed_only(contributory_earnings))
        } else {
            self.split_contributions(
                contributory_earnings,
                employed_income,
                self_employed_income,
                total_income,
            )
        };

        debug!(
            pensionable = %pensionable_earnings,
            employed = %employed,
            self_employed = %self_employed,
            "CPP contributions"
        );

        Ok(CppResult {
            pensionable_earnings,
            contributory_earnings,
            employed,
            self_employed,
            total: employed + self_employed,
        })
    }

    /// Caps total income at the YMPE.
    fn pensionable_earnings(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        total_income.min(self.config.ympe)
    }

    /// Removes the basic exemption, flooring at zero.
    fn contributory_earnings(
        &self,
        pensionable_earnings: Decimal,
    ) -> Decimal {
        (pensionable_earnings - self.config.basic_exemption).max(Decimal::ZERO)
    }

    /// Contribution when all income is from self-employment.
    fn self_employed_only(
        &self,
        contributory_earnings: Decimal,
    ) -> Decimal {
        round_half_up(
            (contributory_earnings * self.config.self_employed_rate)
                .min(self.config.self_employed_max),
        )
    }

    /// Splits contributory earnings by income share and applies each rate.
    fn split_contributions(
        &self,
        contributory_earnings: Decimal,
        employed_income: Decimal,
        self_employed_income: Decimal,
        total_income: Decimal,
    ) -> (Decimal, Decimal) {
        let employed_share = contributory_earnings * employed_income / total_income;
        let self_employed_share = contributory_earnings * self_employed_income / total_income;

        let employed = round_half_up(
            (employed_share * self.config.employee_rate).min(self.config.employee_max),
        );
        let mut self_employed = round_half_up(
            (self_employed_share * self.config.self_employed_rate)
                .min(self.config.self_employed_max),
        );

        if total_income > self.config.ympe && self_employed_income > Decimal::ZERO {
            self_employed = (self.config.self_employed_max - employed).max(Decimal::ZERO);
        }

        (employed, self_employed)
    }
}
