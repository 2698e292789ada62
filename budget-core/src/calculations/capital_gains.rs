//! US capital gains tax.
//!
//! The federal rate is chosen from total annual income and added to the
//! user's state rate. The combined rate applies to the capital gains
//! amount only. Other regions owe nothing here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::models::Region;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapitalGainsConfigError {
    #[error("capital gains rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),

    #[error("capital gains income limits must increase, {0} is not below {1}")]
    LimitsNotIncreasing(Decimal, Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalGainsConfig {
    /// Highest total income taxed at `zero_rate`.
    pub zero_rate_limit: Decimal,

    /// Highest total income taxed at `middle_rate`.
    pub middle_rate_limit: Decimal,

    pub zero_rate: Decimal,

    pub middle_rate: Decimal,

    pub top_rate: Decimal,
}

impl Default for CapitalGainsConfig {
    fn default() -> Self {
        Self {
            zero_rate_limit: dec!(48350),
            middle_rate_limit: dec!(533400),
            zero_rate: dec!(0),
            middle_rate: dec!(0.15),
            top_rate: dec!(0.20),
        }
    }
}

impl CapitalGainsConfig {
    pub fn validate(&self) -> Result<(), CapitalGainsConfigError> {
        for rate in [self.zero_rate, self.middle_rate, self.top_rate] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(CapitalGainsConfigError::InvalidRate(rate));
            }
        }
        if self.zero_rate_limit >= self.middle_rate_limit {
            return Err(CapitalGainsConfigError::LimitsNotIncreasing(
                self.zero_rate_limit,
                self.middle_rate_limit,
            ));
        }
        Ok(())
    }

    /// Federal rate for a household with `total_income`.
    pub fn federal_rate(
        &self,
        total_income: Decimal,
    ) -> Decimal {
        if total_income <= self.zero_rate_limit {
            self.zero_rate
        } else if total_income <= self.middle_rate_limit {
            self.middle_rate
        } else {
            self.top_rate
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapitalGainsCalculator {
    config: CapitalGainsConfig,
}

impl CapitalGainsCalculator {
    pub fn new(config: CapitalGainsConfig) -> Self {
        Self { config }
    }

    /// Tax on `capital_gains` (`TOTALTAXCG`).
    ///
    /// `state_rate` is a fraction; values outside [0, 1] are clamped.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use budget_core::Region;
    /// use budget_core::calculations::capital_gains::{CapitalGainsCalculator, CapitalGainsConfig};
    ///
    /// let calculator = CapitalGainsCalculator::new(CapitalGainsConfig::default());
    /// let tax = calculator
    ///     .calculate(Region::Usa, dec!(120000), dec!(10000), dec!(0.05))
    ///     .unwrap();
    ///
    /// assert_eq!(tax, dec!(2000.00));
    /// ```
    pub fn calculate(
        &self,
        region: Region,
        total_income: Decimal,
        capital_gains: Decimal,
        state_rate: Decimal,
    ) -> Result<Decimal, CapitalGainsConfigError> {
        self.config.validate()?;

        if region != Region::Usa || capital_gains <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let state_rate = clamp_state_rate(state_rate);
        let federal_rate = self.config.federal_rate(total_income);
        let tax = round_half_up(capital_gains * (federal_rate + state_rate));

        debug!(
            federal_rate = %federal_rate,
            state_rate = %state_rate,
            tax = %tax,
            "capital gains tax"
        );
        Ok(tax)
    }
}

fn clamp_state_rate(rate: Decimal) -> Decimal {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        let clamped = rate.clamp(Decimal::ZERO, Decimal::ONE);
        warn!(rate = %rate, clamped = %clamped, "state capital gains rate out of range");
        return clamped;
    }
    rate
}
