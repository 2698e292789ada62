//! Payroll contribution calculators.
//!
//! Canada uses [`cpp`] and [`ei`]; the United States uses
//! [`social_security`] and [`medicare`]. Every calculator takes annual
//! employed and self-employed income, clamps negative inputs to zero and
//! rounds its outputs half-up to cents.

pub mod cpp;
pub mod ei;
pub mod medicare;
pub mod social_security;

pub use cpp::{CppCalculator, CppConfig, CppResult};
pub use ei::{EiCalculator, EiConfig};
pub use medicare::{MedicareCalculator, MedicareConfig, MedicareResult};
pub use social_security::{SocialSecurityCalculator, SocialSecurityConfig, SocialSecurityResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors raised by payroll configuration validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollConfigError {
    #[error("{0} must be between 0 and 1, got {1}")]
    InvalidRate(&'static str, Decimal),

    #[error("{0} must be positive, got {1}")]
    NonPositiveLimit(&'static str, Decimal),

    #[error("{0} must be non-negative, got {1}")]
    NegativeAmount(&'static str, Decimal),
}

/// Constants for every payroll calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    pub cpp: CppConfig,
    pub ei: EiConfig,
    pub social_security: SocialSecurityConfig,
    pub medicare: MedicareConfig,
}

impl PayrollConfig {
    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`PayrollConfigError`] found.
    pub fn validate(&self) -> Result<(), PayrollConfigError> {
        self.cpp.validate()?;
        self.ei.validate()?;
        self.social_security.validate()?;
        self.medicare.validate()
    }
}

pub(crate) fn check_rate(
    name: &'static str,
    value: Decimal,
) -> Result<(), PayrollConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(PayrollConfigError::InvalidRate(name, value));
    }
    Ok(())
}

pub(crate) fn check_positive(
    name: &'static str,
    value: Decimal,
) -> Result<(), PayrollConfigError> {
    if value <= Decimal::ZERO {
        return Err(PayrollConfigError::NonPositiveLimit(name, value));
    }
    Ok(())
}

pub(crate) fn check_non_negative(
    name: &'static str,
    value: Decimal,
) -> Result<(), PayrollConfigError> {
    if value < Decimal::ZERO {
        return Err(PayrollConfigError::NegativeAmount(name, value));
    }
    Ok(())
}

/// Clamps a negative income to zero.
pub(crate) fn income_or_zero(
    name: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(input = name, value = %value, "negative income treated as zero");
        return Decimal::ZERO;
    }
    value
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(PayrollConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_reports_first_invalid_section() {
        let mut config = PayrollConfig::default();
        config.ei.rate = dec!(1.64);

        assert_eq!(
            config.validate(),
            Err(PayrollConfigError::InvalidRate("EI rate", dec!(1.64)))
        );
    }

    #[test]
    fn income_or_zero_clamps_negatives() {
        assert_eq!(income_or_zero("employed", dec!(-10)), Decimal::ZERO);
        assert_eq!(income_or_zero("employed", dec!(10)), dec!(10));
    }
}
