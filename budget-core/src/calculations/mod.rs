//! Budget calculations: frequency normalization, aggregation, taxes,
//! payroll obligations and the budget summary.
//!
//! [`BudgetCalculator`] runs every step in order; the individual modules
//! are public so each step can be used on its own.

pub mod aggregators;
pub mod brackets;
pub mod business;
pub mod calculator;
pub mod capital_gains;
pub mod common;
pub mod frequency;
pub mod payroll;
pub mod summary;
pub mod taxable_income;

pub use aggregators::{BalanceTotals, ExpenseTotals, IncomeTotals};
pub use business::BusinessResult;
pub use calculator::{BudgetCalculator, CalculationError, CalculatorConfig};
pub use capital_gains::{CapitalGainsCalculator, CapitalGainsConfig, CapitalGainsConfigError};
pub use payroll::{PayrollConfig, PayrollConfigError};
pub use summary::{BudgetSummary, Projection, Ratio, RatioKind, RatioRating, Ratios};
pub use taxable_income::TaxableIncome;
