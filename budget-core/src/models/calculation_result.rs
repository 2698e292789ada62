use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Region;
use crate::calculations::aggregators::{BalanceTotals, ExpenseTotals, IncomeTotals};
use crate::calculations::business::BusinessResult;
use crate::calculations::payroll::{CppResult, MedicareResult, SocialSecurityResult};
use crate::calculations::summary::BudgetSummary;
use crate::calculations::taxable_income::TaxableIncome;

/// Payroll obligations for the active region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayrollObligations {
    Canada {
        cpp: CppResult,
        ei_premium: Decimal,
    },
    Usa {
        social_security: SocialSecurityResult,
        medicare: MedicareResult,
    },
    None,
}

impl PayrollObligations {
    /// Sum of all payroll contributions.
    pub fn total(&self) -> Decimal {
        match self {
            Self::Canada { cpp, ei_premium } => cpp.total + ei_premium,
            Self::Usa {
                social_security,
                medicare,
            } => social_security.total + medicare.total,
            Self::None => Decimal::ZERO,
        }
    }
}

/// Output of one calculation pass. Always recomputed in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub region: Region,
    pub subregion: Option<String>,
    pub income: IncomeTotals,
    pub taxable: TaxableIncome,
    pub regional_tax: Decimal,
    pub subregional_tax: Decimal,
    /// Regional plus subregional income tax.
    pub annual_tax: Decimal,
    pub payroll: PayrollObligations,
    pub capital_gains_tax: Decimal,
    pub expenses: ExpenseTotals,
    pub balances: BalanceTotals,
    pub summary: BudgetSummary,
    /// Worksheet figures when a business worksheet replaced sole
    /// proprietorship income.
    pub business: Option<BusinessResult>,
}
