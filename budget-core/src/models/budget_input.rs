use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    AssetInputs, BusinessInput, ExpenseProfile, Frequency, IncomeProfile, LiabilityInputs, Region,
};

/// Everything a calculation pass reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub region: Region,
    /// Province or state code within `region`.
    pub subregion: Option<String>,
    pub income: IncomeProfile,
    pub expenses: ExpenseProfile,
    pub assets: AssetInputs,
    pub liabilities: LiabilityInputs,
    /// User-supplied state capital gains rate, as a fraction.
    pub state_capital_gains_rate: Decimal,
    /// Apply ownership percentages to liquid assets and revolving debt.
    pub partner_share: bool,
    /// When present, its net income replaces the sole proprietorship line.
    pub business: Option<BusinessInput>,
    /// Savings target used for the time-to-goal projection.
    pub goal_amount: Option<Decimal>,
    /// Frequency projections are reported in.
    pub display_frequency: Frequency,
}

impl BudgetInput {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            ..Self::default()
        }
    }

    pub fn with_subregion(
        mut self,
        code: impl Into<String>,
    ) -> Self {
        let code = code.into();
        self.subregion = if code.trim().is_empty() {
            None
        } else {
            Some(code.trim().to_ascii_uppercase())
        };
        self
    }
}
