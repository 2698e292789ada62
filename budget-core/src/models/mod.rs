mod fields;

pub mod balance;
pub mod business;
pub mod budget_input;
pub mod calculation_result;
pub mod expense;
pub mod frequency;
pub mod income;
pub mod jurisdiction;
pub mod monetary_input;
pub mod tax_bracket;

pub use balance::{AssetField, AssetInputs, BalanceInput, LiabilityField, LiabilityInputs};
pub use budget_input::BudgetInput;
pub use business::{BusinessCostGroup, BusinessField, BusinessInput, RevenueType};
pub use calculation_result::{CalculationResult, PayrollObligations};
pub use expense::{ExpenseCategory, ExpenseField, ExpenseProfile};
pub use fields::FieldMap;
pub use frequency::Frequency;
pub use income::{IncomeField, IncomeProfile, IncomeTreatment};
pub use jurisdiction::{JurisdictionProfile, JurisdictionTable, Region};
pub use monetary_input::{MAX_AMOUNT, MonetaryInput, parse_amount, parse_optional_amount};
pub use tax_bracket::{BracketSchedule, BracketScheduleError, TaxBracket};
