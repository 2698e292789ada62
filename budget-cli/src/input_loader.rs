//! CSV loader for budget inputs.
//!
//! ## CSV Format
//!
//! | Column      | Required | Notes                                              |
//! |-------------|----------|----------------------------------------------------|
//! | `field`     | yes      | Persisted field key, e.g. `income_salary_wages`    |
//! | `amount`    | yes      | Amount text; commas and `$` are accepted           |
//! | `frequency` | no       | `annually`, `quarterly`, `monthly` or `weekly`     |
//! | `percent`   | no       | Ownership percentage for asset and liability rows  |
//!
//! Income, expense, asset, liability and business worksheet keys are
//! accepted, plus these settings rows (value in `amount`):
//!
//! | `field`                    | Value                                  |
//! |----------------------------|----------------------------------------|
//! | `price`                    | Business price per unit, hour or rental|
//! | `revenueType`              | `rental`, `service` or `product`       |
//! | `cogs`                     | `yes` to count cost of goods sold      |
//! | `goal_amount`              | Savings goal                           |
//! | `state_capital_gains_rate` | State capital gains rate as a fraction |
//!
//! ### Example
//!
//! ```csv
//! field,amount,frequency,percent
//! income_salary_wages,"4,500",monthly,
//! housing_rent_payment,1800,monthly,
//! assets_savings_accounts,25000,,50
//! ```

use std::path::Path;

use budget_core::{
    AssetField, BalanceInput, BudgetInput, BusinessField, BusinessInput, ExpenseField,
    IncomeField, LiabilityField, MonetaryInput, RevenueType, parse_amount, parse_optional_amount,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    field: String,
    amount: String,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    percent: Option<String>,
}

/// Errors that can occur while loading an input CSV.
#[derive(Debug, thiserror::Error)]
pub enum InputLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, not counting the header.
    #[error("unrecognised field '{field}' on row {row}")]
    UnknownField { field: String, row: usize },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

fn apply_row(
    input: &mut BudgetInput,
    row: CsvRow,
    row_number: usize,
) -> Result<(), InputLoadError> {
    let field = row.field.as_str();
    let frequency = row.frequency.as_deref().unwrap_or("");

    if let Some(income) = IncomeField::parse(field) {
        input
            .income
            .set(income, MonetaryInput::from_text(&row.amount, frequency));
    } else if let Some(expense) = ExpenseField::parse(field) {
        input
            .expenses
            .set(expense, MonetaryInput::from_text(&row.amount, frequency));
    } else if let Some(asset) = AssetField::parse(field) {
        input.assets.set(asset, balance(&row));
    } else if let Some(liability) = LiabilityField::parse(field) {
        input.liabilities.set(liability, balance(&row));
    } else if let Some(line) = BusinessField::parse(field) {
        business(input)
            .lines
            .set(line, MonetaryInput::from_text(&row.amount, frequency));
    } else {
        match field {
            "price" => business(input).price = parse_amount(&row.amount),
            "revenueType" => business(input).revenue_type = RevenueType::parse(&row.amount),
            "cogs" => {
                business(input).include_cogs = row.amount.trim().eq_ignore_ascii_case("yes");
            }
            "goal_amount" => input.goal_amount = parse_optional_amount(&row.amount),
            "state_capital_gains_rate" => {
                input.state_capital_gains_rate = parse_amount(&row.amount);
            }
            _ => {
                return Err(InputLoadError::UnknownField {
                    field: field.to_string(),
                    row: row_number,
                });
            }
        }
    }
    Ok(())
}

fn balance(row: &CsvRow) -> BalanceInput {
    let amount = parse_amount(&row.amount);
    match row.percent.as_deref().and_then(parse_optional_amount) {
        Some(percent) => BalanceInput::with_percent(amount, percent),
        None => BalanceInput::new(amount),
    }
}

fn business(input: &mut BudgetInput) -> &mut BusinessInput {
    input.business.get_or_insert_with(BusinessInput::default)
}

/// Parses CSV text into a [`BudgetInput`] with no region selected.
///
/// # Errors
///
/// * [`InputLoadError::Parse`] if the CSV is structurally invalid.
/// * [`InputLoadError::UnknownField`] if a row names an unknown key.
pub fn load_from_str(text: &str) -> Result<BudgetInput, InputLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut input = BudgetInput::default();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        apply_row(&mut input, result?, idx + 1)?;
    }

    debug!(
        income_lines = input.income.len(),
        expense_lines = input.expenses.len(),
        asset_lines = input.assets.len(),
        liability_lines = input.liabilities.len(),
        business = input.business.is_some(),
        "input CSV loaded"
    );
    Ok(input)
}

/// Reads `path` and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<BudgetInput, InputLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&text)
}
