//! Flat key layout used to persist form inputs and calculation results.
//!
//! Inputs are stored under their field keys: the amount under the key
//! itself, the frequency under [`IncomeField::frequency_key`] (and the
//! expense/business equivalents) and ownership percentages under
//! `<key>_percent`. Results are stored as two-decimal strings under the
//! upper-case total keys read by the summary page.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::repository::{KeyValueStore, StoreError, Ttl};
use crate::models::{
    AssetField, BalanceInput, BudgetInput, BusinessField, BusinessInput, CalculationResult,
    ExpenseCategory, ExpenseField, Frequency, IncomeField, LiabilityField, MonetaryInput,
    PayrollObligations, Region, RevenueType, parse_amount, parse_optional_amount,
};

pub const REGION_KEY: &str = "RegionDropdown";
pub const SUBREGION_KEY: &str = "SubregionDropdown";
pub const ASSET_PARTNER_KEY: &str = "assetspousecheckbox";
pub const LIABILITY_PARTNER_KEY: &str = "liabilityspousecheckbox";
pub const STATE_CAPITAL_GAINS_RATE_KEY: &str = "state_capital_gains_rate";
pub const GOAL_AMOUNT_KEY: &str = "goal_amount";
pub const DISPLAY_FREQUENCY_KEY: &str = "display_frequency";

const PRICE_KEY: &str = "price";
const REVENUE_TYPE_KEY: &str = "revenueType";
const COGS_KEY: &str = "cogs";
const CHECKED: &str = "checked";

/// Result keys written on every pass, in write order. The deduction key
/// (`BPA` or `SD`) depends on the region and is not listed.
pub const OUTPUT_KEYS: &[&str] = &[
    "ANNUALINCOME",
    "ANNUALEMPLOYMENTINCOME",
    "PASSIVEINCOME",
    "ANNUALTAXABLEINCOME",
    "ANNUALSUBREGIONALTAXABLEINCOME",
    "ANNUALREGIONALTAX",
    "ANNUALSUBREGIONALTAX",
    "annualTax",
    "ANNUALCPP",
    "CPPPAYABLEEMPLOYED",
    "CPPPAYABLESELFEMPLOYED",
    "ANNUALEI",
    "TOTALSOCIALSECURITY",
    "TOTALSOCIALSECURITYE",
    "TOTALSOCIALSECURITYSE",
    "TOTALMEDICARE",
    "TOTALTAXCG",
    "HOUSING",
    "TRANSPORTATION",
    "DEPENDANT",
    "DEBT",
    "ESSENTIAL",
    "DISCRETIONARY",
    "ANNUALEXPENSESUM",
    "ASSETS",
    "LIQUIDASSETS",
    "LIABILITIES",
    "LIABILITIESNA",
    "ANNUALGOVERNMENTOBLIGATIONS",
    "DISPOSABLEINCOME",
    "NETWORTH",
];

const DEDUCTION_KEYS: &[&str] = &["BPA", "SD"];

/// Keys written only when a business worksheet was calculated.
pub const BUSINESS_OUTPUT_KEYS: &[&str] = &[
    "totalRevenue",
    "totalCOGS",
    "totalOperationalCosts",
    "totalBuildingCosts",
    "totalVehicleCosts",
    "netIncome",
];

fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

/// Flattens a result into `(key, value)` pairs.
pub fn result_entries(result: &CalculationResult) -> Vec<(&'static str, String)> {
    let zero = Decimal::ZERO;
    let (cpp, cpp_employed, cpp_self_employed, ei) = match &result.payroll {
        PayrollObligations::Canada { cpp, ei_premium } => {
            (cpp.total, cpp.employed, cpp.self_employed, *ei_premium)
        }
        _ => (zero, zero, zero, zero),
    };
    let (ss, ss_employed, ss_self_employed, medicare) = match &result.payroll {
        PayrollObligations::Usa {
            social_security,
            medicare,
        } => (
            social_security.total,
            social_security.employed,
            social_security.self_employed,
            medicare.total,
        ),
        _ => (zero, zero, zero, zero),
    };
    let expenses = &result.expenses;
    let balances = &result.balances;
    let summary = &result.summary;

    let mut entries = vec![
        ("ANNUALINCOME", result.income.annual),
        ("ANNUALEMPLOYMENTINCOME", result.income.employment),
        ("PASSIVEINCOME", result.income.passive),
        ("ANNUALTAXABLEINCOME", result.taxable.regional),
        ("ANNUALSUBREGIONALTAXABLEINCOME", result.taxable.subregional),
        ("ANNUALREGIONALTAX", result.regional_tax),
        ("ANNUALSUBREGIONALTAX", result.subregional_tax),
        ("annualTax", result.annual_tax),
        ("ANNUALCPP", cpp),
        ("CPPPAYABLEEMPLOYED", cpp_employed),
        ("CPPPAYABLESELFEMPLOYED", cpp_self_employed),
        ("ANNUALEI", ei),
        ("TOTALSOCIALSECURITY", ss),
        ("TOTALSOCIALSECURITYE", ss_employed),
        ("TOTALSOCIALSECURITYSE", ss_self_employed),
        ("TOTALMEDICARE", medicare),
        ("TOTALTAXCG", result.capital_gains_tax),
        ("HOUSING", expenses.housing),
        ("TRANSPORTATION", expenses.transportation),
        ("DEPENDANT", expenses.dependant),
        ("DEBT", expenses.debt),
        ("ESSENTIAL", expenses.essential),
        ("DISCRETIONARY", expenses.discretionary),
        ("ANNUALEXPENSESUM", expenses.total),
        ("ASSETS", balances.assets),
        ("LIQUIDASSETS", balances.liquid_assets),
        ("LIABILITIES", balances.liabilities),
        ("LIABILITIESNA", balances.revolving_liabilities),
        ("ANNUALGOVERNMENTOBLIGATIONS", summary.government_obligations),
        ("DISPOSABLEINCOME", summary.disposable_income),
        ("NETWORTH", summary.net_worth),
    ];

    if let Some(key) = result.region.deduction_key() {
        entries.push((key, result.taxable.regional_deduction));
    }

    if let Some(business) = &result.business {
        entries.extend([
            ("totalRevenue", business.revenue),
            ("totalCOGS", business.cogs),
            ("totalOperationalCosts", business.operational),
            ("totalBuildingCosts", business.building),
            ("totalVehicleCosts", business.vehicle),
            ("netIncome", business.net_income),
        ]);
    }

    entries
        .into_iter()
        .map(|(key, value)| (key, money(value)))
        .collect()
}

/// Writes every result key. Returns the number of keys written.
pub async fn save_result(
    store: &dyn KeyValueStore,
    result: &CalculationResult,
    ttl: Ttl,
) -> Result<usize, StoreError> {
    let entries = result_entries(result);
    for (key, value) in &entries {
        store.set(key, value, ttl).await?;
    }
    info!(keys = entries.len(), "calculation result persisted");
    Ok(entries.len())
}

/// Reads back every persisted result key that is present, in
/// [`OUTPUT_KEYS`] order followed by the deduction and business keys.
pub async fn load_outputs(store: &dyn KeyValueStore) -> Result<Vec<(&'static str, Decimal)>, StoreError> {
    let keys = OUTPUT_KEYS
        .iter()
        .chain(DEDUCTION_KEYS)
        .chain(BUSINESS_OUTPUT_KEYS);

    let mut outputs = Vec::new();
    for key in keys {
        if let Some(value) = store.get(key).await? {
            outputs.push((*key, parse_amount(&value)));
        }
    }
    Ok(outputs)
}

/// Writes every input the calculation reads.
pub async fn save_input(
    store: &dyn KeyValueStore,
    input: &BudgetInput,
    ttl: Ttl,
) -> Result<(), StoreError> {
    store.set(REGION_KEY, input.region.as_str(), ttl).await?;
    store
        .set(SUBREGION_KEY, input.subregion.as_deref().unwrap_or(""), ttl)
        .await?;

    for (field, value) in input.income.iter() {
        save_monetary(store, field.key(), &field.frequency_key(), value, ttl).await?;
    }
    for (field, value) in input.expenses.iter() {
        save_monetary(store, field.key(), &field.frequency_key(), value, ttl).await?;
    }
    for (field, value) in input.assets.iter() {
        save_balance(store, field.key(), &field.percent_key(), value, ttl).await?;
    }
    for (field, value) in input.liabilities.iter() {
        save_balance(store, field.key(), &field.percent_key(), value, ttl).await?;
    }

    let partner = if input.partner_share { CHECKED } else { "" };
    store.set(ASSET_PARTNER_KEY, partner, ttl).await?;
    store.set(LIABILITY_PARTNER_KEY, partner, ttl).await?;
    store
        .set(
            STATE_CAPITAL_GAINS_RATE_KEY,
            &input.state_capital_gains_rate.to_string(),
            ttl,
        )
        .await?;
    let goal = input.goal_amount.map(money).unwrap_or_default();
    store.set(GOAL_AMOUNT_KEY, &goal, ttl).await?;
    store
        .set(DISPLAY_FREQUENCY_KEY, input.display_frequency.as_str(), ttl)
        .await?;

    if let Some(business) = &input.business {
        save_business(store, business, ttl).await?;
    }

    debug!(region = %input.region, "budget input persisted");
    Ok(())
}

async fn save_monetary(
    store: &dyn KeyValueStore,
    key: &str,
    frequency_key: &str,
    value: MonetaryInput,
    ttl: Ttl,
) -> Result<(), StoreError> {
    store.set(key, &value.amount.to_string(), ttl).await?;
    let frequency = value.frequency.map_or("", |f| f.as_str());
    store.set(frequency_key, frequency, ttl).await
}

async fn save_balance(
    store: &dyn KeyValueStore,
    key: &str,
    percent_key: &str,
    value: BalanceInput,
    ttl: Ttl,
) -> Result<(), StoreError> {
    store.set(key, &value.amount.to_string(), ttl).await?;
    let percent = value.percent.map(|p| p.to_string()).unwrap_or_default();
    store.set(percent_key, &percent, ttl).await
}

async fn save_business(
    store: &dyn KeyValueStore,
    business: &BusinessInput,
    ttl: Ttl,
) -> Result<(), StoreError> {
    store.set(PRICE_KEY, &business.price.to_string(), ttl).await?;
    store
        .set(REVENUE_TYPE_KEY, business.revenue_type.as_str(), ttl)
        .await?;
    let cogs = if business.include_cogs { "yes" } else { "no" };
    store.set(COGS_KEY, cogs, ttl).await?;
    for (field, value) in business.lines.iter() {
        save_monetary(store, field.key(), &field.frequency_key(), value, ttl).await?;
    }
    Ok(())
}

/// Rebuilds a [`BudgetInput`] from persisted form values.
///
/// Missing keys read as empty text: amounts become zero and frequencies
/// default to annually. A business worksheet is loaded only when a
/// worksheet price or sales line was stored.
pub async fn load_input(store: &dyn KeyValueStore) -> Result<BudgetInput, StoreError> {
    let region = Region::parse(&read(store, REGION_KEY).await?);
    let mut input = BudgetInput::new(region).with_subregion(read(store, SUBREGION_KEY).await?);

    for field in IncomeField::ALL {
        if let Some(value) = load_monetary(store, field.key(), &field.frequency_key()).await? {
            input.income.set(*field, value);
        }
    }
    for category in ExpenseCategory::ALL {
        for field in category.fields() {
            if let Some(value) = load_monetary(store, field.key(), &field.frequency_key()).await? {
                input.expenses.set(field, value);
            }
        }
    }
    for field in AssetField::ALL {
        if let Some(value) = load_balance(store, field.key(), &field.percent_key()).await? {
            input.assets.set(*field, value);
        }
    }
    for field in LiabilityField::ALL {
        if let Some(value) = load_balance(store, field.key(), &field.percent_key()).await? {
            input.liabilities.set(*field, value);
        }
    }

    input.partner_share = read(store, ASSET_PARTNER_KEY).await? == CHECKED
        || read(store, LIABILITY_PARTNER_KEY).await? == CHECKED;
    input.state_capital_gains_rate = parse_amount(&read(store, STATE_CAPITAL_GAINS_RATE_KEY).await?);
    input.goal_amount = parse_optional_amount(&read(store, GOAL_AMOUNT_KEY).await?);
    input.display_frequency =
        Frequency::parse(&read(store, DISPLAY_FREQUENCY_KEY).await?).unwrap_or_default();
    input.business = load_business(store).await?;

    debug!(
        region = %input.region,
        income_lines = input.income.len(),
        expense_lines = input.expenses.len(),
        "budget input loaded"
    );
    Ok(input)
}

async fn read(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<String, StoreError> {
    Ok(store.get(key).await?.unwrap_or_default())
}

async fn load_monetary(
    store: &dyn KeyValueStore,
    key: &str,
    frequency_key: &str,
) -> Result<Option<MonetaryInput>, StoreError> {
    let Some(amount) = store.get(key).await? else {
        return Ok(None);
    };
    let frequency = read(store, frequency_key).await?;
    Ok(Some(MonetaryInput::from_text(&amount, &frequency)))
}

async fn load_balance(
    store: &dyn KeyValueStore,
    key: &str,
    percent_key: &str,
) -> Result<Option<BalanceInput>, StoreError> {
    let Some(amount) = store.get(key).await? else {
        return Ok(None);
    };
    let amount = parse_amount(&amount);
    let balance = match parse_optional_amount(&read(store, percent_key).await?) {
        Some(percent) => BalanceInput::with_percent(amount, percent),
        None => BalanceInput::new(amount),
    };
    Ok(Some(balance))
}

async fn load_business(store: &dyn KeyValueStore) -> Result<Option<BusinessInput>, StoreError> {
    let price = store.get(PRICE_KEY).await?;
    let sales = store.get(BusinessField::Sales.key()).await?;
    if price.is_none() && sales.is_none() {
        return Ok(None);
    }

    let mut business = BusinessInput {
        revenue_type: RevenueType::parse(&read(store, REVENUE_TYPE_KEY).await?),
        price: parse_amount(price.as_deref().unwrap_or_default()),
        include_cogs: read(store, COGS_KEY).await? == "yes",
        ..BusinessInput::default()
    };
    for field in BusinessField::ALL {
        if let Some(value) = load_monetary(store, field.key(), &field.frequency_key()).await? {
            business.lines.set(*field, value);
        }
    }
    Ok(Some(business))
}
