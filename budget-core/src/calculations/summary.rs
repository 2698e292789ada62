//! Budget summary: disposable income, net worth, health ratios and
//! payoff projections.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{ratio, round_half_up};
use crate::models::{Frequency, Region};

/// Traffic-light rating for a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioRating {
    Great,
    Okay,
    Poor,
}

impl RatioRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Okay => "okay",
            Self::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatioKind {
    /// Passive income over annual expenses. Higher is better.
    Fire,
    /// Assets over liabilities. Higher is better.
    SavingsToDebt,
    /// Housing expenses over income. Lower is better.
    HousingToIncome,
    /// Liabilities over income. Lower is better.
    DebtToIncome,
}

impl RatioKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fire => "FIRE ratio",
            Self::SavingsToDebt => "Savings to debt",
            Self::HousingToIncome => "Housing to income",
            Self::DebtToIncome => "Debt to income",
        }
    }

    pub fn rate(
        &self,
        value: Decimal,
    ) -> RatioRating {
        let (great, okay) = match self {
            Self::Fire => (value >= dec!(1.00), value >= dec!(0.25)),
            Self::SavingsToDebt => (value >= dec!(2), value >= dec!(1)),
            Self::HousingToIncome => (value < dec!(0.28), value <= dec!(0.35)),
            Self::DebtToIncome => (value < dec!(0.20), value <= dec!(0.36)),
        };
        if great {
            RatioRating::Great
        } else if okay {
            RatioRating::Okay
        } else {
            RatioRating::Poor
        }
    }

    /// Computes and rates the ratio; `None` when the denominator is zero.
    ///
    /// The value is rounded to two places before rating.
    pub fn evaluate(
        &self,
        numerator: Decimal,
        denominator: Decimal,
    ) -> Option<Ratio> {
        let value = round_half_up(ratio(numerator, denominator)?);
        Some(Ratio {
            value,
            rating: self.rate(value),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub value: Decimal,
    pub rating: RatioRating,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratios {
    pub fire: Option<Ratio>,
    pub savings_to_debt: Option<Ratio>,
    pub housing_to_income: Option<Ratio>,
    pub debt_to_income: Option<Ratio>,
}

impl Ratios {
    pub fn iter(&self) -> impl Iterator<Item = (RatioKind, Option<Ratio>)> {
        [
            (RatioKind::Fire, self.fire),
            (RatioKind::SavingsToDebt, self.savings_to_debt),
            (RatioKind::HousingToIncome, self.housing_to_income),
            (RatioKind::DebtToIncome, self.debt_to_income),
        ]
        .into_iter()
    }
}

/// How long an amount takes to cover from disposable income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    NotApplicable,
    RiskOfInsolvency,
    Periods {
        count: Decimal,
        frequency: Frequency,
    },
}

impl std::fmt::Display for Projection {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::NotApplicable => f.write_str("Not Applicable"),
            Self::RiskOfInsolvency => f.write_str("RISK OF INSOLVENCY"),
            Self::Periods { count, frequency } => {
                write!(f, "{:.2} {}", count, frequency.unit_label())
            }
        }
    }
}

fn periods(
    amount: Decimal,
    disposable_income: Decimal,
    frequency: Frequency,
) -> Projection {
    match ratio(amount, disposable_income) {
        Some(years) => Projection::Periods {
            count: round_half_up(years * frequency.periods_per_year()),
            frequency,
        },
        None => Projection::RiskOfInsolvency,
    }
}

/// Time to pay off revolving debt. Insolvency is reported even when there
/// is no debt.
pub fn time_to_pay_debt(
    revolving_debt: Decimal,
    disposable_income: Decimal,
    frequency: Frequency,
) -> Projection {
    if disposable_income <= Decimal::ZERO {
        return Projection::RiskOfInsolvency;
    }
    if revolving_debt <= Decimal::ZERO {
        return Projection::NotApplicable;
    }
    periods(revolving_debt, disposable_income, frequency)
}

/// Time to save `goal` out of disposable income.
pub fn time_to_goal(
    goal: Option<Decimal>,
    disposable_income: Decimal,
    frequency: Frequency,
) -> Projection {
    let Some(goal) = goal.filter(|g| *g > Decimal::ZERO) else {
        return Projection::NotApplicable;
    };
    if disposable_income <= Decimal::ZERO {
        return Projection::RiskOfInsolvency;
    }
    periods(goal, disposable_income, frequency)
}

/// Annual figures the summary is derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryInput {
    pub region: Region,
    pub annual_income: Decimal,
    pub passive_income: Decimal,
    pub annual_expenses: Decimal,
    pub housing_expenses: Decimal,
    pub regional_tax: Decimal,
    pub subregional_tax: Decimal,
    pub government_obligations: Decimal,
    pub capital_gains_tax: Decimal,
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub revolving_liabilities: Decimal,
    pub goal_amount: Option<Decimal>,
    pub display_frequency: Frequency,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// `annualTax`.
    pub annual_tax: Decimal,
    /// `ANNUALGOVERNMENTOBLIGATIONS`.
    pub government_obligations: Decimal,
    /// `DISPOSABLEINCOME`. Zero when no region is selected.
    pub disposable_income: Decimal,
    /// `NETWORTH`.
    pub net_worth: Decimal,
    pub ratios: Ratios,
    pub time_to_pay_debt: Projection,
    pub time_to_goal: Projection,
}

/// Derives the budget summary.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::Region;
/// use budget_core::calculations::summary::{SummaryInput, summarize};
///
/// let summary = summarize(&SummaryInput {
///     region: Region::Canada,
///     annual_income: dec!(80000),
///     annual_expenses: dec!(40000),
///     regional_tax: dec!(8000),
///     subregional_tax: dec!(3000),
///     government_obligations: dec!(5000),
///     ..SummaryInput::default()
/// });
///
/// assert_eq!(summary.annual_tax, dec!(11000));
/// assert_eq!(summary.disposable_income, dec!(24000));
/// ```
pub fn summarize(input: &SummaryInput) -> BudgetSummary {
    let annual_tax = input.regional_tax + input.subregional_tax;
    let disposable_income = match input.region {
        Region::None => Decimal::ZERO,
        _ => {
            input.annual_income
                - input.annual_expenses
                - input.government_obligations
                - input.capital_gains_tax
                - annual_tax
        }
    };
    let net_worth = input.assets - input.liabilities;

    let ratios = Ratios {
        fire: RatioKind::Fire.evaluate(input.passive_income, input.annual_expenses),
        savings_to_debt: RatioKind::SavingsToDebt.evaluate(input.assets, input.liabilities),
        housing_to_income: RatioKind::HousingToIncome
            .evaluate(input.housing_expenses, input.annual_income),
        debt_to_income: RatioKind::DebtToIncome.evaluate(input.liabilities, input.annual_income),
    };

    let frequency = input.display_frequency;
    let summary = BudgetSummary {
        annual_tax,
        government_obligations: input.government_obligations,
        disposable_income,
        net_worth,
        ratios,
        time_to_pay_debt: time_to_pay_debt(
            input.revolving_liabilities,
            disposable_income,
            frequency,
        ),
        time_to_goal: time_to_goal(input.goal_amount, disposable_income, frequency),
    };

    debug!(
        disposable_income = %summary.disposable_income,
        net_worth = %summary.net_worth,
        "budget summary"
    );
    summary
}
