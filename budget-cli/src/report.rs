//! Plain-text reports printed by the `budget` binary.

use std::fmt;

use budget_core::calculations::summary::Projection;
use budget_core::{CalculationResult, Frequency, PayrollObligations, Region};
use rust_decimal::Decimal;

const LABEL_WIDTH: usize = 28;
const AMOUNT_WIDTH: usize = 14;

/// Full calculation result with amounts shown annually and per
/// `frequency` period.
pub struct ResultReport<'a> {
    pub result: &'a CalculationResult,
    pub frequency: Frequency,
}

impl<'a> ResultReport<'a> {
    pub fn new(
        result: &'a CalculationResult,
        frequency: Frequency,
    ) -> Self {
        Self { result, frequency }
    }

    fn heading(
        &self,
        f: &mut fmt::Formatter<'_>,
        title: &str,
    ) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "{title:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
            "Annual",
            capitalize(self.frequency.as_str())
        )
    }

    fn row(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: &str,
        annual: Decimal,
    ) -> fmt::Result {
        writeln!(
            f,
            "  {label:<width$}{annual:>AMOUNT_WIDTH$.2}{:>AMOUNT_WIDTH$.2}",
            self.frequency.per_period(annual),
            width = LABEL_WIDTH - 2
        )
    }

    fn payroll(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match &self.result.payroll {
            PayrollObligations::Canada { cpp, ei_premium } => {
                self.row(f, "CPP (employed)", cpp.employed)?;
                self.row(f, "CPP (self-employed)", cpp.self_employed)?;
                self.row(f, "EI premium", *ei_premium)?;
            }
            PayrollObligations::Usa {
                social_security,
                medicare,
            } => {
                self.row(f, "Social Security (employed)", social_security.employed)?;
                self.row(f, "Social Security (self-emp.)", social_security.self_employed)?;
                self.row(f, "Medicare", medicare.total)?;
            }
            PayrollObligations::None => {}
        }
        self.row(f, "Total obligations", self.result.payroll.total())
    }
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        writeln!(f, "Jurisdiction: {}", jurisdiction(r.region, r.subregion.as_deref()))?;

        self.heading(f, "Income")?;
        self.row(f, "Annual income", r.income.annual)?;
        self.row(f, "Employment income", r.income.employment)?;
        self.row(f, "Self-employment income", r.income.self_employment)?;
        self.row(f, "Passive income", r.income.passive)?;

        self.heading(f, "Taxable income")?;
        self.row(f, "Adjusted gross income", r.taxable.adjusted_gross)?;
        self.row(f, "Regional deduction", r.taxable.regional_deduction)?;
        self.row(f, "Subregional deduction", r.taxable.subregional_deduction)?;
        self.row(f, "Regional taxable", r.taxable.regional)?;
        self.row(f, "Subregional taxable", r.taxable.subregional)?;
        self.row(f, "Capital gains", r.taxable.capital_gains)?;

        self.heading(f, "Taxes")?;
        self.row(f, "Regional tax", r.regional_tax)?;
        self.row(f, "Subregional tax", r.subregional_tax)?;
        self.row(f, "Income tax", r.annual_tax)?;
        self.row(f, "Capital gains tax", r.capital_gains_tax)?;

        self.heading(f, "Government obligations")?;
        self.payroll(f)?;

        self.heading(f, "Expenses")?;
        self.row(f, "Housing", r.expenses.housing)?;
        self.row(f, "Transportation", r.expenses.transportation)?;
        self.row(f, "Dependant", r.expenses.dependant)?;
        self.row(f, "Debt", r.expenses.debt)?;
        self.row(f, "Essential", r.expenses.essential)?;
        self.row(f, "Discretionary", r.expenses.discretionary)?;
        self.row(f, "Total expenses", r.expenses.total)?;

        if let Some(business) = &r.business {
            self.heading(f, "Business")?;
            self.row(f, "Revenue", business.revenue)?;
            self.row(f, "Cost of goods sold", business.cogs)?;
            self.row(f, "Operational costs", business.operational)?;
            self.row(f, "Building costs", business.building)?;
            self.row(f, "Vehicle costs", business.vehicle)?;
            self.row(f, "Net income", business.net_income)?;
        }

        self.heading(f, "Summary")?;
        self.row(f, "Disposable income", r.summary.disposable_income)?;

        writeln!(f)?;
        writeln!(f, "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", "Balances", "Amount")?;
        balance_row(f, "Assets", r.balances.assets)?;
        balance_row(f, "Liquid assets", r.balances.liquid_assets)?;
        balance_row(f, "Liabilities", r.balances.liabilities)?;
        balance_row(f, "Revolving liabilities", r.balances.revolving_liabilities)?;
        balance_row(f, "Net worth", r.summary.net_worth)?;

        writeln!(f)?;
        writeln!(f, "Ratios")?;
        for (kind, ratio) in r.summary.ratios.iter() {
            match ratio {
                Some(ratio) => writeln!(
                    f,
                    "  {:<width$}{:>AMOUNT_WIDTH$.2}  {}",
                    kind.label(),
                    ratio.value,
                    ratio.rating.as_str(),
                    width = LABEL_WIDTH - 2
                )?,
                None => writeln!(
                    f,
                    "  {:<width$}{:>AMOUNT_WIDTH$}",
                    kind.label(),
                    "n/a",
                    width = LABEL_WIDTH - 2
                )?,
            }
        }

        writeln!(f)?;
        projection_row(f, "Time to pay debt", &r.summary.time_to_pay_debt)?;
        projection_row(f, "Time to goal", &r.summary.time_to_goal)
    }
}

fn balance_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    amount: Decimal,
) -> fmt::Result {
    writeln!(f, "  {label:<width$}{amount:>AMOUNT_WIDTH$.2}", width = LABEL_WIDTH - 2)
}

fn projection_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    projection: &Projection,
) -> fmt::Result {
    writeln!(f, "{label:<LABEL_WIDTH$}{projection}")
}

fn jurisdiction(
    region: Region,
    subregion: Option<&str>,
) -> String {
    match subregion {
        Some(code) => format!("{region}/{code}"),
        None => region.to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Persisted result keys as a two-column table.
pub struct OutputsReport<'a>(pub &'a [(&'static str, Decimal)]);

impl fmt::Display for OutputsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No persisted results.");
        }
        for (key, value) in self.0 {
            writeln!(f, "{key:<36}{value:>AMOUNT_WIDTH$.2}")?;
        }
        Ok(())
    }
}

/// Subregion codes for one region, one per line.
pub struct SubregionList<'a> {
    pub region: Region,
    pub codes: &'a [&'a str],
}

impl fmt::Display for SubregionList<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.codes.is_empty() {
            return writeln!(f, "No subregions for {}.", self.region);
        }
        for code in self.codes {
            writeln!(f, "{code}")?;
        }
        Ok(())
    }
}
