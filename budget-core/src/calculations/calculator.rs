//! One full calculation pass over a [`BudgetInput`].
//!
//! The pass runs in a fixed order and threads every intermediate value
//! through locals:
//!
//! 1. business worksheet (optional, replaces sole proprietorship income)
//! 2. income, expense and balance totals
//! 3. jurisdiction lookup and taxable income
//! 4. regional and subregional bracket tax
//! 5. payroll obligations for the region
//! 6. US capital gains tax
//! 7. budget summary

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::calculations::aggregators::{balance_totals, expense_totals, income_totals};
use crate::calculations::brackets::calculate_tax;
use crate::calculations::business::{self, BusinessResult};
use crate::calculations::capital_gains::{
    CapitalGainsCalculator, CapitalGainsConfig, CapitalGainsConfigError,
};
use crate::calculations::payroll::{
    CppCalculator, EiCalculator, MedicareCalculator, PayrollConfig, PayrollConfigError,
    SocialSecurityCalculator,
};
use crate::calculations::summary::{SummaryInput, summarize};
use crate::calculations::taxable_income::resolve;
use crate::models::{
    BudgetInput, CalculationResult, IncomeField, IncomeProfile, JurisdictionProfile,
    JurisdictionTable, MonetaryInput, PayrollObligations, Region,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("invalid payroll configuration: {0}")]
    Payroll(#[from] PayrollConfigError),

    #[error("invalid capital gains configuration: {0}")]
    CapitalGains(#[from] CapitalGainsConfigError),

    #[error("no jurisdiction profile loaded for region {0}")]
    MissingRegionProfile(Region),
}

/// Rates and limits used by a calculation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub payroll: PayrollConfig,
    pub capital_gains: CapitalGainsConfig,
}

impl CalculatorConfig {
    pub fn validate(&self) -> Result<(), CalculationError> {
        self.payroll.validate()?;
        self.capital_gains.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BudgetCalculator {
    config: CalculatorConfig,
    jurisdictions: JurisdictionTable,
}

impl BudgetCalculator {
    pub fn new(
        config: CalculatorConfig,
        jurisdictions: JurisdictionTable,
    ) -> Self {
        Self {
            config,
            jurisdictions,
        }
    }

    pub fn jurisdictions(&self) -> &JurisdictionTable {
        &self.jurisdictions
    }

    /// Runs every calculator and returns the complete result.
    ///
    /// Input problems never fail the pass; they have already been reduced
    /// to zero contributions.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] if the configuration is invalid or no
    /// profile is loaded for a Canadian or US region.
    pub fn calculate(
        &self,
        input: &BudgetInput,
    ) -> Result<CalculationResult, CalculationError> {
        self.config.validate()?;

        let (income_inputs, business) = self.apply_business_worksheet(input);
        let income = income_totals(&income_inputs);
        let expenses = expense_totals(&input.expenses);
        let balances = balance_totals(&input.assets, &input.liabilities, input.partner_share);

        let region_profile = self.region_profile(input.region)?;
        let subregion_profile = self.subregion_profile(input.region, input.subregion.as_deref());

        let taxable = resolve(
            &income_inputs,
            input.region,
            basic_amount(region_profile),
            basic_amount(subregion_profile),
        );
        let regional_tax = bracket_tax(region_profile, taxable.regional);
        let subregional_tax = bracket_tax(subregion_profile, taxable.subregional);
        let annual_tax = regional_tax + subregional_tax;

        let payroll = self.payroll(input.region, income.employment, income.self_employment)?;
        let capital_gains_tax = CapitalGainsCalculator::new(self.config.capital_gains.clone())
            .calculate(
                input.region,
                income.annual,
                taxable.capital_gains,
                input.state_capital_gains_rate,
            )?;

        let summary = summarize(&SummaryInput {
            region: input.region,
            annual_income: income.annual,
            passive_income: income.passive,
            annual_expenses: expenses.total,
            housing_expenses: expenses.housing,
            regional_tax,
            subregional_tax,
            government_obligations: payroll.total(),
            capital_gains_tax,
            assets: balances.assets,
            liabilities: balances.liabilities,
            revolving_liabilities: balances.revolving_liabilities,
            goal_amount: input.goal_amount,
            display_frequency: input.display_frequency,
        });

        info!(
            region = %input.region,
            subregion = input.subregion.as_deref().unwrap_or(""),
            annual_income = %income.annual,
            annual_tax = %annual_tax,
            disposable_income = %summary.disposable_income,
            "calculation pass complete"
        );

        Ok(CalculationResult {
            region: input.region,
            subregion: input.subregion.clone(),
            income,
            taxable,
            regional_tax,
            subregional_tax,
            annual_tax,
            payroll,
            capital_gains_tax,
            expenses,
            balances,
            summary,
            business,
        })
    }

    /// Replaces sole proprietorship income with the worksheet's net income.
    fn apply_business_worksheet(
        &self,
        input: &BudgetInput,
    ) -> (IncomeProfile, Option<BusinessResult>) {
        let mut income = input.income.clone();
        let Some(worksheet) = &input.business else {
            return (income, None);
        };

        let result = business::calculate(worksheet);
        income.set(IncomeField::SoleProp, MonetaryInput::annual(result.net_income));
        (income, Some(result))
    }

    /// Region-level profile. Required for Canada and the United States.
    fn region_profile(
        &self,
        region: Region,
    ) -> Result<Option<&JurisdictionProfile>, CalculationError> {
        if region == Region::None {
            return Ok(None);
        }
        self.jurisdictions
            .region(region)
            .map(Some)
            .ok_or(CalculationError::MissingRegionProfile(region))
    }

    /// Subregion profile. An unknown code is treated as no subregion.
    fn subregion_profile(
        &self,
        region: Region,
        code: Option<&str>,
    ) -> Option<&JurisdictionProfile> {
        let code = code?;
        let profile = self.jurisdictions.subregion(region, code);
        if profile.is_none() {
            warn!(
                region = %region,
                subregion = code,
                "unknown subregion; subregional deduction and tax are zero"
            );
        }
        profile
    }

    fn payroll(
        &self,
        region: Region,
        employed: Decimal,
        self_employed: Decimal,
    ) -> Result<PayrollObligations, PayrollConfigError> {
        let payroll = &self.config.payroll;
        let obligations = match region {
            Region::Canada => PayrollObligations::Canada {
                cpp: CppCalculator::new(payroll.cpp.clone()).calculate(employed, self_employed)?,
                ei_premium: EiCalculator::new(payroll.ei.clone())
                    .calculate(employed, self_employed)?,
            },
            Region::Usa => PayrollObligations::Usa {
                social_security: SocialSecurityCalculator::new(payroll.social_security.clone())
                    .calculate(employed, self_employed)?,
                medicare: MedicareCalculator::new(payroll.medicare.clone())
                    .calculate(employed, self_employed)?,
            },
            Region::None => PayrollObligations::None,
        };
        Ok(obligations)
    }
}

fn basic_amount(profile: Option<&JurisdictionProfile>) -> Decimal {
    profile.map_or(Decimal::ZERO, |p| p.basic_amount)
}

fn bracket_tax(
    profile: Option<&JurisdictionProfile>,
    taxable_income: Decimal,
) -> Decimal {
    profile.map_or(Decimal::ZERO, |p| {
        calculate_tax(p.brackets.brackets(), taxable_income)
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;
    use crate::calculations::summary::Projection;
    use crate::models::{
        BracketSchedule, BusinessField, BusinessInput, ExpenseField, Frequency, TaxBracket,
    };

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn profile(
        region: Region,
        subregion: Option<&str>,
        basic_amount: Decimal,
        brackets: Vec<TaxBracket>,
    ) -> JurisdictionProfile {
        JurisdictionProfile {
            region,
            subregion: subregion.map(str::to_string),
            basic_amount,
            brackets: BracketSchedule::new(brackets).unwrap(),
        }
    }

    fn table() -> JurisdictionTable {
        JurisdictionTable::new(vec![
            profile(
                Region::Canada,
                None,
                dec!(15000),
                vec![TaxBracket::new(dec!(50000), dec!(0.15)), TaxBracket::unbounded(dec!(0.25))],
            ),
            profile(
                Region::Canada,
                Some("BC"),
                dec!(12000),
                vec![TaxBracket::new(dec!(40000), dec!(0.05)), TaxBracket::unbounded(dec!(0.10))],
            ),
            profile(
                Region::Usa,
                None,
                dec!(14600),
                vec![TaxBracket::new(dec!(50000), dec!(0.10)), TaxBracket::unbounded(dec!(0.20))],
            ),
            profile(Region::Usa, Some("CA"), dec!(5000), vec![TaxBracket::unbounded(dec!(0.05))]),
        ])
    }

    fn calculator() -> BudgetCalculator {
        BudgetCalculator::new(CalculatorConfig::default(), table())
    }

    fn canada_input() -> BudgetInput {
        let mut input = BudgetInput::new(Region::Canada).with_subregion("BC");
        input.income.set(IncomeField::SalaryWages, MonetaryInput::annual(dec!(80000)));
        input.income.set(IncomeField::GamblingWinnings, MonetaryInput::annual(dec!(5000)));
        input
            .expenses
            .set(ExpenseField::RentPayment, MonetaryInput::new(dec!(1500), Frequency::Monthly));
        input
    }

    fn usa_input() -> BudgetInput {
        let mut input = BudgetInput::new(Region::Usa).with_subregion("CA");
        input.income.set(IncomeField::SalaryWages, MonetaryInput::annual(dec!(100000)));
        input.income.set(IncomeField::Alimony, MonetaryInput::annual(dec!(10000)));
        input
            .income
            .set(IncomeField::CapitalGainsLosses, MonetaryInput::annual(dec!(20000)));
        input.state_capital_gains_rate = dec!(0.05);
        input
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_canada_pass() {
        let result = calculator().calculate(&canada_input()).unwrap();

        assert_eq!(result.income.annual, dec!(85000));
        assert_eq!(result.taxable.regional, dec!(65000));
        assert_eq!(result.taxable.subregional, dec!(68000));
        assert_eq!(result.regional_tax, dec!(11250));
        assert_eq!(result.subregional_tax, dec!(4800));
        assert_eq!(result.annual_tax, dec!(16050));
        assert_eq!(result.payroll.total(), dec!(4944.98));
        assert_eq!(result.capital_gains_tax, dec!(0));
        assert_eq!(result.summary.disposable_income, dec!(46005.02));
    }

    #[test]
    fn calculate_canada_uses_cpp_and_ei() {
        let result = calculator().calculate(&canada_input()).unwrap();

        let PayrollObligations::Canada { cpp, ei_premium } = result.payroll else {
            panic!("expected Canadian payroll, got {:?}", result.payroll);
        };
        assert_eq!(cpp.employed, dec!(3867.50));
        assert_eq!(ei_premium, dec!(1077.48));
    }

    #[test]
    fn calculate_usa_pass() {
        let result = calculator().calculate(&usa_input()).unwrap();

        assert_eq!(result.income.annual, dec!(130000));
        assert_eq!(result.taxable.adjusted_gross, dec!(120000));
        assert_eq!(result.regional_tax, dec!(16080));
        assert_eq!(result.subregional_tax, dec!(5750));
        assert_eq!(result.payroll.total(), dec!(7650.00));
        assert_eq!(result.capital_gains_tax, dec!(4000.00));
        assert_eq!(result.summary.disposable_income, dec!(96520));
    }

    #[test]
    fn calculate_without_region_has_no_taxes() {
        let mut input = BudgetInput::new(Region::None);
        input.income.set(IncomeField::SalaryWages, MonetaryInput::annual(dec!(50000)));

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(result.income.annual, dec!(50000));
        assert_eq!(result.annual_tax, dec!(0));
        assert_eq!(result.payroll, PayrollObligations::None);
        assert_eq!(result.summary.disposable_income, dec!(0));
        assert_eq!(result.summary.time_to_pay_debt, Projection::RiskOfInsolvency);
    }

    #[test]
    fn calculate_unknown_subregion_zeroes_subregional_tax() {
        let _guard = init_test_tracing();
        let input = canada_input().with_subregion("ZZ");

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(result.taxable.subregional_deduction, dec!(0));
        assert_eq!(result.taxable.subregional, dec!(80000));
        assert_eq!(result.subregional_tax, dec!(0));
        assert_eq!(result.regional_tax, dec!(11250));
    }

    #[test]
    fn calculate_requires_region_profile() {
        let calculator = BudgetCalculator::new(CalculatorConfig::default(), JurisdictionTable::default());

        assert_eq!(
            calculator.calculate(&canada_input()),
            Err(CalculationError::MissingRegionProfile(Region::Canada))
        );
    }

    #[test]
    fn calculate_rejects_invalid_payroll_config() {
        let mut config = CalculatorConfig::default();
        config.payroll.medicare.employee_rate = dec!(-0.01);

        let result = BudgetCalculator::new(config, table()).calculate(&usa_input());

        assert_eq!(
            result,
            Err(CalculationError::Payroll(PayrollConfigError::InvalidRate(
                "Medicare employee rate",
                dec!(-0.01)
            )))
        );
    }

    #[test]
    fn calculate_business_worksheet_replaces_sole_prop() {
        let mut input = canada_input();
        input.income.set(IncomeField::SoleProp, MonetaryInput::annual(dec!(99999)));
        let mut worksheet = BusinessInput {
            price: dec!(100),
            ..BusinessInput::default()
        };
        worksheet
            .lines
            .set(BusinessField::Sales, MonetaryInput::new(dec!(20), Frequency::Monthly));
        worksheet
            .lines
            .set(BusinessField::Rent, MonetaryInput::new(dec!(500), Frequency::Monthly));
        input.business = Some(worksheet);

        let result = calculator().calculate(&input).unwrap();

        assert_eq!(result.business.map(|b| b.net_income), Some(dec!(18000)));
        assert_eq!(result.income.self_employment, dec!(18000));
        assert_eq!(result.income.annual, dec!(103000));
    }

    #[test]
    fn calculate_is_repeatable() {
        let calculator = calculator();
        let input = usa_input();

        assert_eq!(calculator.calculate(&input), calculator.calculate(&input));
    }
}
