//! Category totals over fixed field lists.
//!
//! Every function here is pure: it reads typed inputs and returns annual
//! totals rounded to cents. Writing the totals anywhere is the caller's job.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{checked_sum, round_half_up};
use crate::models::{
    AssetField, AssetInputs, BalanceInput, ExpenseCategory, ExpenseProfile, FieldMap, IncomeField,
    IncomeProfile, IncomeTreatment, LiabilityField, LiabilityInputs, MonetaryInput,
};

/// Sums the annualized inputs for `fields`.
pub fn aggregate<F>(
    inputs: &FieldMap<F, MonetaryInput>,
    fields: impl IntoIterator<Item = F>,
) -> Decimal
where
    F: Ord + Copy,
{
    round_half_up(checked_sum(
        fields.into_iter().map(|field| inputs.get(field).annualized()),
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTotals {
    /// Every income line (`ANNUALINCOME`).
    pub annual: Decimal,
    /// Salary, tips and bonuses (`ANNUALEMPLOYMENTINCOME`).
    pub employment: Decimal,
    /// Sole proprietorship income.
    pub self_employment: Decimal,
    /// Investment lines counted toward FIRE (`PASSIVEINCOME`).
    pub passive: Decimal,
}

pub fn income_totals(income: &IncomeProfile) -> IncomeTotals {
    let all = IncomeField::ALL.iter().copied();
    let with_treatment = |treatment: IncomeTreatment| {
        IncomeField::ALL
            .iter()
            .copied()
            .filter(move |field| field.treatment() == treatment)
    };

    IncomeTotals {
        annual: aggregate(income, all),
        employment: aggregate(income, with_treatment(IncomeTreatment::Employment)),
        self_employment: aggregate(income, with_treatment(IncomeTreatment::SelfEmployment)),
        passive: aggregate(
            income,
            IncomeField::ALL.iter().copied().filter(IncomeField::is_passive),
        ),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTotals {
    pub housing: Decimal,
    pub transportation: Decimal,
    pub dependant: Decimal,
    pub debt: Decimal,
    pub essential: Decimal,
    pub discretionary: Decimal,
    /// Sum of all categories (`ANNUALEXPENSESUM`).
    pub total: Decimal,
}

impl ExpenseTotals {
    pub fn category(
        &self,
        category: ExpenseCategory,
    ) -> Decimal {
        match category {
            ExpenseCategory::Housing => self.housing,
            ExpenseCategory::Transportation => self.transportation,
            ExpenseCategory::Dependant => self.dependant,
            ExpenseCategory::Debt => self.debt,
            ExpenseCategory::Essential => self.essential,
            ExpenseCategory::Discretionary => self.discretionary,
        }
    }
}

pub fn expense_totals(expenses: &ExpenseProfile) -> ExpenseTotals {
    let total_of = |category: ExpenseCategory| aggregate(expenses, category.fields());

    let housing = total_of(ExpenseCategory::Housing);
    let transportation = total_of(ExpenseCategory::Transportation);
    let dependant = total_of(ExpenseCategory::Dependant);
    let debt = total_of(ExpenseCategory::Debt);
    let essential = total_of(ExpenseCategory::Essential);
    let discretionary = total_of(ExpenseCategory::Discretionary);

    ExpenseTotals {
        housing,
        transportation,
        dependant,
        debt,
        essential,
        discretionary,
        total: checked_sum([housing, transportation, dependant, debt, essential, discretionary]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTotals {
    /// Owned share of every asset (`ASSETS`).
    pub assets: Decimal,
    /// `LIQUIDASSETS`.
    pub liquid_assets: Decimal,
    /// Owned share of every liability (`LIABILITIES`).
    pub liabilities: Decimal,
    /// Debt not backed by an asset (`LIABILITIESNA`).
    pub revolving_liabilities: Decimal,
}

/// Totals balances.
///
/// Ownership percentages always apply to the asset and liability totals.
/// For the liquid and revolving subsets they apply only when
/// `partner_share` is set; otherwise the full balance counts.
pub fn balance_totals(
    assets: &AssetInputs,
    liabilities: &LiabilityInputs,
    partner_share: bool,
) -> BalanceTotals {
    let subset_amount = |input: BalanceInput| {
        if partner_share { input.owned() } else { input.amount }
    };

    let asset_sum = checked_sum(AssetField::ALL.iter().map(|f| assets.get(*f).owned()));
    let liquid_sum = checked_sum(
        AssetField::ALL
            .iter()
            .filter(|f| f.is_liquid())
            .map(|f| subset_amount(assets.get(*f))),
    );
    let liability_sum = checked_sum(
        LiabilityField::ALL
            .iter()
            .map(|f| liabilities.get(*f).owned()),
    );
    let revolving_sum = checked_sum(
        LiabilityField::ALL
            .iter()
            .filter(|f| f.is_revolving())
            .map(|f| subset_amount(liabilities.get(*f))),
    );

    BalanceTotals {
        assets: round_half_up(asset_sum),
        liquid_assets: round_half_up(liquid_sum),
        liabilities: round_half_up(liability_sum),
        revolving_liabilities: round_half_up(revolving_sum),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{ExpenseField, Frequency};

    fn monthly(amount: Decimal) -> MonetaryInput {
        MonetaryInput::new(amount, Frequency::Monthly)
    }

    // =========================================================================
    // income_totals tests
    // =========================================================================

    #[test]
    fn income_totals_groups_by_treatment() {
        let income = IncomeProfile::new()
            .with(IncomeField::SalaryWages, monthly(dec!(5000)))
            .with(IncomeField::Tips, MonetaryInput::new(dec!(100), Frequency::Weekly))
            .with(IncomeField::SoleProp, MonetaryInput::annual(dec!(12000)))
            .with(IncomeField::Interest, MonetaryInput::annual(dec!(800)))
            .with(IncomeField::Royalties, MonetaryInput::new(dec!(50), Frequency::Quarterly));

        let totals = income_totals(&income);

        assert_eq!(totals.employment, dec!(65200));
        assert_eq!(totals.self_employment, dec!(12000));
        assert_eq!(totals.passive, dec!(1000));
        assert_eq!(totals.annual, dec!(78200));
    }

    #[test]
    fn income_totals_skips_unrecognized_frequency() {
        let income = IncomeProfile::new()
            .with(IncomeField::SalaryWages, MonetaryInput::from_text("5000", "daily"));

        assert_eq!(income_totals(&income), IncomeTotals::default());
    }

    // =========================================================================
    // expense_totals tests
    // =========================================================================

    #[test]
    fn expense_totals_sums_each_category() {
        let expenses = ExpenseProfile::new()
            .with(ExpenseField::RentPayment, monthly(dec!(1500)))
            .with(ExpenseField::Internet, monthly(dec!(60)))
            .with(ExpenseField::Fuel, MonetaryInput::new(dec!(40), Frequency::Weekly))
            .with(ExpenseField::CreditCardPayment, monthly(dec!(200)))
            .with(ExpenseField::Grocery, MonetaryInput::new(dec!(120), Frequency::Weekly))
            .with(ExpenseField::Dining, monthly(dec!(150)));

        let totals = expense_totals(&expenses);

        assert_eq!(totals.housing, dec!(18720));
        assert_eq!(totals.transportation, dec!(2080));
        assert_eq!(totals.dependant, dec!(0));
        assert_eq!(totals.debt, dec!(2400));
        assert_eq!(totals.essential, dec!(6240));
        assert_eq!(totals.discretionary, dec!(1800));
        assert_eq!(totals.total, dec!(31240));
        assert_eq!(totals.category(ExpenseCategory::Housing), totals.housing);
    }

    #[test]
    fn aggregate_overflowing_total_is_zero() {
        let huge = MonetaryInput {
            amount: Decimal::MAX,
            frequency: Some(Frequency::Annually),
        };
        let income = IncomeProfile::new()
            .with(IncomeField::SalaryWages, huge)
            .with(IncomeField::Bonuses, huge);

        assert_eq!(income_totals(&income).annual, Decimal::ZERO);
    }

    #[test]
    fn huge_form_amount_contributes_zero() {
        let income = IncomeProfile::new()
            .with(
                IncomeField::SalaryWages,
                MonetaryInput::from_text("79228162514264337593543950335", "weekly"),
            )
            .with(IncomeField::Tips, monthly(dec!(100)));

        assert_eq!(income_totals(&income).annual, dec!(1200));
    }

    // =========================================================================
    // balance_totals tests
    // =========================================================================

    fn sample_balances() -> (AssetInputs, LiabilityInputs) {
        let assets = AssetInputs::new()
            .with(AssetField::CheckingAccounts, BalanceInput::with_percent(dec!(4000), dec!(50)))
            .with(AssetField::SavingsAccounts, BalanceInput::new(dec!(10000)))
            .with(AssetField::PrimaryResidence, BalanceInput::with_percent(dec!(500000), dec!(50)));
        let liabilities = LiabilityInputs::new()
            .with(LiabilityField::PrimaryResidence, BalanceInput::with_percent(dec!(300000), dec!(50)))
            .with(LiabilityField::CreditCard, BalanceInput::with_percent(dec!(3000), dec!(50)));
        (assets, liabilities)
    }

    #[test]
    fn balance_totals_applies_percent_to_totals() {
        let (assets, liabilities) = sample_balances();

        let totals = balance_totals(&assets, &liabilities, false);

        assert_eq!(totals.assets, dec!(262000));
        assert_eq!(totals.liabilities, dec!(151500));
    }

    #[test]
    fn balance_totals_ignores_percent_for_subsets_without_partner_share() {
        let (assets, liabilities) = sample_balances();

        let totals = balance_totals(&assets, &liabilities, false);

        assert_eq!(totals.liquid_assets, dec!(14000));
        assert_eq!(totals.revolving_liabilities, dec!(3000));
    }

    #[test]
    fn balance_totals_applies_percent_to_subsets_with_partner_share() {
        let (assets, liabilities) = sample_balances();

        let totals = balance_totals(&assets, &liabilities, true);

        assert_eq!(totals.liquid_assets, dec!(12000));
        assert_eq!(totals.revolving_liabilities, dec!(1500));
    }
}
