use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::MAX_AMOUNT;
use super::fields::{FieldMap, keyed_fields};

keyed_fields! {
    /// Asset balances captured by the asset form.
    pub enum AssetField {
        CheckingAccounts => "assets_checking_accounts",
        SavingsAccounts => "assets_savings_accounts",
        OtherLiquidAccounts => "assets_other_liquid_accounts",
        MoneyLentOut => "assets_money_lent_out",
        LongTermInvestmentAccounts => "assets_long_term_investment_accounts",
        InvestmentProperties => "assets_investment_properties",
        ArtJewelry => "assets_art_jewelry",
        PrimaryResidence => "assets_primary_residence",
        SmallBusiness => "assets_small_business",
        Vehicles => "assets_vehicles",
    }
}

keyed_fields! {
    /// Liability balances captured by the liability form.
    pub enum LiabilityField {
        SmallBusinessLoan => "liabilities_small_business_loan",
        PrimaryResidence => "liabilities_primary_residence",
        InvestmentProperties => "liabilities_investment_properties",
        VehicleLoan => "liabilities_vehicle_loan",
        PersonalDebt => "liabilities_personal_debt",
        StudentLoan => "liabilities_student_loan",
        LineOfCredit => "liabilities_line_of_credit",
        CreditCard => "liabilities_credit_card",
        TaxArrears => "liabilities_tax_arrears",
    }
}

impl AssetField {
    /// Cash or near-cash balances counted toward liquid assets.
    pub fn is_liquid(&self) -> bool {
        matches!(
            self,
            Self::CheckingAccounts
                | Self::SavingsAccounts
                | Self::OtherLiquidAccounts
                | Self::MoneyLentOut
        )
    }

    pub fn percent_key(&self) -> String {
        format!("{}_percent", self.key())
    }
}

impl LiabilityField {
    /// Debt not secured by an asset, paid down from disposable income.
    pub fn is_revolving(&self) -> bool {
        matches!(
            self,
            Self::PersonalDebt
                | Self::StudentLoan
                | Self::LineOfCredit
                | Self::CreditCard
                | Self::TaxArrears
        )
    }

    pub fn percent_key(&self) -> String {
        format!("{}_percent", self.key())
    }
}

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A balance with an optional ownership percentage (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceInput {
    pub amount: Decimal,
    pub percent: Option<Decimal>,
}

impl BalanceInput {
    /// Creates a fully-owned balance, clamping negatives to zero.
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: clamp_amount(amount),
            percent: None,
        }
    }

    pub fn with_percent(
        amount: Decimal,
        percent: Decimal,
    ) -> Self {
        Self {
            amount: clamp_amount(amount),
            percent: Some(clamp_percent(percent)),
        }
    }

    /// Ownership share as a percentage; unset means 100.
    pub fn share_percent(&self) -> Decimal {
        self.percent.unwrap_or(HUNDRED)
    }

    /// The owned portion of the balance.
    pub fn owned(&self) -> Decimal {
        self.amount * self.share_percent() / HUNDRED
    }
}

fn clamp_amount(amount: Decimal) -> Decimal {
    if amount < Decimal::ZERO {
        warn!(amount = %amount, "negative balance clamped to zero");
        return Decimal::ZERO;
    }
    if amount > MAX_AMOUNT {
        warn!(amount = %amount, "balance out of range treated as zero");
        return Decimal::ZERO;
    }
    amount
}

fn clamp_percent(percent: Decimal) -> Decimal {
    if percent < Decimal::ZERO || percent > HUNDRED {
        let clamped = percent.clamp(Decimal::ZERO, HUNDRED);
        warn!(percent = %percent, clamped = %clamped, "ownership percent out of range");
        return clamped;
    }
    percent
}

pub type AssetInputs = FieldMap<AssetField, BalanceInput>;
pub type LiabilityInputs = FieldMap<LiabilityField, BalanceInput>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn owned_defaults_to_full_balance() {
        assert_eq!(BalanceInput::new(dec!(5000)).owned(), dec!(5000));
    }

    #[test]
    fn owned_applies_percent() {
        assert_eq!(BalanceInput::with_percent(dec!(5000), dec!(40)).owned(), dec!(2000));
    }

    #[test]
    fn out_of_range_balance_is_zero() {
        assert_eq!(BalanceInput::new(Decimal::MAX).owned(), Decimal::ZERO);
        assert_eq!(BalanceInput::with_percent(Decimal::MAX, dec!(50)).owned(), Decimal::ZERO);
    }

    #[test]
    fn with_percent_clamps_out_of_range_values() {
        assert_eq!(
            BalanceInput::with_percent(dec!(100), dec!(150)).percent,
            Some(dec!(100))
        );
        assert_eq!(
            BalanceInput::with_percent(dec!(100), dec!(-5)).percent,
            Some(dec!(0))
        );
    }

    #[test]
    fn liquid_and_revolving_subsets() {
        let liquid: Vec<_> = AssetField::ALL.iter().filter(|f| f.is_liquid()).collect();
        let revolving: Vec<_> = LiabilityField::ALL.iter().filter(|f| f.is_revolving()).collect();

        assert_eq!(liquid.len(), 4);
        assert_eq!(revolving.len(), 5);
        assert_eq!(AssetField::ALL.len(), 10);
        assert_eq!(LiabilityField::ALL.len(), 9);
    }

    #[test]
    fn percent_key_appends_suffix() {
        assert_eq!(
            AssetField::Vehicles.percent_key(),
            "assets_vehicles_percent"
        );
    }
}
