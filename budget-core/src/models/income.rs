use serde::{Deserialize, Serialize};

use super::fields::{FieldMap, keyed_fields};
use super::MonetaryInput;

keyed_fields! {
    /// Income lines captured by the income form.
    pub enum IncomeField {
        SalaryWages => "income_salary_wages",
        Tips => "income_tips",
        Bonuses => "income_bonuses",
        SoleProp => "income_sole_prop",
        InvestmentProperty => "income_investment_property",
        Interest => "income_interest",
        PublicDividend => "income_public_dividend",
        OwnerDividend => "income_owner_dividend",
        Trust => "income_trust",
        PeerToPeerLending => "income_peer_to_peer_lending",
        Royalties => "income_royalties",
        VentureCapital => "income_venture_capital",
        CapitalGainsLosses => "income_capital_gains_losses",
        EmploymentInsurance => "income_employment_insurance",
        FederalPension => "income_federal_pension",
        WorkPension => "income_work_pension",
        SocialSecurity => "income_social_security",
        ScholarshipsGrants => "income_scholarships_grants",
        Alimony => "income_alimony",
        GamblingWinnings => "income_gambling_winnings",
        TaxFreeIncome => "income_tax_free_income",
    }
}

/// How an income line is treated by payroll and income tax rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeTreatment {
    /// Insurable/pensionable employment earnings.
    Employment,
    /// Self-employment earnings subject to CPP or SE tax.
    SelfEmployment,
    CapitalGains,
    /// Never taxed in any region.
    TaxFree,
    /// Excluded from Canadian taxable income.
    GamblingWinnings,
    /// Excluded from US taxable income.
    Alimony,
    Ordinary,
}

impl IncomeField {
    pub fn treatment(&self) -> IncomeTreatment {
        match self {
            Self::SalaryWages | Self::Tips | Self::Bonuses => IncomeTreatment::Employment,
            Self::SoleProp => IncomeTreatment::SelfEmployment,
            Self::CapitalGainsLosses => IncomeTreatment::CapitalGains,
            Self::TaxFreeIncome => IncomeTreatment::TaxFree,
            Self::GamblingWinnings => IncomeTreatment::GamblingWinnings,
            Self::Alimony => IncomeTreatment::Alimony,
            _ => IncomeTreatment::Ordinary,
        }
    }

    /// Whether the line counts toward passive income for the FIRE ratio.
    pub fn is_passive(&self) -> bool {
        matches!(
            self,
            Self::InvestmentProperty
                | Self::Interest
                | Self::PublicDividend
                | Self::Trust
                | Self::PeerToPeerLending
                | Self::Royalties
        )
    }

    /// Persisted key of the frequency selection for this line.
    pub fn frequency_key(&self) -> String {
        format!("frequency_{}_frequency", self.key())
    }
}

/// Income inputs keyed by field.
pub type IncomeProfile = FieldMap<IncomeField, MonetaryInput>;
