use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How often a monetary input recurs within a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Annually,
    Quarterly,
    Monthly,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annually => "annually",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }

    /// Parses a stored frequency key.
    ///
    /// Empty input falls back to [`Frequency::Annually`], matching the
    /// default selection of the input forms. Unknown keys return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "annually" | "annual" => Some(Self::Annually),
            "quarterly" => Some(Self::Quarterly),
            "monthly" => Some(Self::Monthly),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }

    pub fn periods_per_year(&self) -> Decimal {
        match self {
            Self::Annually => Decimal::ONE,
            Self::Quarterly => Decimal::from(4),
            Self::Monthly => Decimal::from(12),
            Self::Weekly => Decimal::from(52),
        }
    }

    /// Converts an annual amount into the amount for one period.
    pub fn per_period(&self, annual: Decimal) -> Decimal {
        annual / self.periods_per_year()
    }

    /// Plural unit label used when reporting a count of periods.
    pub fn unit_label(&self) -> &'static str {
        match self {
            Self::Annually => "Years",
            Self::Quarterly => "Quarters",
            Self::Monthly => "Months",
            Self::Weekly => "Weeks",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
