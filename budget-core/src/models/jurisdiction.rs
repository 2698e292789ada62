use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BracketSchedule;

const CANADIAN_SUBREGIONS: &[&str] = &[
    "AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT",
];

const US_SUBREGIONS: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

/// Country-level jurisdiction selected by the user.
///
/// Anything other than `CAN` or `USA` (including an empty selection) is
/// treated as [`Region::None`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "CAN")]
    Canada,
    #[serde(rename = "USA")]
    Usa,
    #[default]
    #[serde(rename = "NONE")]
    None,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canada => "CAN",
            Self::Usa => "USA",
            Self::None => "NONE",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CAN" => Self::Canada,
            "USA" => Self::Usa,
            _ => Self::None,
        }
    }

    /// Province or state codes offered for this region.
    pub fn subregions(&self) -> &'static [&'static str] {
        match self {
            Self::Canada => CANADIAN_SUBREGIONS,
            Self::Usa => US_SUBREGIONS,
            Self::None => &[],
        }
    }

    /// Name of the persisted key holding the region-level deduction.
    pub fn deduction_key(&self) -> Option<&'static str> {
        match self {
            Self::Canada => Some("BPA"),
            Self::Usa => Some("SD"),
            Self::None => None,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tax reference data for a region or one of its subregions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionProfile {
    pub region: Region,
    /// Province or state code; `None` for the region-level profile.
    pub subregion: Option<String>,
    /// Basic personal amount (Canada) or standard deduction (USA).
    pub basic_amount: Decimal,
    pub brackets: BracketSchedule,
}

/// Immutable lookup of jurisdiction profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JurisdictionTable {
    profiles: BTreeMap<(Region, Option<String>), JurisdictionProfile>,
}

impl JurisdictionTable {
    pub fn new(profiles: impl IntoIterator<Item = JurisdictionProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| ((p.region, p.subregion.clone()), p))
            .collect();
        Self { profiles }
    }

    pub fn region(
        &self,
        region: Region,
    ) -> Option<&JurisdictionProfile> {
        self.profiles.get(&(region, None))
    }

    pub fn subregion(
        &self,
        region: Region,
        code: &str,
    ) -> Option<&JurisdictionProfile> {
        self.profiles
            .get(&(region, Some(code.trim().to_ascii_uppercase())))
    }

    /// Subregion codes available for `region`, sorted alphabetically.
    pub fn subregion_codes(
        &self,
        region: Region,
    ) -> Vec<&str> {
        self.profiles
            .keys()
            .filter(|(r, _)| *r == region)
            .filter_map(|(_, code)| code.as_deref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn profile(
        region: Region,
        subregion: Option<&str>,
    ) -> JurisdictionProfile {
        JurisdictionProfile {
            region,
            subregion: subregion.map(str::to_string),
            basic_amount: dec!(10000),
            brackets: BracketSchedule::flat(dec!(0.10)).unwrap(),
        }
    }

    #[test]
    fn region_parse_falls_back_to_none() {
        assert_eq!(Region::parse("can"), Region::Canada);
        assert_eq!(Region::parse("USA"), Region::Usa);
        assert_eq!(Region::parse(""), Region::None);
        assert_eq!(Region::parse("MEX"), Region::None);
    }

    #[test]
    fn region_subregions() {
        assert_eq!(Region::Canada.subregions().len(), 13);
        assert_eq!(Region::Usa.subregions().len(), 50);
        assert!(Region::None.subregions().is_empty());
    }

    #[test]
    fn table_looks_up_region_and_subregion() {
        let table = JurisdictionTable::new(vec![
            profile(Region::Canada, None),
            profile(Region::Canada, Some("BC")),
            profile(Region::Usa, Some("CA")),
        ]);

        assert!(table.region(Region::Canada).is_some());
        assert!(table.region(Region::Usa).is_none());
        assert!(table.subregion(Region::Canada, "bc").is_some());
        assert!(table.subregion(Region::Canada, "CA").is_none());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn subregion_codes_are_filtered_by_region() {
        let table = JurisdictionTable::new(vec![
            profile(Region::Canada, None),
            profile(Region::Canada, Some("ON")),
            profile(Region::Canada, Some("AB")),
            profile(Region::Usa, Some("TX")),
        ]);

        assert_eq!(table.subregion_codes(Region::Canada), vec!["AB", "ON"]);
        assert_eq!(table.subregion_codes(Region::Usa), vec!["TX"]);
    }
}
