//! Checks the jurisdiction dataset shipped with the crate.

use budget_core::calculations::brackets::calculate_tax;
use budget_core::Region;
use budget_data::JurisdictionLoader;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

#[test]
fn test_builtin_dataset_loads() {
    let table = JurisdictionLoader::builtin().expect("builtin dataset should load");

    // 2 regions, 13 provinces and territories, 50 states.
    assert_eq!(table.len(), 65);
}

#[test]
fn test_every_listed_subregion_has_a_profile() {
    let table = JurisdictionLoader::builtin().unwrap();

    for region in [Region::Canada, Region::Usa] {
        assert!(table.region(region).is_some(), "missing {region} profile");
        for code in region.subregions() {
            assert!(
                table.subregion(region, code).is_some(),
                "missing profile for {region}/{code}"
            );
        }
        assert_eq!(table.subregion_codes(region).len(), region.subregions().len());
    }
}

#[test]
fn test_federal_basic_amounts() {
    let table = JurisdictionLoader::builtin().unwrap();

    assert_eq!(table.region(Region::Canada).unwrap().basic_amount, dec!(15705));
    assert_eq!(table.region(Region::Usa).unwrap().basic_amount, dec!(14600));
}

#[test]
fn test_canadian_federal_tax_at_100000() {
    let table = JurisdictionLoader::builtin().unwrap();
    let federal = table.region(Region::Canada).unwrap();

    assert_eq!(calculate_tax(federal.brackets.brackets(), dec!(100000)), dec!(17427.32));
}

#[test]
fn test_states_without_income_tax() {
    let table = JurisdictionLoader::builtin().unwrap();

    for code in ["AK", "FL", "NV", "NH", "SD", "TN", "TX", "WA", "WY"] {
        let profile = table.subregion(Region::Usa, code).unwrap();
        assert_eq!(
            calculate_tax(profile.brackets.brackets(), dec!(250000)),
            dec!(0),
            "{code} should not tax income"
        );
    }
}
