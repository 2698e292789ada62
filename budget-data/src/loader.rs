use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use budget_core::{
    BracketSchedule, BracketScheduleError, JurisdictionProfile, JurisdictionTable, Region,
    TaxBracket,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

const BUILTIN_JURISDICTIONS: &str = include_str!("../data/jurisdictions.csv");
const BUILTIN_BRACKETS: &str = include_str!("../data/brackets.csv");

pub const JURISDICTIONS_FILE: &str = "jurisdictions.csv";
pub const BRACKETS_FILE: &str = "brackets.csv";

/// Errors that can occur when loading jurisdiction data.
#[derive(Debug, Error)]
pub enum JurisdictionLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Unknown region '{0}' (expected CAN or USA)")]
    UnknownRegion(String),

    #[error("Jurisdiction {0} is listed more than once")]
    DuplicateJurisdiction(String),

    #[error("Jurisdiction {0} has a negative basic amount: {1}")]
    NegativeBasicAmount(String, Decimal),

    #[error("Jurisdiction {0} has no brackets")]
    MissingBrackets(String),

    #[error("Brackets reference unknown jurisdiction {0}")]
    UnknownJurisdiction(String),

    #[error("Invalid bracket schedule for {jurisdiction}: {source}")]
    InvalidSchedule {
        jurisdiction: String,
        source: BracketScheduleError,
    },
}

impl From<csv::Error> for JurisdictionLoaderError {
    fn from(err: csv::Error) -> Self {
        JurisdictionLoaderError::CsvParse(err.to_string())
    }
}

/// A row of `jurisdictions.csv`.
///
/// - `region`: `CAN` or `USA`
/// - `subregion`: province or state code; empty for the region itself
/// - `basic_amount`: basic personal amount or standard deduction
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JurisdictionRecord {
    pub region: String,
    #[serde(deserialize_with = "deserialize_optional_code")]
    pub subregion: Option<String>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub basic_amount: Decimal,
}

/// A row of `brackets.csv`.
///
/// - `upper_limit`: top of the bracket; empty for the unbounded bracket
/// - `rate`: marginal rate as a fraction (e.g. 0.15 for 15%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub region: String,
    #[serde(deserialize_with = "deserialize_optional_code")]
    pub subregion: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_limit: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
}

fn deserialize_optional_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty()))
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

type JurisdictionKey = (Region, Option<String>);

fn label(key: &JurisdictionKey) -> String {
    match &key.1 {
        Some(code) => format!("{}/{}", key.0, code),
        None => key.0.to_string(),
    }
}

fn parse_region(code: &str) -> Result<Region, JurisdictionLoaderError> {
    match Region::parse(code) {
        Region::None => Err(JurisdictionLoaderError::UnknownRegion(code.to_string())),
        region => Ok(region),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_file(path: &Path) -> Result<String, JurisdictionLoaderError> {
    std::fs::read_to_string(path).map_err(|e| JurisdictionLoaderError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Loads [`JurisdictionTable`]s from CSV data.
pub struct JurisdictionLoader;

impl JurisdictionLoader {
    /// Parses `jurisdictions.csv` records. Lines starting with `#` are
    /// ignored.
    pub fn parse_jurisdictions<R: Read>(
        reader: R
    ) -> Result<Vec<JurisdictionRecord>, JurisdictionLoaderError> {
        let mut records = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: JurisdictionRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Parses `brackets.csv` records.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, JurisdictionLoaderError> {
        let mut records = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Joins profile rows with their bracket rows and validates every
    /// schedule.
    ///
    /// Every jurisdiction needs at least one bracket and every bracket row
    /// must belong to a listed jurisdiction.
    pub fn build(
        jurisdictions: &[JurisdictionRecord],
        brackets: &[BracketRecord],
    ) -> Result<JurisdictionTable, JurisdictionLoaderError> {
        let mut grouped: BTreeMap<JurisdictionKey, Vec<TaxBracket>> = BTreeMap::new();
        for record in brackets {
            let key = (parse_region(&record.region)?, record.subregion.clone());
            grouped.entry(key).or_default().push(TaxBracket {
                upper_limit: record.upper_limit,
                rate: record.rate,
            });
        }

        let mut seen = BTreeSet::new();
        let mut profiles = Vec::with_capacity(jurisdictions.len());
        for record in jurisdictions {
            let key = (parse_region(&record.region)?, record.subregion.clone());
            if !seen.insert(key.clone()) {
                return Err(JurisdictionLoaderError::DuplicateJurisdiction(label(&key)));
            }
            if record.basic_amount < Decimal::ZERO {
                return Err(JurisdictionLoaderError::NegativeBasicAmount(
                    label(&key),
                    record.basic_amount,
                ));
            }

            let rows = grouped
                .remove(&key)
                .ok_or_else(|| JurisdictionLoaderError::MissingBrackets(label(&key)))?;
            let schedule = BracketSchedule::new(rows).map_err(|source| {
                JurisdictionLoaderError::InvalidSchedule {
                    jurisdiction: label(&key),
                    source,
                }
            })?;

            debug!(
                jurisdiction = %label(&key),
                brackets = schedule.brackets().len(),
                "jurisdiction loaded"
            );
            profiles.push(JurisdictionProfile {
                region: key.0,
                subregion: key.1,
                basic_amount: record.basic_amount,
                brackets: schedule,
            });
        }

        if let Some(orphan) = grouped.keys().next() {
            return Err(JurisdictionLoaderError::UnknownJurisdiction(label(orphan)));
        }

        Ok(JurisdictionTable::new(profiles))
    }

    /// Parses and builds a table from two CSV readers.
    pub fn load<J: Read, B: Read>(
        jurisdictions: J,
        brackets: B,
    ) -> Result<JurisdictionTable, JurisdictionLoaderError> {
        let jurisdictions = Self::parse_jurisdictions(jurisdictions)?;
        let brackets = Self::parse_brackets(brackets)?;
        let table = Self::build(&jurisdictions, &brackets)?;
        info!(jurisdictions = table.len(), "jurisdiction table loaded");
        Ok(table)
    }

    /// Loads `jurisdictions.csv` and `brackets.csv` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<JurisdictionTable, JurisdictionLoaderError> {
        let jurisdictions = read_file(&dir.join(JURISDICTIONS_FILE))?;
        let brackets = read_file(&dir.join(BRACKETS_FILE))?;
        Self::load(jurisdictions.as_bytes(), brackets.as_bytes())
    }

    /// The dataset shipped with this crate.
    pub fn builtin() -> Result<JurisdictionTable, JurisdictionLoaderError> {
        Self::load(BUILTIN_JURISDICTIONS.as_bytes(), BUILTIN_BRACKETS.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const JURISDICTIONS: &str = "region,subregion,basic_amount
CAN,,15705
CAN,bc,12580
";

    const BRACKETS: &str = "# comment lines are skipped
region,subregion,upper_limit,rate
CAN,,55867,0.15
CAN,,,0.205
CAN,BC,,0.0506
";

    #[test]
    fn test_parse_jurisdiction_record() {
        let records = JurisdictionLoader::parse_jurisdictions(JURISDICTIONS.as_bytes()).unwrap();

        assert_eq!(
            records,
            vec![
                JurisdictionRecord {
                    region: "CAN".to_string(),
                    subregion: None,
                    basic_amount: dec!(15705),
                },
                JurisdictionRecord {
                    region: "CAN".to_string(),
                    subregion: Some("BC".to_string()),
                    basic_amount: dec!(12580),
                },
            ]
        );
    }

    #[test]
    fn test_parse_unbounded_bracket() {
        let records = JurisdictionLoader::parse_brackets(BRACKETS.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].upper_limit, None);
        assert_eq!(records[1].rate, dec!(0.205));
    }

    #[test]
    fn test_parse_invalid_rate() {
        let csv = "region,subregion,upper_limit,rate\nCAN,,,abc";

        let result = JurisdictionLoader::parse_brackets(csv.as_bytes());

        assert!(matches!(result, Err(JurisdictionLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_load_builds_table() {
        let table = JurisdictionLoader::load(JURISDICTIONS.as_bytes(), BRACKETS.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        let federal = table.region(Region::Canada).unwrap();
        assert_eq!(federal.basic_amount, dec!(15705));
        assert_eq!(federal.brackets.brackets().len(), 2);
        assert_eq!(table.subregion_codes(Region::Canada), vec!["BC"]);
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let jurisdictions = "region,subregion,basic_amount\nMEX,,1000";
        let brackets = "region,subregion,upper_limit,rate\nCAN,,,0.1";

        let result = JurisdictionLoader::load(jurisdictions.as_bytes(), brackets.as_bytes());

        assert!(matches!(result, Err(JurisdictionLoaderError::UnknownRegion(r)) if r == "MEX"));
    }

    #[test]
    fn test_missing_brackets_are_rejected() {
        let brackets = "region,subregion,upper_limit,rate\nCAN,,,0.15";

        let result = JurisdictionLoader::load(JURISDICTIONS.as_bytes(), brackets.as_bytes());

        assert!(
            matches!(result, Err(JurisdictionLoaderError::MissingBrackets(j)) if j == "CAN/BC")
        );
    }

    #[test]
    fn test_orphan_brackets_are_rejected() {
        let brackets = format!("{BRACKETS}CAN,ON,,0.0505\n");

        let result = JurisdictionLoader::load(JURISDICTIONS.as_bytes(), brackets.as_bytes());

        assert!(
            matches!(result, Err(JurisdictionLoaderError::UnknownJurisdiction(j)) if j == "CAN/ON")
        );
    }

    #[test]
    fn test_duplicate_jurisdiction_is_rejected() {
        let jurisdictions = format!("{JURISDICTIONS}CAN,BC,11000\n");

        let result = JurisdictionLoader::load(jurisdictions.as_bytes(), BRACKETS.as_bytes());

        assert!(matches!(result, Err(JurisdictionLoaderError::DuplicateJurisdiction(_))));
    }

    #[test]
    fn test_schedule_without_top_bracket_is_rejected() {
        let brackets = "region,subregion,upper_limit,rate
CAN,,55867,0.15
CAN,BC,,0.0506
";

        let result = JurisdictionLoader::load(JURISDICTIONS.as_bytes(), brackets.as_bytes());

        match result {
            Err(JurisdictionLoaderError::InvalidSchedule {
                jurisdiction,
                source,
            }) => {
                assert_eq!(jurisdiction, "CAN");
                assert_eq!(source, BracketScheduleError::MissingUnboundedBracket);
            }
            other => panic!("expected InvalidSchedule, got {other:?}"),
        }
    }

    #[test]
    fn test_from_dir_reports_missing_files() {
        let result = JurisdictionLoader::from_dir(Path::new("/nonexistent/budget-data"));

        assert!(matches!(result, Err(JurisdictionLoaderError::Io { .. })));
    }
}
