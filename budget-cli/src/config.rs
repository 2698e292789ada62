//! `budget.toml` settings. Every key is optional; command-line flags take
//! precedence over the file.
//!
//! ```toml
//! region = "CAN"
//! subregion = "ON"
//! display_frequency = "monthly"
//! partner_share = true
//! data_dir = "./jurisdictions"
//!
//! [store]
//! backend = "sqlite"
//! connection_string = "budget.db"
//! ttl_days = 365
//!
//! [logging]
//! level = "info"
//! file = "budget.log"
//!
//! [calculator.payroll.cpp]
//! ympe = "68500"
//! ```

use std::path::{Path, PathBuf};

use budget_core::calculations::CalculatorConfig;
use budget_core::store::{DEFAULT_TTL_DAYS, StoreConfig, Ttl};
use budget_core::{Frequency, Region};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Persistence settings. `ttl_days = 0` keeps values forever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: String,
    pub connection_string: String,
    pub ttl_days: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        let store = StoreConfig::default();
        Self {
            backend: store.backend,
            connection_string: store.connection_string,
            ttl_days: DEFAULT_TTL_DAYS,
        }
    }
}

impl StoreSettings {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.backend.clone(),
            connection_string: self.connection_string.clone(),
        }
    }

    pub fn ttl(&self) -> Ttl {
        match self.ttl_days {
            0 => Ttl::Never,
            days => Ttl::Days(days),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub region: Option<Region>,
    pub subregion: Option<String>,
    pub display_frequency: Option<Frequency>,
    pub partner_share: bool,
    /// Directory holding `jurisdictions.csv` and `brackets.csv`; the
    /// built-in dataset is used when unset.
    pub data_dir: Option<PathBuf>,
    /// Persist inputs and results when set.
    pub store: Option<StoreSettings>,
    pub logging: LoggingSettings,
    pub calculator: CalculatorConfig,
}

impl BudgetConfig {
    pub fn from_toml(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn parse(text: &str) -> BudgetConfig {
        BudgetConfig::from_toml(text, Path::new("budget.toml")).unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("");

        assert_eq!(config, BudgetConfig::default());
        assert_eq!(config.calculator, CalculatorConfig::default());
    }

    #[test]
    fn full_file_parses() {
        let config = parse(
            r#"
region = "USA"
subregion = "NY"
display_frequency = "weekly"
partner_share = true

[store]
backend = "sqlite"
connection_string = "budget.db"
ttl_days = 30

[logging]
level = "debug"
file = "budget.log"
"#,
        );

        assert_eq!(config.region, Some(Region::Usa));
        assert_eq!(config.subregion.as_deref(), Some("NY"));
        assert_eq!(config.display_frequency, Some(Frequency::Weekly));
        assert!(config.partner_share);
        let store = config.store.unwrap();
        assert_eq!(store.store_config().backend, "sqlite");
        assert_eq!(store.ttl(), Ttl::Days(30));
        assert_eq!(config.logging.file, Some(PathBuf::from("budget.log")));
    }

    #[test]
    fn calculator_overrides_merge_with_defaults() {
        let config = parse(
            r#"
[calculator.payroll.ei]
max_premium = "1049.12"
"#,
        );

        assert_eq!(config.calculator.payroll.ei.max_premium, dec!(1049.12));
        assert_eq!(config.calculator.payroll.ei.rate, dec!(0.0164));
        assert_eq!(
            config.calculator.payroll.cpp,
            CalculatorConfig::default().payroll.cpp
        );
    }

    #[test]
    fn zero_ttl_never_expires() {
        let settings = StoreSettings {
            ttl_days: 0,
            ..StoreSettings::default()
        };

        assert_eq!(settings.ttl(), Ttl::Never);
    }

    #[test]
    fn invalid_file_reports_path() {
        let err = BudgetConfig::from_toml("region = [", Path::new("bad.toml")).unwrap_err();

        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BudgetConfig::load(Path::new("/nonexistent/budget.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
