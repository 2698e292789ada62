//! Wiring shared by the `budget` subcommands: store registry, reference
//! data, settings precedence and the calculate/summary pipelines.

use std::path::Path;

use anyhow::{Context, Result};
use budget_core::calculations::BudgetCalculator;
use budget_core::store::persist::{load_input, load_outputs, save_input, save_result};
use budget_core::store::{MemoryStoreFactory, StoreRegistry};
use budget_core::{
    BudgetInput, CalculationResult, Frequency, JurisdictionTable, KeyValueStore, Region, Ttl,
};
use budget_data::JurisdictionLoader;
use budget_store_sqlite::SqliteStoreFactory;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::{BudgetConfig, StoreSettings};

/// SQLite file used when `--store sqlite` is given without `--db`.
pub const DEFAULT_DB: &str = "budget.db";

/// Registry with every backend the binary ships.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(MemoryStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

/// Loads the reference dataset from `data_dir`, or the built-in one.
pub fn load_jurisdictions(data_dir: Option<&Path>) -> Result<JurisdictionTable> {
    match data_dir {
        Some(dir) => JurisdictionLoader::from_dir(dir)
            .with_context(|| format!("loading jurisdiction data from '{}'", dir.display())),
        None => JurisdictionLoader::builtin().context("loading built-in jurisdiction data"),
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub region: Option<Region>,
    pub subregion: Option<String>,
    pub frequency: Option<Frequency>,
    pub goal: Option<Decimal>,
    pub partner: bool,
}

/// Applies flag, then config, then CSV values to `input`.
pub fn apply_settings(
    mut input: BudgetInput,
    config: &BudgetConfig,
    overrides: &Overrides,
) -> BudgetInput {
    if let Some(region) = overrides.region.or(config.region) {
        input.region = region;
    }
    if let Some(code) = overrides.subregion.as_ref().or(config.subregion.as_ref()) {
        input = input.with_subregion(code.as_str());
    }
    if let Some(frequency) = overrides.frequency.or(config.display_frequency) {
        input.display_frequency = frequency;
    }
    if overrides.goal.is_some() {
        input.goal_amount = overrides.goal;
    }
    input.partner_share = input.partner_share || overrides.partner || config.partner_share;
    input
}

/// Resolves which store to open, if any.
///
/// `--store` replaces the configured backend and `--db` its connection
/// string. A bare `--db` implies SQLite.
pub fn resolve_store(
    config: Option<&StoreSettings>,
    backend: Option<&str>,
    db: Option<&str>,
) -> Option<StoreSettings> {
    let mut settings = config.cloned();
    if let Some(backend) = backend {
        let base = settings.unwrap_or_default();
        settings = Some(StoreSettings {
            backend: backend.to_string(),
            ..base
        });
    }
    if let Some(db) = db {
        let mut base = settings.unwrap_or_else(|| StoreSettings {
            backend: "sqlite".to_string(),
            ..StoreSettings::default()
        });
        base.connection_string = db.to_string();
        settings = Some(base);
    }
    settings.map(|mut s| {
        if s.backend == "sqlite" && s.connection_string.is_empty() {
            s.connection_string = DEFAULT_DB.to_string();
        }
        s
    })
}

pub async fn open_store(
    registry: &StoreRegistry,
    settings: &StoreSettings,
) -> Result<Box<dyn KeyValueStore>> {
    debug!(backend = %settings.backend, "opening store");
    registry
        .create(&settings.store_config())
        .await
        .with_context(|| format!("opening '{}' store", settings.backend))
}

/// Runs one pass and, when a store is given, persists the input and the
/// result.
pub async fn run_calculation(
    calculator: &BudgetCalculator,
    input: &BudgetInput,
    store: Option<(&dyn KeyValueStore, Ttl)>,
) -> Result<CalculationResult> {
    let result = calculator
        .calculate(input)
        .context("calculating budget")?;

    if let Some((store, ttl)) = store {
        save_input(store, input, ttl)
            .await
            .context("persisting budget input")?;
        let written = save_result(store, &result, ttl)
            .await
            .context("persisting calculation result")?;
        info!(keys = written, "results saved");
    }
    Ok(result)
}

/// What `budget summary` prints.
#[derive(Debug)]
pub enum SummaryOutput {
    /// Totals exactly as persisted.
    Stored(Vec<(&'static str, Decimal)>),
    /// Fresh pass over the persisted input.
    Recalculated(Box<CalculationResult>, Frequency),
}

/// Reads persisted totals, or recalculates from the persisted input when a
/// calculator is supplied. A recalculated result is written back.
pub async fn summarize_store(
    store: &dyn KeyValueStore,
    recalculate: Option<(&BudgetCalculator, Ttl)>,
) -> Result<SummaryOutput> {
    match recalculate {
        Some((calculator, ttl)) => {
            let input = load_input(store)
                .await
                .context("reading persisted budget input")?;
            let result = calculator
                .calculate(&input)
                .context("recalculating budget")?;
            save_result(store, &result, ttl)
                .await
                .context("persisting calculation result")?;
            Ok(SummaryOutput::Recalculated(Box::new(result), input.display_frequency))
        }
        None => {
            let outputs = load_outputs(store)
                .await
                .context("reading persisted results")?;
            Ok(SummaryOutput::Stored(outputs))
        }
    }
}
