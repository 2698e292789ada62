use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use budget_cli::app::{self, Overrides, SummaryOutput};
use budget_cli::config::BudgetConfig;
use budget_cli::report::{OutputsReport, ResultReport, SubregionList};
use budget_cli::{input_loader, logging};
use budget_core::calculations::BudgetCalculator;
use budget_core::{Frequency, Region, parse_optional_amount};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Personal budget calculator for Canada and the United States.
///
/// Reads income, expense, asset and liability lines from a CSV file,
/// computes income tax, payroll obligations and the budget summary, and
/// optionally persists everything to a key-value store.
#[derive(Debug, Parser)]
#[command(name = "budget")]
struct Cli {
    /// Settings file; see `budget.toml` in the documentation.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate a budget from an input CSV.
    Calculate {
        /// Input CSV with `field,amount,frequency,percent` columns.
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        jurisdiction: JurisdictionArgs,

        #[command(flatten)]
        store: StoreArgs,

        /// Report period: annually, quarterly, monthly or weekly.
        #[arg(long, value_parser = parse_frequency)]
        frequency: Option<Frequency>,

        /// Savings goal for the time-to-goal projection.
        #[arg(long, value_parser = parse_goal)]
        goal: Option<Decimal>,

        /// Apply ownership percentages to liquid assets and revolving debt.
        #[arg(long)]
        partner: bool,
    },

    /// Print the totals persisted by the last calculation.
    Summary {
        #[command(flatten)]
        store: StoreArgs,

        /// Recalculate from the persisted input instead of reading totals.
        #[arg(long)]
        recalculate: bool,
    },

    /// List province or state codes for a region.
    Subregions {
        /// `CAN` or `USA`.
        #[arg(long, value_parser = parse_region)]
        region: Region,
    },
}

#[derive(Debug, clap::Args)]
struct JurisdictionArgs {
    /// `CAN` or `USA`; anything else disables regional taxes.
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    /// Province or state code, e.g. `BC` or `CA`.
    #[arg(long)]
    subregion: Option<String>,
}

#[derive(Debug, clap::Args)]
struct StoreArgs {
    /// Store backend: `memory` or `sqlite`.
    #[arg(long)]
    store: Option<String>,

    /// SQLite database path, or `:memory:`.
    #[arg(long)]
    db: Option<String>,
}

fn parse_region(s: &str) -> Result<Region, String> {
    Ok(Region::parse(s))
}

fn parse_frequency(s: &str) -> Result<Frequency, String> {
    Frequency::parse(s).ok_or_else(|| {
        format!("unknown frequency '{s}'; expected annually, quarterly, monthly or weekly")
    })
}

fn parse_goal(s: &str) -> Result<Decimal, String> {
    parse_optional_amount(s).ok_or_else(|| format!("invalid amount '{s}'"))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = BudgetConfig::load_or_default(cli.config.as_deref())?;
    logging::init_logging(config.logging.level.as_deref());
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }
    debug!(config = ?cli.config, "settings loaded");

    let registry = app::build_registry();

    match cli.command {
        Command::Calculate {
            input,
            jurisdiction,
            store,
            frequency,
            goal,
            partner,
        } => {
            let overrides = Overrides {
                region: jurisdiction.region,
                subregion: jurisdiction.subregion,
                frequency,
                goal,
                partner,
            };
            let budget = input_loader::load_from_file(&input)
                .with_context(|| format!("loading input '{}'", input.display()))?;
            let budget = app::apply_settings(budget, &config, &overrides);

            let table = app::load_jurisdictions(config.data_dir.as_deref())?;
            let calculator = BudgetCalculator::new(config.calculator.clone(), table);

            let settings =
                app::resolve_store(config.store.as_ref(), store.store.as_deref(), store.db.as_deref());
            let store = match &settings {
                Some(settings) => Some(app::open_store(&registry, settings).await?),
                None => None,
            };
            let target = store
                .as_deref()
                .zip(settings.as_ref().map(|s| s.ttl()));

            let result = app::run_calculation(&calculator, &budget, target).await?;
            print!("{}", ResultReport::new(&result, budget.display_frequency));
        }

        Command::Summary { store, recalculate } => {
            let Some(settings) =
                app::resolve_store(config.store.as_ref(), store.store.as_deref(), store.db.as_deref())
            else {
                bail!("no store configured; pass --store sqlite --db <path> or set [store] in the config");
            };
            let store = app::open_store(&registry, &settings).await?;

            let calculator = if recalculate {
                let table = app::load_jurisdictions(config.data_dir.as_deref())?;
                Some(BudgetCalculator::new(config.calculator.clone(), table))
            } else {
                None
            };

            let output =
                app::summarize_store(&*store, calculator.as_ref().map(|c| (c, settings.ttl()))).await?;
            match output {
                SummaryOutput::Stored(outputs) => print!("{}", OutputsReport(&outputs)),
                SummaryOutput::Recalculated(result, frequency) => {
                    print!("{}", ResultReport::new(&result, frequency));
                }
            }
        }

        Command::Subregions { region } => {
            let table = app::load_jurisdictions(config.data_dir.as_deref())?;
            let codes = table.subregion_codes(region);
            print!(
                "{}",
                SubregionList {
                    region,
                    codes: &codes,
                }
            );
        }
    }

    Ok(())
}
