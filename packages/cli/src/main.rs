#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime explorer.
//!
//! Loads a borough-by-month crime table and either answers one query
//! (`periods`, `categories`, `map`, `region`) or, with no subcommand, opens
//! an interactive session that replays map and sidebar events against the
//! explorer.

mod config;
mod interactive;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crime_explorer::{CrimeExplorer, DataStatus, format_period};
use crime_explorer_ingest::TableReader;
use crime_explorer_models::{CategoryFilter, Period};

use crate::config::CliConfig;
use crate::output::{map_view, print_json, print_map, print_region, region_detail};

#[derive(Parser)]
#[command(name = "crime_explorer", about = "Explore per-region crime counts over time")]
struct Cli {
    /// Path to the crime table (CSV, optionally gzip-compressed).
    #[arg(long, default_value = "data/mps_borough_crime_24m.csv")]
    data: PathBuf,
    /// Optional TOML config with `[ingest]` and `[colors]` tables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Crime category to filter by (`ALL` for every category).
    #[arg(long, default_value = "ALL")]
    category: String,
    /// First month of the range (`YYYYMM`). Defaults to the earliest.
    #[arg(long)]
    from: Option<Period>,
    /// Last month of the range (`YYYYMM`). Defaults to the latest.
    #[arg(long)]
    to: Option<Period>,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the months available in the dataset
    Periods,
    /// List the crime categories available in the dataset
    Categories,
    /// Show every region's total, intensity, and fill color
    Map,
    /// Show the detail panel for one region
    Region {
        /// Region name exactly as it appears in the dataset
        name: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    let mut explorer = load_explorer(&cli, &config);
    apply_filters(&mut explorer, &cli);

    let Some(command) = cli.command else {
        return interactive::run(&mut explorer);
    };

    if let DataStatus::Unavailable { reason } = explorer.status() {
        return Err(format!("No crime data available: {reason}").into());
    }

    match command {
        Commands::Periods => {
            if cli.json {
                print_json(&explorer.available_periods())?;
            } else {
                for period in explorer.available_periods() {
                    println!("{period}  {}", format_period(period));
                }
            }
        }
        Commands::Categories => {
            if cli.json {
                print_json(&explorer.category_options())?;
            } else {
                for option in explorer.category_options() {
                    println!("{option}");
                }
            }
        }
        Commands::Map => {
            let view = map_view(&explorer);
            if cli.json {
                print_json(&view)?;
            } else {
                print_map(&view);
            }
        }
        Commands::Region { name } => {
            let detail = region_detail(&explorer, &name)
                .ok_or_else(|| format!("No crime data for region '{name}'"))?;
            if cli.json {
                print_json(&detail)?;
            } else {
                print_region(&detail);
            }
        }
    }

    Ok(())
}

/// Reads the table, falling back to the terminal "no data" state if
/// ingestion fails.
fn load_explorer(cli: &Cli, config: &CliConfig) -> CrimeExplorer {
    match TableReader::new(config.ingest.clone()).read_path(&cli.data) {
        Ok(table) => CrimeExplorer::with_ramp(table.into_store(), config.colors),
        Err(e) => {
            log::error!("Failed to load {}: {e}", cli.data.display());
            CrimeExplorer::unavailable(e.to_string())
        }
    }
}

/// Applies the command-line filter and range. Invalid ranges are reported
/// and leave the full span selected.
fn apply_filters(explorer: &mut CrimeExplorer, cli: &Cli) {
    explorer.set_category_filter(CategoryFilter::from(cli.category.as_str()));

    let Some((first, last)) = explorer
        .period_bounds()
        .map(|(start, end)| (start.clone(), end.clone()))
    else {
        return;
    };
    let start = cli.from.clone().unwrap_or(first);
    let end = cli.to.clone().unwrap_or(last);

    if let Err(e) = explorer.set_period_range(&start, &end) {
        eprintln!("Ignoring requested range {start}..{end}: {e}");
    }
}
