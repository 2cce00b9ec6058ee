//! tally CLI: categorize bank and card CSV exports into one report
//!
//! Usage:
//!   tally run                         Process credit.csv + debit.csv
//!   tally run --source card.csv:credit --summary-mode formula
//!   tally check "UBER *TRIP"          Show the category of a description
//!   tally init                        Write a default tally.toml

mod config;
mod run_cmd;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tally_finance::SummaryMode;
use tally_ingest::Source;

use config::{DEFAULT_CONFIG_FILE, RunConfig, init_config, load_config};

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Categorize bank and card CSV exports")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process the exports and write the categorized report
    Run {
        /// Run configuration (defaults to ./tally.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input export as PATH:KIND, KIND is credit or debit (repeatable)
        #[arg(long = "source", value_name = "PATH:KIND")]
        sources: Vec<Source>,

        /// Category keyword file (JSON object of category -> keywords)
        #[arg(long)]
        categories: Option<PathBuf>,

        /// Report file to write
        #[arg(long)]
        output: Option<PathBuf>,

        /// computed (default) or formula
        #[arg(long)]
        summary_mode: Option<SummaryMode>,

        /// Split unmatched Pix/transfer rows by direction
        #[arg(long)]
        transfer_fallback: bool,
    },

    /// Show which category a description resolves to
    Check {
        description: String,

        /// Signed value, used by the transfer fallback
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        value: f64,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        categories: Option<PathBuf>,

        #[arg(long)]
        transfer_fallback: bool,
    },

    /// Write a default run configuration
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();

    match cli.command {
        Command::Run {
            config,
            sources,
            categories,
            output,
            summary_mode,
            transfer_fallback,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            apply_overrides(&mut cfg, sources, categories, output, summary_mode, transfer_fallback);
            run_cmd::run(&cfg)?;
        }

        Command::Check {
            description,
            value,
            config,
            categories,
            transfer_fallback,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            apply_overrides(&mut cfg, Vec::new(), categories, None, None, transfer_fallback);
            let rules = cfg.load_rules()?;
            println!("{}", rules.categorize_with_value(&description, value));
        }

        Command::Init { config } => {
            init_config(&config)?;
        }
    }

    Ok(())
}

/// Command-line flags win over the configuration file
fn apply_overrides(
    cfg: &mut RunConfig,
    sources: Vec<Source>,
    categories: Option<PathBuf>,
    output: Option<PathBuf>,
    summary_mode: Option<SummaryMode>,
    transfer_fallback: bool,
) {
    if !sources.is_empty() {
        cfg.sources = sources;
    }
    if let Some(categories) = categories {
        cfg.categories = categories;
    }
    if let Some(output) = output {
        cfg.output = output;
    }
    if let Some(mode) = summary_mode {
        cfg.summary_mode = mode;
    }
    if transfer_fallback {
        cfg.transfer_fallback = true;
    }
}
