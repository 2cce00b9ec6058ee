//! `tally run`: load exports, categorize, print the summary, write the report

use anyhow::{Context, Result};
use std::path::PathBuf;

use tally_finance::{ReportBuilder, RunSummary, process_sources};
use tally_ingest::load_sources;

use crate::config::RunConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Report written to `path`
    Written { path: PathBuf, transactions: usize },
    /// Nothing to report; no file was written
    NoTransactions,
}

pub fn run(cfg: &RunConfig) -> Result<RunOutcome> {
    tracing::debug!(?cfg, "run configuration");
    let rules = cfg.load_rules()?;

    println!("=== Expense Categorizer ===\n");
    let loaded = load_sources(&cfg.sources).context("reading source exports")?;
    let aggregated = process_sources(&loaded, &rules);

    if aggregated.transactions.is_empty() {
        println!("No transactions found. Please check your CSV files.");
        return Ok(RunOutcome::NoTransactions);
    }

    let summary = RunSummary::from_transactions(&aggregated.transactions, &rules)
        .with_malformed_rows(aggregated.stats.malformed_rows);

    println!(
        "Processed {} transactions ({} bill payments skipped, {} tolls grouped)\n",
        aggregated.transactions.len(),
        aggregated.stats.skipped_duplicates,
        aggregated.stats.tolls_grouped
    );
    for line in summary.console_lines() {
        println!("{}", line);
    }

    let report = ReportBuilder::new(cfg.summary_mode).build(&aggregated.transactions, &summary);
    report
        .write(&cfg.output)
        .with_context(|| format!("writing {}", cfg.output.display()))?;

    println!("\nExport completed: {}", cfg.output.display());

    Ok(RunOutcome::Written {
        path: cfg.output.clone(),
        transactions: aggregated.transactions.len(),
    })
}
