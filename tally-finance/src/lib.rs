//! tally-finance: category rules, aggregation, run summary and report output

pub mod aggregator;
pub mod category_rules;
pub mod report;
pub mod summary;

pub use aggregator::{Aggregated, Aggregator, IngestStats, RowOutcome, process_sources};
pub use category_rules::{CategoryRule, CategoryRules, TransferFallback};
pub use report::{Report, ReportBuilder, ReportRow, SummaryMode};
pub use summary::{CategoryTotal, RunSummary};
