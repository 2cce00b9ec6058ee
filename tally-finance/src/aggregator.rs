//! Aggregator: turns raw rows into categorized transactions.
//!
//! Two row patterns get special handling before categorization:
//! credit-card bill payments in the account export are dropped (the card
//! export already lists the purchases), and NuTag toll charges are folded
//! into a single consolidated entry.

use tally_core::{CONSOLIDATED_SOURCE, Transaction};
use tally_ingest::{LoadedSource, RawRecord, Source, normalize_columns, parse_amount};

use crate::category_rules::CategoryRules;

/// Bill payments duplicate the card statement
pub const BILL_PAYMENT_MARKER: &str = "pagamento de fatura";
/// Toll tag charges, one row per toll booth
pub const TOLL_MARKER: &str = "nutag";
pub const TOLL_LABEL: &str = "Pedágios NuTag";
pub const TOLL_CATEGORY: &str = "Transportation";

/// What happened to a single raw row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Added,
    SkippedDuplicate,
    GroupedToll,
}

/// Row counters for the data-quality report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: usize,
    pub skipped_duplicates: usize,
    pub tolls_grouped: usize,
    /// Rows whose amount could not be parsed and was counted as zero
    pub malformed_rows: usize,
}

/// Result of a full run over all sources
#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    pub transactions: Vec<Transaction>,
    pub stats: IngestStats,
}

pub struct Aggregator<'a> {
    rules: &'a CategoryRules,
    transactions: Vec<Transaction>,
    toll_total: f64,
    toll_count: usize,
    stats: IngestStats,
}

impl<'a> Aggregator<'a> {
    pub fn new(rules: &'a CategoryRules) -> Self {
        Self {
            rules,
            transactions: Vec::new(),
            toll_total: 0.0,
            toll_count: 0,
            stats: IngestStats::default(),
        }
    }

    /// Process every row of one loaded source, in file order
    pub fn extend_source(&mut self, loaded: &LoadedSource) {
        for record in &loaded.records {
            self.push(record, &loaded.source);
        }
    }

    pub fn push(&mut self, record: &RawRecord, source: &Source) -> RowOutcome {
        self.stats.rows_read += 1;

        let cols = normalize_columns(record);
        let desc_lower = cols.description.to_lowercase();

        if desc_lower.contains(BILL_PAYMENT_MARKER) {
            tracing::debug!(description = %cols.description, "skipping duplicate bill payment");
            self.stats.skipped_duplicates += 1;
            return RowOutcome::SkippedDuplicate;
        }

        let amount = parse_amount(&cols.raw_value, source.kind);
        if amount.malformed {
            tracing::warn!(
                source = %source.identifier(),
                raw = %cols.raw_value,
                description = %cols.description,
                "unparseable amount, counting as 0"
            );
            self.stats.malformed_rows += 1;
        }

        if desc_lower.contains(TOLL_MARKER) {
            tracing::debug!(value = amount.value, "grouping NuTag toll");
            self.toll_total += amount.value;
            self.toll_count += 1;
            self.stats.tolls_grouped += 1;
            return RowOutcome::GroupedToll;
        }

        let category = self
            .rules
            .categorize_with_value(&cols.description, amount.value)
            .to_string();

        self.transactions.push(
            Transaction::new(
                cols.name,
                cols.description,
                amount.value,
                category,
                source.identifier(),
            )
            .with_date(cols.date),
        );
        RowOutcome::Added
    }

    /// Append the consolidated toll entry and order the result.
    ///
    /// Dated transactions are sorted oldest first with undated ones last;
    /// without any dates the processing order is kept.
    pub fn finish(mut self) -> Aggregated {
        if self.toll_count > 0 {
            tracing::info!(
                count = self.toll_count,
                total = self.toll_total,
                "consolidated NuTag tolls into one entry"
            );
            self.transactions.push(Transaction::new(
                TOLL_LABEL,
                format!("{} ({} transações)", TOLL_LABEL, self.toll_count),
                self.toll_total,
                TOLL_CATEGORY,
                CONSOLIDATED_SOURCE,
            ));
        }

        if self.transactions.iter().any(|t| t.date.is_some()) {
            self.transactions
                .sort_by_key(|t| (t.date.is_none(), t.date));
        }

        Aggregated {
            transactions: self.transactions,
            stats: self.stats,
        }
    }
}

/// Run the aggregator over all loaded sources in order
pub fn process_sources(sources: &[LoadedSource], rules: &CategoryRules) -> Aggregated {
    let mut aggregator = Aggregator::new(rules);
    for loaded in sources {
        aggregator.extend_source(loaded);
    }
    let aggregated = aggregator.finish();
    tracing::info!(
        transactions = aggregated.transactions.len(),
        "total transactions processed"
    );
    aggregated
}
