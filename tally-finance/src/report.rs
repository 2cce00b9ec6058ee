//! Report builder: transaction rows followed by the summary block.
//!
//! The layout is meant for spreadsheets: one header row, the data rows,
//! two blank rows, the category summary, a blank row and the financial
//! summary. Summary values are either precomputed or written as formulas
//! over the data rows.

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tally_core::{Error, Result, Transaction};
use tally_ingest::format_date;

use crate::summary::RunSummary;

/// How summary values are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// Totals rendered with two decimals
    #[default]
    Computed,
    /// `=SUMIF(...)` formulas recomputed by the spreadsheet
    Formula,
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryMode::Computed => f.write_str("computed"),
            SummaryMode::Formula => f.write_str("formula"),
        }
    }
}

impl FromStr for SummaryMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "computed" => Ok(SummaryMode::Computed),
            "formula" => Ok(SummaryMode::Formula),
            other => Err(format!("unknown summary mode '{other}' (expected computed or formula)")),
        }
    }
}

pub const CATEGORY_SUMMARY_HEADER: &str = "CATEGORY SUMMARY";
pub const FINANCIAL_SUMMARY_HEADER: &str = "FINANCIAL SUMMARY";

/// One output row; every cell already rendered as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRow {
    pub date: String,
    pub name: String,
    pub value: String,
    pub category: String,
    pub kind: String,
    pub source: String,
}

impl ReportRow {
    fn label(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    fn blank() -> Self {
        Self::default()
    }
}

/// Ordered rows ready for serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Present only when some transaction carries a date
    pub include_date: bool,
    /// Number of leading rows that are transactions
    pub data_rows: usize,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn header(&self) -> Vec<&'static str> {
        let mut header = Vec::with_capacity(6);
        if self.include_date {
            header.push("Date");
        }
        header.extend(["Name", "Value", "Category", "Type", "Source"]);
        header
    }

    fn cells<'r>(&self, row: &'r ReportRow) -> Vec<&'r str> {
        let mut cells = Vec::with_capacity(6);
        if self.include_date {
            cells.push(row.date.as_str());
        }
        cells.extend([
            row.name.as_str(),
            row.value.as_str(),
            row.category.as_str(),
            row.kind.as_str(),
            row.source.as_str(),
        ]);
        cells
    }

    /// Serialize header and rows as CSV
    pub fn write_to<W: io::Write>(&self, out: W) -> std::result::Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(self.header())?;
        for row in &self.rows {
            wtr.write_record(self.cells(row))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the report file in one pass, replacing any previous one
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let output_err = |source: csv::Error| Error::Output {
            path: path.to_path_buf(),
            source,
        };

        let file = std::fs::File::create(path).map_err(|e| output_err(e.into()))?;
        self.write_to(io::BufWriter::new(file)).map_err(output_err)?;
        tracing::info!(path = %path.display(), rows = self.rows.len(), "report written");
        Ok(())
    }
}

/// Spreadsheet columns for the formula mode
struct Columns {
    value: &'static str,
    category: &'static str,
}

impl Columns {
    fn new(include_date: bool) -> Self {
        if include_date {
            Columns { value: "C", category: "D" }
        } else {
            Columns { value: "B", category: "C" }
        }
    }
}

pub struct ReportBuilder {
    mode: SummaryMode,
}

impl ReportBuilder {
    pub fn new(mode: SummaryMode) -> Self {
        Self { mode }
    }

    pub fn build(&self, txns: &[Transaction], summary: &RunSummary) -> Report {
        let include_date = txns.iter().any(|t| t.date.is_some());
        let cols = Columns::new(include_date);

        let mut rows: Vec<ReportRow> = txns
            .iter()
            .map(|t| ReportRow {
                date: t.date.map(format_date).unwrap_or_default(),
                name: t.name.clone(),
                value: t.value.to_string(),
                category: t.category.clone(),
                kind: t.transaction_type().to_string(),
                source: t.source.clone(),
            })
            .collect();

        // Sheet row 1 is the header, so data spans rows 2..=last_data_row
        let last_data_row = txns.len() + 1;
        let value_range = format!("{v}2:{v}{last_data_row}", v = cols.value);
        let category_range = format!("{c}2:{c}{last_data_row}", c = cols.category);

        rows.push(ReportRow::blank());
        rows.push(ReportRow::blank());
        rows.push(ReportRow::label(CATEGORY_SUMMARY_HEADER, ""));
        rows.push(ReportRow::label("Category", "Total"));

        for c in summary.all_by_total() {
            let value = match self.mode {
                SummaryMode::Computed => format!("{:.2}", c.total),
                SummaryMode::Formula => format!(
                    "=SUMIF({},\"{}\",{})",
                    category_range,
                    c.category.replace('"', "\"\""),
                    value_range
                ),
            };
            rows.push(ReportRow::label(c.category, value));
        }

        rows.push(ReportRow::blank());
        rows.push(ReportRow::label(FINANCIAL_SUMMARY_HEADER, ""));

        let expenses_row = rows.len() + 2;
        let income_row = expenses_row + 1;
        let (expenses, income, net) = match self.mode {
            SummaryMode::Computed => (
                format!("{:.2}", summary.total_expenses),
                format!("{:.2}", summary.total_income),
                format!("{:.2}", summary.net_balance()),
            ),
            SummaryMode::Formula => (
                format!("=SUMIF({r},\"<0\",{r})", r = value_range),
                format!("=SUMIF({r},\">=0\",{r})", r = value_range),
                format!("={v}{income_row}+{v}{expenses_row}", v = cols.value),
            ),
        };
        rows.push(ReportRow::label("Total Expenses", expenses));
        rows.push(ReportRow::label("Total Income", income));
        rows.push(ReportRow::label("Net Balance", net));

        Report {
            include_date,
            data_rows: txns.len(),
            rows,
        }
    }
}
