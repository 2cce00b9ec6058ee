//! Per-category and overall totals for a run

use std::cmp::Ordering;
use std::collections::HashMap;

use tally_core::Transaction;

use crate::category_rules::CategoryRules;

/// Accumulated total of one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Totals derived from the final transaction sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    totals: HashMap<String, CategoryTotal>,
    configured: Vec<String>,
    /// Sum of negative values
    pub total_expenses: f64,
    /// Sum of zero-or-positive values
    pub total_income: f64,
    pub transaction_count: usize,
    /// Rows read with an unparseable amount
    pub malformed_rows: usize,
}

impl RunSummary {
    pub fn from_transactions(txns: &[Transaction], rules: &CategoryRules) -> Self {
        let mut summary = RunSummary {
            configured: rules.category_names().map(str::to_string).collect(),
            ..Default::default()
        };

        for txn in txns {
            let entry = summary
                .totals
                .entry(txn.category.clone())
                .or_insert_with(|| CategoryTotal {
                    category: txn.category.clone(),
                    total: 0.0,
                    count: 0,
                });
            entry.total += txn.value;
            entry.count += 1;

            if txn.is_expense() {
                summary.total_expenses += txn.value;
            } else {
                summary.total_income += txn.value;
            }
            summary.transaction_count += 1;
        }

        summary
    }

    /// Builder pattern: record the malformed row count from ingestion
    pub fn with_malformed_rows(mut self, count: usize) -> Self {
        self.malformed_rows = count;
        self
    }

    pub fn net_balance(&self) -> f64 {
        self.total_expenses + self.total_income
    }

    pub fn category_total(&self, category: &str) -> f64 {
        self.totals.get(category).map(|c| c.total).unwrap_or(0.0)
    }

    pub fn category_count(&self, category: &str) -> usize {
        self.totals.get(category).map(|c| c.count).unwrap_or(0)
    }

    /// Categories that received at least one transaction, biggest expense first
    pub fn observed_by_total(&self) -> Vec<CategoryTotal> {
        let mut out: Vec<_> = self.totals.values().cloned().collect();
        out.sort_by(by_total_then_name);
        out
    }

    /// Configured and observed categories together, biggest expense first.
    /// Configured categories without transactions show a zero total.
    pub fn all_by_total(&self) -> Vec<CategoryTotal> {
        let mut out = self.observed_by_total();
        for name in &self.configured {
            if !self.totals.contains_key(name) {
                out.push(CategoryTotal {
                    category: name.clone(),
                    total: 0.0,
                    count: 0,
                });
            }
        }
        out.sort_by(by_total_then_name);
        out
    }

    /// Human-readable summary printed after a run
    pub fn console_lines(&self) -> Vec<String> {
        let mut lines = vec!["=== Category Summary ===".to_string()];
        for c in self.observed_by_total() {
            lines.push(format!(
                "{}: {} transactions, Total: {}",
                c.category,
                c.count,
                signed_money(c.total)
            ));
        }

        lines.push(String::new());
        lines.push("--- Financial Summary ---".to_string());
        lines.push(format!("Total Expenses: -${:.2}", self.total_expenses.abs()));
        lines.push(format!("Total Income: +${:.2}", self.total_income));
        lines.push(format!("Net Balance: {}", signed_money(self.net_balance())));

        if self.malformed_rows > 0 {
            lines.push(String::new());
            lines.push(format!(
                "Data quality: {} row(s) had an unreadable amount and were counted as 0",
                self.malformed_rows
            ));
        }
        lines
    }
}

fn by_total_then_name(a: &CategoryTotal, b: &CategoryTotal) -> Ordering {
    a.total
        .total_cmp(&b.total)
        .then_with(|| a.category.cmp(&b.category))
}

fn signed_money(amount: f64) -> String {
    let sign = if amount < 0.0 { '-' } else { '+' };
    format!("{}${:.2}", sign, amount.abs())
}
