//! Transaction types shared by the ingest and finance crates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned when no keyword rule matches
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Source label of synthetic entries built from several raw rows
pub const CONSOLIDATED_SOURCE: &str = "Consolidated";

/// Expense or income, derived from the sign of a value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    /// Negative values are expenses; zero and above count as income
    pub fn from_value(value: f64) -> Self {
        if value < 0.0 {
            TransactionType::Expense
        } else {
            TransactionType::Income
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "Expense",
            TransactionType::Income => "Income",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized, categorized transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Booking date, when the source export carries one
    pub date: Option<NaiveDate>,
    /// Display label
    pub name: String,
    /// Text used for categorization
    pub description: String,
    /// Negative = money out, zero or positive = money in
    pub value: f64,
    pub category: String,
    /// Originating file name, or `Consolidated` for synthetic entries
    pub source: String,
}

impl Transaction {
    /// Create a new Transaction
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        value: f64,
        category: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            date: None,
            name: name.into(),
            description: description.into(),
            value,
            category: category.into(),
            source: source.into(),
        }
    }

    /// Builder pattern: attach a booking date
    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// Always consistent with the sign of `value`
    pub fn transaction_type(&self) -> TransactionType {
        TransactionType::from_value(self.value)
    }

    /// Returns true if this is an expense (negative value)
    pub fn is_expense(&self) -> bool {
        self.transaction_type() == TransactionType::Expense
    }

    pub fn is_consolidated(&self) -> bool {
        self.source == CONSOLIDATED_SOURCE
    }
}
