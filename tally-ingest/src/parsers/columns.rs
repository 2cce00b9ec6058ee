//! Column normalizer: maps bank-specific headers onto one transaction shape.
//!
//! Nubank card exports use `date,title,amount`; account exports use
//! `Data,Valor,Identificador,Descrição`. Other banks use English headers in
//! either case. Missing columns degrade to empty text or a zero amount.

use chrono::NaiveDate;

use crate::parsers::dates::parse_date;
use crate::types::RawRecord;

pub const NAME_COLUMNS: &[&str] = &[
    "name",
    "Name",
    "title",
    "Title",
    "description",
    "Description",
    "Descrição",
];

pub const DESCRIPTION_COLUMNS: &[&str] = &[
    "Descrição",
    "description",
    "Description",
    "title",
    "Title",
    "name",
    "Name",
];

pub const VALUE_COLUMNS: &[&str] = &["value", "Value", "amount", "Amount", "Valor"];

pub const DATE_COLUMNS: &[&str] = &["date", "Date", "data", "Data"];

/// Canonical view of a raw row, before the amount is parsed
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumns {
    pub date: Option<NaiveDate>,
    pub name: String,
    pub description: String,
    /// Untouched amount text, `"0"` when no value column is present
    pub raw_value: String,
}

pub fn normalize_columns(record: &RawRecord) -> NormalizedColumns {
    let pick = |columns: &[&str]| record.first_non_empty(columns).unwrap_or("").to_string();

    NormalizedColumns {
        date: record.first_non_empty(DATE_COLUMNS).and_then(parse_date),
        name: pick(NAME_COLUMNS),
        description: pick(DESCRIPTION_COLUMNS),
        raw_value: record
            .first_non_empty(VALUE_COLUMNS)
            .unwrap_or("0")
            .to_string(),
    }
}
