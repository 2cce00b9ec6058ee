use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Sign convention of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Card statement: every row is spending, whatever sign the export uses
    Credit,
    /// Account statement: negative = expense, positive = income
    Debit,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Credit => "credit",
            SourceKind::Debit => "debit",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Ok(SourceKind::Credit),
            "debit" => Ok(SourceKind::Debit),
            other => Err(format!("unknown source kind '{other}' (expected credit or debit)")),
        }
    }
}

/// One configured input file plus its sign convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl Source {
    pub fn new(path: impl Into<PathBuf>, kind: SourceKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Identifier written to the `Source` column: the file name
    pub fn identifier(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// `credit.csv` and `debit.csv` in the working directory
    pub fn defaults() -> Vec<Source> {
        vec![
            Source::new("credit.csv", SourceKind::Credit),
            Source::new("debit.csv", SourceKind::Debit),
        ]
    }
}

/// Parses `PATH:KIND`, e.g. `exports/nubank.csv:credit`
impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, kind) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected PATH:KIND, got '{s}'"))?;
        if path.is_empty() {
            return Err(format!("missing path in '{s}'"));
        }
        Ok(Source::new(path, kind.parse()?))
    }
}

/// One CSV row keyed by its header names
///
/// Column names vary by bank and language, so lookups go through
/// [`RawRecord::first_non_empty`] with an ordered list of candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value of the first listed column that is present and non-empty.
    /// Column names are matched case-sensitively, in the given order.
    pub fn first_non_empty(&self, columns: &[&str]) -> Option<&str> {
        columns
            .iter()
            .filter_map(|c| self.get(c))
            .find(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_empty_respects_order() {
        let record: RawRecord = [("Title", "Padaria"), ("title", ""), ("name", "Mercado")]
            .into_iter()
            .collect();
        assert_eq!(record.first_non_empty(&["title", "Title"]), Some("Padaria"));
        assert_eq!(record.first_non_empty(&["name", "Title"]), Some("Mercado"));
        assert_eq!(record.first_non_empty(&["Name", "amount"]), None);
    }

    #[test]
    fn test_source_from_str() {
        let src: Source = "exports/nubank.csv:credit".parse().unwrap();
        assert_eq!(src.kind, SourceKind::Credit);
        assert_eq!(src.identifier(), "nubank.csv");

        let src: Source = "C:\\bank\\extrato.csv:Debit".parse().unwrap();
        assert_eq!(src.kind, SourceKind::Debit);

        assert!("credit.csv".parse::<Source>().is_err());
        assert!("credit.csv:savings".parse::<Source>().is_err());
        assert!(":debit".parse::<Source>().is_err());
    }

    #[test]
    fn test_default_sources() {
        let defaults = Source::defaults();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults[0].identifier(), "credit.csv");
        assert_eq!(defaults[0].kind, SourceKind::Credit);
        assert_eq!(defaults[1].identifier(), "debit.csv");
        assert_eq!(defaults[1].kind, SourceKind::Debit);
    }
}
