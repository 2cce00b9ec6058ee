//! Keyword rules mapping transaction descriptions to user-defined categories.
//!
//! Rules come from a JSON object such as
//! `{"Transportation": ["uber", "99app"], "Food": ["ifood"]}`. Categories are
//! tried in file order and keywords in list order; the first keyword found
//! (case-insensitive substring) decides the category.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tally_core::{Error, Result, UNCATEGORIZED};

const TRANSFER_KEYWORDS: &[&str] = &["pix", "transferência", "transferencia"];

/// One category and its keywords, lower-cased for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(category: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            category: category.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    fn matches(&self, desc_lower: &str) -> bool {
        self.keywords.iter().any(|k| desc_lower.contains(k.as_str()))
    }
}

/// Split unmatched Pix/transfer rows by direction instead of leaving them
/// uncategorized. Off unless enabled in the run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFallback {
    pub income_category: String,
    pub expense_category: String,
}

impl Default for TransferFallback {
    fn default() -> Self {
        Self {
            income_category: "Ride Sharing Income".to_string(),
            expense_category: "Personal Transfers".to_string(),
        }
    }
}

/// Immutable rule set, loaded once per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    transfer_fallback: Option<TransferFallback>,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self {
            rules,
            transfer_fallback: None,
        }
    }

    /// Builder pattern: enable the transfer fallback
    pub fn with_transfer_fallback(mut self, fallback: TransferFallback) -> Self {
        self.transfer_fallback = Some(fallback);
        self
    }

    /// Load rules from a `categories.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_err = |message: String| Error::Config {
            path: path.to_path_buf(),
            message,
        };

        let text = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let rules = Self::from_json_str(&text).map_err(|e| match e {
            Error::Config { message, .. } => config_err(message),
            other => config_err(other.to_string()),
        })?;

        tracing::debug!(path = %path.display(), categories = rules.len(), "loaded category rules");
        Ok(rules)
    }

    /// Parse the JSON object form, keeping key order.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let object: Map<String, Value> = serde_json::from_str(text)?;

        let mut rules = Vec::with_capacity(object.len());
        for (category, keywords) in object {
            let keywords: Vec<String> =
                serde_json::from_value(keywords).map_err(|_| Error::Config {
                    path: Default::default(),
                    message: format!("category '{category}' must map to a list of keyword strings"),
                })?;
            rules.push(CategoryRule::new(category, keywords));
        }

        Ok(Self::new(rules))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Category names in configuration order
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.category.as_str())
    }

    /// Keyword match only; `Uncategorized` when nothing matches.
    pub fn categorize(&self, description: &str) -> &str {
        if description.is_empty() {
            return UNCATEGORIZED;
        }
        let desc = description.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&desc))
            .map(|rule| rule.category.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    /// Keyword match, then the transfer fallback when it is enabled.
    pub fn categorize_with_value(&self, description: &str, value: f64) -> &str {
        let category = self.categorize(description);
        if category != UNCATEGORIZED || description.is_empty() {
            return category;
        }

        let Some(fallback) = &self.transfer_fallback else {
            return category;
        };

        let desc = description.to_lowercase();
        if !TRANSFER_KEYWORDS.iter().any(|k| desc.contains(k)) {
            return category;
        }

        if value > 0.0 {
            &fallback.income_category
        } else if value < 0.0 {
            &fallback.expense_category
        } else {
            UNCATEGORIZED
        }
    }
}
