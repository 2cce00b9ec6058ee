use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tally_finance::{CategoryRules, SummaryMode, TransferFallback};
use tally_ingest::Source;

pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

/// Run configuration, read from `tally.toml` when present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub output: PathBuf,
    pub categories: PathBuf,
    pub summary_mode: SummaryMode,
    /// Split unmatched Pix/transfer rows into income and expense categories
    pub transfer_fallback: bool,
    /// Processed in order; kept last so the TOML tables follow plain keys
    pub sources: Vec<Source>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("categorized_expenses.csv"),
            categories: PathBuf::from("categories.json"),
            summary_mode: SummaryMode::Computed,
            transfer_fallback: false,
            sources: Source::defaults(),
        }
    }
}

impl RunConfig {
    /// Load and prepare the category rules this configuration points at
    pub fn load_rules(&self) -> Result<CategoryRules> {
        let rules = CategoryRules::load(&self.categories)
            .with_context(|| format!("loading categories from {}", self.categories.display()))?;
        Ok(if self.transfer_fallback {
            rules.with_transfer_fallback(TransferFallback::default())
        } else {
            rules
        })
    }
}

/// An explicit path must exist; otherwise `tally.toml` is used if present.
pub fn load_config(explicit: Option<&Path>) -> Result<RunConfig> {
    let p = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(RunConfig::default());
            }
            p
        }
    };

    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(path: &Path, cfg: &RunConfig) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &RunConfig::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
