//! Read CSV exports into raw records.
//!
//! Every export has a header row; fields are trimmed and short rows are
//! tolerated so a truncated line degrades instead of aborting the run.

use std::io;
use std::path::Path;

use tally_core::{Error, Result};

use crate::types::{RawRecord, Source};

/// Records of one source that was found on disk
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub source: Source,
    pub records: Vec<RawRecord>,
}

/// Parse an export file, keyed by its header row.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let rdr = builder()
        .from_path(path)
        .map_err(|source| Error::Source {
            path: path.to_path_buf(),
            source,
        })?;
    collect_records(rdr).map_err(|source| Error::Source {
        path: path.to_path_buf(),
        source,
    })
}

/// Same as [`read_records`] for in-memory or piped input.
pub fn read_records_from<R: io::Read>(input: R) -> Result<Vec<RawRecord>> {
    Ok(collect_records(builder().from_reader(input))?)
}

/// Load every configured source in order. Missing files are skipped with a
/// warning; unreadable ones abort.
pub fn load_sources(sources: &[Source]) -> Result<Vec<LoadedSource>> {
    let mut loaded = Vec::with_capacity(sources.len());

    for source in sources {
        if !source.path.exists() {
            tracing::warn!(path = %source.path.display(), "file not found, skipping source");
            continue;
        }

        tracing::info!(source = %source.identifier(), kind = %source.kind, "processing");
        let records = read_records(&source.path)?;
        tracing::debug!(source = %source.identifier(), rows = records.len(), "read rows");

        loaded.push(LoadedSource {
            source: source.clone(),
            records,
        });
    }

    Ok(loaded)
}

fn builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(csv::Trim::All);
    builder
}

fn collect_records<R: io::Read>(mut rdr: csv::Reader<R>) -> std::result::Result<Vec<RawRecord>, csv::Error> {
    let headers = rdr.headers()?.clone();
    let mut records = Vec::new();

    for result in rdr.records() {
        let row = result?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        records.push(headers.iter().zip(row.iter()).collect());
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceKind;
    use std::fs;

    #[test]
    fn test_read_records_trims_and_keys_by_header() {
        let csv = "date , title , amount\n2025-03-14, Uber Trip ,\"25,00\"\n\n2025-03-15,iFood,\"42,10\"\n";
        let records = read_records_from(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("title"), Some("Uber Trip"));
        assert_eq!(records[0].get("amount"), Some("25,00"));
        assert_eq!(records[1].get("date"), Some("2025-03-15"));
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let csv = "Data,Valor,Identificador,Descrição\n02/01/2025,-30.5\n";
        let records = read_records_from(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Valor"), Some("-30.5"));
        assert_eq!(records[0].get("Descrição"), None);
    }

    #[test]
    fn test_blank_field_rows_are_skipped() {
        let csv = "title,amount\n,\nPadaria,\"8,00\"\n";
        let records = read_records_from(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("title"), Some("Padaria"));
    }

    #[test]
    fn test_missing_sources_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("debit.csv");
        fs::write(&present, "Descrição,Valor\nSalário,3000.00\n").unwrap();

        let sources = vec![
            Source::new(dir.path().join("credit.csv"), SourceKind::Credit),
            Source::new(&present, SourceKind::Debit),
        ];
        let loaded = load_sources(&sources).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].source.identifier(), "debit.csv");
        assert_eq!(loaded[0].records[0].get("Valor"), Some("3000.00"));
    }

    #[test]
    fn test_unreadable_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory exists but cannot be read as CSV
        let sources = vec![Source::new(dir.path(), SourceKind::Debit)];
        let err = load_sources(&sources).unwrap_err();
        assert!(matches!(err, Error::Source { .. }));
    }
}
