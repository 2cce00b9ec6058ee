//! tally-ingest: CSV export loading, column normalization and amount parsing.

pub mod parsers;
pub mod reader;
pub mod types;

pub use parsers::amount::{ParsedAmount, parse_amount};
pub use parsers::columns::{NormalizedColumns, normalize_columns};
pub use parsers::dates::{format_date, parse_date};
pub use reader::{LoadedSource, load_sources, read_records, read_records_from};
pub use types::{RawRecord, Source, SourceKind};
