//! Locale-tolerant amount parsing
//!
//! Exports mix `1234.56`, `50,00` and `R$ -30,50`. The first comma is read as
//! the decimal separator, currency symbols and spaces are dropped, and the
//! longest leading number is taken, so `1.500,00` ends up as `1.5`.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::SourceKind;

static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").expect("numeric prefix regex"));

/// Signed amount plus a flag for values that could not be read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAmount {
    pub value: f64,
    /// No number found in the raw text; `value` is 0.0
    pub malformed: bool,
}

/// Parse `raw` and apply the sign convention of `kind`.
///
/// Credit exports are forced non-positive; debit exports keep their sign.
pub fn parse_amount(raw: &str, kind: SourceKind) -> ParsedAmount {
    let (parsed, malformed) = match parse_decimal(raw) {
        Some(v) => (v, false),
        None => (0.0, true),
    };

    let value = match kind {
        SourceKind::Credit => -parsed.abs(),
        SourceKind::Debit => parsed,
    };

    ParsedAmount {
        // -0.0 would print as "-0" in the report
        value: if value == 0.0 { 0.0 } else { value },
        malformed,
    }
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let dotted = raw.replacen(',', ".", 1);
    let cleaned: String = dotted
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let m = NUMERIC_PREFIX.find(&cleaned)?;
    m.as_str().parse().ok()
}
