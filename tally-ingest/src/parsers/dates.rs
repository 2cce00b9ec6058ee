//! Booking dates as found in card (`2025-03-14`) and account (`14/03/2025`) exports

use chrono::NaiveDate;

/// Format used for the `Date` column of the report
pub const REPORT_DATE_FORMAT: &str = "%d/%m/%Y";

const ACCEPTED_FORMATS: &[&str] = &["%Y-%m-%d", REPORT_DATE_FORMAT];

/// Parse an ISO or day-first date. Anything else yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok());
    if parsed.is_none() {
        tracing::debug!(raw, "unrecognized date format, leaving transaction undated");
    }
    parsed
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(parse_date("2025-03-14"), Some(expected));
        assert_eq!(parse_date("14/03/2025"), Some(expected));
        assert_eq!(parse_date(" 14/03/2025 "), Some(expected));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("03/14/2025"), None);
        assert_eq!(parse_date("Mar 14"), None);
    }

    #[test]
    fn test_format_day_first() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(format_date(date), "02/01/2025");
    }
}
