//! Calendar-date helpers for log keys.
//!
//! Dates travel as `YYYY-MM-DD` text everywhere outside the model.

use crate::model::codec::{CodecError, CodecResult};
use chrono::{Local, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns today's calendar date in the runtime's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses strict `YYYY-MM-DD` text.
///
/// Unpadded forms such as `2024-1-5` are rejected so that every accepted value
/// formats back to the same text.
pub fn parse_date(value: &str) -> CodecResult<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .filter(|date| format_date(*date) == trimmed)
        .ok_or_else(|| CodecError::InvalidDate(value.to_string()))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_date, parse_date, today};

    #[test]
    fn parse_accepts_padded_iso_dates() {
        let date = parse_date("2024-01-05").unwrap();
        assert_eq!(format_date(date), "2024-01-05");
    }

    #[test]
    fn parse_rejects_unpadded_and_garbage_input() {
        assert!(parse_date("2024-1-5").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn today_formats_as_ten_chars() {
        assert_eq!(format_date(today()).len(), 10);
    }
}
