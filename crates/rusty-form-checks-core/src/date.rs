//! Date normalisation
//!
//! Dates are compared as `YYYYMMDD` integers so the ordinary numeric
//! operators apply. A missing date normalises to `0`, which makes it compare
//! as earlier than any real date. Callers that must reject a missing date
//! pair the comparison with a required check.

use chrono::{DateTime, Datelike, NaiveDate};

use crate::error::ConfigError;

/// Normalises `date` to `(year + year_offset) * 10000 + month * 100 + day`
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use rusty_form_checks_core::date_to_comparable_integer;
///
/// let d = NaiveDate::from_ymd_opt(2024, 3, 7);
/// assert_eq!(date_to_comparable_integer(d, 0), 20240307);
/// assert_eq!(date_to_comparable_integer(d, 18), 20420307);
/// assert_eq!(date_to_comparable_integer(None, 18), 0);
/// ```
pub fn date_to_comparable_integer(date: Option<NaiveDate>, year_offset: i32) -> i64 {
    match date {
        Some(d) => {
            let year = i64::from(d.year()) + i64::from(year_offset);
            year * 10_000 + i64::from(d.month()) * 100 + i64::from(d.day())
        }
        None => 0,
    }
}

/// Parses a `YYYY-MM-DD` literal supplied while configuring a check
pub fn parse_date_literal(literal: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(literal.trim(), "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidDate(literal.to_string()))
}

/// Reads a date out of a control value
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps. Anything else yields `None`;
/// callers that must reject malformed input check for a blank value first.
pub fn parse_control_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}
