//! The month rule shared by the Seeder and every report.
//!
//! A stored `dateOfSale` is kept verbatim, and [`extract_sale_date`] derives its calendar date
//! once, at write time. Reports filter on the month number of that date, so the rule that puts a
//! row into a month is the same rule that finds it again. The year is ignored.

use chrono::{DateTime, Month, NaiveDate, NaiveDateTime};
use std::str::FromStr;

/// Timestamp layouts without an offset, tried after RFC 3339.
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Date-only layouts. `%B` also accepts the abbreviated month name when parsing.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%d %B %Y"];

/// Derives the calendar date of a raw `dateOfSale` value.
///
/// Accepted inputs:
/// - RFC 3339, e.g. `2021-11-27T20:29:54+05:30` (the date in the given offset is used)
/// - `2021-11-27T20:29:54` or `2021-11-27 20:29:54`, optionally with fractional seconds
/// - `2021-11-27`
/// - `November 27, 2021` or `Nov 27, 2021`
/// - `November 2021` or `Nov 2021`, which maps to the first of the month
///
/// Returns `None` for anything else; such rows never match a month filter.
pub fn extract_sale_date(date_of_sale: &str) -> Option<NaiveDate> {
    let s = date_of_sale.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    NaiveDate::parse_from_str(&format!("1 {s}"), "%d %B %Y").ok()
}

/// Parses the `month` parameter of a report request.
///
/// Accepts an English month name or its three-letter abbreviation in any case (`March`,
/// `mar`), or a month number from 1 to 12 (`3`, `03`). Returns `None` for anything else,
/// including the empty string.
pub fn parse_month_label(label: &str) -> Option<Month> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    if label.bytes().all(|b| b.is_ascii_digit()) {
        return label
            .parse::<u8>()
            .ok()
            .and_then(|n| Month::try_from(n).ok());
    }
    Month::from_str(label).ok()
}

/// The month number (1-12) stored alongside each row.
pub(crate) fn month_number(month: Month) -> i64 {
    i64::from(month.number_from_month())
}
