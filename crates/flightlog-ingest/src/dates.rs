//! Manifest date parsing
//!
//! Manifests mix several hand-typed date layouts. Layouts are tried in a
//! fixed order and the first one that yields a real calendar date wins, so
//! an ambiguous value like `03/04/1996` is read month-first.

use crate::error::RowParseError;
use chrono::NaiveDate;

/// Two-digit years below this are 20xx, the rest 19xx
pub const YEAR_PIVOT: i32 = 50;

#[derive(Debug, Clone, Copy)]
enum Order {
    MonthDayYear,
    YearMonthDay,
    DayMonthYear,
}

/// Layouts in the order they are tried
const LAYOUTS: &[(Order, char)] = &[
    (Order::MonthDayYear, '/'),
    (Order::YearMonthDay, '-'),
    (Order::DayMonthYear, '/'),
    (Order::DayMonthYear, '-'),
];

/// Parse a manifest date
///
/// # Examples
///
/// ```
/// use flightlog_ingest::parse_manifest_date;
///
/// let d = parse_manifest_date("11/17/95").unwrap();
/// assert_eq!(d.to_string(), "1995-11-17");
/// assert!(parse_manifest_date("yesterday").is_err());
/// ```
pub fn parse_manifest_date(raw: &str) -> Result<NaiveDate, RowParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RowParseError::MissingField("Date"));
    }

    LAYOUTS
        .iter()
        .find_map(|(order, sep)| try_layout(trimmed, *order, *sep))
        .ok_or_else(|| RowParseError::InvalidDate(trimmed.to_string()))
}

fn try_layout(s: &str, order: Order, sep: char) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split(sep).collect();
    if parts.len() != 3 || parts.iter().any(|p| !is_digits(p)) {
        return None;
    }

    let (year, month, day) = match order {
        Order::MonthDayYear => (parts[2], parts[0], parts[1]),
        Order::YearMonthDay => (parts[0], parts[1], parts[2]),
        Order::DayMonthYear => (parts[2], parts[1], parts[0]),
    };

    if month.len() > 2 || day.len() > 2 {
        return None;
    }

    NaiveDate::from_ymd_opt(expand_year(year)?, month.parse().ok()?, day.parse().ok()?)
}

fn expand_year(s: &str) -> Option<i32> {
    let value: i32 = s.parse().ok()?;
    match s.len() {
        4 => Some(value),
        2 if value < YEAR_PIVOT => Some(2000 + value),
        2 => Some(1900 + value),
        _ => None,
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
