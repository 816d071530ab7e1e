//! Transaction date parsing
//!
//! Sales exports mix date styles freely, sometimes within one file. Numeric
//! dates are read day-first (`05/01/2023` is 5 January) and only fall back to
//! month-first when day-first cannot produce a valid date (`01/25/2023`).
//! Year-first dates (`2023-01-05`) are always read as ISO order. Two-digit
//! years land within 50 years of the current year. Any time of day is ignored.

use chrono::{DateTime, Datelike, Local, NaiveDate};

const NAMED_MONTH_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%d %b, %Y",
];

/// Parse a transaction date, returning `None` when no supported reading exists
pub fn parse_transaction_date(raw: &str) -> Option<NaiveDate> {
    parse_transaction_date_near(raw, Local::now().year())
}

/// Parse a transaction date, expanding two-digit years around `reference_year`
pub fn parse_transaction_date_near(raw: &str, reference_year: i32) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }

    parse_numeric_date(raw, reference_year).or_else(|| parse_named_date(raw))
}

fn parse_numeric_date(raw: &str, reference_year: i32) -> Option<NaiveDate> {
    let date_part = raw.split(|c: char| c == 'T' || c.is_whitespace()).next()?;
    let fields: Vec<&str> = date_part
        .split(|c: char| matches!(c, '-' | '/' | '.'))
        .collect();

    if !fields
        .iter()
        .all(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    match fields.as_slice() {
        // Compact 20230105
        [compact] if compact.len() == 8 => {
            let year = compact[..4].parse().ok()?;
            let month = compact[4..6].parse().ok()?;
            let day = compact[6..].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        [first, second, third] if first.len() == 4 => {
            let year = first.parse().ok()?;
            let a: u32 = second.parse().ok()?;
            let b: u32 = third.parse().ok()?;
            NaiveDate::from_ymd_opt(year, a, b).or_else(|| NaiveDate::from_ymd_opt(year, b, a))
        }
        [first, second, third] if third.len() == 4 || third.len() == 2 => {
            let year = expand_year(third, reference_year)?;
            let a: u32 = first.parse().ok()?;
            let b: u32 = second.parse().ok()?;
            NaiveDate::from_ymd_opt(year, b, a).or_else(|| NaiveDate::from_ymd_opt(year, a, b))
        }
        _ => None,
    }
}

/// A two-digit year is placed in the reference year's century, then moved
/// one century so that it lies in `[reference - 50, reference + 50)`.
fn expand_year(field: &str, reference_year: i32) -> Option<i32> {
    let value: i32 = field.parse().ok()?;
    if field.len() != 2 {
        return Some(value);
    }

    let year = reference_year - reference_year.rem_euclid(100) + value;
    if year >= reference_year + 50 {
        Some(year - 100)
    } else if year < reference_year - 50 {
        Some(year + 100)
    } else {
        Some(year)
    }
}

fn parse_named_date(raw: &str) -> Option<NaiveDate> {
    // Drop a trailing time component ("05 Jan 2023 10:15")
    let head: Vec<&str> = raw.split_whitespace().take(3).collect();
    let head = head.join(" ");

    NAMED_MONTH_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(raw, format)
            .or_else(|_| NaiveDate::parse_from_str(&head, format))
            .ok()
    })
}
