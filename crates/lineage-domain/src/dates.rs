//! Best-effort parsing of genealogical date strings
//!
//! Source data carries dates in many shapes ("1850-03-12", "12 MAR 1850",
//! "abt 1850", "March 1850"). Parsing is fuzzy: qualifiers are stripped, a set of
//! common layouts is tried, and a bare four-digit year resolves to 1 January of that
//! year. Anything else is a [`MalformedValue`] which callers treat as absent data.

use crate::MalformedValue;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const FULL_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
];

const MONTH_YEAR_FORMATS: &[&str] = &["%b %Y", "%B %Y", "%Y-%m", "%m/%Y"];

fn qualifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:abt\.?|about|circa|ca\.?|c\.|est\.?|estimated|cal\.?|bef\.?|before|aft\.?|after)\s+")
            .expect("qualifier pattern is valid")
    })
}

/// Text laid out as a day/month date, so a failed parse means a bad day or month
fn day_month_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^\d{1,4}[-/.]\d{1,2}(?:[-/.]\d{1,4})?$|\b\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\b|\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{1,2}\b",
        )
        .expect("day/month pattern is valid")
    })
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b(\d{4})\b").expect("year pattern is valid"))
}

/// Parse a date string, tolerating qualifiers and partial dates
///
/// # Examples
///
/// ```
/// use lineage_domain::dates::parse_fuzzy;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_fuzzy("1850-03-12").unwrap(), NaiveDate::from_ymd_opt(1850, 3, 12).unwrap());
/// assert_eq!(parse_fuzzy("ABT 12 MAR 1850").unwrap(), NaiveDate::from_ymd_opt(1850, 3, 12).unwrap());
/// assert_eq!(parse_fuzzy("1850").unwrap(), NaiveDate::from_ymd_opt(1850, 1, 1).unwrap());
/// assert!(parse_fuzzy("sometime").is_err());
/// ```
pub fn parse_fuzzy(raw: &str) -> Result<NaiveDate, MalformedValue> {
    let cleaned = raw.trim().replace(',', " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = qualifier_pattern().replace(&cleaned, "");
    let text = text.trim();

    if text.is_empty() {
        return Err(MalformedValue::new("date", raw));
    }

    for format in FULL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }

    // chrono needs a day to build a date; pin month-only forms to the 1st
    for format in MONTH_YEAR_FORMATS {
        let padded = format!("1 {}", text);
        let padded_format = format!("%d {}", format);
        if let Ok(date) = NaiveDate::parse_from_str(&padded, &padded_format) {
            return Ok(date);
        }
    }

    // "1850-02-30" is not "1850"
    if day_month_pattern().is_match(text) {
        return Err(MalformedValue::new("date", raw));
    }

    year_pattern()
        .captures(text)
        .and_then(|caps| caps[1].parse::<i32>().ok())
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .ok_or_else(|| MalformedValue::new("date", raw))
}

/// Elapsed years between two dates, using 365.25-day years
///
/// Negative when `later` precedes `earlier`.
pub fn years_between(earlier: NaiveDate, later: NaiveDate) -> f64 {
    (later - earlier).num_days() as f64 / 365.25
}

/// Whether two date strings denote the same day
///
/// Identical text always matches; otherwise both sides must parse.
pub fn same_day(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if a == b {
        return true;
    }
    matches!((parse_fuzzy(a), parse_fuzzy(b)), (Ok(x), Ok(y)) if x == y)
}
