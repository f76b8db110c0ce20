//! Loose date-expression parsing.
//!
//! Resume dates arrive as anything from `"2020"` to `"Aug 2020"` to
//! `"15/06/21"` to full ISO dates, with en/em dashes and stray whitespace.
//! `parse_date` resolves an expression to a concrete `NaiveDate` through a
//! fixed cascade of heuristics; every failure path is `None`, never a panic.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static PRESENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)present").unwrap());
static YEAR_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})$").unwrap());
static MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+)\s+(\d{4})").unwrap());
static DAY_MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})").unwrap());
static ANY_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4})").unwrap());
static ISO_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}[/\-]").unwrap());

/// Year-first numeric formats. Only tried when the expression opens with a
/// 4-digit year: chrono's `%Y` happily parses 1-2 digit years, which would
/// otherwise swallow day-first strings like "15/06/21".
const ISO_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Month-name formats carrying an explicit day.
const NAMED_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

const MONTH_NAMES: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// True when the expression marks an ongoing position ("Present", "present",
/// anywhere in the token). Callers must treat this as "now", not as a parse
/// failure.
pub fn is_present_marker(expr: &str) -> bool {
    PRESENT_RE.is_match(expr)
}

/// Replaces en/em dashes with a plain hyphen.
pub fn normalize_dashes(expr: &str) -> String {
    expr.replace(['\u{2013}', '\u{2014}'], "-")
}

/// Parses a loosely-formatted date expression. Resolution order, first
/// match wins:
///
/// 1. bare 4-digit year → January 1 of that year
/// 2. a handful of well-known calendar formats
/// 3. "Month Year" (full or abbreviated month name) → first of that month
/// 4. numeric `D/M/Y` or `D-M-Y`, 2-digit years assumed in the 2000s
/// 5. first 4-digit year found anywhere → January 1
///
/// Empty and "present"-marked input short-circuits to `None`.
pub fn parse_date(expr: &str) -> Option<NaiveDate> {
    let trimmed = expr.trim();
    if trimmed.is_empty() || is_present_marker(trimmed) {
        return None;
    }
    let normalized = normalize_dashes(trimmed)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    bare_year(&normalized)
        .or_else(|| known_format(&normalized))
        .or_else(|| month_year(&normalized))
        .or_else(|| day_month_year(&normalized))
        .or_else(|| year_anywhere(&normalized))
}

fn bare_year(expr: &str) -> Option<NaiveDate> {
    let caps = YEAR_ONLY_RE.captures(expr)?;
    let year: i32 = caps[1].parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

fn known_format(expr: &str) -> Option<NaiveDate> {
    if ISO_PREFIX_RE.is_match(expr) {
        if let Some(date) = ISO_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(expr, fmt).ok())
        {
            return Some(date);
        }
    }
    NAMED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(expr, fmt).ok())
}

fn month_year(expr: &str) -> Option<NaiveDate> {
    let caps = MONTH_YEAR_RE.captures(expr)?;
    let month = month_from_name(&caps[1])?;
    let year: i32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Resolves "Aug", "Sept", "August", ... to a month number. Requires at
/// least three letters and a genuine prefix of the full name, so arbitrary
/// words never alias onto a month.
fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|full| full.starts_with(&lower))
        .map(|idx| idx as u32 + 1)
}

fn day_month_year(expr: &str) -> Option<NaiveDate> {
    let caps = DAY_MONTH_YEAR_RE.captures(expr)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let year = if year < 100 { 2000 + year } else { year };
    // A matched-but-impossible calendar day (e.g. 31/02/2021) returns None
    // here and degrades to the year fallback in the cascade.
    NaiveDate::from_ymd_opt(year, month, day)
}

fn year_anywhere(expr: &str) -> Option<NaiveDate> {
    let caps = ANY_YEAR_RE.captures(expr)?;
    let year: i32 = caps[1].parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}
