//! Human-readable elapsed time between two loosely-formatted dates.

use chrono::{Datelike, NaiveDate, Utc};

use crate::pipeline::dates::parse_date;

/// Renders the elapsed time between two date expressions.
///
/// The start must parse or the result is an empty string (callers render
/// "N/A"). A missing or unparseable end means the position is ongoing and
/// today's date is used.
pub fn duration_between(start_expr: &str, end_expr: Option<&str>) -> String {
    let Some(start) = parse_date(start_expr) else {
        return String::new();
    };
    let end = end_expr
        .and_then(parse_date)
        .unwrap_or_else(|| Utc::now().date_naive());
    duration_between_dates(start, end)
}

/// Whole-unit year/month arithmetic between two concrete dates.
///
/// Only positive units render; a span under one month (or a reversed range)
/// collapses to the literal "Less than a month".
pub fn duration_between_dates(start: NaiveDate, end: NaiveDate) -> String {
    let mut years = end.year() - start.year();
    let mut months = end.month() as i32 - start.month() as i32;
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let year_part = match years {
        y if y > 1 => format!("{y} yrs"),
        1 => "1 yr".to_string(),
        _ => String::new(),
    };
    let month_part = match months {
        m if m > 1 => format!("{m} mos"),
        1 => "1 mo".to_string(),
        _ => String::new(),
    };

    match (year_part.is_empty(), month_part.is_empty()) {
        (false, false) => format!("{year_part}, {month_part}"),
        (false, true) => year_part,
        (true, false) => month_part,
        (true, true) => "Less than a month".to_string(),
    }
}
