//! Free-text experience extraction.
//!
//! Resume text extracted from a PDF/DOCX has no grammar, but job headers
//! leave recognizable traces: pipe-delimited "Role | Company | Dates" lines,
//! bare date-range lines, bullet lists. The extractor folds over the lines
//! carrying one in-progress record, classifying each line with a fixed
//! priority order so the highest-signal delimiter (explicit pipes) always
//! wins over weaker cues. Unclassifiable prose degrades to description text
//! attached to the nearest preceding header.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::experience::ExperienceRecord;
use crate::pipeline::dates::normalize_dashes;

/// "Role | Company" or "Role | Company | Dates".
static COMPOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\|\s*(.+?)\s*(?:\|\s*(.+))?$").unwrap());

/// "Aug 2020 - May 2022", "2018 - 2020", "Aug 2020 - Present".
static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([A-Za-z]{3,}\s*\d{4}|\d{4})\s*-\s*(Present|[A-Za-z]{3,}\s*\d{4}|\d{4})")
        .unwrap()
});

/// "- achieved X" or "• achieved X".
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-•]\s*(.+)$").unwrap());

/// "Freelance Consultant - Jan 2020" style single-line header: leading text,
/// a hyphen, then a month/year, bare year, or "Present".
static SINGLE_LINE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Za-z].{1,120})\s*-\s*(Present|[A-Za-z]{3,}\s*\d{4}|\d{4})").unwrap()
});

/// Classifies a line as a compound job header. Returns (role, company,
/// date_range) when the line carries at least two non-empty pipe-delimited
/// segments; the third segment is the date range when present.
pub fn compound_segments(line: &str) -> Option<(String, String, String)> {
    let caps = COMPOUND_RE.captures(line)?;
    let role = caps[1].trim().to_string();
    let company = caps[2].trim().to_string();
    if role.is_empty() || company.is_empty() {
        return None;
    }
    let range = caps
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    Some((role, company, range))
}

/// Extracts a date-range token from a line that is a date range and nothing
/// stronger: any pipe-delimited line belongs to `compound_segments`.
pub fn date_range_token(line: &str) -> Option<String> {
    if line.contains('|') {
        return None;
    }
    DATE_RANGE_RE
        .find(line)
        .map(|m| m.as_str().trim().to_string())
}

/// Strips the bullet glyph from a bullet line.
pub fn bullet_text(line: &str) -> Option<String> {
    BULLET_RE
        .captures(line)
        .map(|caps| caps[1].trim().to_string())
}

/// Matches a header that folds role and dates into one line. Returns
/// (role, matched range expression).
pub fn single_line_header(line: &str) -> Option<(String, String)> {
    SINGLE_LINE_HEADER_RE.captures(line).map(|caps| {
        (
            caps[1].trim().to_string(),
            caps.get(0).unwrap().as_str().trim().to_string(),
        )
    })
}

/// Scans free text and segments it into candidate experience records.
///
/// Single pass over non-empty trimmed lines; one in-progress record is
/// carried and flushed at every new header and at end of stream.
pub fn extract_experience(text: &str) -> Vec<ExperienceRecord> {
    let mut records: Vec<ExperienceRecord> = Vec::new();
    let mut current: Option<ExperienceRecord> = None;

    for raw_line in text.lines() {
        let line = normalize_dashes(raw_line.trim());
        if line.is_empty() {
            continue;
        }

        if let Some((role, company, range)) = compound_segments(&line) {
            if let Some(done) = current.take() {
                records.push(done);
            }
            current = Some(ExperienceRecord {
                role,
                company_name: company,
                date_range: range,
                ..Default::default()
            });
            continue;
        }

        if let Some(rec) = current.as_mut() {
            if let Some(range) = date_range_token(&line) {
                rec.date_range = range;
                continue;
            }
            if let Some(bullet) = bullet_text(&line) {
                append_description(rec, &bullet);
                continue;
            }
            append_description(rec, &line);
            continue;
        }

        // No record in progress: only a date-led header can open one;
        // anything else (stray prose, orphan bullets) has nothing to attach
        // to and is dropped.
        if let Some((role, range)) = single_line_header(&line) {
            current = Some(ExperienceRecord {
                role,
                date_range: range,
                ..Default::default()
            });
        }
    }

    if let Some(done) = current.take() {
        records.push(done);
    }

    debug!(count = records.len(), "extracted experience from free text");
    records
}

fn append_description(rec: &mut ExperienceRecord, text: &str) {
    if !rec.description.is_empty() {
        rec.description.push(' ');
    }
    rec.description.push_str(text);
}
