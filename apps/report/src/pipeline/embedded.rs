//! Secondary pass: descriptions that still contain "Role | Company" lines.
//!
//! Upstream parsers sometimes collapse several jobs into one entry, leaving
//! the later headers buried in the first entry's description. When a
//! description shows the pipe-header signal, it is re-scanned with the text
//! extractor and the finds are appended as records of their own.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::experience::ExperienceRecord;
use crate::pipeline::text_extract::extract_experience;

/// A pipe with 2+ letters on the left and a word character on the right:
/// the minimal footprint of an embedded "Role | Company" header.
static EMBEDDED_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{2,}\s*\|\s*[A-Za-z0-9&]").unwrap());

/// True when the description plausibly contains an embedded job header.
pub fn has_embedded_header(description: &str) -> bool {
    description.contains('|') && EMBEDDED_HEADER_RE.is_match(description)
}

/// Expands records whose descriptions embed further job headers.
///
/// A record without the signal passes through untouched, so a list already
/// free of embedded patterns comes back identical. When a description does
/// yield sub-records, the original is kept only if it was a real entry in
/// its own right (both role and company populated) rather than a bare
/// container for the text.
pub fn split_embedded(records: Vec<ExperienceRecord>) -> Vec<ExperienceRecord> {
    let mut output = Vec::with_capacity(records.len());

    for record in records {
        if record.description.is_empty() || !has_embedded_header(&record.description) {
            output.push(record);
            continue;
        }

        let extracted = extract_experience(&record.description);
        if extracted.is_empty() {
            output.push(record);
            continue;
        }

        debug!(
            role = %record.role,
            found = extracted.len(),
            "split embedded experience out of description"
        );
        if !record.role.is_empty() && !record.company_name.is_empty() {
            output.push(record);
        }
        output.extend(extracted);
    }

    output
}
