use serde::{Deserialize, Serialize};

/// One canonical work-experience entry.
///
/// Every candidate, whether it arrived as a structured object from a
/// parsing service or was inferred from free text, is normalized into this
/// shape before splitting and deduplication. String fields use `""` for
/// "absent"; the sources are too inconsistent for anything stricter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub role: String,
    pub company_name: String,
    /// Combined range expression as the source wrote it, e.g. "Aug 2020 - Present".
    pub date_range: String,
    /// Raw start token (year, "Month Year", or a full date). Empty = unknown.
    pub start: String,
    /// Raw end token. Empty = unknown or ongoing.
    pub end: String,
    pub is_current: bool,
    pub description: String,
}

impl ExperienceRecord {
    /// A record is worth keeping iff it identifies a job somehow: by role,
    /// company, or date range. Description-only fragments are noise.
    pub fn is_meaningful(&self) -> bool {
        !self.role.is_empty() || !self.company_name.is_empty() || !self.date_range.is_empty()
    }

    /// Deduplication key: case- and whitespace-insensitive over the three
    /// identifying fields. Synonymous roles ("Engineer" vs "Software
    /// Engineer") intentionally stay distinct.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.role.trim().to_lowercase(),
            self.company_name.trim().to_lowercase(),
            self.date_range.trim().to_lowercase()
        )
    }
}
