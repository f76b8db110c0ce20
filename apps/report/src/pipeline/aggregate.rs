//! Experience aggregation: structured fields + free text → one canonical,
//! deduplicated list.
//!
//! Upstream parsing services disagree on everything: the field the job list
//! lives under, whether it is a bare array or wrapped in an `items` object,
//! and what each attribute is called. All accepted spellings live in the
//! const tables below so the mapping stays auditable; first present key
//! wins.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::models::experience::ExperienceRecord;
use crate::models::profile::{first_string, string_or_list, unwrap_envelope};
use crate::pipeline::dates::is_present_marker;
use crate::pipeline::embedded::split_embedded;
use crate::pipeline::text_extract::extract_experience;

/// Field names a structured experience array may hide under, probed in order.
const STRUCTURED_FIELDS: &[&str] = &[
    "experience",
    "work_experience",
    "employer",
    "jobs",
    "positions",
    "employment_history",
    "WorkExperience",
    "experience_section",
];

/// Free-text fields worth scanning for experience blocks, probed in order.
const TEXT_FIELDS: &[&str] = &[
    "raw_text",
    "text",
    "parsed_text",
    "description",
    "summary",
    "profile_summary",
    "bio",
];

const ROLE_KEYS: &[&str] = &["role", "job_title", "title"];
const COMPANY_KEYS: &[&str] = &["company_name", "company", "organization"];
const DESCRIPTION_KEYS: &[&str] = &["description", "summary", "responsibilities"];
const START_KEYS: &[&str] = &["from_year", "start_year", "from", "start_date"];
const END_KEYS: &[&str] = &["to_year", "end_year", "to", "end_date"];

/// Builds the canonical, deduplicated experience list for a profile.
///
/// The profile is read-only; candidates are collected from every recognized
/// structured field, then from one extractor pass over the concatenated
/// free-text fields, normalized, expanded for embedded headers, and finally
/// deduplicated by (role, company, date range). Output order is first
/// occurrence, structured before text.
///
/// The only error is the contract violation of a non-object profile.
pub fn aggregate(profile: &Value) -> Result<Vec<ExperienceRecord>, AppError> {
    let data = unwrap_envelope(profile);
    if !data.is_object() {
        return Err(AppError::Validation(
            "profile must be a JSON object".to_string(),
        ));
    }

    let mut candidates: Vec<ExperienceRecord> = collect_structured(data)
        .into_iter()
        .map(normalize_candidate)
        .collect();
    let structured_count = candidates.len();

    let combined_text = collect_free_text(data);
    if !combined_text.is_empty() {
        candidates.extend(extract_experience(&combined_text));
    }
    debug!(
        structured = structured_count,
        text = candidates.len() - structured_count,
        "collected experience candidates"
    );

    Ok(dedupe(split_embedded(candidates)))
}

/// Pulls every structured candidate off the profile, tolerating the three
/// wrapper shapes seen in the wild: a bare array, `{"items": [...]}`, and
/// the field nested under its own name (`experience.experience`). The
/// legacy `sections["Work Experience"].items` location is probed last.
fn collect_structured(data: &Value) -> Vec<&Value> {
    let mut items = Vec::new();

    for field in STRUCTURED_FIELDS {
        let Some(value) = data.get(*field) else {
            continue;
        };
        if let Some(arr) = value.as_array() {
            items.extend(arr.iter());
        } else if value.is_object() {
            let nested = value
                .get("items")
                .and_then(Value::as_array)
                .or_else(|| value.get(*field).and_then(Value::as_array));
            if let Some(arr) = nested {
                items.extend(arr.iter());
            }
        }
    }

    if let Some(arr) = data
        .get("sections")
        .and_then(|s| s.get("Work Experience"))
        .and_then(|w| w.get("items"))
        .and_then(Value::as_array)
    {
        items.extend(arr.iter());
    }

    items
}

/// Concatenates every recognized free-text field (and the `pages` array)
/// with blank-line separators for a single extractor pass.
fn collect_free_text(data: &Value) -> String {
    let mut chunks: Vec<String> = TEXT_FIELDS
        .iter()
        .filter_map(|field| data.get(*field).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect();

    if let Some(pages) = data.get("pages").and_then(Value::as_array) {
        let joined = pages
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        if !joined.trim().is_empty() {
            chunks.push(joined);
        }
    }

    chunks.join("\n\n")
}

/// Maps one structured candidate onto the canonical record shape. Non-object
/// candidates normalize to an empty record and are discarded downstream.
fn normalize_candidate(item: &Value) -> ExperienceRecord {
    let date_range = first_string(item, &["date_range"]).unwrap_or_else(|| {
        match (
            first_string(item, &["from"]),
            first_string(item, &["to"]),
        ) {
            (Some(from), Some(to)) => format!("{from} - {to}"),
            _ => String::new(),
        }
    });

    let end = first_string(item, END_KEYS).unwrap_or_default();
    let is_current = item
        .get("is_current")
        .and_then(Value::as_bool)
        .unwrap_or(false)
        || is_present_marker(&end);

    ExperienceRecord {
        role: first_string(item, ROLE_KEYS).unwrap_or_default(),
        company_name: first_string(item, COMPANY_KEYS).unwrap_or_default(),
        date_range,
        start: first_string(item, START_KEYS).unwrap_or_default(),
        end,
        is_current,
        description: DESCRIPTION_KEYS
            .iter()
            .filter_map(|k| item.get(*k).and_then(|v| string_or_list(v, ", ")))
            .find(|s| !s.is_empty())
            .unwrap_or_default(),
    }
}

/// First-occurrence dedup over the (role, company, date range) key;
/// records with a fully-empty key are dropped.
fn dedupe(records: Vec<ExperienceRecord>) -> Vec<ExperienceRecord> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for record in records {
        if !record.is_meaningful() {
            continue;
        }
        if seen.insert(record.dedup_key()) {
            unique.push(record);
        }
    }

    debug!(count = unique.len(), "deduplicated experience list");
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_profile_yields_empty_list() {
        assert!(aggregate(&json!({})).unwrap().is_empty());
        assert!(aggregate(&json!({"unrelated": 42})).unwrap().is_empty());
    }

    #[test]
    fn test_non_object_profile_is_a_contract_violation() {
        assert!(matches!(
            aggregate(&json!("just a string")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            aggregate(&json!([1, 2, 3])),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_structured_array_is_normalized() {
        let profile = json!({
            "experience": [
                {"job_title": "Engineer", "company": "Acme", "date_range": "2020 - 2022"}
            ]
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].role, "Engineer");
        assert_eq!(list[0].company_name, "Acme");
        assert_eq!(list[0].date_range, "2020 - 2022");
    }

    #[test]
    fn test_items_wrapper_shape_is_accepted() {
        let profile = json!({
            "WorkExperience": {"items": [{"title": "Analyst", "organization": "Initech"}]}
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].role, "Analyst");
        assert_eq!(list[0].company_name, "Initech");
    }

    #[test]
    fn test_self_nested_shape_is_accepted() {
        let profile = json!({
            "experience": {"experience": [{"role": "Engineer", "company_name": "Acme"}]}
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].role, "Engineer");
    }

    #[test]
    fn test_sections_work_experience_shape_is_accepted() {
        let profile = json!({
            "sections": {"Work Experience": {"items": [{"role": "Engineer", "company": "Acme"}]}}
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].company_name, "Acme");
    }

    #[test]
    fn test_date_range_synthesized_from_discrete_fields() {
        let profile = json!({
            "jobs": [{"role": "Engineer", "company": "Acme", "from": "2019", "to": "2021"}]
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list[0].date_range, "2019 - 2021");
    }

    #[test]
    fn test_date_range_preferred_over_discrete_fields() {
        // Judgment call preserved from the source: the combined range wins
        // even when discrete fields disagree with it.
        let profile = json!({
            "jobs": [{
                "role": "Engineer",
                "company": "Acme",
                "date_range": "2018 - 2020",
                "from": "2019",
                "to": "2021"
            }]
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list[0].date_range, "2018 - 2020");
    }

    #[test]
    fn test_is_current_from_explicit_flag_and_present_token() {
        let profile = json!({
            "jobs": [
                {"role": "A", "company": "X", "is_current": true},
                {"role": "B", "company": "Y", "to": "Present"},
                {"role": "C", "company": "Z", "to": "2021"}
            ]
        });
        let list = aggregate(&profile).unwrap();
        assert!(list[0].is_current);
        assert!(list[1].is_current);
        assert!(!list[2].is_current);
    }

    #[test]
    fn test_text_candidates_follow_structured() {
        let profile = json!({
            "experience": [{"role": "Engineer", "company": "Acme"}],
            "raw_text": "Analyst | Initech | 2018 - 2019"
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].company_name, "Acme");
        assert_eq!(list[1].company_name, "Initech");
    }

    #[test]
    fn test_multiple_text_fields_are_concatenated() {
        let profile = json!({
            "summary": "Engineer | Acme | 2020 - 2021",
            "bio": "Analyst | Initech | 2018 - 2019",
            "pages": ["Consultant | Globex | 2016 - 2017"]
        });
        let list = aggregate(&profile).unwrap();
        let companies: Vec<&str> = list.iter().map(|r| r.company_name.as_str()).collect();
        assert_eq!(companies, vec!["Acme", "Initech", "Globex"]);
    }

    #[test]
    fn test_duplicates_collapse_to_first_occurrence() {
        let profile = json!({
            "experience": [
                {"role": "Engineer", "company": "Acme", "date_range": "2020 - 2022",
                 "description": "first copy"},
                {"role": " engineer ", "company": "ACME", "date_range": "2020 - 2022",
                 "description": "second copy"}
            ]
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].description, "first copy");
    }

    #[test]
    fn test_structured_and_text_duplicates_collapse() {
        let profile = json!({
            "experience": [{"role": "Engineer", "company": "Acme", "date_range": "2020 - 2022"}],
            "raw_text": "Engineer | Acme | 2020 - 2022\n- From the PDF text"
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list.len(), 1);
        // First occurrence (the structured one, with no description) wins.
        assert_eq!(list[0].description, "");
    }

    #[test]
    fn test_meaningless_records_are_dropped() {
        let profile = json!({
            "experience": [{"description": "floating text, no role or company"}, {}, "not even an object"]
        });
        assert!(aggregate(&profile).unwrap().is_empty());
    }

    #[test]
    fn test_embedded_description_is_split() {
        let profile = json!({
            "experience": [{
                "role": "Engineer",
                "company": "Acme",
                "date_range": "2020 - 2022",
                "description": "Platform work. Analyst | Initech | 2018 - 2019"
            }]
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].company_name, "Acme");
        assert_eq!(list[1].company_name, "Initech");
    }

    #[test]
    fn test_envelope_wrapped_profile() {
        let profile = json!({
            "data": {"experience": [{"role": "Engineer", "company": "Acme"}]}
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_output_order_is_deterministic() {
        let profile = json!({
            "experience": [{"role": "A", "company": "X"}, {"role": "B", "company": "Y"}],
            "jobs": [{"role": "C", "company": "Z"}],
            "raw_text": "D | W | 2020 - 2021"
        });
        let first = aggregate(&profile).unwrap();
        for _ in 0..10 {
            assert_eq!(aggregate(&profile).unwrap(), first);
        }
        let roles: Vec<&str> = first.iter().map(|r| r.role.as_str()).collect();
        assert_eq!(roles, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_description_accepts_array_of_strings() {
        let profile = json!({
            "experience": [{
                "role": "Engineer",
                "company": "Acme",
                "responsibilities": ["Built APIs", "Led reviews"]
            }]
        });
        let list = aggregate(&profile).unwrap();
        assert_eq!(list[0].description, "Built APIs, Led reviews");
    }
}
