//! Fixed-layout plain-text report rendering.
//!
//! Formatting lives in one place so output changes stay localized; the
//! layout (separators, section titles, N/A fallbacks) is part of the
//! contract and is pinned by tests.

use serde_json::Value;

use crate::errors::AppError;
use crate::models::experience::ExperienceRecord;
use crate::models::profile::{coerce_string, first_string, string_or_list, unwrap_envelope};
use crate::pipeline::dates::{is_present_marker, normalize_dashes};
use crate::pipeline::duration::duration_between;

const RULE_HEAVY: &str = "===========================================";
const RULE_LIGHT: &str = "-------------------------------------------";

/// Renders the full plain-text report for a profile and its canonical
/// experience list. Missing or blank values render as "N/A".
pub fn format_report(profile: &Value, experiences: &[ExperienceRecord]) -> Result<String, AppError> {
    let data = unwrap_envelope(profile);
    if !data.is_object() {
        return Err(AppError::Validation(
            "profile must be a JSON object".to_string(),
        ));
    }

    let name = safe(name_field(data));
    let email = safe(contact_field(data, "email"));
    let phone = safe(contact_field(data, "phone"));
    let address = safe(address_field(data));
    let summary = safe(first_string(
        data,
        &["profile_summary", "summary", "professional_summary"],
    ));
    let skills = safe(skills_field(data));
    let experience_block = format_experience_section(experiences);
    let education_block = format_education_section(data);
    let technical = safe(
        heading_remainder(data, "skills_heading", "TECHNICAL SKILLS")
            .map(|rem| rem.split('\n').collect::<Vec<_>>().join(", ")),
    );
    let others = safe(heading_remainder(
        data,
        "others_heading",
        "ADDITIONAL INFORMATION",
    ));

    let mut out = String::new();
    out.push('\n');
    out.push_str(RULE_HEAVY);
    out.push_str("\n              Resume Information\n");
    out.push_str(RULE_HEAVY);
    out.push_str("\n\n");
    out.push_str(&format!("Name     : {name}\n"));
    out.push_str(&format!("Email    : {email}\n"));
    out.push_str(&format!("Phone    : {phone}\n"));
    out.push_str(&format!("Address  : {address}\n"));
    section(&mut out, "           Profile Summary", &summary);
    section(&mut out, "               Skills", &skills);
    section(&mut out, "             Experience", &experience_block);
    section(&mut out, "             Education", &education_block);
    section(&mut out, "          Technical Skills", &technical);
    section(&mut out, "      Languages & Certifications", &others);

    Ok(out)
}

fn section(out: &mut String, title: &str, body: &str) {
    out.push('\n');
    out.push_str(RULE_LIGHT);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE_LIGHT);
    out.push('\n');
    out.push_str(body);
    out.push('\n');
}

fn safe(value: Option<String>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => "N/A".to_string(),
    }
}

fn safe_str(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

/// `name` arrives either as `{"full_name": "..."}` or a plain string.
fn name_field(data: &Value) -> Option<String> {
    data.get("name").and_then(|name| {
        name.get("full_name")
            .and_then(coerce_string)
            .or_else(|| coerce_string(name))
    })
}

/// `email`/`phone` arrive either as `[{"email": "..."}]` or a plain string.
fn contact_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(|value| {
        value
            .get(0)
            .and_then(|entry| entry.get(key))
            .and_then(coerce_string)
            .or_else(|| coerce_string(value))
    })
}

fn address_field(data: &Value) -> Option<String> {
    let address = data.get("address")?;
    let parts: Vec<String> = ["city", "state", "country_code"]
        .iter()
        .filter_map(|k| address.get(*k).and_then(coerce_string))
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Skills land under `skills.overall_skills`, `skills`, or
/// `profile_summary_details.skills`, as an array or one string.
fn skills_field(data: &Value) -> Option<String> {
    let candidates = [
        data.get("skills").and_then(|s| s.get("overall_skills")),
        data.get("skills"),
        data.get("profile_summary_details").and_then(|d| d.get("skills")),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(|v| string_or_list(v, ", "))
        .find(|s| !s.is_empty())
}

/// Some parsers dump whole resume sections as one heading string; the body
/// is whatever remains after the literal section label is removed.
fn heading_remainder(data: &Value, key: &str, label: &str) -> Option<String> {
    let raw = data.get(key).and_then(Value::as_str)?;
    let remainder = raw.replace(label, "").trim().to_string();
    if remainder.is_empty() {
        None
    } else {
        Some(remainder)
    }
}

fn format_experience_section(experiences: &[ExperienceRecord]) -> String {
    if experiences.is_empty() {
        return "N/A".to_string();
    }
    experiences
        .iter()
        .map(format_experience_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_experience_entry(record: &ExperienceRecord) -> String {
    let role = safe_str(&record.role);
    let company = safe_str(&record.company_name);

    // Display start/end come from the combined range when the source gave
    // one, else from the discrete tokens carried on the record.
    let mut start = record.start.clone();
    let mut end = record.end.clone();
    if !record.date_range.is_empty() {
        let range = normalize_dashes(&record.date_range);
        let mut parts = range.split('-');
        if let Some(first) = parts.next() {
            start = first.trim().to_string();
        }
        if let Some(second) = parts.next() {
            end = second.trim().to_string();
        }
    }

    let is_current = record.is_current || is_present_marker(&end);
    let start_disp = if start.is_empty() {
        "Unknown"
    } else {
        start.as_str()
    };
    let end_disp = if is_current {
        "Present"
    } else if end.is_empty() {
        "Unknown"
    } else {
        end.as_str()
    };

    let duration = if start.is_empty() {
        String::new()
    } else {
        let end_expr = if is_current || end.is_empty() {
            None
        } else {
            Some(end.as_str())
        };
        duration_between(&start, end_expr)
    };
    let duration = if duration.is_empty() {
        "N/A".to_string()
    } else {
        duration
    };

    let details = safe_str(&collapse_whitespace(&record.description));

    format!(
        "• {role}\n  Company : {company}\n  Duration: {duration}\n  Years   : {start_disp} - {end_disp}\n  Details : {details}"
    )
}

fn format_education_section(data: &Value) -> String {
    let Some(entries) = data.get("education").and_then(Value::as_array) else {
        return "N/A".to_string();
    };
    if entries.is_empty() {
        return "N/A".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            let degree = safe(first_string(entry, &["degree", "degree_major"]));
            let course = safe(first_string(entry, &["course", "field"]));
            let institute = safe(first_string(
                entry,
                &["institute", "institution", "university"],
            ));
            let month = first_string(entry, &["to_month"]).unwrap_or_default();
            let year = first_string(entry, &["to_year"]).unwrap_or_default();
            format!("{degree} in {course} — {institute} ({month} {year})")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
