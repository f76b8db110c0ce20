//! Helpers for reading loosely-shaped profile JSON.
//!
//! Upstream parsing services disagree on field names, wrap payloads in
//! envelopes, and emit strings where numbers are expected (and vice versa).
//! These accessors absorb that: every lookup is an ordered candidate-key
//! probe that coerces scalars to strings and treats empty as absent.

use serde_json::Value;

/// Some parsing services wrap their payload as `{"data": {...}}`.
/// Operate on the inner object when present, the value itself otherwise.
pub fn unwrap_envelope(profile: &Value) -> &Value {
    match profile.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => profile,
    }
}

/// Coerces a scalar JSON value to a string. Strings pass through, numbers
/// are rendered (`2020` → `"2020"`), everything else is absent.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Probes `obj` for the first key in `keys` holding a non-empty scalar.
pub fn first_string(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(coerce_string))
        .find(|s| !s.is_empty())
}

/// Accepts a string, or an array of scalars joined with `sep`.
/// Used for description-like fields that some sources emit as lists.
pub fn string_or_list(value: &Value, sep: &str) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(coerce_string).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(sep))
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_with_data_object() {
        let profile = json!({"data": {"name": "Jane"}});
        assert_eq!(unwrap_envelope(&profile).get("name"), Some(&json!("Jane")));
    }

    #[test]
    fn test_unwrap_envelope_without_data_key() {
        let profile = json!({"name": "Jane"});
        assert_eq!(unwrap_envelope(&profile).get("name"), Some(&json!("Jane")));
    }

    #[test]
    fn test_unwrap_envelope_ignores_non_object_data() {
        let profile = json!({"data": "raw string", "name": "Jane"});
        assert_eq!(unwrap_envelope(&profile).get("name"), Some(&json!("Jane")));
    }

    #[test]
    fn test_first_string_respects_key_priority() {
        let obj = json!({"title": "Dev", "role": "Engineer"});
        assert_eq!(
            first_string(&obj, &["role", "job_title", "title"]),
            Some("Engineer".to_string())
        );
    }

    #[test]
    fn test_first_string_skips_empty_values() {
        let obj = json!({"role": "", "title": "Dev"});
        assert_eq!(
            first_string(&obj, &["role", "job_title", "title"]),
            Some("Dev".to_string())
        );
    }

    #[test]
    fn test_first_string_coerces_numbers() {
        let obj = json!({"from_year": 2020});
        assert_eq!(
            first_string(&obj, &["from_year", "start_year"]),
            Some("2020".to_string())
        );
    }

    #[test]
    fn test_first_string_absent() {
        let obj = json!({"unrelated": true});
        assert_eq!(first_string(&obj, &["role", "title"]), None);
    }

    #[test]
    fn test_string_or_list_joins_arrays() {
        let v = json!(["Built APIs", "Led reviews"]);
        assert_eq!(
            string_or_list(&v, ", "),
            Some("Built APIs, Led reviews".to_string())
        );
    }

    #[test]
    fn test_string_or_list_rejects_objects() {
        assert_eq!(string_or_list(&json!({"a": 1}), ", "), None);
    }
}
