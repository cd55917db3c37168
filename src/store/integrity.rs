//! Structural checks on persisted profile records.
//!
//! A record that passes these checks is safe to decode; one that fails is
//! reported as [`StoreError::Integrity`] and never retried.

use serde_json::{Map, Value};

use crate::error::StoreError;

const SECTIONS: [&str; 5] = ["personal", "career", "skills", "mindset", "progress"];

const ARRAY_FIELDS: [(&str, &str); 9] = [
    ("career", "goals"),
    ("career", "interests"),
    ("career", "challenges"),
    ("skills", "current"),
    ("skills", "learning"),
    ("skills", "target"),
    ("mindset", "concerns"),
    ("progress", "completed_actions"),
    ("progress", "milestones"),
];

const NUMBER_FIELDS: [(&str, &str); 3] = [
    ("personal", "years_of_experience"),
    ("mindset", "confidence_level"),
    ("mindset", "motivation_level"),
];

/// Check a stored profile record's shape before decoding it.
pub fn check_profile(key: &str, record: &Value) -> Result<(), StoreError> {
    let fail = |reason: String| StoreError::Integrity {
        record: format!("profile {key}"),
        reason,
    };

    let root = record
        .as_object()
        .ok_or_else(|| fail(format!("expected an object, found {}", kind(record))))?;

    match root.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => {}
        Some(other) => return Err(fail(format!("id must be a non-empty string, found {}", kind(other)))),
        None => return Err(fail("missing required field id".to_string())),
    }

    for section in SECTIONS {
        section_of(root, section).map_err(&fail)?;
    }

    for (section, field) in ARRAY_FIELDS {
        let value = section_of(root, section).map_err(&fail)?.get(field);
        match value {
            Some(Value::Array(_)) => {}
            Some(other) => return Err(fail(format!("{section}.{field} must be an array, found {}", kind(other)))),
            None => return Err(fail(format!("missing required field {section}.{field}"))),
        }
    }

    for (section, field) in NUMBER_FIELDS {
        let value = section_of(root, section).map_err(&fail)?.get(field);
        match value {
            Some(Value::Number(_)) => {}
            Some(other) => return Err(fail(format!("{section}.{field} must be a number, found {}", kind(other)))),
            None => return Err(fail(format!("missing required field {section}.{field}"))),
        }
    }

    Ok(())
}

fn section_of<'a>(root: &'a Map<String, Value>, section: &str) -> Result<&'a Map<String, Value>, String> {
    match root.get(section) {
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(format!("{section} must be an object, found {}", kind(other))),
        None => Err(format!("missing required field {section}")),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UserProfile;

    fn valid() -> Value {
        serde_json::to_value(UserProfile::new("u1")).unwrap()
    }

    fn reason(result: Result<(), StoreError>) -> String {
        match result {
            Err(StoreError::Integrity { reason, .. }) => reason,
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn serialized_profile_passes() {
        assert!(check_profile("u1", &valid()).is_ok());
    }

    #[test]
    fn non_object_fails() {
        assert!(reason(check_profile("u1", &Value::String("oops".into()))).contains("object"));
    }

    #[test]
    fn missing_section_fails() {
        let mut record = valid();
        record.as_object_mut().unwrap().remove("skills");
        assert_eq!(reason(check_profile("u1", &record)), "missing required field skills");
    }

    #[test]
    fn scalar_where_array_expected_fails() {
        let mut record = valid();
        record["career"]["goals"] = Value::String("become rich".into());
        assert_eq!(
            reason(check_profile("u1", &record)),
            "career.goals must be an array, found string"
        );
    }

    #[test]
    fn wrong_number_type_fails() {
        let mut record = valid();
        record["mindset"]["confidence_level"] = Value::Bool(true);
        assert!(reason(check_profile("u1", &record)).contains("mindset.confidence_level"));
    }

    #[test]
    fn blank_id_fails() {
        let mut record = valid();
        record["id"] = Value::String(" ".into());
        assert!(reason(check_profile("u1", &record)).contains("id"));
    }

    #[test]
    fn integrity_errors_are_not_recoverable() {
        let err = check_profile("u1", &Value::Null).unwrap_err();
        assert!(!err.is_recoverable());
    }
}
