//! Request body validation.
//!
//! Handlers take the body as raw JSON, run the rules that apply to each
//! field, and bail out with a 422 carrying every collected message, the same
//! shape as classic framework validators: `{"errors": {"field": ["msg"]}}`.
//! Rules distinguish between a field being absent, `null`, and present with
//! the wrong type, which is what partial updates need.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Per-field validation messages, in stable field order.
#[derive(Debug, Default, Serialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fail with a 422 if any message was collected.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

/// Validation rules. Each records messages into [`ValidationErrors`] and
/// leaves value extraction to [`extract`] once the body has passed. Rules
/// compose: `require_string` + `max_chars` is the equivalent of
/// `required|string|max:n`.
pub mod rules {
    use super::*;

    /// `required|string` — absent, null, empty, or non-string all fail.
    pub fn require_string(body: &Value, field: &str, errors: &mut ValidationErrors) {
        match body.get(field) {
            None | Some(Value::Null) => {
                errors.add(field, format!("The {field} field is required."));
            }
            Some(Value::String(s)) if s.is_empty() => {
                errors.add(field, format!("The {field} field is required."));
            }
            Some(Value::String(_)) => {}
            Some(_) => {
                errors.add(field, format!("The {field} field must be a string."));
            }
        }
    }

    /// `sometimes|string` — only checked when the key is present.
    pub fn optional_string(body: &Value, field: &str, errors: &mut ValidationErrors) {
        match body.get(field) {
            None | Some(Value::String(_)) => {}
            Some(_) => {
                errors.add(field, format!("The {field} field must be a string."));
            }
        }
    }

    /// `max:n`, counted in characters; only applies to present string values.
    pub fn max_chars(body: &Value, field: &str, max: usize, errors: &mut ValidationErrors) {
        if let Some(Value::String(s)) = body.get(field) {
            if s.chars().count() > max {
                errors.add(
                    field,
                    format!("The {field} field must not be greater than {max} characters."),
                );
            }
        }
    }

    /// `min:n`, counted in characters; only applies to present string values.
    pub fn min_chars(body: &Value, field: &str, min: usize, errors: &mut ValidationErrors) {
        if let Some(Value::String(s)) = body.get(field) {
            if !s.is_empty() && s.chars().count() < min {
                errors.add(
                    field,
                    format!("The {field} field must be at least {min} characters."),
                );
            }
        }
    }

    /// `required|string|email|max:255`
    pub fn require_email(body: &Value, field: &str, errors: &mut ValidationErrors) {
        require_string(body, field, errors);
        max_chars(body, field, 255, errors);
        if let Some(Value::String(s)) = body.get(field) {
            if !s.is_empty() && !looks_like_email(s) {
                errors.add(
                    field,
                    format!("The {field} field must be a valid email address."),
                );
            }
        }
    }

    /// `sometimes|boolean` — accepts true/false, 0/1, and their string forms.
    pub fn optional_bool(body: &Value, field: &str, errors: &mut ValidationErrors) {
        match body.get(field) {
            None | Some(Value::Null) => {}
            Some(v) if extract::truthy(v).is_some() => {}
            Some(_) => {
                errors.add(field, format!("The {field} field must be true or false."));
            }
        }
    }

    /// `sometimes|nullable|date` — `YYYY-MM-DD`.
    pub fn optional_date(body: &Value, field: &str, errors: &mut ValidationErrors) {
        match body.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => {
                if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                    errors.add(field, format!("The {field} field must be a valid date."));
                }
            }
            Some(_) => {
                errors.add(field, format!("The {field} field must be a valid date."));
            }
        }
    }

    /// `sometimes|array` with `string|max:n` elements.
    pub fn optional_string_array(
        body: &Value,
        field: &str,
        max_each: usize,
        errors: &mut ValidationErrors,
    ) {
        match body.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) if s.chars().count() <= max_each => {}
                        Value::String(_) => {
                            errors.add(
                                &format!("{field}.{i}"),
                                format!(
                                    "The {field}.{i} field must not be greater than {max_each} characters."
                                ),
                            );
                        }
                        _ => {
                            errors.add(
                                &format!("{field}.{i}"),
                                format!("The {field}.{i} field must be a string."),
                            );
                        }
                    }
                }
            }
            Some(_) => {
                errors.add(field, format!("The {field} field must be an array."));
            }
        }
    }

    pub fn looks_like_email(s: &str) -> bool {
        let Some((local, domain)) = s.split_once('@') else {
            return false;
        };
        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    }
}

/// Value extraction, used after the body has passed validation. Extractors
/// never panic; unexpected shapes simply come back as `None`.
pub mod extract {
    use super::*;

    pub fn string(body: &Value, field: &str) -> Option<String> {
        body.get(field).and_then(Value::as_str).map(str::to_string)
    }

    pub fn date(body: &Value, field: &str) -> Option<NaiveDate> {
        body.get(field)
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    pub fn boolean(body: &Value, field: &str) -> Option<bool> {
        body.get(field).and_then(truthy)
    }

    pub fn string_array(body: &Value, field: &str) -> Option<Vec<String>> {
        body.get(field).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }

    /// Flexible boolean reading: `true`, `1`, `"1"`, `"true"` and friends.
    pub fn truthy(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Some(true),
                "0" | "false" | "off" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Query-string boolean: anything unrecognised counts as false.
    pub fn query_bool(raw: &str) -> bool {
        matches!(
            raw.to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn require_string_collects_missing_empty_and_wrong_type() {
        let body = json!({ "empty": "", "num": 3, "null": null });
        let mut errors = ValidationErrors::default();
        rules::require_string(&body, "missing", &mut errors);
        rules::require_string(&body, "empty", &mut errors);
        rules::require_string(&body, "num", &mut errors);
        rules::require_string(&body, "null", &mut errors);
        assert!(errors.into_result().is_err());

        let mut errors = ValidationErrors::default();
        rules::require_string(&json!({ "title": "ok" }), "title", &mut errors);
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn length_rules_count_characters() {
        let body = json!({ "title": "x".repeat(256), "password": "short" });
        let mut errors = ValidationErrors::default();
        rules::max_chars(&body, "title", 255, &mut errors);
        rules::min_chars(&body, "password", 8, &mut errors);
        assert!(!errors.is_empty());

        let mut errors = ValidationErrors::default();
        rules::max_chars(&json!({ "title": "fine" }), "title", 255, &mut errors);
        rules::min_chars(&json!({ "password": "long enough" }), "password", 8, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn optional_rules_skip_absent_fields() {
        let body = json!({});
        let mut errors = ValidationErrors::default();
        rules::optional_string(&body, "title", &mut errors);
        rules::optional_bool(&body, "is_completed", &mut errors);
        rules::optional_date(&body, "due_date", &mut errors);
        rules::optional_string_array(&body, "tags", 255, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn date_rule_rejects_garbage() {
        let mut errors = ValidationErrors::default();
        rules::optional_date(&json!({ "due_date": "not-a-date" }), "due_date", &mut errors);
        assert!(!errors.is_empty());

        let mut errors = ValidationErrors::default();
        rules::optional_date(&json!({ "due_date": "2024-12-31" }), "due_date", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn email_rule() {
        assert!(rules::looks_like_email("pera@example.com"));
        assert!(!rules::looks_like_email("pera"));
        assert!(!rules::looks_like_email("@example.com"));
        assert!(!rules::looks_like_email("pera@nodot"));
    }

    #[test]
    fn truthy_accepts_flexible_booleans() {
        assert_eq!(extract::truthy(&json!(true)), Some(true));
        assert_eq!(extract::truthy(&json!(0)), Some(false));
        assert_eq!(extract::truthy(&json!("1")), Some(true));
        assert_eq!(extract::truthy(&json!("no")), Some(false));
        assert_eq!(extract::truthy(&json!("maybe")), None);
        assert_eq!(extract::truthy(&json!([1])), None);
    }

    #[test]
    fn query_bool_defaults_to_false() {
        assert!(extract::query_bool("true"));
        assert!(extract::query_bool("YES"));
        assert!(!extract::query_bool("false"));
        assert!(!extract::query_bool("whatever"));
    }

    #[test]
    fn tags_must_be_an_array_of_strings() {
        let mut errors = ValidationErrors::default();
        rules::optional_string_array(&json!({ "tags": "rust" }), "tags", 255, &mut errors);
        assert!(!errors.is_empty());

        let mut errors = ValidationErrors::default();
        rules::optional_string_array(&json!({ "tags": ["rust", 1] }), "tags", 255, &mut errors);
        assert!(!errors.is_empty());

        let mut errors = ValidationErrors::default();
        rules::optional_string_array(&json!({ "tags": ["rust", "work"] }), "tags", 255, &mut errors);
        assert!(errors.is_empty());
    }
}
