/*
[INPUT]:  Raw JSON bodies from the auth API
[OUTPUT]: The uniform success/message/data/errors response wrapper
[POS]:    HTTP layer - envelope parsing and field-error access
[UPDATE]: When the server's envelope contract changes
*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Uniform response wrapper returned by every auth endpoint.
///
/// `success = true` implies `data` carries the endpoint's payload;
/// `success = false` implies `message` is user-displayable and `errors`,
/// if present, is keyed by form field.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiEnvelope<T> {
    /// First error message recorded for a field, if any.
    pub fn first_error(&self, field: &str) -> Option<&str> {
        self.errors.as_ref().and_then(|e| e.first_for(field))
    }

    /// User-displayable failure message, preferring the envelope's `message`.
    pub fn failure_message(&self, fallback: &str) -> String {
        if self.message.is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        }
    }
}

/// Field-keyed validation errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(pub HashMap<String, FieldErrorValue>);

impl FieldErrors {
    /// First message recorded for `field`.
    pub fn first_for(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(FieldErrorValue::first)
    }

    /// Flatten to one message per field, for direct form binding.
    pub fn flatten(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.first().map(|m| (k.clone(), m.to_string())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A field error as the server sends it: a bare string, a list of strings,
/// or a nested field map (serializer errors for compound fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldErrorValue {
    One(String),
    Many(Vec<String>),
    Nested(HashMap<String, FieldErrorValue>),
}

impl FieldErrorValue {
    /// First message in the value, descending into nested maps.
    pub fn first(&self) -> Option<&str> {
        match self {
            FieldErrorValue::One(s) => Some(s.as_str()),
            FieldErrorValue::Many(v) => v.first().map(String::as_str),
            FieldErrorValue::Nested(m) => m.values().find_map(FieldErrorValue::first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"email": "Enter a valid email address."}"#, "Enter a valid email address.")]
    #[case(r#"{"email": ["Enter a valid email address.", "Required."]}"#, "Enter a valid email address.")]
    #[case(r#"{"email": {"detail": ["Enter a valid email address."]}}"#, "Enter a valid email address.")]
    fn field_error_first_unwraps_all_shapes(#[case] json: &str, #[case] expected: &str) {
        let errors: FieldErrors = serde_json::from_str(json).unwrap();
        assert_eq!(errors.first_for("email"), Some(expected));
    }

    #[test]
    fn envelope_parses_failure_without_data() {
        let body = r#"{
            "success": false,
            "message": "Login failed",
            "errors": {"non_field_errors": ["Invalid credentials"]}
        }"#;
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(body).unwrap();

        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(
            envelope.first_error("non_field_errors"),
            Some("Invalid credentials")
        );
        assert_eq!(envelope.failure_message("fallback"), "Login failed");
    }

    #[test]
    fn envelope_failure_message_falls_back_when_empty() {
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(envelope.failure_message("fallback"), "fallback");
    }

    #[test]
    fn flatten_takes_first_message_per_field() {
        let json = r#"{"email": ["a", "b"], "password": "c"}"#;
        let errors: FieldErrors = serde_json::from_str(json).unwrap();
        let flat = errors.flatten();
        assert_eq!(flat.get("email").map(String::as_str), Some("a"));
        assert_eq!(flat.get("password").map(String::as_str), Some("c"));
    }
}
