use axum::http::{header, HeaderMap};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// One field-level violation, in the `{ value, msg, param, location }` shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub value: Value,
    pub msg: String,
    pub param: String,
    pub location: String,
}

impl FieldError {
    pub fn body(param: impl Into<String>, msg: impl Into<String>, value: Value) -> Self {
        Self {
            value,
            msg: msg.into(),
            param: param.into(),
            location: "body".to_string(),
        }
    }
}

/// Flatten validator output into a list ordered by field name
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                let value = err.params.get("value").cloned().unwrap_or(Value::Null);
                FieldError::body(field.clone(), msg, value)
            })
        })
        .collect();

    out.sort_by(|a, b| a.param.cmp(&b.param));
    out
}

/// Run the declared rules of a request body
pub fn validate_body<T: Validate>(body: &T) -> Result<(), ApiError> {
    body.validate()
        .map_err(|errors| ApiError::validation_error(field_errors(&errors)))
}

/// Decode a JSON request body.
///
/// A request without a JSON content type or with an empty body decodes to
/// `T::default()`, so its missing fields surface as field violations. Only
/// a body that is present but not parseable is a single body-level violation.
pub fn parse_json_body<T>(headers: &HeaderMap, body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::validation_error(vec![FieldError::body("body", "Invalid JSON body", Value::Null)])
    })
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// String field that treats null, arrays and objects as absent and
/// stringifies numbers and booleans
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(length(min = 1, message = "Body is required"))]
        body: String,
    }

    #[test]
    fn valid_body_passes() {
        let sample = Sample { name: "a".into(), body: "b".into() };
        assert!(validate_body(&sample).is_ok());
    }

    #[test]
    fn violations_are_listed_per_field_in_name_order() {
        let sample = Sample { name: String::new(), body: String::new() };
        let errors = match validate_body(&sample) {
            Err(ApiError::ValidationError(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        };

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].param, "body");
        assert_eq!(errors[0].msg, "Body is required");
        assert_eq!(errors[1].param, "name");
        assert_eq!(errors[1].msg, "Name is required");
        assert!(errors.iter().all(|e| e.location == "body"));
    }

    #[test]
    fn whitespace_counts_as_content() {
        let sample = Sample { name: " ".into(), body: "b".into() };
        assert!(validate_body(&sample).is_ok());
    }

    #[derive(Debug, Default, Deserialize, Validate)]
    struct Note {
        #[serde(default, deserialize_with = "lenient_string")]
        #[validate(required(message = "Note is required"), length(min = 1, message = "Note is required"))]
        note: Option<String>,
    }

    fn json_headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn null_and_structured_values_are_absent() {
        let headers = json_headers("application/json");
        for body in [r#"{"note": null}"#, r#"{"note": []}"#, r#"{"note": {}}"#, "{}"] {
            let note: Note = parse_json_body(&headers, body.as_bytes()).unwrap();
            assert_eq!(note.note, None, "body {}", body);
        }
    }

    #[test]
    fn scalars_are_stringified() {
        let headers = json_headers("application/json; charset=utf-8");
        let note: Note = parse_json_body(&headers, br#"{"note": 42}"#).unwrap();
        assert_eq!(note.note.as_deref(), Some("42"));
        let note: Note = parse_json_body(&headers, br#"{"note": false}"#).unwrap();
        assert_eq!(note.note.as_deref(), Some("false"));
    }

    #[test]
    fn missing_content_type_or_empty_body_decodes_to_default() {
        let note: Note = parse_json_body(&HeaderMap::new(), br#"{"note": "x"}"#).unwrap();
        assert_eq!(note.note, None);

        let note: Note = parse_json_body(&json_headers("application/json"), b"  ").unwrap();
        assert_eq!(note.note, None);
    }

    #[test]
    fn unparseable_body_is_a_single_body_violation() {
        let err = parse_json_body::<Note>(&json_headers("application/json"), b"{\"note\": ").unwrap_err();
        match err {
            ApiError::ValidationError(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].param, "body");
                assert_eq!(errors[0].msg, "Invalid JSON body");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn absent_and_empty_values_report_one_violation_each() {
        for note in [None, Some(String::new())] {
            let errors = match validate_body(&Note { note }) {
                Err(ApiError::ValidationError(errors)) => errors,
                other => panic!("expected validation error, got {:?}", other),
            };
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].param, "note");
            assert_eq!(errors[0].msg, "Note is required");
        }
    }
}
