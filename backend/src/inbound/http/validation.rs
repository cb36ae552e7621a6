//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure is an `invalid_request` error whose details name
//! the offending camelCase field and a stable reason code.

use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::domain::{Error, MoodMode, SettingsValidationError};

/// Reason codes raised by the adapter itself rather than the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidMode,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidMode => "invalid_mode",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(message: impl Into<String>, field: &str, code: &str, value: Option<&str>) -> Error {
    let mut details = Map::new();
    details.insert("field".to_owned(), json!(field));
    if let Some(value) = value {
        details.insert("value".to_owned(), json!(value));
    }
    details.insert("code".to_owned(), json!(code));
    Error::invalid_request(message).with_details(Value::Object(details))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        format!("missing required field: {field}"),
        field,
        ErrorCode::MissingField.as_str(),
        None,
    )
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let field = field.as_str();
        field_error(
            format!("{field} must be a valid UUID"),
            field,
            ErrorCode::InvalidUuid.as_str(),
            Some(value),
        )
    })
}

/// Parse an optional mode token; unknown tokens fail with `Invalid mode`.
pub(crate) fn parse_optional_mode(value: Option<&str>) -> Result<Option<MoodMode>, Error> {
    value
        .map(|raw| {
            raw.parse::<MoodMode>().map_err(|_| {
                field_error(
                    "Invalid mode",
                    "mode",
                    ErrorCode::InvalidMode.as_str(),
                    Some(raw),
                )
            })
        })
        .transpose()
}

/// Translate a domain settings validation failure, echoing the raw value
/// when there is a single one to echo.
pub(crate) fn settings_validation_error(error: &SettingsValidationError, value: Option<&str>) -> Error {
    field_error(error.to_string(), error.field(), &error.code(), value)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::Tone;

    #[rstest]
    fn missing_field_names_the_field() {
        let err = missing_field_error(FieldName::new("tone"));

        assert_eq!(err.message(), "missing required field: tone");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "tone", "code": "missing_field" }))
        );
    }

    #[rstest]
    #[case::absent(None, Ok(None))]
    #[case::zen(Some("zen"), Ok(Some(MoodMode::Zen)))]
    #[case::warrior(Some("warrior"), Ok(Some(MoodMode::Warrior)))]
    fn optional_mode_parses_known_tokens(
        #[case] raw: Option<&str>,
        #[case] expected: Result<Option<MoodMode>, ()>,
    ) {
        assert_eq!(parse_optional_mode(raw).map_err(|_| ()), expected);
    }

    #[rstest]
    fn unknown_mode_is_rejected_with_details() {
        let err = parse_optional_mode(Some("sleepy")).expect_err("unknown mode");

        assert_eq!(err.message(), "Invalid mode");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "mode", "value": "sleepy", "code": "invalid_mode" }))
        );
    }

    #[rstest]
    fn malformed_uuid_echoes_value() {
        let err = parse_uuid("card-1", FieldName::new("cardId")).expect_err("bad uuid");

        assert_eq!(err.details().and_then(|d| d.get("value")), Some(&json!("card-1")));
    }

    #[rstest]
    fn settings_errors_keep_domain_reason() {
        let domain = SettingsValidationError::from("loud".parse::<Tone>().expect_err("bad tone"));
        let err = settings_validation_error(&domain, Some("loud"));

        assert_eq!(err.message(), "Invalid tone");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "tone", "value": "loud", "code": "invalid_tone" }))
        );
    }
}
