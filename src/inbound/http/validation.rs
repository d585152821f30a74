//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{Error, ProjectId};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_uuid",
    }))
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be an RFC 3339 timestamp")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_timestamp",
    }))
}

pub(crate) fn parse_project_id(value: &str, field: FieldName) -> Result<ProjectId, Error> {
    ProjectId::parse(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|stamp| stamp.with_timezone(&Utc))
                .map_err(|_| invalid_timestamp_error(field, &raw))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use serde_json::Value;

    #[test]
    fn invalid_uuid_error_carries_field_and_value() {
        let error = parse_project_id("nope", FieldName::new("project_id")).expect_err("rejects");
        let details = error.details().expect("details present");
        assert_eq!(details.get("field").and_then(Value::as_str), Some("project_id"));
        assert_eq!(details.get("value").and_then(Value::as_str), Some("nope"));
    }

    #[test]
    fn optional_timestamp_accepts_absence() {
        let parsed = parse_optional_rfc3339_timestamp(None, FieldName::new("date"))
            .expect("absent is fine");
        assert!(parsed.is_none());
    }

    #[test]
    fn optional_timestamp_rejects_garbage() {
        let error =
            parse_optional_rfc3339_timestamp(Some("yesterday".to_owned()), FieldName::new("date"))
                .expect_err("rejects");
        let details = error.details().expect("details present");
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("invalid_timestamp")
        );
    }
}
