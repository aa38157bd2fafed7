//! Request parsing helpers shared by the route handlers.

use axum::{Json, extract::rejection::JsonRejection};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::types::{Id, is_blank};

/// Parse a numeric path parameter; anything else is a 400 naming the entity.
pub(crate) fn parse_id(raw: &str, entity: &str) -> ApiResult<Id> {
    raw.trim()
        .parse::<Id>()
        .map_err(|_| ApiError::invalid_id(entity))
}

/// Unwrap a JSON body, turning axum's rejection into a 400 with our error shape.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::invalid_body(rejection.body_text()))
}

/// A required text field: missing or blank is a 400 "`what` is required".
pub(crate) fn required_text(value: Option<String>, what: &str) -> ApiResult<String> {
    match value {
        Some(text) if !is_blank(&text) => Ok(text),
        _ => Err(ApiError::missing_field(what)),
    }
}

/// An optional text field that must not be blank when present.
pub(crate) fn non_empty_text(value: Option<String>, what: &str) -> ApiResult<Option<String>> {
    match value {
        Some(text) if is_blank(&text) => Err(ApiError::empty_field(what)),
        other => Ok(other),
    }
}

/// Distinguish an explicit `null` from an absent field.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: absent stays
/// `None`, `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body returned by every successful DELETE.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl DeleteResponse {
    pub(crate) fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn parse_id_accepts_integers() {
        assert_eq!(parse_id("42", "board").unwrap(), 42);
        assert_eq!(parse_id(" 7 ", "task").unwrap(), 7);
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        let err = parse_id("abc", "column").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidId);
        assert_eq!(err.message, "Invalid column ID");
        assert!(parse_id("12abc", "column").is_err());
        assert!(parse_id("", "column").is_err());
    }

    #[test]
    fn required_text_rejects_missing_and_blank() {
        assert!(required_text(None, "Board name").is_err());
        assert!(required_text(Some("   ".into()), "Board name").is_err());
        assert_eq!(required_text(Some("Ops".into()), "Board name").unwrap(), "Ops");
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
    }

    #[test]
    fn nullable_separates_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.note, None);

        let null: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(null.note, Some(None));

        let set: Patch = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(set.note, Some(Some("hi".to_string())));
    }

    #[test]
    fn non_empty_text_allows_absent() {
        assert_eq!(non_empty_text(None, "Task title").unwrap(), None);
        assert!(non_empty_text(Some(String::new()), "Task title").is_err());
    }
}
