use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use culinary_core::error::DocumentStoreError;

use crate::validation::ValidationErrors;

/// Errors surfaced by the request router.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The payload or a query parameter failed validation. Nothing was written.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The store is not connected or an operation on it failed.
    #[error("Database not available: {0}")]
    StorageUnavailable(String),

    /// A document could not be converted on its way to or from the store.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<DocumentStoreError> for ApiError {
    fn from(err: DocumentStoreError) -> Self {
        if err.is_unavailable() {
            ApiError::StorageUnavailable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

const DATA_ERROR_PREFIX: &str = "target type: ";
const MISSING_FIELD: &str = "missing field `";

/// A `serde_path_to_error` path such as `title`, `tags[0]` or `b[0].y`.
fn is_path(candidate: &str) -> bool {
    !candidate.is_empty() && candidate != "." && !candidate.contains(char::is_whitespace)
}

/// Recovers the failing field from an axum JSON data error.
///
/// axum renders the `serde_path_to_error` path before the serde message, except at the
/// document root:
///
/// - ``...target type: title: invalid type: integer `42`, expected a string at line 1 column 11``
/// - ``...target type: missing field `video_url` at line 1 column 20``
/// - ``...target type: b[0]: missing field `y` at line 1 column 23``
fn rejected_field(message: &str) -> Option<String> {
    let detail = message
        .split_once(DATA_ERROR_PREFIX)
        .map_or(message, |(_, detail)| detail);

    let (path, serde_message) = match detail.split_once(": ") {
        Some((path, rest)) if is_path(path) => (Some(path), rest),
        _ => (None, detail),
    };

    let missing = serde_message
        .strip_prefix(MISSING_FIELD)
        .and_then(|rest| rest.split_once('`'))
        .map(|(field, _)| field);

    match (path, missing) {
        (Some(path), Some(field)) => Some(format!("{path}.{field}")),
        (Some(path), None) => Some(path.to_string()),
        (None, Some(field)) => Some(field.to_string()),
        (None, None) => None,
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let field = match &rejection {
            JsonRejection::JsonDataError(_) => rejected_field(&message),
            _ => None,
        };

        ApiError::Validation(ValidationErrors::single(
            field.unwrap_or_else(|| "body".to_string()),
            message,
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "error": "Validation failed",
                    "fields": errors,
                }),
            ),
            ApiError::StorageUnavailable(_) => {
                tracing::error!(error = %self, "storage failure");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    serde_json::json!({ "error": self.to_string() }),
                )
            }
            ApiError::Internal(_) => {
                tracing::error!(error = %self, "document conversion failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": self.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

    fn field_of(detail: &str) -> Option<String> {
        rejected_field(&format!("{PREFIX}{detail}"))
    }

    #[test]
    fn names_missing_top_level_field() {
        assert_eq!(
            field_of("missing field `video_url` at line 1 column 20").as_deref(),
            Some("video_url")
        );
    }

    #[test]
    fn names_field_with_wrong_type() {
        assert_eq!(
            field_of("title: invalid type: integer `42`, expected a string at line 1 column 11").as_deref(),
            Some("title")
        );
        assert_eq!(
            field_of("title: invalid type: null, expected a string at line 1 column 13").as_deref(),
            Some("title")
        );
        assert_eq!(
            field_of("tags: invalid type: string \"vegan\", expected a sequence at line 1 column 16").as_deref(),
            Some("tags")
        );
    }

    #[test]
    fn names_nested_paths() {
        assert_eq!(
            field_of("tags[1]: invalid type: integer `3`, expected a string at line 1 column 18").as_deref(),
            Some("tags[1]")
        );
        assert_eq!(
            field_of("b[0]: missing field `y` at line 1 column 23").as_deref(),
            Some("b[0].y")
        );
    }

    #[test]
    fn root_type_errors_have_no_field() {
        assert_eq!(field_of("invalid type: sequence, expected struct Recipe at line 1 column 0"), None);
    }

    #[test]
    fn connectivity_errors_become_unavailable() {
        let err = ApiError::from(DocumentStoreError::StorageUnavailable("no store connection".into()));
        assert!(matches!(err, ApiError::StorageUnavailable(_)));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from(DocumentStoreError::Initialization("bad dsn".into()));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn conversion_errors_are_internal() {
        let err = ApiError::from(DocumentStoreError::InvalidDocument("no ObjectId".into()));
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(DocumentStoreError::Serialization("bad date".into()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_are_client_errors() {
        let err = ApiError::from(ValidationErrors::single("email", "value is not a valid email address"));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
