//! HTTP error mapping.
//!
//! Client-caused failures carry their message to the caller. Store and other
//! server failures are logged in full and answered with a generic message
//! naming only the operation that failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use notekeep_core::logging::SUBSYSTEM;
use serde_json::json;

/// API error returned by handlers and extractors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    TooManyRequests(String),
    /// Server-side failure while performing `action` (e.g. "fetching notes").
    #[error("Server error while {action}: {source}")]
    Internal {
        action: &'static str,
        #[source]
        source: notekeep_core::Error,
    },
}

impl ApiError {
    /// Classify a core error, using `action` in the message if it is a
    /// server-side failure.
    pub fn from_core(err: notekeep_core::Error, action: &'static str) -> Self {
        use notekeep_core::Error;
        if !err.is_client_error() {
            return ApiError::Internal {
                action,
                source: err,
            };
        }
        match err {
            Error::NoteNotFound => ApiError::NotFound(err.to_string()),
            Error::InvalidIdentifier(_) => ApiError::BadRequest("Invalid note ID".to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the client.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal { action, .. } => format!("Server error while {}", action),
            other => other.to_string(),
        }
    }
}

impl From<notekeep_core::Error> for ApiError {
    fn from(err: notekeep_core::Error) -> Self {
        ApiError::from_core(err, "processing request")
    }
}

/// Attach the failing operation to a core result.
pub trait ResultExt<T> {
    fn during(self, action: &'static str) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for notekeep_core::Result<T> {
    fn during(self, action: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_core(e, action))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { action, source } = &self {
            tracing::error!({ SUBSYSTEM } = "api", error = %source, "Server error while {}", action);
        }

        let body = Json(json!({
            "success": false,
            "message": self.public_message(),
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notekeep_core::Error;

    #[test]
    fn test_validation_maps_to_bad_request_with_all_messages() {
        let err = ApiError::from_core(
            Error::Validation(vec!["Title is required".into(), "Content is required".into()]),
            "creating note",
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.public_message(),
            "Title is required, Content is required"
        );
    }

    #[test]
    fn test_invalid_identifier_maps_to_bad_request() {
        let err = ApiError::from_core(Error::InvalidIdentifier("zzz".into()), "fetching note");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Invalid note ID");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from_core(Error::NoteNotFound, "fetching note");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Note not found");
    }

    #[test]
    fn test_store_failure_hides_detail() {
        let err = ApiError::from_core(
            Error::Database(sqlx::Error::PoolTimedOut),
            "fetching notes",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Server error while fetching notes");
    }

    #[test]
    fn test_internal_error_maps_to_500() {
        let err = ApiError::from_core(
            Error::Internal("negative count".into()),
            "fetching statistics",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Server error while fetching statistics");
    }

    #[test]
    fn test_payload_too_large_is_413() {
        let err = ApiError::PayloadTooLarge("Request body is too large".into());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
