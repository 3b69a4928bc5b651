//! Error types for notekeep.

use thiserror::Error;

/// Result type alias using notekeep's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notekeep operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No note with this id exists for the caller
    #[error("Note not found")]
    NoteNotFound,

    /// The note id is not well-formed
    #[error("Invalid note ID: {0}")]
    InvalidIdentifier(String),

    /// One or more fields violate their constraints.
    ///
    /// Holds one message per violation, in field order.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a validation error from a single message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(vec![msg.into()])
    }

    /// True for failures caused by the caller's input rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NoteNotFound | Error::InvalidIdentifier(_) | Error::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_note_not_found() {
        assert_eq!(Error::NoteNotFound.to_string(), "Note not found");
    }

    #[test]
    fn test_error_display_invalid_identifier() {
        let err = Error::InvalidIdentifier("abc".to_string());
        assert_eq!(err.to_string(), "Invalid note ID: abc");
    }

    #[test]
    fn test_error_display_validation_joins_messages() {
        let err = Error::Validation(vec![
            "Title is required".to_string(),
            "Content is required".to_string(),
        ]);
        assert_eq!(err.to_string(), "Title is required, Content is required");
    }

    #[test]
    fn test_validation_helper_single_message() {
        match Error::validation("page must be >= 1") {
            Error::Validation(msgs) => assert_eq!(msgs, vec!["page must be >= 1".to_string()]),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing DATABASE_URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing DATABASE_URL");
    }

    #[test]
    fn test_is_client_error() {
        assert!(Error::NoteNotFound.is_client_error());
        assert!(Error::InvalidIdentifier("x".into()).is_client_error());
        assert!(Error::validation("bad").is_client_error());
        assert!(!Error::Internal("boom".into()).is_client_error());
        assert!(!Error::Database(sqlx::Error::RowNotFound).is_client_error());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
