//! Error types for content-hub search.

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for content-hub operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input, rejected before any data-store access.
    ///
    /// `field` names the offending request parameter when there is one.
    #[error("Invalid input: {message}")]
    InvalidInput {
        field: Option<String>,
        message: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Invalid input attributed to a named request field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Invalid input with no specific field.
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: None,
            message: message.into(),
        }
    }

    /// True for errors the caller caused (bad parameters).
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_field() {
        let err = Error::invalid_field("format", "Must be one of: json, csv");
        assert_eq!(err.to_string(), "Invalid input: Must be one of: json, csv");
        match err {
            Error::InvalidInput { field, .. } => assert_eq!(field.as_deref(), Some("format")),
            _ => panic!("Expected InvalidInput"),
        }
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("unknown search mode".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown search mode");
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::invalid("bad").is_validation());
        assert!(!Error::Internal("boom".to_string()).is_validation());
        assert!(!Error::Database(sqlx::Error::RowNotFound).is_validation());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("Serialization error:"));
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: Error = sqlx::Error::PoolTimedOut.into();
        assert!(err.to_string().starts_with("Database error:"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
