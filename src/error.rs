//! Error types for bhub.

use thiserror::Error;

/// Common error type for bhub.
#[derive(Error, Debug)]
pub enum BhubError {
    /// Database error.
    ///
    /// Generic database error wrapping failures from any backend.
    /// Errors from sqlx are converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Feed fetching or parsing error.
    #[error("feed error: {0}")]
    Feed(String),

    /// Upstream feed timed out.
    #[error("feed timeout: {0}")]
    FeedTimeout(String),

    /// Embedding provider error.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for BhubError {
    fn from(e: sqlx::Error) -> Self {
        BhubError::Database(e.to_string())
    }
}

/// Result type alias for bhub operations.
pub type Result<T> = std::result::Result<T, BhubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = BhubError::Auth("invalid password".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid password");
    }

    #[test]
    fn test_permission_error_display() {
        let err = BhubError::Permission("admin access required".to_string());
        assert_eq!(err.to_string(), "permission denied: admin access required");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = BhubError::NotFound("article".to_string());
        assert_eq!(err.to_string(), "article not found");
    }

    #[test]
    fn test_feed_error_display() {
        let err = BhubError::Feed("parse failure".to_string());
        assert_eq!(err.to_string(), "feed error: parse failure");
    }

    #[test]
    fn test_feed_timeout_display() {
        let err = BhubError::FeedTimeout("https://example.com/feed.xml".to_string());
        assert!(err.to_string().contains("feed timeout"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BhubError = io_err.into();
        assert!(matches!(err, BhubError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(BhubError::Validation("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
