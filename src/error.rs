//! Error types for filedepot.

use thiserror::Error;

/// Common error type for filedepot.
#[derive(Error, Debug)]
pub enum DepotError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Upload exceeds the per-file limit or the owner's remaining quota.
    #[error("file size exceeded: {size_mb:.2}MB over limit of {limit_mb:.2}MB")]
    PayloadTooLarge {
        /// Size accumulated when the limit was hit, in megabytes.
        size_mb: f64,
        /// The limit that was exceeded, in megabytes.
        limit_mb: f64,
    },

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The upload stream could not be read.
    #[error("upload error: {0}")]
    Upload(String),

    /// Resource already exists.
    #[error("{0} already exists")]
    Conflict(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The deferred task worker is no longer accepting work.
    #[error("deferred task queue is closed")]
    TaskQueueClosed,
}

impl From<sqlx::Error> for DepotError {
    fn from(e: sqlx::Error) -> Self {
        DepotError::Database(e.to_string())
    }
}

/// Result type alias for filedepot operations.
pub type Result<T> = std::result::Result<T, DepotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_display() {
        let err = DepotError::NotFound("user".to_string());
        assert_eq!(err.to_string(), "user not found");
    }

    #[test]
    fn test_payload_too_large_display() {
        let err = DepotError::PayloadTooLarge {
            size_mb: 5.5,
            limit_mb: 5.0,
        };
        assert_eq!(
            err.to_string(),
            "file size exceeded: 5.50MB over limit of 5.00MB"
        );
    }

    #[test]
    fn test_conflict_error_display() {
        let err = DepotError::Conflict("user".to_string());
        assert_eq!(err.to_string(), "user already exists");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DepotError = io_err.into();
        assert!(matches!(err, DepotError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: DepotError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DepotError::Database(_)));
    }

    #[test]
    fn test_task_queue_closed_display() {
        assert_eq!(
            DepotError::TaskQueueClosed.to_string(),
            "deferred task queue is closed"
        );
    }
}
