//! Search index error types.
//!
//! This module defines the error types that can occur during search index operations.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., malformed index URL).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The request never produced a response (refused connection, timeout).
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The index answered with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    StatusError {
        operation: String,
        status: u16,
        body: String,
    },

    /// Failed to parse a response from the index.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize documents for the index.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a status error for the named operation.
    pub fn status(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::StatusError {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }

    /// Whether repeating the same request could succeed (transient failures).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) => true,
            Self::StatusError { status, .. } => *status == 429 || *status >= 500,
            Self::ValidationError(_)
            | Self::ParseError(_)
            | Self::SerializationError(_)
            | Self::BatchSizeExceeded { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(SearchIndexError::connection("refused").is_retryable());
        assert!(SearchIndexError::status("commit", 503, "").is_retryable());
        assert!(SearchIndexError::status("commit", 429, "").is_retryable());
        assert!(!SearchIndexError::status("add-field", 400, "bad").is_retryable());
        assert!(!SearchIndexError::parse("eof").is_retryable());
        assert!(!SearchIndexError::batch_size_exceeded(10, 5).is_retryable());
    }

    #[test]
    fn test_status_error_message() {
        let err = SearchIndexError::status("delete-all", 404, "core not found");
        assert_eq!(
            err.to_string(),
            "delete-all failed with status 404: core not found"
        );
    }
}
