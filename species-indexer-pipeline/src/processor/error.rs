//! Malformed record errors.

use thiserror::Error;

/// A catalog record that cannot be turned into a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Malformed record {record}: {reason}")]
pub struct MalformedRecordError {
    /// Identifies the record (catalog id, or name when the id is missing).
    pub record: String,
    pub reason: String,
}

impl MalformedRecordError {
    pub fn new(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            reason: reason.into(),
        }
    }
}
