//! Fetch error types.

use thiserror::Error;

/// Errors returned by a catalog fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Timeout, connection failure, 5xx or 429. Worth retrying.
    #[error("Transient failure fetching {path}: {reason}")]
    Transient { path: String, reason: String },

    /// Any other 4xx, or a body that is not JSON. Retrying cannot help.
    #[error("Permanent failure fetching {path}: {reason}")]
    Permanent { path: String, reason: String },
}

impl FetchError {
    /// Create a transient error.
    pub fn transient(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transient {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a permanent error.
    pub fn permanent(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Permanent {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Short label used in logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transient { .. } => "transient",
            Self::Permanent { .. } => "permanent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let transient = FetchError::transient("pokemon/25", "status 503");
        let permanent = FetchError::permanent("pokemon/99999", "status 404");

        assert!(transient.is_transient());
        assert!(!permanent.is_transient());
        assert_eq!(permanent.kind(), "permanent");
        assert_eq!(
            transient.to_string(),
            "Transient failure fetching pokemon/25: status 503"
        );
    }
}
