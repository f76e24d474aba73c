//! Engine error taxonomy
//!
//! Only caller contract violations are hard errors. Everything else -
//! failed evidence queries, rejected candidates, failed free-text analysis,
//! missing collections in an old saved session - degrades gracefully and is
//! surfaced through returned lists or statistics, never exceptions.

use thiserror::Error;

/// Fatal errors returned to callers
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed caller input; nothing was mutated
    #[error("Validation error: {0}")]
    Validation(String),

    /// A turn was submitted while a prior turn is still processing
    #[error("A turn is already being processed")]
    TurnInProgress,

    #[error("LLM error: {0}")]
    Llm(#[from] crate::llm::LlmError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A non-fatal failure of one external evidence query
///
/// Recorded and skipped; the pipeline continues with remaining queries.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExtractionFailure {
    pub query: String,
    pub message: String,
}

impl std::fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "query '{}' failed: {}", self.query, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = EngineError::Validation("trip_nights must be >= 1".to_string());
        assert!(err.to_string().contains("trip_nights"));
    }

    #[test]
    fn test_extraction_failure_display() {
        let failure = ExtractionFailure {
            query: "best surf todos santos".to_string(),
            message: "timed out".to_string(),
        };
        assert!(failure.to_string().contains("timed out"));
    }
}
