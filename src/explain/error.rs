//! Explanation stage error types.

use thiserror::Error;

/// Errors returned by the explanation stage.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// The generation model did not answer within the configured timeout.
    ///
    /// Retryable; the retrieval result it was asked to explain was sound.
    #[error("explanation generation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The generation provider failed.
    #[error("explanation generation failed: {reason}")]
    Provider { reason: String },

    /// The model answered with blank text.
    #[error("generation model returned empty text for '{title}'")]
    EmptyGeneration { title: String },

    /// A selected candidate no longer resolves to a catalog entry.
    #[error("selected candidate index {index} is not in the catalog")]
    MissingEntry { index: usize },
}
