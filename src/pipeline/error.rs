//! Pipeline error taxonomy.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::embedding::EmbeddingError;
use crate::explain::ExplainError;
use crate::retrieval::RetrievalError;

/// Single error surface for `recommend` calls.
///
/// Catalog failures are fatal at startup (no catalog, no recommendations);
/// everything else is per-call and leaves no partial state behind.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The trimmed query text was empty. Caller should re-prompt.
    #[error("query is empty")]
    EmptyQuery,

    /// Catalog snapshot could not be loaded or was corrupt.
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    /// The query could not be vectorized.
    #[error("query encoding failed: {0}")]
    Encoding(#[from] EmbeddingError),

    /// Retrieval rejected the query vector.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Explanation generation failed or timed out.
    #[error("explanation generation failed: {0}")]
    Generation(#[from] ExplainError),
}

impl PipelineError {
    /// True for failures worth retrying (possibly with backoff); catalog
    /// corruption and empty queries are not among them.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PipelineError::Encoding(_)
                | PipelineError::Generation(
                    ExplainError::Timeout { .. } | ExplainError::Provider { .. }
                )
        )
    }
}
