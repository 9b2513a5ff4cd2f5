//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary values from these rather than repeating literals
//! across modules; every stage of the pipeline must agree on the embedding
//! dimension, and the snapshot loader rejects catalogs that disagree.

/// Embedding dimension of the default encoder (jina-embeddings-v2-small-en).
pub const DEFAULT_EMBEDDING_DIM: usize = 512;

/// Max tokens fed to the encoder per text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 1024;

/// Candidates pulled from the catalog before final selection.
///
/// Larger than the final shortlist so the selector has room to diversify.
pub const DEFAULT_TOP_K: usize = 15;

/// Titles in the final shortlist.
pub const DEFAULT_TOP_N: usize = 3;

/// Timeout for a single explanation-model call, in seconds.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;
