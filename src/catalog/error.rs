//! Catalog error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by catalog loading and snapshot building.
///
/// Any `Corrupt*` variant means the snapshot is rejected wholesale; the store
/// never loads a partial catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Snapshot file could not be read.
    #[error("failed to read catalog snapshot '{path}': {source}")]
    Io {
        /// Snapshot path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not valid JSON for the expected schema.
    #[error("failed to parse catalog snapshot '{path}': {source}")]
    Parse {
        /// Snapshot path.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot contained no entries.
    #[error("corrupt catalog: snapshot contains no entries")]
    CorruptEmpty,

    /// An entry is missing a required field.
    #[error("corrupt catalog: entry '{id}' has an empty required field '{field}'")]
    CorruptMissingField {
        /// Entry id (or its position when the id itself is missing).
        id: String,
        /// Field name.
        field: &'static str,
    },

    /// Two entries share the same id.
    #[error("corrupt catalog: duplicate entry id '{id}'")]
    CorruptDuplicateId { id: String },

    /// An entry's embedding does not match the catalog dimensionality.
    #[error(
        "corrupt catalog: entry '{id}' has embedding dimension {actual}, expected {expected}"
    )]
    CorruptEmbeddingDimension {
        id: String,
        expected: usize,
        actual: usize,
    },

    /// Snapshot building failed while embedding an entry.
    #[error("failed to embed entry '{id}': {source}")]
    Embedding {
        id: String,
        #[source]
        source: crate::embedding::EmbeddingError,
    },

    /// Snapshot file could not be written.
    #[error("failed to write catalog snapshot '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be serialized.
    #[error("failed to serialize catalog snapshot '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
