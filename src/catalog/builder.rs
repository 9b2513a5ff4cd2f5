//! Offline snapshot builder.
//!
//! Reads a raw corpus file (entries without embeddings), embeds each entry's
//! text surface, and writes the snapshot JSON that [`CatalogStore::load`]
//! consumes. Run via `aniko index <corpus.json> <catalog.json>`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::{CatalogEntry, CatalogError, CatalogStore, EpisodeLength};
use crate::embedding::Embedder;

/// One raw corpus record, before embedding.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCatalogEntry {
    pub id: String,
    pub title: String,
    pub synopsis: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tones: Vec<String>,
    pub episode_length: EpisodeLength,
}

/// Embeds a raw corpus and writes the snapshot. Returns the entry count.
///
/// The output is validated through [`CatalogStore::from_entries`] before
/// anything is written, so a corrupt corpus never produces a snapshot.
pub fn build_snapshot<P: AsRef<Path>, Q: AsRef<Path>>(
    corpus_path: P,
    snapshot_path: Q,
    embedder: &Embedder,
) -> Result<usize, CatalogError> {
    let corpus_path = corpus_path.as_ref();
    let snapshot_path = snapshot_path.as_ref();

    let file = File::open(corpus_path).map_err(|e| CatalogError::Io {
        path: corpus_path.to_path_buf(),
        source: e,
    })?;
    let raw: Vec<RawCatalogEntry> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| CatalogError::Parse {
            path: corpus_path.to_path_buf(),
            source: e,
        })?;

    info!(
        corpus = %corpus_path.display(),
        entries = raw.len(),
        "Embedding corpus entries"
    );

    let mut entries = Vec::with_capacity(raw.len());
    for record in raw {
        let text = CatalogEntry::embedding_text(
            &record.title,
            &record.synopsis,
            &record.genres,
            &record.tones,
        );
        let embedding = embedder
            .embed(&text)
            .map_err(|e| CatalogError::Embedding {
                id: record.id.clone(),
                source: e,
            })?;

        debug!(id = %record.id, dim = embedding.len(), "Entry embedded");

        entries.push(CatalogEntry {
            id: record.id,
            title: record.title,
            synopsis: record.synopsis,
            genres: record.genres,
            tones: record.tones,
            episode_length: record.episode_length,
            embedding,
        });
    }

    // Validate before writing, same rules as load.
    let store = CatalogStore::from_entries(entries)?;

    let out = File::create(snapshot_path).map_err(|e| CatalogError::Write {
        path: snapshot_path.to_path_buf(),
        source: e,
    })?;
    serde_json::to_writer(BufWriter::new(out), store.all()).map_err(|e| {
        CatalogError::Serialize {
            path: snapshot_path.to_path_buf(),
            source: e,
        }
    })?;

    info!(
        snapshot = %snapshot_path.display(),
        entries = store.len(),
        embedding_dim = store.embedding_dim(),
        "Catalog snapshot written"
    );

    Ok(store.len())
}
