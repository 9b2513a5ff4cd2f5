//! Anime catalog: the frozen corpus the pipeline recommends from.
//!
//! A snapshot is built offline (see [`builder`]), loaded once at startup, and
//! never mutated afterwards; concurrent readers need no locking.

pub mod builder;
pub mod error;


pub use error::CatalogError;

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Coarse episode-length bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeLength {
    /// Under ~15 minutes.
    Short,
    /// The usual ~24 minutes.
    Standard,
    /// 45 minutes and up.
    Long,
}

impl EpisodeLength {
    /// Parses the UI label form (`"Short (<15m)"`, `"Standard (24m)"`,
    /// `"Long (45m+)"`) as well as the bare bucket name, case-insensitively.
    pub fn parse_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_ascii_lowercase();
        if lower.starts_with("short") {
            Some(Self::Short)
        } else if lower.starts_with("standard") {
            Some(Self::Standard)
        } else if lower.starts_with("long") {
            Some(Self::Long)
        } else {
            None
        }
    }
}

impl fmt::Display for EpisodeLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Short => "Short (<15m)",
            Self::Standard => "Standard (24m)",
            Self::Long => "Long (45m+)",
        };
        f.write_str(label)
    }
}

/// One anime title with its metadata and precomputed embedding.
///
/// Immutable after load. Every embedding in a store was produced by the same
/// encoder version; vectors from mismatched encoders are never compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique id.
    pub id: String,
    pub title: String,
    pub synopsis: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Tone tags (e.g. `Epic`, `Dark/Serious`, `Bittersweet`).
    #[serde(default)]
    pub tones: Vec<String>,
    pub episode_length: EpisodeLength,
    pub embedding: Vec<f32>,
}

impl CatalogEntry {
    /// Text surface used to embed this entry when building a snapshot.
    ///
    /// Kept in one place so the builder and any re-indexing tooling agree.
    pub fn embedding_text(
        title: &str,
        synopsis: &str,
        genres: &[String],
        tones: &[String],
    ) -> String {
        let mut text = format!("{title}. {synopsis}");
        if !genres.is_empty() {
            text.push_str(" Genres: ");
            text.push_str(&genres.join(", "));
            text.push('.');
        }
        if !tones.is_empty() {
            text.push_str(" Tone: ");
            text.push_str(&tones.join(", "));
            text.push('.');
        }
        text
    }
}

/// Ordered, read-only collection of [`CatalogEntry`], keyed by id.
///
/// Entry order is the snapshot order and serves as the stable tie-break for
/// equal similarity scores downstream.
#[derive(Debug)]
pub struct CatalogStore {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<String, usize>,
    embedding_dim: usize,
}

impl CatalogStore {
    /// Loads and validates a snapshot. All-or-nothing: any invalid entry
    /// rejects the whole snapshot.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);
        let entries: Vec<CatalogEntry> =
            serde_json::from_reader(reader).map_err(|e| CatalogError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        let store = Self::from_entries(entries)?;

        info!(
            path = %path.display(),
            entries = store.len(),
            embedding_dim = store.embedding_dim(),
            "Catalog snapshot loaded"
        );

        Ok(store)
    }

    /// Builds a store from in-memory entries, validating required fields,
    /// id uniqueness, and embedding dimensionality.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::CorruptEmpty);
        }

        let embedding_dim = entries[0].embedding.len();
        let mut by_id = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let id_for_report = || {
                if entry.id.trim().is_empty() {
                    format!("#{index}")
                } else {
                    entry.id.clone()
                }
            };

            if entry.id.trim().is_empty() {
                return Err(CatalogError::CorruptMissingField {
                    id: id_for_report(),
                    field: "id",
                });
            }
            if entry.title.trim().is_empty() {
                return Err(CatalogError::CorruptMissingField {
                    id: id_for_report(),
                    field: "title",
                });
            }
            if entry.synopsis.trim().is_empty() {
                return Err(CatalogError::CorruptMissingField {
                    id: id_for_report(),
                    field: "synopsis",
                });
            }
            if entry.embedding.is_empty() || entry.embedding.len() != embedding_dim {
                return Err(CatalogError::CorruptEmbeddingDimension {
                    id: entry.id.clone(),
                    expected: embedding_dim,
                    actual: entry.embedding.len(),
                });
            }

            if by_id.insert(entry.id.clone(), index).is_some() {
                return Err(CatalogError::CorruptDuplicateId {
                    id: entry.id.clone(),
                });
            }
        }

        Ok(Self {
            entries,
            by_id,
            embedding_dim,
        })
    }

    /// All entries, in snapshot order.
    pub fn all(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entry by id.
    pub fn by_id(&self, id: &str) -> Option<&CatalogEntry> {
        self.by_id.get(id).map(|&index| &self.entries[index])
    }

    /// Entry by catalog position.
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality shared by every embedding in this store.
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}
