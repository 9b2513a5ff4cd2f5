//! Top-K retrieval over the catalog.
//!
//! Structured filters are a hard pre-filter: an entry that misses a specified
//! constraint never ranks, it is excluded outright. When the filtered set is
//! empty the retriever falls back to the unfiltered catalog and flags the
//! result as relaxed so downstream stages can say so.


use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{CatalogEntry, CatalogStore};
use crate::constants::DEFAULT_TOP_K;
use crate::query::QueryFilters;

/// Errors returned by retrieval.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Query vector does not match the catalog dimensionality.
    #[error("invalid query dimension: expected {expected}, got {actual}")]
    InvalidQueryDimension { expected: usize, actual: usize },
}

/// A catalog entry paired with its similarity to the query.
///
/// `index` is the entry's catalog position and the stable tie-break for equal
/// scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub score: f32,
}

/// Result of one retrieval pass.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Candidates sorted by similarity descending, at most K.
    pub candidates: Vec<Candidate>,
    /// True when the structured filters excluded everything and were dropped.
    pub filters_relaxed: bool,
}

/// Cosine-similarity scanner over the frozen catalog.
pub struct Retriever {
    store: Arc<CatalogStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self {
            store,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(store: Arc<CatalogStore>, top_k: usize) -> Self {
        Self { store, top_k }
    }

    /// Returns the top-K entries by cosine similarity, honoring filters.
    ///
    /// Sorted strictly non-increasing by score; ties break by catalog order.
    pub fn retrieve(
        &self,
        query: &[f32],
        filters: &QueryFilters,
    ) -> Result<Retrieval, RetrievalError> {
        if query.len() != self.store.embedding_dim() {
            return Err(RetrievalError::InvalidQueryDimension {
                expected: self.store.embedding_dim(),
                actual: query.len(),
            });
        }

        let matched: Vec<usize> = self
            .store
            .all()
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry_matches(entry, filters))
            .map(|(index, _)| index)
            .collect();

        let (pool, filters_relaxed) = if matched.is_empty() && !filters.is_empty() {
            warn!(
                genres = ?filters.genres,
                tone = ?filters.tone,
                episode_length = ?filters.episode_length,
                "Filters excluded every entry, relaxing to full catalog"
            );
            ((0..self.store.len()).collect(), true)
        } else {
            (matched, false)
        };

        let mut candidates: Vec<Candidate> = pool
            .into_iter()
            .map(|index| Candidate {
                index,
                score: cosine_similarity(query, &self.store.all()[index].embedding),
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });
        candidates.truncate(self.top_k);

        debug!(
            candidates = candidates.len(),
            filters_relaxed, "Retrieval complete"
        );

        Ok(Retrieval {
            candidates,
            filters_relaxed,
        })
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

/// Hard filter check. Unset fields impose no constraint; string comparisons
/// are case-insensitive.
pub fn entry_matches(entry: &CatalogEntry, filters: &QueryFilters) -> bool {
    if !filters.genres.is_empty() {
        let wanted_genre = filters.genres.iter().any(|wanted| {
            entry
                .genres
                .iter()
                .any(|genre| genre.eq_ignore_ascii_case(wanted))
        });
        if !wanted_genre {
            return false;
        }
    }

    if let Some(ref tone) = filters.tone {
        let has_tone = entry.tones.iter().any(|t| t.eq_ignore_ascii_case(tone));
        if !has_tone {
            return false;
        }
    }

    if let Some(length) = filters.episode_length {
        if entry.episode_length != length {
            return false;
        }
    }

    true
}

/// Cosine similarity of two vectors; 0.0 for mismatched or empty inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
