//! Final shortlist selection.
//!
//! Primarily similarity-ranked, with one diversity rule: no two selected
//! titles may share an identical genre set while alternatives remain in the
//! candidate pool. Near-duplicate franchises (same genre fingerprint) would
//! otherwise crowd the whole shortlist.


use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::CatalogStore;
use crate::constants::DEFAULT_TOP_N;
use crate::retrieval::Candidate;

/// Reduces retrieval candidates to the final top-N shortlist.
pub struct Selector {
    store: Arc<CatalogStore>,
    top_n: usize,
}

impl Selector {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self {
            store,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(store: Arc<CatalogStore>, top_n: usize) -> Self {
        Self { store, top_n }
    }

    /// Picks at most N candidates, preferring higher similarity and distinct
    /// genre sets.
    ///
    /// Every returned candidate comes from the input; when fewer than N
    /// candidates exist they are all returned, never padded. Expects the
    /// input sorted by score descending (retrieval order).
    pub fn select(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        let mut selected: Vec<Candidate> = Vec::with_capacity(self.top_n);
        let mut passed_over: Vec<Candidate> = Vec::new();
        let mut seen_genre_sets: Vec<BTreeSet<String>> = Vec::new();

        for &candidate in candidates {
            if selected.len() == self.top_n {
                break;
            }

            let Some(entry) = self.store.get(candidate.index) else {
                continue;
            };
            let genre_set: BTreeSet<String> = entry
                .genres
                .iter()
                .map(|g| g.to_ascii_lowercase())
                .collect();

            if seen_genre_sets.contains(&genre_set) {
                passed_over.push(candidate);
                continue;
            }

            seen_genre_sets.push(genre_set);
            selected.push(candidate);
        }

        // Diversity is a preference, not a quota: refill from the passed-over
        // candidates when the pool ran out of distinct genre sets.
        for candidate in passed_over {
            if selected.len() == self.top_n {
                break;
            }
            selected.push(candidate);
        }

        selected.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });

        debug!(
            pool = candidates.len(),
            selected = selected.len(),
            "Shortlist selected"
        );

        selected
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }
}
