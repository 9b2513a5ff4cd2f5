//! Pipeline orchestrator: one `recommend` call from query string to markdown.
//!
//! The pipeline owns no mutable state between calls; the only shared piece is
//! the frozen [`CatalogStore`] behind an `Arc`, so concurrent calls are
//! independent and order-insensitive. The single suspension point is the
//! explanation model call, bounded by a timeout.

pub mod error;


pub use error::PipelineError;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::catalog::CatalogStore;
use crate::constants::{DEFAULT_GENERATION_TIMEOUT_SECS, DEFAULT_TOP_K, DEFAULT_TOP_N};
use crate::embedding::Embedder;
use crate::explain::{ExplanationGenerator, ExplanationModel, RecommendationResult};
use crate::query::Query;
use crate::ranking::Selector;
use crate::retrieval::Retriever;

/// Tunables owned by the orchestrator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Candidates retrieved before selection.
    pub top_k: usize,
    /// Titles in the final shortlist.
    pub top_n: usize,
    /// Timeout for a single explanation-model call.
    pub generation_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            top_n: DEFAULT_TOP_N,
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }
}

/// The recommendation pipeline: encode, retrieve, select, explain.
pub struct RecommendationPipeline {
    store: Arc<CatalogStore>,
    embedder: Embedder,
    retriever: Retriever,
    selector: Selector,
    explainer: ExplanationGenerator,
}

impl RecommendationPipeline {
    /// Builds a pipeline with default tunables. `model` is the optional
    /// generation capability; `None` selects template justifications.
    pub fn new(
        store: Arc<CatalogStore>,
        embedder: Embedder,
        model: Option<Arc<dyn ExplanationModel>>,
    ) -> Self {
        Self::with_config(store, embedder, model, PipelineConfig::default())
    }

    pub fn with_config(
        store: Arc<CatalogStore>,
        embedder: Embedder,
        model: Option<Arc<dyn ExplanationModel>>,
        config: PipelineConfig,
    ) -> Self {
        let retriever = Retriever::with_top_k(Arc::clone(&store), config.top_k);
        let selector = Selector::with_top_n(Arc::clone(&store), config.top_n);
        let explainer = ExplanationGenerator::new(model).with_timeout(config.generation_timeout);

        Self {
            store,
            embedder,
            retriever,
            selector,
            explainer,
        }
    }

    /// The sole ingress the presentation layer uses: merged query string in,
    /// rendered markdown out. All-or-nothing per call.
    pub async fn recommend(&self, raw_query: &str) -> Result<String, PipelineError> {
        // Guard before any catalog or encoder work.
        if raw_query.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        let query = Query::parse(raw_query);
        let result = self.recommend_query(query).await?;
        Ok(result.to_markdown())
    }

    /// Structured twin of [`recommend`](Self::recommend); preferred for
    /// callers that already hold typed filters.
    pub async fn recommend_query(
        &self,
        query: Query,
    ) -> Result<RecommendationResult, PipelineError> {
        if query.text.trim().is_empty() && query.filters.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        debug!(
            text = %query.text,
            genres = ?query.filters.genres,
            "Pipeline run starting"
        );

        let query_vector = self.embedder.embed(&query.enriched_text())?;
        let retrieval = self.retriever.retrieve(&query_vector, &query.filters)?;
        let selection = self.selector.select(&retrieval.candidates);

        let result = self
            .explainer
            .explain(&query, &selection, &self.store, retrieval.filters_relaxed)
            .await?;

        info!(
            titles = ?result.titles(),
            filters_relaxed = result.filters_relaxed,
            "Pipeline run complete"
        );

        Ok(result)
    }

    /// The frozen catalog this pipeline serves from.
    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }
}
