//! Aniko: a mood-driven anime recommendation pipeline.
//!
//! Given a free-text description of what a viewer is in the mood for (plus
//! optional genre/tone/length filters), the pipeline returns a short, ranked,
//! justified shortlist as one markdown block:
//!
//! query → [`Embedder`] → [`Retriever`] (over a frozen [`CatalogStore`]) →
//! [`Selector`] → [`ExplanationGenerator`] → markdown.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Environment-backed configuration
//! - [`CatalogStore`], [`CatalogEntry`], [`EpisodeLength`] - The frozen corpus
//! - [`RecommendationPipeline`], [`PipelineConfig`], [`PipelineError`] - Orchestration
//!
//! ## Stages
//! - [`Embedder`], [`EmbedderConfig`] - Query/synopsis encoding
//! - [`Retriever`], [`Candidate`], [`Retrieval`] - Filtered top-K retrieval
//! - [`Selector`] - Diversity-aware shortlist selection
//! - [`ExplanationGenerator`], [`ExplanationModel`], [`GenaiModel`] - Grounded
//!   justification generation
//!
//! ## Ingress/Egress
//! - [`Query`], [`QueryFilters`] - Typed query (plus the merged-string parser)
//! - [`Recommendation`], [`RecommendationResult`] - Final output
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod explain;
pub mod pipeline;
pub mod query;
pub mod ranking;
pub mod retrieval;

pub use catalog::{CatalogEntry, CatalogError, CatalogStore, EpisodeLength};
pub use config::{Config, ConfigError};
pub use embedding::{Embedder, EmbedderConfig, EmbeddingError};
pub use explain::{
    ExplainError, ExplanationGenerator, ExplanationModel, GenaiModel, Recommendation,
    RecommendationResult, build_prompt, template_justification,
};
#[cfg(any(test, feature = "mock"))]
pub use explain::MockExplanationModel;
pub use pipeline::{PipelineConfig, PipelineError, RecommendationPipeline};
pub use query::{Query, QueryFilters};
pub use ranking::Selector;
pub use retrieval::{Candidate, Retrieval, RetrievalError, Retriever, cosine_similarity};
