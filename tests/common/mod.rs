//! Shared fixtures for integration tests.

use std::sync::Arc;

use aniko::{
    CatalogEntry, CatalogStore, Embedder, EmbedderConfig, EpisodeLength, ExplanationModel,
    MockExplanationModel, RecommendationPipeline,
};

pub fn stub_embedder() -> Embedder {
    Embedder::load(EmbedderConfig::stub()).expect("stub embedder should load")
}

/// Builds an entry whose embedding is the stub encoding of `embed_text`.
///
/// Pointing `embed_text` at the exact query under test pins that entry to
/// cosine similarity 1.0, which makes ranking assertions exact.
pub fn embedded_entry(
    embedder: &Embedder,
    id: &str,
    title: &str,
    genres: &[&str],
    tones: &[&str],
    length: EpisodeLength,
    embed_text: &str,
) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        title: title.to_string(),
        synopsis: format!("{title} follows its lead through growth and change. More happens."),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        tones: tones.iter().map(|t| t.to_string()).collect(),
        episode_length: length,
        embedding: embedder.embed(embed_text).expect("fixture embedding"),
    }
}

pub const SLICE_OF_LIFE_QUERY: &str = "wholesome slice-of-life with strong character growth";

/// A small catalog where three slice-of-life titles are pinned to the
/// canonical query and the rest score arbitrarily (but deterministically).
pub fn mood_catalog() -> Arc<CatalogStore> {
    let embedder = stub_embedder();
    let entries = vec![
        embedded_entry(
            &embedder,
            "sol-1",
            "Gentle Days",
            &["Slice of Life"],
            &["Bittersweet"],
            EpisodeLength::Standard,
            SLICE_OF_LIFE_QUERY,
        ),
        embedded_entry(
            &embedder,
            "sol-2",
            "Harbor Lights",
            &["Slice of Life", "Drama"],
            &["Bittersweet"],
            EpisodeLength::Standard,
            SLICE_OF_LIFE_QUERY,
        ),
        embedded_entry(
            &embedder,
            "sol-3",
            "Bakery Corner",
            &["Slice of Life", "Comedy"],
            &["High-energy"],
            EpisodeLength::Short,
            SLICE_OF_LIFE_QUERY,
        ),
        embedded_entry(
            &embedder,
            "act-1",
            "Blade Vow",
            &["Action"],
            &["Epic"],
            EpisodeLength::Standard,
            "Blade Vow document",
        ),
        embedded_entry(
            &embedder,
            "hor-1",
            "Hollow Town",
            &["Horror"],
            &["Dark/Serious"],
            EpisodeLength::Long,
            "Hollow Town document",
        ),
        embedded_entry(
            &embedder,
            "rom-1",
            "Paper Cranes",
            &["Romance"],
            &["Bittersweet"],
            EpisodeLength::Standard,
            "Paper Cranes document",
        ),
    ];
    Arc::new(CatalogStore::from_entries(entries).expect("fixture catalog"))
}

/// Pipeline over [`mood_catalog`] with a canned explanation model.
pub fn canned_pipeline() -> RecommendationPipeline {
    let model: Arc<dyn ExplanationModel> =
        Arc::new(MockExplanationModel::canned("Matches the mood you described."));
    RecommendationPipeline::new(mood_catalog(), stub_embedder(), Some(model))
}

/// Pipeline over [`mood_catalog`] using the deterministic template fallback.
pub fn template_pipeline() -> RecommendationPipeline {
    RecommendationPipeline::new(mood_catalog(), stub_embedder(), None)
}
