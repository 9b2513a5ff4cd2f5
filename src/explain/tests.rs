use super::*;
use crate::catalog::{CatalogEntry, CatalogStore, EpisodeLength};
use crate::query::{Query, QueryFilters};
use crate::retrieval::Candidate;

fn entry(id: &str, title: &str, genres: &[&str]) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        title: title.to_string(),
        synopsis: format!("{title} follows a healer in a quiet village. Things change."),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        tones: vec!["Bittersweet".to_string()],
        episode_length: EpisodeLength::Standard,
        embedding: vec![1.0, 0.0],
    }
}

fn test_store() -> CatalogStore {
    CatalogStore::from_entries(vec![
        entry("a", "Quiet Healer", &["Slice of Life", "Fantasy"]),
        entry("b", "Loud Mecha", &["Mecha"]),
    ])
    .unwrap()
}

fn test_query() -> Query {
    Query::new(
        "wholesome slice-of-life",
        QueryFilters {
            genres: vec!["Slice of Life".to_string()],
            ..Default::default()
        },
    )
}

fn selection() -> Vec<Candidate> {
    vec![
        Candidate { index: 0, score: 0.9 },
        Candidate { index: 1, score: 0.4 },
    ]
}

#[test]
fn test_build_prompt_contains_only_entry_facts() {
    let store = test_store();
    let prompt = build_prompt(&test_query(), store.get(0).unwrap());

    assert!(prompt.contains("Quiet Healer"));
    assert!(prompt.contains("Slice of Life, Fantasy"));
    assert!(prompt.contains("wholesome slice-of-life"));
    assert!(!prompt.contains("Loud Mecha"));
}

#[test]
fn test_template_justification_is_grounded_and_nonempty() {
    let store = test_store();
    let text = template_justification(&test_query(), store.get(0).unwrap());

    assert!(!text.trim().is_empty());
    assert!(text.contains("Quiet Healer"));
    assert!(text.contains("Slice of Life"));
    assert!(text.contains("you asked for"));
}

#[test]
fn test_template_justification_without_genres() {
    let query = Query::new("anything", QueryFilters::default());
    let mut bare = entry("x", "Bare Title", &[]);
    bare.genres.clear();

    let text = template_justification(&query, &bare);

    assert!(text.starts_with("Bare Title matches the mood"));
}

#[tokio::test]
async fn test_explain_with_template_fallback() {
    let store = test_store();
    let generator = ExplanationGenerator::new(None);

    let result = generator
        .explain(&test_query(), &selection(), &store, false)
        .await
        .expect("template explain should succeed");

    assert_eq!(result.recommendations.len(), 2);
    assert_eq!(result.recommendations[0].rank, 1);
    assert_eq!(result.recommendations[1].rank, 2);
    assert_eq!(result.titles(), vec!["Quiet Healer", "Loud Mecha"]);
    for rec in &result.recommendations {
        assert!(!rec.justification.trim().is_empty());
    }
}

#[tokio::test]
async fn test_explain_with_mock_model() {
    let store = test_store();
    let model: std::sync::Arc<dyn ExplanationModel> =
        std::sync::Arc::new(MockExplanationModel::canned("A strong match for your request."));
    let generator = ExplanationGenerator::new(Some(model));

    let result = generator
        .explain(&test_query(), &selection(), &store, true)
        .await
        .unwrap();

    assert!(result.filters_relaxed);
    assert_eq!(
        result.recommendations[0].justification,
        "A strong match for your request."
    );
}

#[tokio::test]
async fn test_explain_times_out() {
    let store = test_store();
    let model: std::sync::Arc<dyn ExplanationModel> = std::sync::Arc::new(
        MockExplanationModel::slow(std::time::Duration::from_millis(200)),
    );
    let generator = ExplanationGenerator::new(Some(model))
        .with_timeout(std::time::Duration::from_millis(10));

    let result = generator
        .explain(&test_query(), &selection(), &store, false)
        .await;

    assert!(matches!(result, Err(ExplainError::Timeout { .. })));
}

#[tokio::test]
async fn test_explain_propagates_provider_failure() {
    let store = test_store();
    let model: std::sync::Arc<dyn ExplanationModel> =
        std::sync::Arc::new(MockExplanationModel::failing());
    let generator = ExplanationGenerator::new(Some(model));

    let result = generator
        .explain(&test_query(), &selection(), &store, false)
        .await;

    assert!(matches!(result, Err(ExplainError::Provider { .. })));
}

#[tokio::test]
async fn test_explain_rejects_blank_generation() {
    let store = test_store();
    let model: std::sync::Arc<dyn ExplanationModel> =
        std::sync::Arc::new(MockExplanationModel::canned("   "));
    let generator = ExplanationGenerator::new(Some(model));

    let result = generator
        .explain(&test_query(), &selection(), &store, false)
        .await;

    assert!(matches!(result, Err(ExplainError::EmptyGeneration { .. })));
}

#[tokio::test]
async fn test_explain_rejects_missing_entry() {
    let store = test_store();
    let generator = ExplanationGenerator::new(None);
    let bad_selection = vec![Candidate { index: 99, score: 0.5 }];

    let result = generator
        .explain(&test_query(), &bad_selection, &store, false)
        .await;

    assert!(matches!(result, Err(ExplainError::MissingEntry { index: 99 })));
}

#[test]
fn test_markdown_rendering() {
    let result = RecommendationResult {
        query: test_query(),
        recommendations: vec![Recommendation {
            entry_id: "a".to_string(),
            title: "Quiet Healer".to_string(),
            rank: 1,
            genres: vec!["Slice of Life".to_string()],
            tones: vec!["Bittersweet".to_string()],
            episode_length: EpisodeLength::Standard,
            justification: "A calm, grounded pick.".to_string(),
        }],
        filters_relaxed: false,
    };

    let markdown = result.to_markdown();

    assert!(markdown.contains("### 1. Quiet Healer"));
    assert!(markdown.contains("**Genres:** Slice of Life"));
    assert!(markdown.contains("**Tone:** Bittersweet"));
    assert!(markdown.contains("**Length:** Standard (24m)"));
    assert!(markdown.contains("A calm, grounded pick."));
    assert!(!markdown.contains("relaxed"));
}

#[test]
fn test_markdown_mentions_relaxed_filters() {
    let result = RecommendationResult {
        query: test_query(),
        recommendations: vec![],
        filters_relaxed: true,
    };

    let markdown = result.to_markdown();

    assert!(markdown.contains("filters were relaxed"));
    assert!(markdown.contains("No recommendations found"));
}
