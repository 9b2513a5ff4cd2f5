//! Grounded explanation generation.
//!
//! The only stage allowed to be non-deterministic. The model dependency is a
//! narrow injected capability ([`ExplanationModel`]); with no model configured
//! the generator falls back to a deterministic metadata template, so retrieval
//! and ranking stay testable in isolation either way.

pub mod error;
pub mod prompt;
pub mod result;

#[cfg(test)]
mod tests;

pub use error::ExplainError;
pub use prompt::{SYSTEM_PROMPT, build_prompt};
pub use result::{Recommendation, RecommendationResult};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogEntry, CatalogStore};
use crate::constants::DEFAULT_GENERATION_TIMEOUT_SECS;
use crate::query::Query;
use crate::retrieval::Candidate;

/// Narrow generation capability: one prompt in, one justification out.
#[async_trait]
pub trait ExplanationModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ExplainError>;
}

/// [`ExplanationModel`] backed by a genai chat provider.
pub struct GenaiModel {
    client: Client,
    model: String,
}

impl GenaiModel {
    /// Creates a model handle for a provider model id (e.g. `gpt-4o-mini`).
    /// Provider credentials come from the environment, as genai resolves them.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ExplanationModel for GenaiModel {
    async fn generate(&self, prompt: &str) -> Result<String, ExplainError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| ExplainError::Provider {
                reason: e.to_string(),
            })?;

        response
            .first_text()
            .map(|text| text.to_string())
            .ok_or_else(|| ExplainError::Provider {
                reason: "provider returned no text content".to_string(),
            })
    }
}

/// Deterministic test double for the generation model.
#[cfg(any(test, feature = "mock"))]
pub struct MockExplanationModel {
    response: String,
    delay: Option<Duration>,
    fail: bool,
}

#[cfg(any(test, feature = "mock"))]
impl MockExplanationModel {
    /// Always answers with `response`.
    pub fn canned(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            delay: None,
            fail: false,
        }
    }

    /// Sleeps for `delay` before answering (for timeout tests).
    pub fn slow(delay: Duration) -> Self {
        Self {
            response: "slow answer".to_string(),
            delay: Some(delay),
            fail: false,
        }
    }

    /// Always fails with a provider error.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            delay: None,
            fail: true,
        }
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl ExplanationModel for MockExplanationModel {
    async fn generate(&self, _prompt: &str) -> Result<String, ExplainError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ExplainError::Provider {
                reason: "mock provider failure".to_string(),
            });
        }
        Ok(self.response.clone())
    }
}

/// Turns a selected shortlist into a [`RecommendationResult`].
pub struct ExplanationGenerator {
    model: Option<Arc<dyn ExplanationModel>>,
    timeout: Duration,
}

impl ExplanationGenerator {
    /// With `None` the generator uses the deterministic metadata template.
    pub fn new(model: Option<Arc<dyn ExplanationModel>>) -> Self {
        if model.is_none() {
            warn!("No generation model configured, using template justifications");
        }
        Self {
            model,
            timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Produces one justified recommendation per selected candidate, in rank
    /// order. All-or-nothing: any model failure fails the whole stage rather
    /// than returning a partial shortlist.
    pub async fn explain(
        &self,
        query: &Query,
        selection: &[Candidate],
        store: &CatalogStore,
        filters_relaxed: bool,
    ) -> Result<RecommendationResult, ExplainError> {
        let mut recommendations = Vec::with_capacity(selection.len());

        for (position, candidate) in selection.iter().enumerate() {
            let entry = store
                .get(candidate.index)
                .ok_or(ExplainError::MissingEntry {
                    index: candidate.index,
                })?;

            let justification = match &self.model {
                Some(model) => self.generate_justification(query, entry, model).await?,
                None => template_justification(query, entry),
            };

            recommendations.push(Recommendation {
                entry_id: entry.id.clone(),
                title: entry.title.clone(),
                rank: position + 1,
                genres: entry.genres.clone(),
                tones: entry.tones.clone(),
                episode_length: entry.episode_length,
                justification,
            });
        }

        info!(
            count = recommendations.len(),
            filters_relaxed, "Explanations generated"
        );

        Ok(RecommendationResult {
            query: query.clone(),
            recommendations,
            filters_relaxed,
        })
    }

    async fn generate_justification(
        &self,
        query: &Query,
        entry: &CatalogEntry,
        model: &Arc<dyn ExplanationModel>,
    ) -> Result<String, ExplainError> {
        let prompt = build_prompt(query, entry);
        debug!(title = %entry.title, prompt_len = prompt.len(), "Requesting justification");

        let generated = tokio::time::timeout(self.timeout, model.generate(&prompt))
            .await
            .map_err(|_| ExplainError::Timeout {
                seconds: self.timeout.as_secs(),
            })??;

        let generated = generated.trim();
        if generated.is_empty() {
            return Err(ExplainError::EmptyGeneration {
                title: entry.title.clone(),
            });
        }

        Ok(generated.to_string())
    }
}

/// Deterministic fallback justification built from the entry's own metadata.
///
/// Same grounding contract as the model path: only facts from the entry and
/// the query appear.
pub fn template_justification(query: &Query, entry: &CatalogEntry) -> String {
    let mut text = if entry.genres.is_empty() {
        format!("{} matches the mood of your request.", entry.title)
    } else {
        format!("{} is a {} pick", entry.title, entry.genres.join(" / "))
    };

    if !entry.genres.is_empty() {
        if !entry.tones.is_empty() {
            text.push_str(&format!(
                " with a {} feel",
                entry.tones.join(", ").to_ascii_lowercase()
            ));
        }
        text.push('.');
    }

    text.push(' ');
    text.push_str(first_sentence(&entry.synopsis));

    let matched_genres: Vec<&String> = entry
        .genres
        .iter()
        .filter(|genre| {
            query
                .filters
                .genres
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(genre))
        })
        .collect();
    if !matched_genres.is_empty() {
        let names: Vec<&str> = matched_genres.iter().map(|g| g.as_str()).collect();
        text.push_str(&format!(
            " It covers the {} you asked for.",
            names.join(" and ")
        ));
    }

    text
}

fn first_sentence(synopsis: &str) -> &str {
    let trimmed = synopsis.trim();
    match trimmed.find(". ") {
        Some(pos) => &trimmed[..=pos],
        None => trimmed,
    }
}
