//! Final recommendation types and markdown rendering.

use serde::Serialize;

use crate::catalog::EpisodeLength;
use crate::query::Query;

/// One recommended title with its rank and grounded justification.
///
/// Carries the key attributes so rendering needs no catalog access.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub entry_id: String,
    pub title: String,
    /// 1-based position in the shortlist.
    pub rank: usize,
    pub genres: Vec<String>,
    pub tones: Vec<String>,
    pub episode_length: EpisodeLength,
    pub justification: String,
}

/// Ordered shortlist returned by the pipeline. Immutable once produced.
#[derive(Debug, Clone)]
pub struct RecommendationResult {
    pub query: Query,
    /// At most N recommendations, in rank order.
    pub recommendations: Vec<Recommendation>,
    /// True when structured filters had to be dropped during retrieval.
    pub filters_relaxed: bool,
}

impl RecommendationResult {
    /// Renders the single markdown block the presentation layer displays.
    ///
    /// Deterministic given the recommendations; all wording variability lives
    /// in the justifications themselves.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        if self.filters_relaxed {
            out.push_str(
                "_No titles matched every filter exactly, so the filters were relaxed to find the closest picks._\n\n",
            );
        }

        if self.recommendations.is_empty() {
            out.push_str("No recommendations found for this request.\n");
            return out;
        }

        for rec in &self.recommendations {
            out.push_str(&format!("### {}. {}\n", rec.rank, rec.title));

            let mut attributes: Vec<String> = Vec::new();
            if !rec.genres.is_empty() {
                attributes.push(format!("**Genres:** {}", rec.genres.join(", ")));
            }
            if !rec.tones.is_empty() {
                attributes.push(format!("**Tone:** {}", rec.tones.join(", ")));
            }
            attributes.push(format!("**Length:** {}", rec.episode_length));
            out.push_str(&attributes.join(" | "));
            out.push_str("\n\n");

            out.push_str(rec.justification.trim());
            out.push_str("\n\n");
        }

        out.trim_end().to_string()
    }

    /// Titles in rank order (handy for tests and logging).
    pub fn titles(&self) -> Vec<&str> {
        self.recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect()
    }
}
