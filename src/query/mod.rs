//! Typed queries and the merged-string ingress form.
//!
//! The front-end flattens free text and sidebar filters into one delimited
//! string (`"free text | Genres: a, b | Tone: x | Episode length: y"`).
//! [`Query::parse`] undoes that merge at the boundary so retrieval filters on
//! typed data, while [`Query::enriched_text`] re-merges for the encoder so
//! both ingress forms embed identically.


use crate::catalog::EpisodeLength;

/// Segment separator used by the presentation layer.
pub const FILTER_SEPARATOR: &str = " | ";
/// Prefix of the genre filter segment.
pub const GENRES_PREFIX: &str = "Genres:";
/// Prefix of the tone filter segment.
pub const TONE_PREFIX: &str = "Tone:";
/// Prefix of the episode-length filter segment.
pub const EPISODE_LENGTH_PREFIX: &str = "Episode length:";

/// The `"Any"` sentinel the UI uses for an unset selectbox.
const ANY_SENTINEL: &str = "any";

/// Structured constraints supplied alongside the free text.
///
/// An empty/`None` field means "no constraint"; a set field is a hard filter
/// at retrieval time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilters {
    pub genres: Vec<String>,
    pub tone: Option<String>,
    pub episode_length: Option<EpisodeLength>,
}

impl QueryFilters {
    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.tone.is_none() && self.episode_length.is_none()
    }
}

/// A user query: free text plus optional structured filters.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub text: String,
    pub filters: QueryFilters,
}

impl Query {
    /// Builds a query from structured parts (the preferred, testable ingress).
    pub fn new(text: impl Into<String>, filters: QueryFilters) -> Self {
        Self {
            text: text.into().trim().to_string(),
            filters,
        }
    }

    /// Parses the presentation layer's merged form.
    ///
    /// Segments carrying a known filter prefix become typed filters; all other
    /// segments are kept as free text in order. A `"Any"` tone or length is
    /// treated as unset, matching the UI's selectbox default.
    pub fn parse(raw: &str) -> Self {
        let mut text_parts: Vec<&str> = Vec::new();
        let mut filters = QueryFilters::default();

        for segment in raw.split(FILTER_SEPARATOR) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            if let Some(rest) = segment.strip_prefix(GENRES_PREFIX) {
                filters.genres = rest
                    .split(',')
                    .map(|g| g.trim().to_string())
                    .filter(|g| !g.is_empty())
                    .collect();
            } else if let Some(rest) = segment.strip_prefix(TONE_PREFIX) {
                let tone = rest.trim();
                if !tone.is_empty() && !tone.eq_ignore_ascii_case(ANY_SENTINEL) {
                    filters.tone = Some(tone.to_string());
                }
            } else if let Some(rest) = segment.strip_prefix(EPISODE_LENGTH_PREFIX) {
                filters.episode_length = EpisodeLength::parse_label(rest);
            } else {
                text_parts.push(segment);
            }
        }

        Self {
            text: text_parts.join(FILTER_SEPARATOR),
            filters,
        }
    }

    /// Re-merges text and filters into the single string the encoder sees.
    ///
    /// Mirrors the front-end's merge format so a pre-merged and a structured
    /// query embed to the same vector.
    pub fn enriched_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.text.is_empty() {
            parts.push(self.text.clone());
        }
        if !self.filters.genres.is_empty() {
            parts.push(format!("{GENRES_PREFIX} {}", self.filters.genres.join(", ")));
        }
        if let Some(ref tone) = self.filters.tone {
            parts.push(format!("{TONE_PREFIX} {tone}"));
        }
        if let Some(length) = self.filters.episode_length {
            parts.push(format!("{EPISODE_LENGTH_PREFIX} {length}"));
        }
        parts.join(FILTER_SEPARATOR)
    }
}
