//! Grounded prompt construction.
//!
//! The grounding contract: a justification may reference only the facts in
//! the prompt, which are the selected entry's own metadata and the viewer's
//! request. Nothing about other titles or outside knowledge goes in, so
//! nothing fabricated can come out attributed to the catalog.

use crate::catalog::CatalogEntry;
use crate::query::Query;

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are an anime recommendation assistant. \
Write a short justification (2 to 3 sentences) for why the single title \
described below fits the viewer's request. Use only the facts listed in the \
message. Do not mention any other title. Do not invent genres, plot points, \
or attributes that are not listed.";

/// Builds the per-title user prompt from the entry's metadata and the query.
pub fn build_prompt(query: &Query, entry: &CatalogEntry) -> String {
    let mut prompt = format!("Viewer request: {}\n\n", query.enriched_text());

    prompt.push_str(&format!("Title: {}\n", entry.title));
    if !entry.genres.is_empty() {
        prompt.push_str(&format!("Genres: {}\n", entry.genres.join(", ")));
    }
    if !entry.tones.is_empty() {
        prompt.push_str(&format!("Tone: {}\n", entry.tones.join(", ")));
    }
    prompt.push_str(&format!("Episode length: {}\n", entry.episode_length));
    prompt.push_str(&format!("Synopsis: {}\n", entry.synopsis));

    prompt
}
