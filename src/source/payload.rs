//! Decoding of the JSON documents the model is asked to produce.
//!
//! Parsing is strict about shape: a missing `verses`/`results` array or a
//! missing field on any item is an error, not an empty result. It is lenient
//! about numbers, since the schema only promises "a number".

use serde::{Deserialize, Deserializer};

use crate::models::{ChapterContent, SearchResult, Verse};

use super::SourceError;

#[derive(Deserialize)]
struct ChapterPayload {
    verses: Vec<VersePayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersePayload {
    #[serde(deserialize_with = "loose_number")]
    verse_number: u32,
    text: String,
}

#[derive(Deserialize)]
struct SearchPayload {
    results: Vec<SearchHitPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHitPayload {
    book: String,
    #[serde(deserialize_with = "loose_number")]
    chapter: u32,
    #[serde(deserialize_with = "loose_number")]
    verse_number: u32,
    text: String,
}

/// Accept any JSON number. Fractions are truncated; negative, non-finite, or
/// oversized values collapse to the nearest representable bound.
fn loose_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value <= 0.0 {
        return Ok(0);
    }
    Ok(value.trunc().min(u32::MAX as f64) as u32)
}

/// Parse the model's chapter reply. Numbering is passed through as-is.
pub fn parse_chapter(reply: &str) -> Result<ChapterContent, SourceError> {
    let payload: ChapterPayload = serde_json::from_str(reply.trim())?;
    Ok(ChapterContent {
        verses: payload
            .verses
            .into_iter()
            .map(|v| Verse::new(v.verse_number, v.text))
            .collect(),
    })
}

/// Parse the model's search reply, keeping at most `limit` hits.
pub fn parse_search(reply: &str, limit: usize) -> Result<Vec<SearchResult>, SourceError> {
    let payload: SearchPayload = serde_json::from_str(reply.trim())?;
    Ok(payload
        .results
        .into_iter()
        .take(limit)
        .map(|hit| SearchResult {
            book: hit.book,
            chapter: hit.chapter,
            verse_number: hit.verse_number,
            text: hit.text,
        })
        .collect())
}
