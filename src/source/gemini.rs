//! Client for the hosted Gemini `generateContent` endpoint. Each call sends a
//! prompt plus a JSON response schema and decodes the model's text reply.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::models::{ChapterContent, SearchResult};

use super::payload::{parse_chapter, parse_search};
use super::{ScriptureSource, SourceError};

pub struct GeminiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    search_limit: usize,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            search_limit: config.search_limit,
        })
    }

    fn generate(&self, prompt: &str, schema: Value) -> Result<String, SourceError> {
        let api_key = self.api_key.as_deref().ok_or(SourceError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }
        extract_reply_text(&text)
    }
}

impl ScriptureSource for GeminiClient {
    fn fetch_chapter(&self, book: &str, chapter: u32) -> Result<ChapterContent, SourceError> {
        info!(%book, chapter, "requesting chapter");
        let prompt = format!(
            "Please provide the full text of the book \"{book}\" chapter {chapter} from the \
             Amharic Bible. Format the output as a valid JSON object."
        );
        let result = self
            .generate(&prompt, chapter_schema())
            .and_then(|reply| parse_chapter(&reply));
        match &result {
            Ok(content) => debug!(verses = content.verses.len(), "chapter decoded"),
            Err(err) => error!(%book, chapter, error = %err, "chapter request failed"),
        }
        result
    }

    fn search(&self, query: &str) -> Result<Vec<SearchResult>, SourceError> {
        info!(%query, "requesting search");
        let prompt = format!(
            "Search the Amharic Bible for verses containing the keyword \"{query}\". Return up \
             to {} most relevant verses. Format the output as a valid JSON object.",
            self.search_limit
        );
        let result = self
            .generate(&prompt, search_schema())
            .and_then(|reply| parse_search(&reply, self.search_limit));
        match &result {
            Ok(hits) => debug!(hits = hits.len(), "search decoded"),
            Err(err) => error!(%query, error = %err, "search request failed"),
        }
        result
    }
}

fn chapter_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "verses": {
                "type": "ARRAY",
                "description": "An array of verses from the chapter.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "verseNumber": { "type": "NUMBER", "description": "The verse number." },
                        "text": { "type": "STRING", "description": "The Amharic text of the verse." },
                    },
                    "required": ["verseNumber", "text"],
                },
            },
        },
        "required": ["verses"],
    })
}

fn search_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "results": {
                "type": "ARRAY",
                "description": "An array of search result verses.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "book": { "type": "STRING", "description": "The name of the book in Amharic." },
                        "chapter": { "type": "NUMBER", "description": "The chapter number." },
                        "verseNumber": { "type": "NUMBER", "description": "The verse number." },
                        "text": { "type": "STRING", "description": "The Amharic text of the verse." },
                    },
                    "required": ["book", "chapter", "verseNumber", "text"],
                },
            },
        },
        "required": ["results"],
    })
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Concatenate the text parts of the first candidate.
fn extract_reply_text(body: &str) -> Result<String, SourceError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        Err(SourceError::EmptyReply)
    } else {
        Ok(text.to_string())
    }
}

fn api_error(status: u16, body: &str) -> SourceError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| format!("HTTP {status}"));
    SourceError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_text_joins_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": " {\"verses\": "}, {"text": "[]} "}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(extract_reply_text(body).unwrap(), r#"{"verses": []}"#);
    }

    #[test]
    fn missing_candidates_is_empty_reply() {
        let err = extract_reply_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .unwrap_err();
        assert!(matches!(err, SourceError::EmptyReply));
    }

    #[test]
    fn api_error_prefers_service_message() {
        let err = api_error(
            400,
            r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#,
        );
        match err {
            SourceError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_status() {
        match api_error(502, "<html>bad gateway</html>") {
            SourceError::Api { message, .. } => assert_eq!(message, "HTTP 502"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn client_without_key_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path(), |_| None).unwrap();
        let client = GeminiClient::new(&config).unwrap();
        assert!(matches!(
            client.fetch_chapter("ዘፍጥረት", 1),
            Err(SourceError::MissingApiKey)
        ));
    }

    #[test]
    fn schemas_require_their_arrays() {
        assert_eq!(chapter_schema()["required"], json!(["verses"]));
        assert_eq!(search_schema()["required"], json!(["results"]));
    }
}
