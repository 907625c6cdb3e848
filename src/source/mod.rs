//! The oracle seam: everything that knows how chapter text and search hits
//! are produced lives behind [`ScriptureSource`].

mod gemini;
mod payload;

use thiserror::Error;

use crate::models::{ChapterContent, SearchResult};

pub use gemini::GeminiClient;
pub use payload::{parse_chapter, parse_search};

/// Supplier of chapter text and search hits. Implementations are called from
/// worker threads, one request at a time per call.
pub trait ScriptureSource: Send + Sync {
    /// Fetch every verse of `chapter` in `book`. Numbering is not trusted by
    /// callers; they normalize the result before showing it.
    fn fetch_chapter(&self, book: &str, chapter: u32) -> Result<ChapterContent, SourceError>;

    /// Search the whole text for `query`, returning a small list of hits.
    fn search(&self, query: &str) -> Result<Vec<SearchResult>, SourceError>;
}

/// Failures talking to the oracle. Each request fails on its own; nothing is
/// retried automatically.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text")]
    EmptyReply,

    #[error("reply did not match the expected shape: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl SourceError {
    /// Short message shown in the error panel.
    pub fn user_message(&self) -> String {
        match self {
            SourceError::MissingApiKey => {
                "No API key is configured. Set GEMINI_API_KEY and restart.".to_string()
            }
            SourceError::Transport(err) if err.is_timeout() => {
                "The request timed out. Please try again.".to_string()
            }
            SourceError::Transport(err) if err.is_connect() || err.is_request() => {
                "Connection error. Please check your internet connection and try again."
                    .to_string()
            }
            SourceError::Transport(_) => {
                "A network error occurred. Please try again later.".to_string()
            }
            SourceError::Api { status: 429, .. } => {
                "The service quota was exceeded. Please wait and try again.".to_string()
            }
            SourceError::Api { message, .. } => format!("The service rejected the request: {message}"),
            SourceError::EmptyReply | SourceError::Malformed(_) => {
                "Received an unexpected response. Please try again.".to_string()
            }
        }
    }
}
