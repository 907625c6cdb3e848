//! Terminal reader for the Amharic Bible.
//!
//! Chapter text and search results come from a language-model backed
//! [`source::ScriptureSource`]; everything after the oracle reply (verse
//! ordering, selection, citation text) is deterministic and lives in
//! [`verses`].
pub mod books;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod share;
pub mod source;
pub mod ui;
pub mod verses;

pub use config::Config;
pub use logging::init_logging;
pub use models::{ChapterContent, ChapterRef, SearchResult, Verse};
pub use share::{Platform, TerminalPlatform};
pub use source::{GeminiClient, ScriptureSource, SourceError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
