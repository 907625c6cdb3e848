//! Binary entry point: load configuration, start file logging, connect the
//! Gemini client, and drive the Ratatui event loop until the user exits.
use std::sync::Arc;

use amharic_bible_reader::{init_logging, run_app, App, Config, GeminiClient, TerminalPlatform};
use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_logging(&config)?;
    config.require_api_key()?;

    let client = GeminiClient::new(&config).context("failed to build the Gemini client")?;
    info!(model = %config.model, "starting reader");

    let mut app = App::new(Arc::new(client), Box::new(TerminalPlatform::new()));
    run_app(&mut app)
}
