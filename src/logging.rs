//! File-backed tracing setup. The terminal is owned by the TUI, so log lines
//! go to `reader.log` in the data directory instead of stderr.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;
    let log_path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
