//! Runtime configuration. Values come from an optional `config.json` in the
//! data directory, then environment variables override individual fields.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".amharic-bible-reader";
/// Optional configuration file inside the data directory.
const CONFIG_FILE_NAME: &str = "config.json";
/// Log file written while the terminal is in raw mode.
const LOG_FILE_NAME: &str = "reader.log";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_SEARCH_LIMIT: usize = 15;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LOG_FILTER: &str = "amharic_bible_reader=info";

/// Shape of `config.json`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    search_limit: Option<usize>,
    timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub search_limit: usize,
    pub timeout: Duration,
    pub log_filter: String,
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory and load configuration from it plus the
    /// process environment.
    pub fn load() -> Result<Self> {
        let data_dir = data_dir()?;
        Self::load_from(&data_dir, |key| env::var(key).ok())
    }

    /// Load from an explicit directory with a custom environment lookup.
    pub fn load_from<F>(data_dir: &Path, env_var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = read_file_config(&data_dir.join(CONFIG_FILE_NAME))?;

        let api_key = env_var("GEMINI_API_KEY")
            .or_else(|| env_var("API_KEY"))
            .or(file.api_key)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let model = env_var("AMHARIC_BIBLE_MODEL")
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            model,
            endpoint: file
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            search_limit: file.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT).max(1),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            log_filter: file
                .log_filter
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// The API key, or an error explaining how to provide one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "no API key found; set GEMINI_API_KEY or add \"api_key\" to {}",
                self.data_dir.join(CONFIG_FILE_NAME).display()
            )
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Resolve the absolute path to the data directory inside the user's home.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
