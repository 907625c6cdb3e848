//! Outbound platform capabilities: writing to the clipboard and handing text
//! to a share target. Both are optional and fail independently; callers show
//! failures as a notice and carry on.

use std::io::{self, IsTerminal, Write};

use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("clipboard is not available")]
    ClipboardUnavailable,

    #[error("failed to copy to clipboard: {0}")]
    Clipboard(#[source] io::Error),

    #[error("sharing is not supported here")]
    ShareUnavailable,

    #[error("failed to open share target: {0}")]
    Share(#[source] io::Error),
}

/// Clipboard and share capabilities of the host.
pub trait Platform {
    fn copy(&mut self, text: &str) -> Result<(), ShareError>;

    /// Whether [`Platform::share`] can do anything at all.
    fn can_share(&self) -> bool;

    fn share(&mut self, title: &str, text: &str) -> Result<(), ShareError>;
}

/// Terminal implementation: OSC 52 for the clipboard and a `mailto:` link
/// opened with the desktop handler for sharing.
pub struct TerminalPlatform {
    share_enabled: bool,
}

impl TerminalPlatform {
    pub fn new() -> Self {
        // A desktop session is required for `open` to reach a mail client.
        let share_enabled = cfg!(any(target_os = "macos", target_os = "windows"))
            || std::env::var_os("DISPLAY").is_some()
            || std::env::var_os("WAYLAND_DISPLAY").is_some();
        Self { share_enabled }
    }
}

impl Default for TerminalPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for TerminalPlatform {
    fn copy(&mut self, text: &str) -> Result<(), ShareError> {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(ShareError::ClipboardUnavailable);
        }
        execute!(stdout, CopyToClipboard::to_clipboard_from(text))
            .and_then(|_| stdout.flush())
            .map_err(|err| {
                warn!(error = %err, "clipboard write failed");
                ShareError::Clipboard(err)
            })?;
        info!(bytes = text.len(), "copied to clipboard");
        Ok(())
    }

    fn can_share(&self) -> bool {
        self.share_enabled
    }

    fn share(&mut self, title: &str, text: &str) -> Result<(), ShareError> {
        if !self.share_enabled {
            return Err(ShareError::ShareUnavailable);
        }
        open::that(mailto_link(title, text)).map_err(|err| {
            warn!(error = %err, "share target failed to open");
            ShareError::Share(err)
        })?;
        info!(%title, "opened share target");
        Ok(())
    }
}

/// Build a `mailto:` URI with the subject and body percent-encoded.
pub fn mailto_link(title: &str, text: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        percent_encode(title),
        percent_encode(text)
    )
}

fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
