// src/infrastructure/clipboard.rs
use crate::application::Clipboard;
use crate::domain::DomainError;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, instrument};

/// Clipboard adapter that pipes text into the platform's clipboard tool.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn pipe_into(mut command: Command, text: &str) -> Result<(), DomainError> {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DomainError::ClipboardUnavailable(e.to_string()))?;

        child
            .stdin
            .take()
            .ok_or_else(|| DomainError::ClipboardUnavailable("no stdin handle".to_string()))?
            .write_all(text.as_bytes())
            .map_err(|e| DomainError::ClipboardUnavailable(e.to_string()))?;

        let status = child
            .wait()
            .map_err(|e| DomainError::ClipboardUnavailable(e.to_string()))?;
        if !status.success() {
            return Err(DomainError::ClipboardUnavailable(format!(
                "clipboard tool exited with {status}"
            )));
        }
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    #[instrument(level = "debug", skip(self, text))]
    fn write_text(&mut self, text: &str) -> Result<(), DomainError> {
        debug!(bytes = text.len(), "Writing to system clipboard");

        #[cfg(target_os = "macos")]
        {
            Self::pipe_into(Command::new("pbcopy"), text)
        }
        #[cfg(target_os = "windows")]
        {
            Self::pipe_into(Command::new("clip"), text)
        }
        #[cfg(target_os = "linux")]
        {
            // Wayland first, then the X11 fallback.
            Self::pipe_into(Command::new("wl-copy"), text).or_else(|_| {
                let mut xclip = Command::new("xclip");
                xclip.args(["-selection", "clipboard"]);
                Self::pipe_into(xclip, text)
            })
        }
    }
}
