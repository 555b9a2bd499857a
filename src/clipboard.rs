//! Clipboard access for rich-text copies.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error(transparent)]
    System(#[from] arboard::Error),
    #[error("{0}")]
    Platform(String),
}

/// Somewhere rich text can be copied to.
pub trait Clipboard {
    /// Offer `html` with `plain` as the plain-text flavor.
    ///
    /// Returns `Ok(false)` when this clipboard cannot hold HTML at all.
    fn copy_html(&mut self, html: &str, plain: &str) -> Result<bool, ClipboardError>;
}

/// The desktop clipboard, via arboard.
///
/// Opening the clipboard fails on headless systems; copies then report
/// unsupported instead of erroring.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                debug!(error = %err, "system clipboard unavailable");
                None
            }
        };
        Self { inner }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn copy_html(&mut self, html: &str, plain: &str) -> Result<bool, ClipboardError> {
        let Some(clipboard) = self.inner.as_mut() else {
            return Ok(false);
        };
        match clipboard.set_html(html, Some(plain)) {
            Ok(()) => Ok(true),
            Err(arboard::Error::ClipboardNotSupported) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-process clipboard that keeps the last copy.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub html: Option<String>,
    pub plain: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn copy_html(&mut self, html: &str, plain: &str) -> Result<bool, ClipboardError> {
        self.html = Some(html.to_string());
        self.plain = Some(plain.to_string());
        Ok(true)
    }
}
