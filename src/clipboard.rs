//! Clipboard sink.

/// Errors from the clipboard layer.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard could be opened on this platform/session.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The write itself was rejected.
    #[error("clipboard write rejected: {0}")]
    Write(String),
}

/// Host-provided capability to place text on the system clipboard.
pub trait ClipboardWriter: Send + Sync {
    /// Write `text` to the clipboard, replacing its current contents.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard backed by arboard. A fresh handle is opened per write.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}
