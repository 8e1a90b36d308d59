use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(String);

/// Destination for a finished translation besides stdout
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard.
///
/// The handle is dropped right after the copy. On Linux/X11 the selection is
/// owned by this process, so the text can disappear when it exits unless a
/// clipboard manager takes it over.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

/// Copy `text` into `sink`. A failure is logged and reported as `false`;
/// it never fails the translation.
pub fn copy_to_clipboard(sink: &mut dyn ClipboardSink, text: &str) -> bool {
    match sink.copy(text) {
        Ok(()) => {
            info!(bytes = text.len(), "translation copied to clipboard");
            true
        }
        Err(e) => {
            warn!("{e}; translation was not copied");
            false
        }
    }
}
