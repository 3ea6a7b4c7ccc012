use crate::error::{HotwordError, Result};
use arboard::Clipboard;

/// Open a handle to the system clipboard.
///
/// On X11 the written contents are only served while a handle is alive, so
/// callers keep it around until the paste has been requested.
pub fn open_clipboard() -> Result<Clipboard> {
    Clipboard::new().map_err(|e| HotwordError::Clipboard(e.to_string()))
}

/// Replace the clipboard contents with `text`
pub fn set_clipboard_text(clipboard: &mut Clipboard, text: &str) -> Result<()> {
    clipboard
        .set_text(text)
        .map_err(|e| HotwordError::Clipboard(e.to_string()))
}
