//! Erase-and-substitute side effects.
//!
//! The engine hands every completion to an [`ActionSink`]. The production
//! sink, [`PasteSink`], types backspaces and then pastes the replacement
//! through the system clipboard. That overwrites whatever the user had on
//! the clipboard; the previous contents are not restored.

use crate::clipboard::{open_clipboard, set_clipboard_text};
use crate::error::Result;
use crate::keyboard::{create_keyboard_controller, send_backspace, send_paste};
use crate::settings::Settings;
use std::thread;

pub trait ActionSink: Send {
    /// Remove the `count` most recently typed characters from the focused input.
    fn delete_last_characters(&mut self, count: usize) -> Result<()>;

    /// Insert `text` at the cursor of the focused input.
    fn insert_text(&mut self, text: &str) -> Result<()>;

    /// Replace the last `count` typed characters with `replacement`.
    fn expand(&mut self, count: usize, replacement: &str) -> Result<()> {
        self.delete_last_characters(count)?;
        self.insert_text(replacement)
    }
}

impl<S: ActionSink + ?Sized> ActionSink for Box<S> {
    fn delete_last_characters(&mut self, count: usize) -> Result<()> {
        (**self).delete_last_characters(count)
    }

    fn insert_text(&mut self, text: &str) -> Result<()> {
        (**self).insert_text(text)
    }

    fn expand(&mut self, count: usize, replacement: &str) -> Result<()> {
        (**self).expand(count, replacement)
    }
}

/// Backspaces via enigo, replacement via arboard clipboard + paste chord.
#[derive(Debug, Clone, Default)]
pub struct PasteSink {
    settings: Settings,
}

impl PasteSink {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl ActionSink for PasteSink {
    fn delete_last_characters(&mut self, count: usize) -> Result<()> {
        let mut keyboard = create_keyboard_controller()?;
        send_backspace(&mut keyboard, count, self.settings.keystroke_delay())
    }

    fn insert_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = open_clipboard()?;
        set_clipboard_text(&mut clipboard, text)?;

        thread::sleep(self.settings.paste_delay());

        let mut keyboard = create_keyboard_controller()?;
        send_paste(&mut keyboard, self.settings.paste_shortcut)?;

        // Keep the clipboard owner alive while the target application reads it.
        thread::sleep(self.settings.clipboard_hold());
        drop(clipboard);
        Ok(())
    }
}

/// Logs completions instead of touching the keyboard or clipboard.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl ActionSink for LogSink {
    fn delete_last_characters(&mut self, count: usize) -> Result<()> {
        tracing::info!(count, "dry run: would erase characters");
        Ok(())
    }

    fn insert_text(&mut self, text: &str) -> Result<()> {
        tracing::info!(len = text.chars().count(), "dry run: would paste replacement");
        Ok(())
    }
}
