use crate::config::get_settings_file_path;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Modifier held while tapping the paste key.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PasteModifier {
    Control,
    Meta,
    Alt,
    Shift,
}

/// Key chord that makes the focused application paste.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteShortcut {
    pub modifier: PasteModifier,
    pub key: char,
}

impl PasteShortcut {
    /// Cmd+V on macOS, Ctrl+V everywhere else.
    pub fn platform_default() -> Self {
        let modifier = if cfg!(target_os = "macos") {
            PasteModifier::Meta
        } else {
            PasteModifier::Control
        };
        Self { modifier, key: 'v' }
    }
}

impl Default for PasteShortcut {
    fn default() -> Self {
        Self::platform_default()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub paste_shortcut: PasteShortcut,
    /// Pause between simulated backspaces.
    pub keystroke_delay_ms: u64,
    /// Pause between writing the clipboard and sending the paste chord.
    pub paste_delay_ms: u64,
    /// How long the clipboard is held after the paste chord so a slow
    /// application can still fetch it. X11 drops the contents with the owner.
    pub clipboard_hold_ms: u64,
    /// Actions running longer than this are reported as slow.
    pub slow_action_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paste_shortcut: PasteShortcut::platform_default(),
            keystroke_delay_ms: 2,
            paste_delay_ms: 10,
            clipboard_hold_ms: 200,
            slow_action_ms: 500,
        }
    }
}

impl Settings {
    pub fn keystroke_delay(&self) -> Duration {
        Duration::from_millis(self.keystroke_delay_ms)
    }

    pub fn paste_delay(&self) -> Duration {
        Duration::from_millis(self.paste_delay_ms)
    }

    pub fn clipboard_hold(&self) -> Duration {
        Duration::from_millis(self.clipboard_hold_ms)
    }

    pub fn slow_action_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_action_ms)
    }
}

/// Load settings from the config directory, falling back to defaults when
/// no settings file exists.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(&get_settings_file_path())
}

pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_json::from_str(&content).map_err(|e| e.into())
}
