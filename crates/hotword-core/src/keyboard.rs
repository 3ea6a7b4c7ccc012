use crate::error::{HotwordError, Result};
use crate::event::{KeyEvent, KeyTransition};
use crate::settings::{PasteModifier, PasteShortcut};
use enigo::{Direction, Enigo, Key, Keyboard, Settings as EnigoSettings};
use rdev::{self, EventType, Key as RdevKey};
use std::thread;
use std::time::Duration;

/// Text produced by an rdev event, if it is a single printable character.
pub fn rdev_event_text(event: &rdev::Event) -> Option<String> {
    let name = event.name.as_ref()?;
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(name.clone()),
        _ => None,
    }
}

/// Converts raw rdev events into [`KeyEvent`]s.
///
/// Several platforms only name a key on press, so the name seen at press
/// time is remembered and attached to the release of the same key.
#[derive(Default)]
pub struct KeyTranslator {
    held: Vec<(RdevKey, Option<String>)>,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &rdev::Event) -> Option<KeyEvent> {
        match event.event_type {
            EventType::KeyPress(key) => {
                let text = rdev_event_text(event);
                match self.held.iter_mut().find(|(held, _)| *held == key) {
                    Some(entry) => entry.1 = text.clone(),
                    None => self.held.push((key, text.clone())),
                }
                Some(KeyEvent {
                    transition: KeyTransition::Pressed,
                    text,
                })
            }
            EventType::KeyRelease(key) => {
                let index = self.held.iter().position(|(held, _)| *held == key);
                let remembered = index.and_then(|index| self.held.swap_remove(index).1);
                Some(KeyEvent {
                    transition: KeyTransition::Released,
                    text: rdev_event_text(event).or(remembered),
                })
            }
            _ => None,
        }
    }
}

/// Create a keyboard controller
pub fn create_keyboard_controller() -> Result<Enigo> {
    Enigo::new(&EnigoSettings::default()).map_err(|err| {
        HotwordError::Enigo(format!("Failed to create keyboard controller: {}", err))
    })
}

/// Send backspace key presses
pub fn send_backspace(keyboard: &mut Enigo, count: usize, delay: Duration) -> Result<()> {
    for _ in 0..count {
        thread::sleep(delay);
        keyboard
            .key(Key::Backspace, Direction::Click)
            .map_err(|err| HotwordError::Enigo(format!("Failed to send backspace: {}", err)))?;
    }
    Ok(())
}

fn modifier_key(modifier: PasteModifier) -> Key {
    match modifier {
        PasteModifier::Control => Key::Control,
        PasteModifier::Meta => Key::Meta,
        PasteModifier::Alt => Key::Alt,
        PasteModifier::Shift => Key::Shift,
    }
}

/// Tap the paste chord, releasing the modifier even if the tap fails.
pub fn send_paste(keyboard: &mut Enigo, shortcut: PasteShortcut) -> Result<()> {
    let modifier = modifier_key(shortcut.modifier);
    keyboard
        .key(modifier, Direction::Press)
        .map_err(|err| HotwordError::Enigo(format!("Failed to press modifier: {}", err)))?;

    let tapped = keyboard.key(Key::Unicode(shortcut.key), Direction::Click);
    let released = keyboard.key(modifier, Direction::Release);

    tapped.map_err(|err| HotwordError::Enigo(format!("Failed to send paste key: {}", err)))?;
    released.map_err(|err| HotwordError::Enigo(format!("Failed to release modifier: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn event(event_type: EventType, name: Option<&str>) -> rdev::Event {
        rdev::Event {
            time: SystemTime::now(),
            name: name.map(str::to_string),
            event_type,
        }
    }

    #[test]
    fn release_inherits_the_name_seen_on_press() {
        let mut translator = KeyTranslator::new();

        let press = translator
            .translate(&event(EventType::KeyPress(RdevKey::KeyH), Some("h")))
            .unwrap();
        assert_eq!(press.normalize(), None);

        let release = translator
            .translate(&event(EventType::KeyRelease(RdevKey::KeyH), None))
            .unwrap();
        assert_eq!(release.normalize(), Some('h'));
    }

    #[test]
    fn release_without_press_carries_no_text() {
        let mut translator = KeyTranslator::new();
        let release = translator
            .translate(&event(EventType::KeyRelease(RdevKey::KeyW), None))
            .unwrap();
        assert_eq!(release.normalize(), None);
    }

    #[test]
    fn control_characters_are_not_text() {
        let backspace = event(EventType::KeyPress(RdevKey::Backspace), Some("\u{8}"));
        assert_eq!(rdev_event_text(&backspace), None);

        let shift = event(EventType::KeyPress(RdevKey::ShiftLeft), None);
        assert_eq!(rdev_event_text(&shift), None);
    }

    #[test]
    fn mouse_events_are_dropped() {
        let mut translator = KeyTranslator::new();
        let moved = event(EventType::MouseMove { x: 1.0, y: 2.0 }, None);
        assert!(translator.translate(&moved).is_none());
    }
}
