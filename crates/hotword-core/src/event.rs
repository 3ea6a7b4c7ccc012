/// Direction of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Pressed,
    Released,
}

/// Key event as delivered by an event source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub transition: KeyTransition,
    /// Text the key produces, if the platform reported any.
    pub text: Option<String>,
}

impl KeyEvent {
    pub fn pressed(text: impl Into<String>) -> Self {
        Self {
            transition: KeyTransition::Pressed,
            text: Some(text.into()),
        }
    }

    pub fn released(text: impl Into<String>) -> Self {
        Self {
            transition: KeyTransition::Released,
            text: Some(text.into()),
        }
    }

    /// A release of a key without text (modifiers, arrows, ...).
    pub fn released_silent() -> Self {
        Self {
            transition: KeyTransition::Released,
            text: None,
        }
    }

    /// The single character this event stands for, if any.
    ///
    /// Only releases carrying exactly one code point count as input.
    pub fn normalize(&self) -> Option<char> {
        if self.transition != KeyTransition::Released {
            return None;
        }

        let text = self.text.as_deref()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_with_one_character_normalize() {
        assert_eq!(KeyEvent::released("h").normalize(), Some('h'));
        assert_eq!(KeyEvent::released("é").normalize(), Some('é'));
    }

    #[test]
    fn everything_else_is_ignored() {
        assert_eq!(KeyEvent::pressed("h").normalize(), None);
        assert_eq!(KeyEvent::released("").normalize(), None);
        assert_eq!(KeyEvent::released("ab").normalize(), None);
        assert_eq!(KeyEvent::released_silent().normalize(), None);
    }
}
