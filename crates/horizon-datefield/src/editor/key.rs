//! Keyboard keys and the edit actions they map to.

use crate::format::Handler;

/// Step applied by PageUp/PageDown.
pub const PAGE_STEP: i32 = 10;

/// A key reported by the host control.
///
/// Built from the host's key name with [`Key::from_name`], which follows web
/// `KeyboardEvent.key` naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `0`-`9`.
    Digit(u8),
    /// An alphabetic character.
    Letter(char),
    /// Any other printable character.
    Char(char),

    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    // Editing
    Backspace,
    Delete,
    Space,
    Enter,
    Tab,
    Escape,

    /// Unmapped key.
    Unknown,
}

impl Key {
    /// Map a host key name (`"ArrowUp"`, `"Backspace"`, `" "`, `"7"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            " " | "Spacebar" | "Space" => Key::Space,
            "Enter" => Key::Enter,
            "Tab" => Key::Tab,
            "Escape" | "Esc" => Key::Escape,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => match c.to_digit(10) {
                        Some(digit) => Key::Digit(digit as u8),
                        None if c.is_alphabetic() => Key::Letter(c),
                        None => Key::Char(c),
                    },
                    _ => Key::Unknown,
                }
            }
        }
    }

    /// Keys that resolve a caret on a literal towards the previous field.
    pub fn is_backward(&self) -> bool {
        matches!(
            self,
            Key::Backspace | Key::ArrowUp | Key::ArrowDown | Key::PageUp | Key::PageDown
        )
    }

    /// Keys whose native handling is suppressed even when no field handles
    /// them, since native insertion/deletion would change the string width.
    pub fn is_always_intercepted(&self) -> bool {
        matches!(self, Key::Backspace | Key::Delete | Key::Space)
    }

    /// The edit action this key performs, if any.
    pub fn action(&self) -> Option<KeyAction> {
        match *self {
            Key::Digit(digit) => Some(KeyAction::Digit(digit)),
            Key::Letter(c) => Some(KeyAction::Letter(c)),
            Key::ArrowUp => Some(KeyAction::Step(1)),
            Key::ArrowDown => Some(KeyAction::Step(-1)),
            Key::PageUp => Some(KeyAction::Step(PAGE_STEP)),
            Key::PageDown => Some(KeyAction::Step(-PAGE_STEP)),
            Key::Backspace => Some(KeyAction::Clear(ClearDirection::Backward)),
            Key::Delete => Some(KeyAction::Clear(ClearDirection::Forward)),
            Key::Space => Some(KeyAction::Advance),
            _ => None,
        }
    }
}

/// Which way a clear moves the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClearDirection {
    /// Backspace: caret moves before the field.
    Backward,
    /// Delete: caret stays.
    Forward,
}

/// A structured edit to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Enter a digit.
    Digit(u8),
    /// Increment (positive) or decrement (negative), wrapping in bounds.
    Step(i32),
    /// Reset the field to its placeholder.
    Clear(ClearDirection),
    /// Move to the next field.
    Advance,
    /// Letter type-ahead.
    Letter(char),
}

impl KeyAction {
    /// The handler family that implements this action.
    pub fn handler(&self) -> Handler {
        match self {
            KeyAction::Digit(_) => Handler::Digit,
            KeyAction::Step(_) => Handler::Step,
            KeyAction::Clear(_) => Handler::Clear,
            KeyAction::Advance => Handler::Advance,
            KeyAction::Letter(_) => Handler::Letter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Key::from_name("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("7"), Key::Digit(7));
        assert_eq!(Key::from_name("p"), Key::Letter('p'));
        assert_eq!(Key::from_name("/"), Key::Char('/'));
        assert_eq!(Key::from_name("F5"), Key::Unknown);
    }

    #[test]
    fn test_arrows_share_step_action() {
        assert_eq!(Key::ArrowUp.action(), Some(KeyAction::Step(1)));
        assert_eq!(Key::ArrowDown.action(), Some(KeyAction::Step(-1)));
        assert_eq!(Key::PageDown.action().map(|a| a.handler()), Some(Handler::Step));
        assert_eq!(Key::ArrowLeft.action(), None);
    }

    #[test]
    fn test_key_classes() {
        assert!(Key::Backspace.is_backward());
        assert!(Key::PageUp.is_backward());
        assert!(!Key::Delete.is_backward());
        assert!(!Key::Digit(1).is_backward());
        assert!(Key::Space.is_always_intercepted());
        assert!(!Key::ArrowUp.is_always_intercepted());
    }
}
