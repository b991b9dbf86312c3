//! Keystroke-level helpers: auto-closing pairs and modifier shortcuts.
//!
//! Platform-agnostic key types; the host converts its native key events
//! into these before calling the session.

use std::ops::Range;

use crate::editing::commands::{Cmd, WrapStyle};

/// Key values the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character key.
    Character(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    /// The primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    /// Whether the platform's primary modifier is held.
    pub fn has_primary(&self, is_mac: bool) -> bool {
        if is_mac { self.meta } else { self.ctrl }
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// Event was handled; the host must suppress default key handling.
    Handled,
    /// Event was not a binding; let the widget handle it.
    NotHandled,
}

/// Opening characters that auto-close, with their closers.
pub const PAIRS: &[(char, char)] = &[('`', '`'), ('*', '*'), ('_', '_'), ('[', ']')];

/// The closing character for an auto-pair opener.
pub fn closing_pair(open: char) -> Option<char> {
    PAIRS
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, close)| *close)
}

/// Auto-pair command for a typed character, if one applies.
///
/// Pairs only trigger on a collapsed selection. With a range selected the
/// default insertion proceeds, so wrap-style formatting stays an explicit
/// action.
pub fn pair_command(ch: char, selection: &Range<usize>) -> Option<Cmd> {
    if selection.start != selection.end {
        return None;
    }
    closing_pair(ch).map(|close| Cmd::InsertPair { open: ch, close })
}

/// Maps a modifier-key combination to a formatting command.
pub fn shortcut_command(key: &Key, modifiers: &Modifiers, is_mac: bool) -> Option<Cmd> {
    if !modifiers.has_primary(is_mac) || modifiers.alt {
        return None;
    }
    let Key::Character(ch) = key else {
        return None;
    };
    match ch.to_ascii_lowercase() {
        'b' => Some(Cmd::Wrap(WrapStyle::Bold)),
        'i' => Some(Cmd::Wrap(WrapStyle::Italic)),
        'k' => Some(Cmd::InsertLink),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case('`', '`')]
    #[case('*', '*')]
    #[case('_', '_')]
    #[case('[', ']')]
    fn pairs_close(#[case] open: char, #[case] close: char) {
        assert_eq!(closing_pair(open), Some(close));
        assert_eq!(
            pair_command(open, &(3..3)),
            Some(Cmd::InsertPair { open, close })
        );
    }

    #[test]
    fn no_pair_for_ordinary_characters() {
        assert_eq!(closing_pair('a'), None);
        assert_eq!(pair_command('a', &(0..0)), None);
    }

    #[test]
    fn pairs_skip_nonempty_selection() {
        assert_eq!(pair_command('*', &(1..4)), None);
    }

    #[test]
    fn primary_shortcuts_map_to_commands() {
        let ctrl = Modifiers::CTRL;
        assert_eq!(
            shortcut_command(&Key::Character('b'), &ctrl, false),
            Some(Cmd::Wrap(WrapStyle::Bold))
        );
        assert_eq!(
            shortcut_command(&Key::Character('I'), &ctrl, false),
            Some(Cmd::Wrap(WrapStyle::Italic))
        );
        assert_eq!(
            shortcut_command(&Key::Character('k'), &ctrl, false),
            Some(Cmd::InsertLink)
        );
    }

    #[test]
    fn mac_uses_meta_not_ctrl() {
        let meta = Modifiers::META;
        assert_eq!(
            shortcut_command(&Key::Character('b'), &meta, true),
            Some(Cmd::Wrap(WrapStyle::Bold))
        );
        assert_eq!(shortcut_command(&Key::Character('b'), &meta, false), None);
        assert_eq!(
            shortcut_command(&Key::Character('b'), &Modifiers::CTRL, true),
            None
        );
    }

    #[test]
    fn unbound_combinations_pass_through() {
        assert_eq!(
            shortcut_command(&Key::Character('x'), &Modifiers::CTRL, false),
            None
        );
        assert_eq!(
            shortcut_command(&Key::Character('b'), &Modifiers::NONE, false),
            None
        );
        assert_eq!(shortcut_command(&Key::Enter, &Modifiers::CTRL, false), None);
    }
}
