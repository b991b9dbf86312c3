//! The floating selection toolbar.
//!
//! Derived state only: visibility and an approximate anchor recomputed
//! from the current selection on every mouse-up, key-up, and selection
//! change. A collapsed selection hides the bar.

use std::ops::Range;

use crate::editing::commands::{Cmd, WrapStyle};
use crate::editing::text::line_index;
use crate::editing::widget::{MenuPosition, WidgetRect};
use crate::palette::LINE_HEIGHT;

/// Vertical gap between the selection's line and the toolbar.
const TOOLBAR_OFFSET: f32 = 40.0;

/// Formatting actions exposed on the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Bold,
    Italic,
    InlineCode,
    Strikethrough,
    Link,
}

impl ToolbarAction {
    /// All actions in display order.
    pub const ALL: &'static [ToolbarAction] = &[
        ToolbarAction::Bold,
        ToolbarAction::Italic,
        ToolbarAction::InlineCode,
        ToolbarAction::Strikethrough,
        ToolbarAction::Link,
    ];

    pub fn command(self) -> Cmd {
        match self {
            ToolbarAction::Bold => Cmd::Wrap(WrapStyle::Bold),
            ToolbarAction::Italic => Cmd::Wrap(WrapStyle::Italic),
            ToolbarAction::InlineCode => Cmd::Wrap(WrapStyle::InlineCode),
            ToolbarAction::Strikethrough => Cmd::Wrap(WrapStyle::Strikethrough),
            ToolbarAction::Link => Cmd::InsertLink,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ToolbarAction::Bold => "bold",
            ToolbarAction::Italic => "italic",
            ToolbarAction::InlineCode => "code",
            ToolbarAction::Strikethrough => "strikethrough",
            ToolbarAction::Link => "link",
        }
    }
}

/// Visibility and position of the floating toolbar.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionToolbar {
    visible: bool,
    position: MenuPosition,
}

impl SelectionToolbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> MenuPosition {
        self.position
    }

    /// Recomputes from the current selection. Anchored above the line
    /// holding the selection start; proportional to line count, not
    /// pixel-exact.
    pub fn sync(&mut self, text: &str, selection: &Range<usize>, rect: &WidgetRect) {
        if selection.start == selection.end {
            self.visible = false;
            return;
        }
        let line = line_index(text, selection.start) as f32;
        self.visible = true;
        self.position = MenuPosition {
            top: (rect.top + line * LINE_HEIGHT - TOOLBAR_OFFSET).max(rect.top),
            left: rect.left + 16.0,
        };
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rect() -> WidgetRect {
        WidgetRect {
            top: 200.0,
            left: 40.0,
            width: 600.0,
            height: 400.0,
        }
    }

    #[test]
    fn collapsed_selection_hides() {
        let mut bar = SelectionToolbar::new();
        bar.sync("hello", &(2..2), &rect());
        assert!(!bar.is_visible());
    }

    #[test]
    fn nonempty_selection_shows_above_line() {
        let mut bar = SelectionToolbar::new();
        bar.sync("a\nb\nselected here", &(4..12), &rect());
        assert!(bar.is_visible());
        let pos = bar.position();
        assert_eq!(pos.top, 200.0 + 2.0 * LINE_HEIGHT - 40.0);
        assert_eq!(pos.left, 56.0);
    }

    #[test]
    fn anchor_clamps_to_widget_top() {
        let mut bar = SelectionToolbar::new();
        bar.sync("first line", &(0..5), &rect());
        assert_eq!(bar.position().top, 200.0);
    }

    #[test]
    fn selection_collapse_hides_again() {
        let mut bar = SelectionToolbar::new();
        bar.sync("hello", &(0..5), &rect());
        assert!(bar.is_visible());
        bar.sync("hello", &(3..3), &rect());
        assert!(!bar.is_visible());
    }

    #[test]
    fn actions_map_to_wrap_commands() {
        assert_eq!(
            ToolbarAction::Bold.command(),
            Cmd::Wrap(WrapStyle::Bold)
        );
        assert_eq!(ToolbarAction::Link.command(), Cmd::InsertLink);
        assert_eq!(ToolbarAction::ALL.len(), 5);
    }
}
