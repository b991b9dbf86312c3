//! The seam between the editor core and a live text input.
//!
//! The engine never talks to a concrete UI toolkit. Hosts implement
//! [`TextWidget`] over whatever input they render (a browser textarea, a
//! terminal input, a test buffer) and the session drives it through this
//! interface only.

use std::ops::Range;

use super::text::clamp_selection;

/// Minimal contract a live text input must provide.
pub trait TextWidget {
    /// Current selection as byte offsets; collapsed when start == end.
    fn selection(&self) -> Range<usize>;

    /// Replaces the displayed text.
    fn set_value(&mut self, text: &str);

    /// Moves the selection. Called only after the displayed value has
    /// been updated for the edit that produced this selection.
    fn set_selection(&mut self, selection: Range<usize>);

    /// Gives the input keyboard focus.
    fn focus(&mut self);
}

/// In-memory widget for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessWidget {
    value: String,
    selection: Range<usize>,
    focused: bool,
}

impl HeadlessWidget {
    pub fn new(value: &str) -> Self {
        let len = value.len();
        Self {
            value: value.to_string(),
            selection: len..len,
            focused: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl TextWidget for HeadlessWidget {
    fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.value = text.to_string();
        self.selection = clamp_selection(&self.value, &self.selection);
    }

    fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = clamp_selection(&self.value, &selection);
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

/// Bounding box of the text widget in host screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WidgetRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

/// Anchor for a floating menu or toolbar, in host screen coordinates.
///
/// Positions are approximate (line-count based); the host only needs a
/// plausible anchor, not pixel accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MenuPosition {
    pub top: f32,
    pub left: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_widget_clamps_selection() {
        let mut w = HeadlessWidget::new("hello");
        w.set_selection(2..99);
        assert_eq!(w.selection(), 2..5);

        w.set_value("hi");
        assert_eq!(w.selection(), 2..2);
    }

    #[test]
    fn focus_sticks() {
        let mut w = HeadlessWidget::new("");
        assert!(!w.is_focused());
        w.focus();
        assert!(w.is_focused());
    }
}
