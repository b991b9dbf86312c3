//! Offset helpers shared by the mutation planner and the palette.
//!
//! All offsets are byte offsets into UTF-8 text. Anything arriving from
//! outside (widget selections, host callers) goes through the snapping
//! helpers before it is used to slice.

use std::ops::Range;

/// Snaps an offset down to the nearest char boundary, clamped to the text
/// length.
pub fn snap_to_char_boundary(text: &str, offset: usize) -> usize {
    let mut at = offset.min(text.len());
    while at > 0 && !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

/// Clamps a selection to the text: ordered endpoints, in range, on char
/// boundaries.
pub fn clamp_selection(text: &str, selection: &Range<usize>) -> Range<usize> {
    let start = snap_to_char_boundary(text, selection.start.min(selection.end));
    let end = snap_to_char_boundary(text, selection.start.max(selection.end));
    start..end.max(start)
}

/// Offset of the first byte of the line containing `at` (one past the
/// previous line break, or the start of the text).
pub fn line_start(text: &str, at: usize) -> usize {
    let at = snap_to_char_boundary(text, at);
    text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Offset of the line break terminating the line containing `at`, or the
/// end of the text.
pub fn line_end(text: &str, at: usize) -> usize {
    let at = snap_to_char_boundary(text, at);
    text[at..].find('\n').map(|i| at + i).unwrap_or(text.len())
}

/// Zero-based index of the line containing `at`.
pub fn line_index(text: &str, at: usize) -> usize {
    let at = snap_to_char_boundary(text, at);
    text[..at].matches('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_handles_multibyte() {
        let text = "a🦀b"; // crab is 4 bytes at offset 1..5
        assert_eq!(snap_to_char_boundary(text, 0), 0);
        assert_eq!(snap_to_char_boundary(text, 1), 1);
        assert_eq!(snap_to_char_boundary(text, 2), 1);
        assert_eq!(snap_to_char_boundary(text, 4), 1);
        assert_eq!(snap_to_char_boundary(text, 5), 5);
        assert_eq!(snap_to_char_boundary(text, 100), 6);
    }

    #[test]
    fn clamp_orders_and_bounds() {
        let text = "hello";
        assert_eq!(clamp_selection(text, &(3..1)), 1..3);
        assert_eq!(clamp_selection(text, &(2..99)), 2..5);
        assert_eq!(clamp_selection(text, &(99..99)), 5..5);
    }

    #[test]
    fn line_bounds() {
        let text = "Notes:\nsecond line";
        assert_eq!(line_start(text, 0), 0);
        assert_eq!(line_start(text, 3), 0);
        assert_eq!(line_end(text, 3), 6);
        assert_eq!(line_start(text, 10), 7);
        assert_eq!(line_end(text, 10), text.len());
        assert_eq!(line_index(text, 3), 0);
        assert_eq!(line_index(text, 10), 1);
    }

    #[test]
    fn line_start_at_break_belongs_to_next_line() {
        let text = "a\nb";
        // Offset 2 sits at the start of the second line.
        assert_eq!(line_start(text, 2), 2);
        // Offset 1 is the newline itself, still on the first line.
        assert_eq!(line_start(text, 1), 0);
        assert_eq!(line_end(text, 1), 1);
    }
}
