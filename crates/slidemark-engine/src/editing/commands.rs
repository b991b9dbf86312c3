//! Formatting commands and their edit planning.
//!
//! Every command is planned as a pure function of `(text, selection)`:
//! the plan names the byte range to replace, the replacement text, and
//! where the selection lands in the resulting document. [`super::document::Document::apply`]
//! compiles the plan into an xi-rope delta. Nothing here touches a live
//! widget, which is what makes each operation unit-testable headlessly.

use std::ops::Range;

use super::document::Document;
use super::text::{clamp_selection, line_end, line_start};

/// Placeholder URL selected for immediate overtype after link insertion.
pub const LINK_URL_PLACEHOLDER: &str = "https://example.com";

/// Inline wrap styles: `prefix + content + suffix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapStyle {
    Bold,
    Italic,
    InlineCode,
    Strikethrough,
    Superscript,
    /// Colored `<span>` with an inline style.
    ColorSpan { color: String },
}

impl WrapStyle {
    pub fn prefix(&self) -> String {
        match self {
            WrapStyle::Bold => "**".to_string(),
            WrapStyle::Italic => "*".to_string(),
            WrapStyle::InlineCode => "`".to_string(),
            WrapStyle::Strikethrough => "~~".to_string(),
            WrapStyle::Superscript => "<sup>".to_string(),
            WrapStyle::ColorSpan { color } => format!("<span style=\"color: {color}\">"),
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            WrapStyle::Bold => "**",
            WrapStyle::Italic => "*",
            WrapStyle::InlineCode => "`",
            WrapStyle::Strikethrough => "~~",
            WrapStyle::Superscript => "</sup>",
            WrapStyle::ColorSpan { .. } => "</span>",
        }
    }

    /// Literal content used when the selection is empty.
    pub fn placeholder(&self) -> &'static str {
        match self {
            WrapStyle::Bold => "bold text",
            WrapStyle::Italic => "italic text",
            WrapStyle::InlineCode => "code",
            WrapStyle::Strikethrough => "strikethrough",
            WrapStyle::Superscript => "superscript",
            WrapStyle::ColorSpan { .. } => "colored text",
        }
    }
}

/// An editing command over the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Wrap the selection (or a placeholder) in inline markers.
    Wrap(WrapStyle),
    /// Insert a heading marker at the start of the current line.
    InsertHeading { level: u8 },
    /// Start a list item ahead of the text from the cursor to line end.
    InsertList { ordered: bool },
    /// Wrap the selection (or "Quote") as a block quote.
    InsertQuote,
    /// Insert `[text](url)` with the placeholder URL selected.
    InsertLink,
    /// Wrap the selection (or "code") in a fenced block.
    InsertCodeBlock,
    /// Insert a horizontal rule at the cursor.
    InsertRule,
    /// Insert an `<img />` tag at the cursor. Empty attributes are omitted.
    InsertImage {
        src: String,
        alt: String,
        width: Option<u32>,
        height: Option<u32>,
    },
    /// Insert an arbitrary snippet at the cursor.
    InsertSnippet {
        text: String,
        /// Select the inserted range instead of collapsing after it.
        select_inserted: bool,
    },
    /// Insert an auto-closing pair with the cursor between the delimiters.
    InsertPair { open: char, close: char },
    /// Delete the in-progress `/query` token: line start through cursor.
    RemoveSlashToken,
}

/// A planned edit: replace `replace` with `insert`, then select
/// `selection_after` (offsets into the resulting document).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EditPlan {
    pub replace: Range<usize>,
    pub insert: String,
    pub selection_after: Range<usize>,
}

impl EditPlan {
    fn insert_at(at: usize, insert: String) -> Self {
        let end = at + insert.len();
        Self {
            replace: at..at,
            insert,
            selection_after: end..end,
        }
    }
}

/// Plans a command against the document's current text and selection.
pub(crate) fn plan_command(doc: &Document, cmd: &Cmd) -> EditPlan {
    let text = doc.text();
    let sel = clamp_selection(&text, &doc.selection());
    plan_in(&text, &sel, cmd)
}

pub(crate) fn plan_in(text: &str, sel: &Range<usize>, cmd: &Cmd) -> EditPlan {
    match cmd {
        Cmd::Wrap(style) => plan_wrap(text, sel, &style.prefix(), style.suffix(), style.placeholder()),
        Cmd::InsertHeading { level } => plan_heading(text, sel, *level),
        Cmd::InsertList { ordered } => plan_list(text, sel, *ordered),
        Cmd::InsertQuote => plan_wrap(text, sel, "\n> ", "\n", "Quote"),
        Cmd::InsertLink => plan_link(text, sel),
        Cmd::InsertCodeBlock => plan_wrap(text, sel, "\n\n```\n", "\n```\n\n", "code"),
        Cmd::InsertRule => EditPlan::insert_at(sel.start, "\n\n---\n\n".to_string()),
        Cmd::InsertImage {
            src,
            alt,
            width,
            height,
        } => EditPlan::insert_at(sel.start, image_tag(src, alt, *width, *height)),
        Cmd::InsertSnippet {
            text: snippet,
            select_inserted,
        } => {
            let mut plan = EditPlan::insert_at(sel.start, snippet.clone());
            if *select_inserted {
                plan.selection_after = sel.start..sel.start + snippet.len();
            }
            plan
        }
        Cmd::InsertPair { open, close } => {
            let mut insert = String::new();
            insert.push(*open);
            insert.push(*close);
            let middle = sel.start + open.len_utf8();
            EditPlan {
                replace: sel.start..sel.start,
                insert,
                selection_after: middle..middle,
            }
        }
        Cmd::RemoveSlashToken => {
            let start = line_start(text, sel.start);
            EditPlan {
                replace: start..sel.start,
                insert: String::new(),
                selection_after: start..start,
            }
        }
    }
}

fn plan_wrap(
    text: &str,
    sel: &Range<usize>,
    prefix: &str,
    suffix: &str,
    placeholder: &str,
) -> EditPlan {
    let selected = &text[sel.clone()];
    let content = if selected.is_empty() {
        placeholder
    } else {
        selected
    };
    let insert = format!("{prefix}{content}{suffix}");
    // Keep the content addressable for immediate further typing.
    let content_start = sel.start + prefix.len();
    EditPlan {
        replace: sel.clone(),
        insert,
        selection_after: content_start..content_start + content.len(),
    }
}

fn plan_heading(text: &str, sel: &Range<usize>, level: u8) -> EditPlan {
    let level = level.clamp(1, 6) as usize;
    let marker = format!("{} ", "#".repeat(level));
    // A selection spanning lines still only marks the line holding its
    // start; rewriting the rest would be guesswork.
    let start = line_start(text, sel.start);
    let end = line_end(text, sel.start);

    if sel.is_empty() && start == end {
        // Empty line: marker plus placeholder, cursor at its end.
        let insert = format!("{marker}Heading");
        let cursor = start + insert.len();
        EditPlan {
            replace: start..start,
            insert,
            selection_after: cursor..cursor,
        }
    } else {
        // The line's existing text becomes the heading content.
        let cursor = end + marker.len();
        EditPlan {
            replace: start..start,
            insert: marker,
            selection_after: cursor..cursor,
        }
    }
}

fn plan_list(text: &str, sel: &Range<usize>, ordered: bool) -> EditPlan {
    let marker = if ordered { "1. " } else { "- " };
    let start = line_start(text, sel.start);
    // Text from the cursor to line end becomes the first item. Only break
    // the line when something precedes the cursor on it.
    let insert = if sel.start > start {
        format!("\n{marker}")
    } else {
        marker.to_string()
    };
    let cursor = sel.start + insert.len();
    EditPlan {
        replace: sel.start..sel.start,
        insert,
        selection_after: cursor..cursor,
    }
}

fn plan_link(text: &str, sel: &Range<usize>) -> EditPlan {
    let selected = &text[sel.clone()];
    let content = if selected.is_empty() {
        "link text"
    } else {
        selected
    };
    let insert = format!("[{content}]({LINK_URL_PLACEHOLDER})");
    // Select the URL so the user can type over it immediately.
    let url_start = sel.start + 1 + content.len() + 2;
    EditPlan {
        replace: sel.clone(),
        insert,
        selection_after: url_start..url_start + LINK_URL_PLACEHOLDER.len(),
    }
}

fn image_tag(src: &str, alt: &str, width: Option<u32>, height: Option<u32>) -> String {
    let mut tag = format!(
        "<img src=\"{}\"",
        html_escape::encode_double_quoted_attribute(src)
    );
    if !alt.is_empty() {
        tag.push_str(&format!(
            " alt=\"{}\"",
            html_escape::encode_double_quoted_attribute(alt)
        ));
    }
    if let Some(w) = width {
        tag.push_str(&format!(" width=\"{w}\""));
    }
    if let Some(h) = height {
        tag.push_str(&format!(" height=\"{h}\""));
    }
    tag.push_str(" />");
    tag
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn apply_plan(text: &str, sel: Range<usize>, cmd: &Cmd) -> (String, Range<usize>) {
        let plan = plan_in(text, &sel, cmd);
        let mut out = String::with_capacity(text.len() + plan.insert.len());
        out.push_str(&text[..plan.replace.start]);
        out.push_str(&plan.insert);
        out.push_str(&text[plan.replace.end..]);
        (out, plan.selection_after)
    }

    #[test]
    fn bold_on_empty_selection_inserts_placeholder() {
        let (out, sel) = apply_plan("Hello ", 6..6, &Cmd::Wrap(WrapStyle::Bold));
        assert_eq!(out, "Hello **bold text**");
        assert_eq!(&out[sel], "bold text");
    }

    #[test]
    fn bold_wraps_existing_selection() {
        let (out, sel) = apply_plan("Hello world", 6..11, &Cmd::Wrap(WrapStyle::Bold));
        assert_eq!(out, "Hello **world**");
        assert_eq!(&out[sel], "world");
    }

    #[rstest]
    #[case(WrapStyle::Italic, "*pick*")]
    #[case(WrapStyle::InlineCode, "`pick`")]
    #[case(WrapStyle::Strikethrough, "~~pick~~")]
    #[case(WrapStyle::Superscript, "<sup>pick</sup>")]
    fn wrap_styles_surround_selection(#[case] style: WrapStyle, #[case] expected: &str) {
        let (out, sel) = apply_plan("pick", 0..4, &Cmd::Wrap(style));
        assert_eq!(out, expected);
        assert_eq!(&out[sel], "pick");
    }

    #[test]
    fn color_span_carries_color() {
        let (out, sel) = apply_plan(
            "x",
            0..1,
            &Cmd::Wrap(WrapStyle::ColorSpan {
                color: "#ff0000".to_string(),
            }),
        );
        assert_eq!(out, "<span style=\"color: #ff0000\">x</span>");
        assert_eq!(&out[sel], "x");
    }

    #[rstest]
    #[case(WrapStyle::Bold)]
    #[case(WrapStyle::Italic)]
    #[case(WrapStyle::InlineCode)]
    #[case(WrapStyle::Superscript)]
    fn wrap_round_trips(#[case] style: WrapStyle) {
        // Stripping exactly prefix/suffix at the recorded boundaries must
        // reconstruct the original selected substring.
        let text = "alpha beta gamma";
        let sel = 6..10;
        let plan = plan_in(text, &sel, &Cmd::Wrap(style.clone()));
        let prefix = style.prefix();
        let suffix = style.suffix();
        let inner = &plan.insert[prefix.len()..plan.insert.len() - suffix.len()];
        assert_eq!(inner, &text[sel.clone()]);
        assert_eq!(
            plan.selection_after,
            sel.start + prefix.len()..sel.start + prefix.len() + inner.len()
        );
    }

    #[test]
    fn heading_on_existing_line_reuses_line_content() {
        let text = "Notes:\nsecond line";
        let (out, sel) = apply_plan(text, 10..10, &Cmd::InsertHeading { level: 2 });
        assert_eq!(out, "Notes:\n## second line");
        // Cursor lands at the end of the heading text.
        assert_eq!(sel, out.len()..out.len());
    }

    #[test]
    fn heading_on_empty_line_inserts_placeholder() {
        let (out, sel) = apply_plan("intro\n", 6..6, &Cmd::InsertHeading { level: 1 });
        assert_eq!(out, "intro\n# Heading");
        assert_eq!(sel, out.len()..out.len());
    }

    #[test]
    fn heading_level_is_clamped() {
        let (out, _) = apply_plan("", 0..0, &Cmd::InsertHeading { level: 9 });
        assert_eq!(out, "###### Heading");
    }

    #[test]
    fn multiline_selection_marks_only_first_line() {
        let text = "one\ntwo\nthree";
        let (out, _) = apply_plan(text, 1..9, &Cmd::InsertHeading { level: 2 });
        assert_eq!(out, "## one\ntwo\nthree");
    }

    #[test]
    fn list_midline_breaks_the_line() {
        let (out, sel) = apply_plan("abcdef", 3..3, &Cmd::InsertList { ordered: false });
        assert_eq!(out, "abc\n- def");
        assert_eq!(sel, 6..6); // right after "- "
    }

    #[test]
    fn list_at_line_start_does_not_add_blank_line() {
        let (out, sel) = apply_plan("item", 0..0, &Cmd::InsertList { ordered: false });
        assert_eq!(out, "- item");
        assert_eq!(sel, 2..2);
    }

    #[test]
    fn ordered_list_marker() {
        let (out, _) = apply_plan("item", 0..0, &Cmd::InsertList { ordered: true });
        assert_eq!(out, "1. item");
    }

    #[test]
    fn quote_wraps_selection() {
        let (out, sel) = apply_plan("wise words", 0..10, &Cmd::InsertQuote);
        assert_eq!(out, "\n> wise words\n");
        assert_eq!(&out[sel], "wise words");
    }

    #[test]
    fn quote_empty_selection_uses_placeholder() {
        let (out, sel) = apply_plan("", 0..0, &Cmd::InsertQuote);
        assert_eq!(out, "\n> Quote\n");
        assert_eq!(&out[sel], "Quote");
    }

    #[test]
    fn link_selects_url_placeholder() {
        let (out, sel) = apply_plan("docs", 0..4, &Cmd::InsertLink);
        assert_eq!(out, "[docs](https://example.com)");
        assert_eq!(&out[sel], "https://example.com");
    }

    #[test]
    fn link_empty_selection_uses_text_placeholder() {
        let (out, sel) = apply_plan("", 0..0, &Cmd::InsertLink);
        assert_eq!(out, "[link text](https://example.com)");
        assert_eq!(&out[sel], "https://example.com");
    }

    #[test]
    fn code_block_wraps_selection() {
        let (out, sel) = apply_plan("let x = 1;", 0..10, &Cmd::InsertCodeBlock);
        assert_eq!(out, "\n\n```\nlet x = 1;\n```\n\n");
        assert_eq!(&out[sel], "let x = 1;");
    }

    #[test]
    fn rule_inserts_at_cursor_without_replacing_selection() {
        let (out, sel) = apply_plan("ab", 1..2, &Cmd::InsertRule);
        assert_eq!(out, "a\n\n---\n\nb");
        assert_eq!(sel, 8..8);
    }

    #[test]
    fn image_tag_omits_empty_attributes() {
        let (out, _) = apply_plan(
            "",
            0..0,
            &Cmd::InsertImage {
                src: "/up/1.png".to_string(),
                alt: String::new(),
                width: None,
                height: None,
            },
        );
        assert_eq!(out, "<img src=\"/up/1.png\" />");
    }

    #[test]
    fn image_tag_includes_dimensions() {
        let (out, _) = apply_plan(
            "",
            0..0,
            &Cmd::InsertImage {
                src: "/a.png".to_string(),
                alt: "chart".to_string(),
                width: Some(640),
                height: Some(480),
            },
        );
        assert_eq!(
            out,
            "<img src=\"/a.png\" alt=\"chart\" width=\"640\" height=\"480\" />"
        );
    }

    #[test]
    fn snippet_selects_inserted_range_when_asked() {
        let (out, sel) = apply_plan(
            "ab",
            1..1,
            &Cmd::InsertSnippet {
                text: "XYZ".to_string(),
                select_inserted: true,
            },
        );
        assert_eq!(out, "aXYZb");
        assert_eq!(&out[sel], "XYZ");
    }

    #[test]
    fn snippet_collapses_after_insert_by_default() {
        let (out, sel) = apply_plan(
            "ab",
            1..1,
            &Cmd::InsertSnippet {
                text: "XYZ".to_string(),
                select_inserted: false,
            },
        );
        assert_eq!(out, "aXYZb");
        assert_eq!(sel, 4..4);
    }

    #[test]
    fn pair_places_cursor_between_delimiters() {
        let (out, sel) = apply_plan("ab", 1..1, &Cmd::InsertPair { open: '[', close: ']' });
        assert_eq!(out, "a[]b");
        assert_eq!(sel, 2..2);
    }

    #[test]
    fn remove_slash_token_deletes_line_so_far() {
        let text = "first\n/head";
        let (out, sel) = apply_plan(text, text.len()..text.len(), &Cmd::RemoveSlashToken);
        assert_eq!(out, "first\n");
        assert_eq!(sel, 6..6);
    }

    #[rstest]
    #[case(Cmd::Wrap(WrapStyle::Bold))]
    #[case(Cmd::InsertHeading { level: 3 })]
    #[case(Cmd::InsertList { ordered: true })]
    #[case(Cmd::InsertQuote)]
    #[case(Cmd::InsertLink)]
    #[case(Cmd::InsertCodeBlock)]
    #[case(Cmd::InsertRule)]
    #[case(Cmd::RemoveSlashToken)]
    fn offsets_stay_in_bounds(#[case] cmd: Cmd) {
        let text = "line one\nline 🦀 two\n\nlast";
        let len = text.len();
        for start in 0..=len {
            for end in start..=len {
                let sel = clamp_selection(text, &(start..end));
                let plan = plan_in(text, &sel, &cmd);
                let new_len = len - (plan.replace.end - plan.replace.start) + plan.insert.len();
                assert!(plan.replace.start <= plan.replace.end);
                assert!(plan.replace.end <= len);
                assert!(plan.selection_after.start <= plan.selection_after.end);
                assert!(
                    plan.selection_after.end <= new_len,
                    "selection {:?} beyond new length {} for {:?} at {:?}",
                    plan.selection_after,
                    new_len,
                    cmd,
                    sel
                );
            }
        }
    }
}
