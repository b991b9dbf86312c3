//! Token tree to HTML rendering.
//!
//! `render_html` is a pure function of the document text and options:
//! same input, same output, no state between calls. Code blocks are
//! first-class leaves handed to the highlighter, so highlighting happens
//! as part of the tree walk rather than as a patch on the produced HTML.

use std::sync::OnceLock;

use regex::Regex;

use super::highlight::{self, Theme};
use super::parser::{parse, ParseOptions};
use super::sanitize;
use super::token::{Block, Inline, ListItem};

/// Rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub parse: ParseOptions,
}

/// Shown instead of an empty tree when the document is blank.
pub const EMPTY_PREVIEW: &str =
    "<p class=\"preview-placeholder\"><em>Start typing to see your preview...</em></p>\n";

/// Renders markdown text to sanitized HTML.
pub fn render_html(text: &str, options: &RenderOptions) -> String {
    if text.trim().is_empty() {
        return EMPTY_PREVIEW.to_string();
    }
    let blocks = parse(text, &options.parse);
    if blocks.is_empty() {
        return EMPTY_PREVIEW.to_string();
    }
    render_blocks(&blocks, options)
}

/// Renders an already-parsed token tree.
pub fn render_blocks(blocks: &[Block], options: &RenderOptions) -> String {
    let mut writer = HtmlWriter {
        out: String::new(),
        theme: options.theme,
        link_depth: 0,
    };
    for block in blocks {
        writer.write_block(block);
    }
    writer.out
}

fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(r"https?://[^\s<>\[\]]+").expect("Invalid URL regex"))
}

struct HtmlWriter {
    out: String,
    theme: Theme,
    /// Nonzero while rendering link content; suppresses autolinking.
    link_depth: usize,
}

impl HtmlWriter {
    fn write_block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, content } => {
                let level = (*level).clamp(1, 6);
                self.out.push_str(&format!("<h{level}>"));
                self.write_inlines(content);
                self.out.push_str(&format!("</h{level}>\n"));
            }
            Block::Paragraph { content } => {
                self.out.push_str("<p>");
                self.write_inlines(content);
                self.out.push_str("</p>\n");
            }
            Block::List {
                ordered,
                start,
                items,
            } => self.write_list(*ordered, *start, items),
            Block::BlockQuote { children } => {
                self.out.push_str("<blockquote>\n");
                for child in children {
                    self.write_block(child);
                }
                self.out.push_str("</blockquote>\n");
            }
            Block::CodeBlock { lang, code } => {
                let lang = lang.as_deref().unwrap_or(highlight::DEFAULT_LANGUAGE);
                self.out
                    .push_str(&highlight::highlight_code(code, lang, self.theme));
            }
            Block::Rule => self.out.push_str("<hr />\n"),
            Block::Html { html } => {
                self.out.push_str(&sanitize::sanitize_block(html));
                self.out.push('\n');
            }
            Block::Table { head, rows } => self.write_table(head, rows),
        }
    }

    fn write_list(&mut self, ordered: bool, start: u64, items: &[ListItem]) {
        if ordered {
            if start != 1 {
                self.out.push_str(&format!("<ol start=\"{start}\">\n"));
            } else {
                self.out.push_str("<ol>\n");
            }
        } else {
            self.out.push_str("<ul>\n");
        }
        for item in items {
            self.out.push_str("<li>");
            self.write_inlines(&item.content);
            if !item.children.is_empty() {
                self.out.push('\n');
                for child in &item.children {
                    self.write_block(child);
                }
            }
            self.out.push_str("</li>\n");
        }
        self.out.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
    }

    fn write_table(&mut self, head: &[Vec<Inline>], rows: &[Vec<Vec<Inline>>]) {
        self.out.push_str("<table>\n<thead>\n<tr>");
        for cell in head {
            self.out.push_str("<th>");
            self.write_inlines(cell);
            self.out.push_str("</th>");
        }
        self.out.push_str("</tr>\n</thead>\n");
        if !rows.is_empty() {
            self.out.push_str("<tbody>\n");
            for row in rows {
                self.out.push_str("<tr>");
                for cell in row {
                    self.out.push_str("<td>");
                    self.write_inlines(cell);
                    self.out.push_str("</td>");
                }
                self.out.push_str("</tr>\n");
            }
            self.out.push_str("</tbody>\n");
        }
        self.out.push_str("</table>\n");
    }

    fn write_inlines(&mut self, nodes: &[Inline]) {
        for node in nodes {
            self.write_inline(node);
        }
    }

    fn write_inline(&mut self, node: &Inline) {
        match node {
            Inline::Text(text) => self.write_text(text),
            Inline::Strong(inner) => self.wrap_inlines("strong", inner),
            Inline::Emphasis(inner) => self.wrap_inlines("em", inner),
            Inline::Strikethrough(inner) => self.wrap_inlines("del", inner),
            Inline::Code(code) => {
                self.out.push_str("<code>");
                let decoded = html_escape::decode_html_entities(code);
                self.out.push_str(&html_escape::encode_text(&decoded));
                self.out.push_str("</code>");
            }
            Inline::Link {
                href,
                title,
                content,
            } => {
                self.out.push_str("<a href=\"");
                self.out.push_str(&encode_attr(&safe_href(href)));
                self.out.push('"');
                if !title.is_empty() {
                    self.out.push_str(" title=\"");
                    self.out.push_str(&encode_attr(title));
                    self.out.push('"');
                }
                self.out.push('>');
                self.link_depth += 1;
                self.write_inlines(content);
                self.link_depth -= 1;
                self.out.push_str("</a>");
            }
            Inline::Image { src, alt } => {
                self.out.push_str("<img src=\"");
                self.out.push_str(&encode_attr(&safe_href(src)));
                self.out.push_str("\" alt=\"");
                self.out.push_str(&encode_attr(alt));
                self.out.push_str("\" />");
            }
            Inline::Html(html) => {
                // Tokens without any allow-listed tag are dropped before
                // the sanitizer ever sees them.
                if sanitize::contains_allowed_tag(html, sanitize::INLINE_TAGS)
                    || sanitize::contains_allowed_closing_tag(html, sanitize::INLINE_TAGS)
                {
                    self.out.push_str(&sanitize::sanitize_inline(html));
                }
            }
            Inline::HardBreak => self.out.push_str("<br />\n"),
            Inline::SoftBreak => self.out.push('\n'),
        }
    }

    fn wrap_inlines(&mut self, tag: &str, inner: &[Inline]) {
        self.out.push_str(&format!("<{tag}>"));
        self.write_inlines(inner);
        self.out.push_str(&format!("</{tag}>"));
    }

    /// Plain text: escape, and turn bare URLs into links unless already
    /// inside one.
    fn write_text(&mut self, text: &str) {
        if self.link_depth > 0 || !text.contains("http") {
            self.out.push_str(&html_escape::encode_text(text));
            return;
        }
        let mut last = 0;
        for m in url_regex().find_iter(text) {
            self.out
                .push_str(&html_escape::encode_text(&text[last..m.start()]));
            let url = m.as_str();
            self.out.push_str("<a href=\"");
            self.out.push_str(&encode_attr(url));
            self.out.push_str("\">");
            self.out.push_str(&html_escape::encode_text(url));
            self.out.push_str("</a>");
            last = m.end();
        }
        self.out.push_str(&html_escape::encode_text(&text[last..]));
    }
}

fn encode_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Refuses executable URL schemes in hrefs the renderer itself builds.
fn safe_href(href: &str) -> String {
    let lowered: String = href
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("vbscript:")
        || lowered.starts_with("data:")
    {
        "#".to_string()
    } else {
        href.to_string()
    }
}
