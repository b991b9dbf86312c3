//! Allow-list HTML sanitizer for raw markdown HTML.
//!
//! Raw HTML reaching the preview is never emitted verbatim. Tags and
//! attributes outside the fixed allow-lists are stripped, and container
//! tags that could carry executable content are dropped together with
//! everything inside them. Sanitization always runs; there is no
//! environment here without it.

use std::borrow::Cow;

/// Tags allowed in inline raw HTML.
pub const INLINE_TAGS: &[&str] = &["span", "img", "sup", "sub", "br"];

/// Tags allowed in block-level raw HTML.
pub const BLOCK_TAGS: &[&str] = &["span", "img", "sup", "sub", "br", "p", "div"];

/// Attributes preserved on allowed tags.
pub const ALLOWED_ATTRS: &[&str] = &["style", "src", "alt", "width", "height", "title"];

/// Tags whose entire content is removed, not just the tag itself.
const DROP_CONTENT_TAGS: &[&str] = &[
    "script", "style", "iframe", "noscript", "object", "embed", "textarea", "title",
];

/// Tags with no closing counterpart; always emitted self-closed.
const VOID_TAGS: &[&str] = &["img", "br"];

/// Sanitizes inline raw HTML.
pub fn sanitize_inline(html: &str) -> String {
    sanitize(html, INLINE_TAGS)
}

/// Sanitizes block-level raw HTML.
pub fn sanitize_block(html: &str) -> String {
    sanitize(html, BLOCK_TAGS)
}

/// Pre-filter: does the fragment contain at least one allow-listed
/// opening tag? Inline raw HTML failing this test is dropped outright,
/// which keeps stray `<things like this>` out of the preview without
/// paying for a sanitizer pass.
pub fn contains_allowed_tag(html: &str, allowed: &[&str]) -> bool {
    let mut scanner = Scanner::new(html);
    while let Some(token) = scanner.next_token() {
        if let Token::Tag(tag) = token {
            if !tag.closing && allowed.contains(&tag.name.as_str()) {
                return true;
            }
        }
    }
    false
}

/// Companion to [`contains_allowed_tag`] for bare closing tags.
///
/// The markdown tokenizer delivers inline HTML tag by tag, so `</span>`
/// arrives as its own token. Dropping it would unbalance a span kept by
/// the opening-tag filter.
pub fn contains_allowed_closing_tag(html: &str, allowed: &[&str]) -> bool {
    let mut scanner = Scanner::new(html);
    while let Some(token) = scanner.next_token() {
        if let Token::Tag(tag) = token {
            if tag.closing && allowed.contains(&tag.name.as_str()) {
                return true;
            }
        }
    }
    false
}

fn sanitize(html: &str, allowed: &[&str]) -> String {
    let mut out = String::with_capacity(html.len());
    let mut scanner = Scanner::new(html);
    while let Some(token) = scanner.next_token() {
        match token {
            Token::Text(text) => {
                // Text may arrive pre-escaped; decode first so entities
                // display as their literal characters, then re-escape.
                let decoded = html_escape::decode_html_entities(text);
                out.push_str(&html_escape::encode_text(&decoded));
            }
            Token::Tag(tag) => {
                if allowed.contains(&tag.name.as_str()) {
                    write_tag(&mut out, &tag);
                } else if !tag.closing && DROP_CONTENT_TAGS.contains(&tag.name.as_str()) {
                    scanner.skip_past_closing(&tag.name);
                }
                // Disallowed tag: stripped, inner content kept.
            }
            Token::Comment => {}
        }
    }
    out
}

fn write_tag(out: &mut String, tag: &ParsedTag) {
    if tag.closing {
        if !VOID_TAGS.contains(&tag.name.as_str()) {
            out.push_str("</");
            out.push_str(&tag.name);
            out.push('>');
        }
        return;
    }

    out.push('<');
    out.push_str(&tag.name);
    for (name, value) in &tag.attrs {
        if !ALLOWED_ATTRS.contains(&name.as_str()) {
            continue;
        }
        if name == "src" && !safe_url(value) {
            continue;
        }
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        let decoded = html_escape::decode_html_entities(value.as_str());
        out.push_str(&html_escape::encode_double_quoted_attribute(&decoded));
        out.push('"');
    }
    if tag.self_closing || VOID_TAGS.contains(&tag.name.as_str()) {
        out.push_str(" />");
    } else {
        out.push('>');
    }
}

/// Rejects URL schemes that execute.
fn safe_url(value: &str) -> bool {
    let v: String = value
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    !(v.starts_with("javascript:") || v.starts_with("vbscript:") || v.starts_with("data:"))
}

#[derive(Debug)]
enum Token<'a> {
    Text(&'a str),
    Tag(ParsedTag),
    Comment,
}

#[derive(Debug)]
struct ParsedTag {
    name: String,
    closing: bool,
    self_closing: bool,
    attrs: Vec<(String, String)>,
}

/// Byte cursor over an HTML fragment. Position restores on a failed tag
/// parse so malformed input falls back to text.
struct Scanner<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Scanner<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        if self.eof() {
            return None;
        }
        if self.peek() == Some(b'<') {
            if self.s[self.i..].starts_with("<!--") {
                match self.s[self.i..].find("-->") {
                    Some(end) => self.i += end + 3,
                    None => self.i = self.s.len(),
                }
                return Some(Token::Comment);
            }
            if self.s[self.i..].starts_with("<!") {
                match self.s[self.i..].find('>') {
                    Some(end) => self.i += end + 1,
                    None => self.i = self.s.len(),
                }
                return Some(Token::Comment);
            }
            let saved = self.i;
            if let Some(tag) = self.parse_tag() {
                return Some(Token::Tag(tag));
            }
            // Bare '<' that opens nothing parseable: treat as text.
            self.i = saved + 1;
            return Some(Token::Text("<"));
        }
        let start = self.i;
        while !self.eof() && self.peek() != Some(b'<') {
            self.i += 1;
        }
        Some(Token::Text(&self.s[start..self.i]))
    }

    fn parse_tag(&mut self) -> Option<ParsedTag> {
        debug_assert_eq!(self.peek(), Some(b'<'));
        self.bump();

        let closing = if self.peek() == Some(b'/') {
            self.bump();
            true
        } else {
            false
        };

        let name_start = self.i;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'-') {
            self.bump();
        }
        if self.i == name_start {
            return None;
        }
        let name = self.s[name_start..self.i].to_ascii_lowercase();

        let mut attrs = Vec::new();
        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return None,
                Some(b'>') => {
                    self.bump();
                    break;
                }
                Some(b'/') => {
                    self.bump();
                    if self.peek() == Some(b'>') {
                        self.bump();
                        self_closing = true;
                        break;
                    }
                }
                Some(_) => {
                    if let Some(attr) = self.parse_attr() {
                        attrs.push(attr);
                    }
                }
            }
        }

        Some(ParsedTag {
            name,
            closing,
            self_closing,
            attrs,
        })
    }

    fn parse_attr(&mut self) -> Option<(String, String)> {
        let name_start = self.i;
        while matches!(self.peek(), Some(b) if !b.is_ascii_whitespace() && b != b'=' && b != b'>' && b != b'/')
        {
            self.bump();
        }
        if self.i == name_start {
            // Unparseable byte; consume it so the attr loop advances.
            self.bump();
            return None;
        }
        let name = self.s[name_start..self.i].to_ascii_lowercase();

        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Some((name, String::new()));
        }
        self.bump();
        self.skip_whitespace();

        let value = match self.peek() {
            Some(q @ (b'"' | b'\'')) => {
                self.bump();
                let start = self.i;
                while !self.eof() && self.peek() != Some(q) {
                    self.bump();
                }
                let value = &self.s[start..self.i];
                self.bump();
                Cow::Borrowed(value)
            }
            _ => {
                let start = self.i;
                while matches!(self.peek(), Some(b) if !b.is_ascii_whitespace() && b != b'>') {
                    self.bump();
                }
                Cow::Borrowed(&self.s[start..self.i])
            }
        };

        Some((name, value.into_owned()))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.bump();
        }
    }

    /// Skips everything up to and including `</name ... >`. Used to drop
    /// the content of script-like containers. Unclosed containers consume
    /// the rest of the input.
    fn skip_past_closing(&mut self, name: &str) {
        let lower = self.s[self.i..].to_ascii_lowercase();
        let needle = format!("</{name}");
        let mut from = 0;
        while let Some(pos) = lower[from..].find(&needle) {
            let at = from + pos;
            let after = lower.as_bytes().get(at + needle.len()).copied();
            if matches!(after, Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | None) {
                match lower[at..].find('>') {
                    Some(gt) => self.i += at + gt + 1,
                    None => self.i = self.s.len(),
                }
                return;
            }
            from = at + needle.len();
        }
        self.i = self.s.len();
    }
}
