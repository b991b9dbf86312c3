use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

use super::token::{Block, Inline, ListItem};

/// Parser configuration, passed explicitly into every parse call.
///
/// There is deliberately no module-level parser state: two calls with the
/// same text and options produce identical trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// GFM tables.
    pub tables: bool,
    /// GFM strikethrough (`~~text~~`).
    pub strikethrough: bool,
    /// Treat single source line breaks as hard breaks.
    pub hard_breaks: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            hard_breaks: false,
        }
    }
}

impl ParseOptions {
    fn to_cmark_options(self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        opts
    }
}

/// Parses markdown into a block token tree.
///
/// The tree is always rebuilt from scratch; there is no incremental
/// reparse and no state carried between calls.
pub fn parse(text: &str, options: &ParseOptions) -> Vec<Block> {
    let parser = Parser::new_ext(text, options.to_cmark_options());
    let mut builder = TreeBuilder::new(options.hard_breaks);
    for event in parser {
        builder.push(event);
    }
    builder.finish()
}

/// An open block-level container on the builder stack.
#[derive(Debug)]
enum Frame {
    Paragraph {
        content: Vec<Inline>,
    },
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Quote {
        children: Vec<Block>,
    },
    List {
        ordered: bool,
        start: u64,
        items: Vec<ListItem>,
    },
    Item {
        item: ListItem,
    },
    CodeBlock {
        lang: Option<String>,
        code: String,
    },
    HtmlBlock {
        html: String,
    },
    Table {
        head: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
        current_row: Vec<Vec<Inline>>,
        current_cell: Option<Vec<Inline>>,
    },
}

/// An open inline-level container (strong, emphasis, link, ...).
#[derive(Debug)]
struct InlineFrame {
    kind: InlineKind,
    children: Vec<Inline>,
}

#[derive(Debug)]
enum InlineKind {
    Strong,
    Emphasis,
    Strikethrough,
    Link { href: String, title: String },
    Image { src: String },
}

/// Folds the pulldown-cmark event stream into the token tree.
///
/// Maintains two stacks: block containers and inline containers. Inline
/// tokens sink into the innermost open inline frame, or failing that into
/// the innermost block frame that accepts inline content.
struct TreeBuilder {
    hard_breaks: bool,
    blocks: Vec<Block>,
    stack: Vec<Frame>,
    inline_stack: Vec<InlineFrame>,
}

impl TreeBuilder {
    fn new(hard_breaks: bool) -> Self {
        Self {
            hard_breaks,
            blocks: Vec::new(),
            stack: Vec::new(),
            inline_stack: Vec::new(),
        }
    }

    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.sink(Inline::Code(code.to_string())),
            Event::InlineHtml(html) => self.sink(Inline::Html(html.to_string())),
            Event::Html(html) => self.html_text(&html),
            Event::SoftBreak => {
                let node = if self.hard_breaks {
                    Inline::HardBreak
                } else {
                    Inline::SoftBreak
                };
                self.sink(node);
            }
            Event::HardBreak => self.sink(Inline::HardBreak),
            Event::Rule => self.close_block(Block::Rule),
            // Task markers, footnotes, math: outside the supported subset.
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        // A well-formed event stream leaves both stacks empty. Drain
        // whatever remains so a parser hiccup degrades instead of
        // dropping text.
        while let Some(frame) = self.inline_stack.pop() {
            let node = close_inline(frame);
            self.sink_into_block(node);
        }
        while let Some(frame) = self.stack.pop() {
            if let Some(block) = close_frame(frame) {
                self.route_block(block);
            }
        }
        self.blocks
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.stack.push(Frame::Paragraph {
                content: Vec::new(),
            }),
            Tag::Heading { level, .. } => self.stack.push(Frame::Heading {
                level: heading_level(level),
                content: Vec::new(),
            }),
            Tag::BlockQuote(_) => self.stack.push(Frame::Quote {
                children: Vec::new(),
            }),
            Tag::List(start) => self.stack.push(Frame::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
                items: Vec::new(),
            }),
            Tag::Item => self.stack.push(Frame::Item {
                item: ListItem::default(),
            }),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        let tag = info.split_whitespace().next().unwrap_or("");
                        if tag.is_empty() {
                            None
                        } else {
                            Some(tag.to_string())
                        }
                    }
                    CodeBlockKind::Indented => None,
                };
                self.stack.push(Frame::CodeBlock {
                    lang,
                    code: String::new(),
                });
            }
            Tag::HtmlBlock => self.stack.push(Frame::HtmlBlock {
                html: String::new(),
            }),
            Tag::Table(_) => self.stack.push(Frame::Table {
                head: Vec::new(),
                rows: Vec::new(),
                current_row: Vec::new(),
                current_cell: None,
            }),
            Tag::TableHead | Tag::TableRow => {
                if let Some(Frame::Table { current_row, .. }) = self.stack.last_mut() {
                    current_row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(Frame::Table { current_cell, .. }) = self.stack.last_mut() {
                    *current_cell = Some(Vec::new());
                }
            }
            Tag::Strong => self.open_inline(InlineKind::Strong),
            Tag::Emphasis => self.open_inline(InlineKind::Emphasis),
            Tag::Strikethrough => self.open_inline(InlineKind::Strikethrough),
            Tag::Link {
                dest_url, title, ..
            } => self.open_inline(InlineKind::Link {
                href: dest_url.to_string(),
                title: title.to_string(),
            }),
            Tag::Image { dest_url, .. } => self.open_inline(InlineKind::Image {
                src: dest_url.to_string(),
            }),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if let Some(Frame::Paragraph { content }) = self.pop_frame() {
                    self.close_paragraph(content);
                }
            }
            TagEnd::Heading(_) => {
                if let Some(Frame::Heading { level, content }) = self.pop_frame() {
                    self.close_block(Block::Heading { level, content });
                }
            }
            TagEnd::BlockQuote(_) => {
                if let Some(Frame::Quote { children }) = self.pop_frame() {
                    self.close_block(Block::BlockQuote { children });
                }
            }
            TagEnd::List(_) => {
                if let Some(Frame::List {
                    ordered,
                    start,
                    items,
                }) = self.pop_frame()
                {
                    self.close_block(Block::List {
                        ordered,
                        start,
                        items,
                    });
                }
            }
            TagEnd::Item => {
                if let Some(Frame::Item { item }) = self.pop_frame() {
                    if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                        items.push(item);
                    }
                }
            }
            TagEnd::CodeBlock => {
                if let Some(Frame::CodeBlock { lang, code }) = self.pop_frame() {
                    self.close_block(Block::CodeBlock { lang, code });
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(Frame::HtmlBlock { html }) = self.pop_frame() {
                    self.close_block(Block::Html { html });
                }
            }
            TagEnd::Table => {
                if let Some(Frame::Table { head, rows, .. }) = self.pop_frame() {
                    self.close_block(Block::Table { head, rows });
                }
            }
            TagEnd::TableHead => {
                if let Some(Frame::Table {
                    head, current_row, ..
                }) = self.stack.last_mut()
                {
                    *head = std::mem::take(current_row);
                }
            }
            TagEnd::TableRow => {
                if let Some(Frame::Table {
                    rows, current_row, ..
                }) = self.stack.last_mut()
                {
                    rows.push(std::mem::take(current_row));
                }
            }
            TagEnd::TableCell => {
                if let Some(Frame::Table {
                    current_row,
                    current_cell,
                    ..
                }) = self.stack.last_mut()
                {
                    current_row.push(current_cell.take().unwrap_or_default());
                }
            }
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough | TagEnd::Link
            | TagEnd::Image => {
                if let Some(frame) = self.inline_stack.pop() {
                    let node = close_inline(frame);
                    self.sink(node);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(Frame::CodeBlock { code, .. }) => code.push_str(text),
            Some(Frame::HtmlBlock { html }) => html.push_str(text),
            _ => self.sink(Inline::Text(text.to_string())),
        }
    }

    fn html_text(&mut self, html: &str) {
        match self.stack.last_mut() {
            Some(Frame::HtmlBlock { html: buf }) => buf.push_str(html),
            // Block HTML outside an HtmlBlock frame: emit directly.
            _ => self.close_block(Block::Html {
                html: html.to_string(),
            }),
        }
    }

    fn open_inline(&mut self, kind: InlineKind) {
        self.inline_stack.push(InlineFrame {
            kind,
            children: Vec::new(),
        });
    }

    /// Delivers an inline token to the innermost open container.
    fn sink(&mut self, node: Inline) {
        if let Some(frame) = self.inline_stack.last_mut() {
            frame.children.push(node);
        } else {
            self.sink_into_block(node);
        }
    }

    fn sink_into_block(&mut self, node: Inline) {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::Paragraph { content }
                | Frame::Heading { content, .. }
                | Frame::Item {
                    item: ListItem { content, .. },
                } => {
                    content.push(node);
                    return;
                }
                Frame::Table { current_cell, .. } => {
                    if let Some(cell) = current_cell {
                        cell.push(node);
                        return;
                    }
                }
                _ => {}
            }
        }
        // Stray inline outside any block: wrap it in a paragraph rather
        // than dropping the text.
        self.blocks.push(Block::Paragraph {
            content: vec![node],
        });
    }

    fn pop_frame(&mut self) -> Option<Frame> {
        self.stack.pop()
    }

    /// Routes a finished paragraph. Inside a tight list item the first
    /// paragraph becomes the item's own content.
    fn close_paragraph(&mut self, content: Vec<Inline>) {
        if let Some(Frame::Item { item }) = self.stack.last_mut() {
            if item.content.is_empty() && item.children.is_empty() {
                item.content = content;
                return;
            }
        }
        self.close_block(Block::Paragraph { content });
    }

    fn close_block(&mut self, block: Block) {
        self.route_block(block);
    }

    fn route_block(&mut self, block: Block) {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::Quote { children } => {
                    children.push(block);
                    return;
                }
                Frame::Item { item } => {
                    item.children.push(block);
                    return;
                }
                _ => {}
            }
        }
        self.blocks.push(block);
    }
}

fn close_inline(frame: InlineFrame) -> Inline {
    match frame.kind {
        InlineKind::Strong => Inline::Strong(frame.children),
        InlineKind::Emphasis => Inline::Emphasis(frame.children),
        InlineKind::Strikethrough => Inline::Strikethrough(frame.children),
        InlineKind::Link { href, title } => Inline::Link {
            href,
            title,
            content: frame.children,
        },
        InlineKind::Image { src } => Inline::Image {
            alt: Inline::flatten_text(&frame.children),
            src,
        },
    }
}

fn close_frame(frame: Frame) -> Option<Block> {
    match frame {
        Frame::Paragraph { content } => Some(Block::Paragraph { content }),
        Frame::Heading { level, content } => Some(Block::Heading { level, content }),
        Frame::Quote { children } => Some(Block::BlockQuote { children }),
        Frame::List {
            ordered,
            start,
            items,
        } => Some(Block::List {
            ordered,
            start,
            items,
        }),
        Frame::Item { .. } => None,
        Frame::CodeBlock { lang, code } => Some(Block::CodeBlock { lang, code }),
        Frame::HtmlBlock { html } => Some(Block::Html { html }),
        Frame::Table { head, rows, .. } => Some(Block::Table { head, rows }),
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
