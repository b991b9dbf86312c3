//! Markdown tokenizer and preview renderer.
//!
//! Parsing produces a closed token tree ([`Block`]/[`Inline`]); rendering
//! walks it exhaustively into sanitized HTML. Both are pure functions of
//! their inputs, rebuilt from scratch on every document change.

pub mod highlight;
pub mod html;
pub mod parser;
pub mod sanitize;
pub mod token;

pub use highlight::{detect_language, highlight_code, Theme, DEFAULT_LANGUAGE};
pub use html::{render_blocks, render_html, RenderOptions, EMPTY_PREVIEW};
pub use parser::{parse, ParseOptions};
pub use token::{Block, Inline, ListItem};
