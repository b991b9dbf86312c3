//! slidemark-engine: the headless core of the slide markdown editor.
//!
//! Four cooperating pieces, all pure over strings and offsets:
//!
//! - **editing**: the document buffer and the text mutation engine
//! - **markdown**: tokenizer and sanitized-HTML preview renderer
//! - **palette / toolbar / autopair**: derived UI state and keystroke
//!   handling for the slash menu, the floating selection toolbar, and
//!   auto-closing pairs
//! - **session**: one mounted editor instance wiring the above to a host
//!   through the [`TextWidget`] seam
//!
//! Everything runs synchronously inside the host's event handlers; the
//! only deferred step is cursor placement after a mutation, which the
//! host flushes once its widget has repainted.

pub mod autopair;
pub mod editing;
pub mod markdown;
pub mod palette;
pub mod session;
pub mod toolbar;

pub use autopair::{Key, KeydownResult, Modifiers};
pub use editing::{Cmd, Document, HeadlessWidget, MenuPosition, Patch, TextWidget, WidgetRect, WrapStyle};
pub use markdown::{parse, render_html, Block, Inline, ListItem, ParseOptions, RenderOptions, Theme};
pub use palette::{detect_slash_query, CommandKind, Palette, PaletteKeyOutcome, SlashCommand, COMMANDS};
pub use session::{EditorOptions, EditorSession, ImageInsert};
pub use toolbar::{SelectionToolbar, ToolbarAction};
