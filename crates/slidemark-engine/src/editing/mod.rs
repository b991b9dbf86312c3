//! Editing core: the document buffer and the text mutation engine.
//!
//! All edits flow through [`Cmd`] values applied to a [`Document`]. A
//! command is planned as a pure function of the current text and
//! selection, compiled to an xi-rope delta, and applied atomically; the
//! resulting [`Patch`] tells the host what changed and where the
//! selection landed. Cursor placement on a live widget is the host's job,
//! after its repaint, via the session's pending-selection handoff.

pub mod commands;
pub mod document;
pub mod patch;
pub mod text;
pub mod widget;

pub use commands::{Cmd, WrapStyle, LINK_URL_PLACEHOLDER};
pub use document::Document;
pub use patch::Patch;
pub use widget::{HeadlessWidget, MenuPosition, TextWidget, WidgetRect};
