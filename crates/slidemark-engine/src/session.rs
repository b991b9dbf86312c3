//! The editor session: one mounted editor instance.
//!
//! Owns the document and the derived UI state (palette, toolbar), routes
//! keystrokes, and talks to the host through three narrow channels: the
//! [`TextWidget`] seam, a synchronous `on_change` callback fired after
//! every mutation, and a pending-selection handoff the host flushes after
//! its next repaint. The widget's displayed value must re-render before a
//! new selection can be applied to it, so cursor placement is never done
//! in the same handler as the text update.

use std::ops::Range;

use crate::autopair::{pair_command, shortcut_command, Key, KeydownResult, Modifiers};
use crate::editing::commands::Cmd;
use crate::editing::document::Document;
use crate::editing::patch::Patch;
use crate::editing::widget::{MenuPosition, TextWidget, WidgetRect};
use crate::markdown::{render_html, ParseOptions, RenderOptions, Theme};
use crate::palette::{CommandKind, Palette, PaletteKeyOutcome, SlashCommand};
use crate::toolbar::SelectionToolbar;

/// Host-facing editor configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorOptions {
    pub autopair: bool,
    /// Cmd is the primary modifier instead of Ctrl.
    pub is_mac: bool,
    pub theme: Theme,
    pub parse: ParseOptions,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            autopair: true,
            is_mac: false,
            theme: Theme::default(),
            parse: ParseOptions::default(),
        }
    }
}

/// An image chosen through the host's picker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageInsert {
    pub src: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

type ChangeCallback = Box<dyn FnMut(&str)>;
type ImagePicker = Box<dyn FnMut(&[String]) -> Option<ImageInsert>>;

/// One live editor over a markdown document.
pub struct EditorSession<W: TextWidget> {
    document: Document,
    widget: Option<W>,
    palette: Palette,
    toolbar: SelectionToolbar,
    options: EditorOptions,
    on_change: Option<ChangeCallback>,
    image_urls: Vec<String>,
    image_picker: Option<ImagePicker>,
    pending_selection: Option<Range<usize>>,
}

impl<W: TextWidget> EditorSession<W> {
    pub fn new(text: &str, options: EditorOptions) -> Self {
        Self {
            document: Document::from_str(text),
            widget: None,
            palette: Palette::new(),
            toolbar: SelectionToolbar::new(),
            options,
            on_change: None,
            image_urls: Vec::new(),
            image_picker: None,
            pending_selection: None,
        }
    }

    /// Registers the callback invoked synchronously with the new text
    /// after every mutation.
    pub fn on_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Previously-uploaded image URLs offered by the image picker.
    pub fn set_image_urls(&mut self, urls: Vec<String>) {
        self.image_urls = urls;
    }

    /// Delegates image picking to the host instead of inserting a bare
    /// placeholder tag.
    pub fn set_image_picker(
        &mut self,
        picker: impl FnMut(&[String]) -> Option<ImageInsert> + 'static,
    ) {
        self.image_picker = Some(Box::new(picker));
    }

    pub fn attach_widget(&mut self, widget: W) {
        self.widget = Some(widget);
    }

    pub fn detach_widget(&mut self) -> Option<W> {
        self.pending_selection = None;
        self.widget.take()
    }

    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut W> {
        self.widget.as_mut()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.options.theme = theme;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn toolbar(&self) -> &SelectionToolbar {
        &self.toolbar
    }

    /// Applies a command to the document.
    ///
    /// With a widget attached, the widget's selection is adopted first,
    /// the new text is pushed to the widget, and the new selection is
    /// parked until the host flushes it after repaint. With no widget,
    /// cursor-relative placement is impossible: insertions append at the
    /// end of the document instead, and slash-token removal is a no-op.
    pub fn execute(&mut self, cmd: Cmd) -> Patch {
        if self.widget.is_none() {
            return self.execute_detached(cmd);
        }

        self.adopt_widget_selection();
        let patch = self.document.apply(cmd);
        let text = self.document.text();
        if let Some(widget) = self.widget.as_mut() {
            widget.set_value(&text);
        }
        self.pending_selection = Some(patch.new_selection.clone());
        if let Some(callback) = self.on_change.as_mut() {
            callback(&text);
        }
        patch
    }

    fn execute_detached(&mut self, cmd: Cmd) -> Patch {
        if matches!(cmd, Cmd::RemoveSlashToken) {
            // Deleting relative to an unknown cursor would eat real text.
            return Patch {
                changed: 0..0,
                new_selection: self.document.selection(),
                version: self.document.version(),
            };
        }
        let len = self.document.len();
        self.document.set_selection(len..len);
        let patch = self.document.apply(cmd);
        let text = self.document.text();
        if let Some(callback) = self.on_change.as_mut() {
            callback(&text);
        }
        patch
    }

    /// Adopts text the user typed directly into the widget. Hosts call
    /// this from their input event before recomputing palette and
    /// toolbar state. Does not fire `on_change`: the new text came from
    /// the host, which already has it.
    pub fn set_text(&mut self, text: &str) {
        self.document.set_text(text);
        self.pending_selection = None;
        self.adopt_widget_selection();
    }

    /// Adopts the widget's selection unless an edit is still waiting for
    /// its post-repaint cursor flush, in which case the widget is stale
    /// and the document already holds the authoritative selection.
    fn adopt_widget_selection(&mut self) {
        if self.pending_selection.is_some() {
            return;
        }
        if let Some(widget) = self.widget.as_ref() {
            self.document.set_selection(widget.selection());
        }
    }

    /// The selection parked by the last mutation, for hosts that drive
    /// their widget themselves. Cleared on take.
    pub fn take_pending_selection(&mut self) -> Option<Range<usize>> {
        self.pending_selection.take()
    }

    /// Focuses the widget and applies the parked selection. Call after
    /// the widget has repainted with the new text.
    pub fn flush_pending_cursor(&mut self) {
        if let Some(selection) = self.pending_selection.take() {
            if let Some(widget) = self.widget.as_mut() {
                widget.focus();
                widget.set_selection(selection);
            }
        }
    }

    /// Keydown routing: palette navigation, then shortcuts, then
    /// auto-pairing. Returns whether the host must suppress the default
    /// key behavior.
    pub fn handle_keydown(&mut self, key: &Key, modifiers: &Modifiers) -> KeydownResult {
        match self.palette.handle_key(key) {
            PaletteKeyOutcome::Consumed | PaletteKeyOutcome::Dismissed => {
                return KeydownResult::Handled;
            }
            PaletteKeyOutcome::Execute(command) => {
                self.execute_palette_command(command);
                return KeydownResult::Handled;
            }
            PaletteKeyOutcome::Inactive => {}
        }

        if let Some(cmd) = shortcut_command(key, modifiers, self.options.is_mac) {
            self.execute(cmd);
            return KeydownResult::Handled;
        }

        if self.options.autopair && !modifiers.ctrl && !modifiers.meta && !modifiers.alt {
            if let Key::Character(ch) = key {
                let selection = self.current_selection();
                if let Some(cmd) = pair_command(*ch, &selection) {
                    self.execute(cmd);
                    return KeydownResult::Handled;
                }
            }
        }

        KeydownResult::NotHandled
    }

    /// Recomputes palette and toolbar state after a key-up, mouse-up, or
    /// native selection change.
    pub fn handle_selection_event(&mut self, rect: &WidgetRect) {
        let text = self.document.text();
        let selection = self.current_selection();
        self.palette.sync(&text, selection.end);
        self.toolbar.sync(&text, &selection, rect);
    }

    /// Dropdown anchor for the palette while it is open.
    pub fn palette_anchor(&self, rect: &WidgetRect) -> Option<MenuPosition> {
        if !self.palette.is_active() {
            return None;
        }
        let text = self.document.text();
        let cursor = self.current_selection().end;
        Some(self.palette.anchor(&text, cursor, rect))
    }

    /// Programmatic snippet insertion at the live cursor. This is the
    /// entry point behind the host's document-level insert event.
    pub fn insert_snippet(&mut self, snippet: &str, select_inserted: bool) -> Patch {
        self.execute(Cmd::InsertSnippet {
            text: snippet.to_string(),
            select_inserted,
        })
    }

    /// Inserts a pasted code snippet as a fenced block, auto-detecting
    /// the language tag where possible and leaving the fence untagged
    /// otherwise. The inserted range is selected so the paste is easy to
    /// adjust.
    pub fn insert_code_snippet(&mut self, code: &str) -> Patch {
        let lang = crate::markdown::highlight::detect_language(code).unwrap_or_default();
        let body = code.strip_suffix('\n').unwrap_or(code);
        let snippet = format!("\n\n```{lang}\n{body}\n```\n\n");
        self.insert_snippet(&snippet, true)
    }

    /// Renders the current document to sanitized preview HTML.
    pub fn render_preview(&self) -> String {
        render_html(
            &self.document.text(),
            &RenderOptions {
                theme: self.options.theme,
                parse: self.options.parse,
            },
        )
    }

    fn current_selection(&self) -> Range<usize> {
        if self.pending_selection.is_none() {
            if let Some(widget) = self.widget.as_ref() {
                return widget.selection();
            }
        }
        self.document.selection()
    }

    fn execute_palette_command(&mut self, command: &'static SlashCommand) {
        log::debug!("palette execute: {}", command.title);
        self.execute(Cmd::RemoveSlashToken);
        match command.kind {
            CommandKind::Text => {}
            CommandKind::Image => {
                let choice = match self.image_picker.as_mut() {
                    Some(picker) => picker(&self.image_urls),
                    None => self.image_urls.first().map(|url| ImageInsert {
                        src: url.clone(),
                        ..ImageInsert::default()
                    }),
                };
                if let Some(image) = choice {
                    self.execute(Cmd::InsertImage {
                        src: image.src,
                        alt: image.alt,
                        width: image.width,
                        height: image.height,
                    });
                }
            }
            kind => {
                if let Some(cmd) = kind.command() {
                    self.execute(cmd);
                }
            }
        }
        self.palette.dismiss();
    }
}
