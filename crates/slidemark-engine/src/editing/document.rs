use xi_rope::Rope;

use super::commands::{plan_command, Cmd};
use super::patch::Patch;
use super::text::{clamp_selection, line_end, line_start};

/// The markdown source being edited.
///
/// A single rope buffer is the only mutable state: edits replace the
/// buffer atomically through [`Document::apply`], never in place. The
/// selection is a pair of byte offsets into the buffer, kept ordered, in
/// range, and on char boundaries.
pub struct Document {
    buffer: Rope,
    selection: std::ops::Range<usize>,
    version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::from_str("")
    }

    pub fn from_str(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            selection: len..len,
            version: 0,
        }
    }

    /// Creates a document from raw bytes, rejecting invalid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_str(text))
    }

    /// Current text content.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> std::ops::Range<usize> {
        self.selection.clone()
    }

    /// Sets the selection, clamping to the buffer and snapping to char
    /// boundaries. Out-of-range input is expected whenever the widget's
    /// view of the text lags an edit.
    pub fn set_selection(&mut self, selection: std::ops::Range<usize>) {
        let text = self.text();
        self.selection = clamp_selection(&text, &selection);
    }

    /// Byte offset of the start of the line containing the selection
    /// start.
    pub fn current_line_start(&self) -> usize {
        let text = self.text();
        line_start(&text, self.selection.start)
    }

    /// Byte offset of the end of the line containing the selection start.
    pub fn current_line_end(&self) -> usize {
        let text = self.text();
        line_end(&text, self.selection.start)
    }

    /// Replaces the whole text, keeping the selection where it still
    /// fits. This is the path for text typed directly into the widget;
    /// structured edits go through [`Document::apply`].
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        self.selection = clamp_selection(text, &self.selection);
        self.version += 1;
    }

    /// Applies a command: plan, compile to a delta, replace the buffer,
    /// move the selection, bump the version.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let plan = plan_command(self, &cmd);

        let mut builder = xi_rope::delta::Builder::new(self.buffer.len());
        builder.replace(plan.replace.clone(), Rope::from(plan.insert.as_str()));
        let delta = builder.build();
        self.buffer = delta.apply(&self.buffer);

        let text = self.text();
        let new_selection = clamp_selection(&text, &plan.selection_after);
        self.selection = new_selection.clone();
        self.version += 1;

        Patch {
            changed: plan.replace.start..plan.replace.start + plan.insert.len(),
            new_selection,
            version: self.version,
        }
    }

    /// Slices the buffer, clamping the range to the document bounds.
    pub fn slice_to_cow(&self, range: std::ops::Range<usize>) -> std::borrow::Cow<'_, str> {
        let len = self.buffer.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.buffer.slice_to_cow(start..end)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Document {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            selection: self.selection.clone(),
            version: self.version,
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        // Buffer compared as text; the rope's internal shape is derived.
        self.buffer.to_string() == other.buffer.to_string()
            && self.selection == other.selection
            && self.version == other.version
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.buffer.len())
            .field("selection", &self.selection)
            .field("version", &self.version)
            .finish()
    }
}
