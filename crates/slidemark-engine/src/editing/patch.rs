/// Result of applying a command to a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Range of inserted text in the new document.
    pub changed: std::ops::Range<usize>,
    /// Selection after the edit, in new-document offsets.
    pub new_selection: std::ops::Range<usize>,
    /// Document version after the edit.
    pub version: u64,
}
