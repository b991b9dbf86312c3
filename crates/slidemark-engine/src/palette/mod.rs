//! The slash-command palette.
//!
//! A `/` typed at the start of an empty line opens the menu; everything
//! typed after it (until a space) is the filter query. The palette state
//! is recomputed from the document text and cursor on every keystroke, so
//! it can never drift from what the user actually sees.

pub mod filter;
pub mod registry;

use std::ops::Range;

use crate::autopair::Key;
use crate::editing::text::{line_index, line_start, snap_to_char_boundary};
use crate::editing::widget::{MenuPosition, WidgetRect};

pub use filter::filter_commands;
pub use registry::{CommandKind, SlashCommand, COMMANDS};

/// Approximate rendered line height used for menu anchoring.
pub const LINE_HEIGHT: f32 = 24.0;

/// An in-progress slash token at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashQuery {
    /// Offset of the `/` (equals the current line start).
    pub start: usize,
    /// Text between the `/` and the cursor.
    pub query: String,
}

/// Finds a slash token ending at the cursor, if the current line is one.
///
/// The line up to the cursor must begin with `/` and contain no
/// whitespace after it; a space anywhere in the token dissolves it back
/// into ordinary text.
pub fn detect_slash_query(text: &str, cursor: usize) -> Option<SlashQuery> {
    let cursor = snap_to_char_boundary(text, cursor);
    let start = line_start(text, cursor);
    let line = &text[start..cursor];
    let rest = line.strip_prefix('/')?;
    if rest.chars().any(char::is_whitespace) {
        return None;
    }
    Some(SlashQuery {
        start,
        query: rest.to_string(),
    })
}

/// Palette state: closed, or open with a live query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaletteState {
    #[default]
    Inactive,
    Active {
        query: String,
        selected: usize,
    },
}

/// Outcome of feeding a key to the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteKeyOutcome {
    /// Palette is closed; the key means nothing to it.
    Inactive,
    /// Navigation key consumed; the widget must not see it.
    Consumed,
    /// Enter on the highlighted entry. The caller removes the slash token
    /// and runs the command.
    Execute(&'static SlashCommand),
    /// Escape pressed; palette closed with no side effects.
    Dismissed,
}

/// The slash-command palette state machine.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    state: PaletteState,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PaletteState::Active { .. })
    }

    pub fn query(&self) -> Option<&str> {
        match &self.state {
            PaletteState::Active { query, .. } => Some(query),
            PaletteState::Inactive => None,
        }
    }

    pub fn selected(&self) -> usize {
        match &self.state {
            PaletteState::Active { selected, .. } => *selected,
            PaletteState::Inactive => 0,
        }
    }

    /// Recomputes the state from the document text and cursor.
    pub fn sync(&mut self, text: &str, cursor: usize) {
        match detect_slash_query(text, cursor) {
            Some(slash) => {
                let selected = match &self.state {
                    // Keep the highlight while the query grows or shrinks,
                    // clamped later by the filtered list length.
                    PaletteState::Active { query, selected } if *query == slash.query => *selected,
                    PaletteState::Active { selected, .. } => {
                        let n = filter_commands(&slash.query, COMMANDS).len();
                        (*selected).min(n.saturating_sub(1))
                    }
                    PaletteState::Inactive => {
                        log::debug!("palette opened with query {:?}", slash.query);
                        0
                    }
                };
                self.state = PaletteState::Active {
                    query: slash.query,
                    selected,
                };
            }
            None => {
                if self.is_active() {
                    log::debug!("palette closed");
                }
                self.state = PaletteState::Inactive;
            }
        }
    }

    /// Closes the palette regardless of the text.
    pub fn dismiss(&mut self) {
        self.state = PaletteState::Inactive;
    }

    /// Commands matching the current query, ranked.
    pub fn filtered(&self) -> Vec<&'static SlashCommand> {
        match &self.state {
            PaletteState::Active { query, .. } => filter_commands(query, COMMANDS),
            PaletteState::Inactive => Vec::new(),
        }
    }

    /// Feeds a keydown to the palette. Up/Down/Enter are reserved for
    /// menu navigation while active; Escape closes.
    pub fn handle_key(&mut self, key: &Key) -> PaletteKeyOutcome {
        let PaletteState::Active { query, selected } = &mut self.state else {
            return PaletteKeyOutcome::Inactive;
        };
        let matches = filter_commands(query, COMMANDS);
        if matches.is_empty() {
            if *key == Key::Escape {
                self.dismiss();
                return PaletteKeyOutcome::Dismissed;
            }
            return PaletteKeyOutcome::Inactive;
        }

        match key {
            Key::ArrowUp => {
                *selected = (*selected + matches.len() - 1) % matches.len();
                PaletteKeyOutcome::Consumed
            }
            Key::ArrowDown => {
                *selected = (*selected + 1) % matches.len();
                PaletteKeyOutcome::Consumed
            }
            Key::Enter => {
                let command = matches[(*selected).min(matches.len() - 1)];
                self.dismiss();
                PaletteKeyOutcome::Execute(command)
            }
            Key::Escape => {
                self.dismiss();
                PaletteKeyOutcome::Dismissed
            }
            _ => PaletteKeyOutcome::Inactive,
        }
    }

    /// Dropdown anchor just below the cursor's line.
    pub fn anchor(&self, text: &str, cursor: usize, rect: &WidgetRect) -> MenuPosition {
        let line = line_index(text, cursor) as f32;
        MenuPosition {
            top: rect.top + (line + 1.0) * LINE_HEIGHT,
            left: rect.left + 16.0,
        }
    }
}

/// Range of the in-progress slash token (for deletion before execute).
pub fn slash_token_range(text: &str, cursor: usize) -> Option<Range<usize>> {
    detect_slash_query(text, cursor).map(|q| q.start..snap_to_char_boundary(text, cursor))
}
