//! Fenced-code syntax highlighting.
//!
//! Highlighting is keyed by the fence's language tag and by the ambient
//! light/dark theme. Unknown languages fall back to plain text and any
//! highlighter error falls back to an escaped code block, so a bad fence
//! can never break the preview.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Ambient UI theme. Only the code highlight colors depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    fn syntect_name(self) -> &'static str {
        match self {
            Theme::Light => "InspiredGitHub",
            Theme::Dark => "base16-ocean.dark",
        }
    }
}

/// Language used when a fence carries no tag.
pub const DEFAULT_LANGUAGE: &str = "text";

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Renders a code block to highlighted HTML.
pub fn highlight_code(code: &str, lang: &str, theme: Theme) -> String {
    let syntax = SYNTAX_SET
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    let Some(highlight_theme) = THEME_SET.themes.get(theme.syntect_name()) else {
        return plain_code_block(code, lang);
    };

    match highlighted_html_for_string(code, &SYNTAX_SET, syntax, highlight_theme) {
        Ok(html) => html,
        Err(err) => {
            log::debug!("highlight failed for language {lang:?}: {err}");
            plain_code_block(code, lang)
        }
    }
}

/// Best-effort language detection for a pasted snippet.
///
/// First-line heuristics only (shebangs, XML/PHP prologues and the like);
/// returns the fence tag to use, or `None` when the snippet can't be
/// classified and the fence should stay untagged.
pub fn detect_language(code: &str) -> Option<String> {
    let first_line = code.lines().next()?;
    let syntax = SYNTAX_SET.find_syntax_by_first_line(first_line)?;
    syntax
        .file_extensions
        .first()
        .map(|extension| extension.to_string())
}

/// Escaped, unhighlighted fallback.
pub(crate) fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>\n",
        html_escape::encode_double_quoted_attribute(lang),
        html_escape::encode_text(code)
    )
}
