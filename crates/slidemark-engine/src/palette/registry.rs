//! The static slash-command registry.
//!
//! Commands are immutable records; nothing here changes at runtime. The
//! icon field names an icon in the host's icon set.

use crate::editing::commands::{Cmd, WrapStyle};

/// What a palette entry does when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Text,
    Heading1,
    Heading2,
    Heading3,
    Bold,
    Italic,
    InlineCode,
    BulletList,
    NumberedList,
    Quote,
    CodeBlock,
    Link,
    Image,
}

impl CommandKind {
    /// The editing command this entry dispatches, if it edits directly.
    ///
    /// `Text` is a no-op (it exists so "plain text" is discoverable) and
    /// `Image` defers to the host's image picker.
    pub fn command(self) -> Option<Cmd> {
        match self {
            CommandKind::Text => None,
            CommandKind::Heading1 => Some(Cmd::InsertHeading { level: 1 }),
            CommandKind::Heading2 => Some(Cmd::InsertHeading { level: 2 }),
            CommandKind::Heading3 => Some(Cmd::InsertHeading { level: 3 }),
            CommandKind::Bold => Some(Cmd::Wrap(WrapStyle::Bold)),
            CommandKind::Italic => Some(Cmd::Wrap(WrapStyle::Italic)),
            CommandKind::InlineCode => Some(Cmd::Wrap(WrapStyle::InlineCode)),
            CommandKind::BulletList => Some(Cmd::InsertList { ordered: false }),
            CommandKind::NumberedList => Some(Cmd::InsertList { ordered: true }),
            CommandKind::Quote => Some(Cmd::InsertQuote),
            CommandKind::CodeBlock => Some(Cmd::InsertCodeBlock),
            CommandKind::Link => Some(Cmd::InsertLink),
            CommandKind::Image => None,
        }
    }
}

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashCommand {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub search_terms: &'static [&'static str],
    pub kind: CommandKind,
}

/// The full registry, in display order.
pub const COMMANDS: &[SlashCommand] = &[
    SlashCommand {
        title: "Text",
        description: "Just start typing with plain text",
        icon: "text",
        search_terms: &["p", "paragraph", "plain"],
        kind: CommandKind::Text,
    },
    SlashCommand {
        title: "Heading 1",
        description: "Big section heading",
        icon: "heading-1",
        search_terms: &["title", "big", "large", "h1"],
        kind: CommandKind::Heading1,
    },
    SlashCommand {
        title: "Heading 2",
        description: "Medium section heading",
        icon: "heading-2",
        search_terms: &["subtitle", "medium", "h2"],
        kind: CommandKind::Heading2,
    },
    SlashCommand {
        title: "Heading 3",
        description: "Small section heading",
        icon: "heading-3",
        search_terms: &["subtitle", "small", "h3"],
        kind: CommandKind::Heading3,
    },
    SlashCommand {
        title: "Bold",
        description: "Make text bold",
        icon: "bold",
        search_terms: &["strong", "b"],
        kind: CommandKind::Bold,
    },
    SlashCommand {
        title: "Italic",
        description: "Make text italic",
        icon: "italic",
        search_terms: &["emphasis", "em", "i"],
        kind: CommandKind::Italic,
    },
    SlashCommand {
        title: "Inline Code",
        description: "Inline code snippet",
        icon: "code",
        search_terms: &["code", "monospace"],
        kind: CommandKind::InlineCode,
    },
    SlashCommand {
        title: "Bullet List",
        description: "Create a simple bullet list",
        icon: "list",
        search_terms: &["unordered", "point", "ul"],
        kind: CommandKind::BulletList,
    },
    SlashCommand {
        title: "Numbered List",
        description: "Create a list with numbering",
        icon: "list-ordered",
        search_terms: &["ordered", "numbers", "ol"],
        kind: CommandKind::NumberedList,
    },
    SlashCommand {
        title: "Quote",
        description: "Capture a quote",
        icon: "text-quote",
        search_terms: &["blockquote", "citation"],
        kind: CommandKind::Quote,
    },
    SlashCommand {
        title: "Code Block",
        description: "Capture a code snippet",
        icon: "square-code",
        search_terms: &["codeblock", "fence", "pre"],
        kind: CommandKind::CodeBlock,
    },
    SlashCommand {
        title: "Link",
        description: "Insert a hyperlink",
        icon: "link",
        search_terms: &["url", "href", "anchor"],
        kind: CommandKind::Link,
    },
    SlashCommand {
        title: "Image",
        description: "Embed an uploaded image",
        icon: "image",
        search_terms: &["photo", "picture", "media", "img"],
        kind: CommandKind::Image,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_thirteen_commands() {
        assert_eq!(COMMANDS.len(), 13);
    }

    #[test]
    fn titles_are_unique() {
        let mut titles: Vec<_> = COMMANDS.iter().map(|c| c.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), COMMANDS.len());
    }

    #[test]
    fn only_text_and_image_lack_a_direct_command() {
        for cmd in COMMANDS {
            let direct = cmd.kind.command();
            match cmd.kind {
                CommandKind::Text | CommandKind::Image => assert!(direct.is_none()),
                _ => assert!(direct.is_some(), "{} should edit directly", cmd.title),
            }
        }
    }

    #[test]
    fn heading_commands_carry_their_level() {
        assert_eq!(
            CommandKind::Heading2.command(),
            Some(Cmd::InsertHeading { level: 2 })
        );
    }
}
