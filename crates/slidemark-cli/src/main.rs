use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use slidemark_config::Config;
use slidemark_engine::{
    markdown, Block as MdBlock, Document, Inline, ListItem, ParseOptions, RenderOptions, Theme,
};
use std::{env, io::stdout, path::PathBuf, process};

struct App {
    path: PathBuf,
    document: Document,
    content: Vec<String>,
    scroll: u16,
    theme: Theme,
    parse: ParseOptions,
}

impl App {
    fn new(path: PathBuf, theme: Theme, parse: ParseOptions) -> Result<Self> {
        let mut app = Self {
            path,
            document: Document::new(),
            content: Vec::new(),
            scroll: 0,
            theme,
            parse,
        };
        app.reload()?;
        Ok(app)
    }

    fn reload(&mut self) -> Result<()> {
        let bytes = std::fs::read(&self.path)?;
        self.document = Document::from_bytes(&bytes)?;
        self.content = render_document_lines(&self.document, &self.parse);
        self.scroll = 0;
        log::debug!(
            "loaded {} ({} bytes, {} preview lines)",
            self.path.display(),
            self.document.len(),
            self.content.len()
        );
        Ok(())
    }

    fn scroll_down(&mut self) {
        let max = self.content.len().saturating_sub(1) as u16;
        self.scroll = (self.scroll + 1).min(max);
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }
}

/// Flattens the parsed token tree into preview lines for the terminal.
fn render_document_lines(document: &Document, parse: &ParseOptions) -> Vec<String> {
    let blocks = markdown::parse(&document.text(), parse);
    if blocks.is_empty() {
        return vec!["Start typing to see your preview...".to_string()];
    }
    let mut lines = Vec::new();
    for block in &blocks {
        push_block_lines(&mut lines, block, 0);
    }
    lines
}

fn push_block_lines(lines: &mut Vec<String>, block: &MdBlock, indent: usize) {
    let pad = "  ".repeat(indent);
    match block {
        MdBlock::Heading { level, content } => {
            let marker = "#".repeat(*level as usize);
            lines.push(format!("{pad}{marker} {}", inline_text(content)));
            lines.push(String::new());
        }
        MdBlock::Paragraph { content } => {
            lines.push(format!("{pad}{}", inline_text(content)));
            lines.push(String::new());
        }
        MdBlock::List {
            ordered,
            start,
            items,
        } => {
            push_list_lines(lines, *ordered, *start, items, indent);
            if indent == 0 {
                lines.push(String::new());
            }
        }
        MdBlock::BlockQuote { children } => {
            let mut inner = Vec::new();
            for child in children {
                push_block_lines(&mut inner, child, 0);
            }
            while inner.last().is_some_and(|l| l.is_empty()) {
                inner.pop();
            }
            for line in inner {
                lines.push(format!("{pad}> {line}"));
            }
            lines.push(String::new());
        }
        MdBlock::CodeBlock { lang, code } => {
            lines.push(format!("{pad}```{}", lang.as_deref().unwrap_or("")));
            lines.extend(code.lines().map(|l| format!("{pad}{l}")));
            lines.push(format!("{pad}```"));
            lines.push(String::new());
        }
        MdBlock::Rule => {
            lines.push(format!("{pad}---"));
            lines.push(String::new());
        }
        MdBlock::Html { html } => {
            lines.extend(html.lines().map(|l| format!("{pad}{l}")));
            lines.push(String::new());
        }
        MdBlock::Table { head, rows } => {
            let render_row =
                |row: &[Vec<Inline>]| -> String {
                    let cells: Vec<String> = row.iter().map(|c| inline_text(c)).collect();
                    format!("{pad}| {} |", cells.join(" | "))
                };
            lines.push(render_row(head));
            lines.push(format!("{pad}|{}|", "---|".repeat(head.len())));
            for row in rows {
                lines.push(render_row(row));
            }
            lines.push(String::new());
        }
    }
}

fn push_list_lines(
    lines: &mut Vec<String>,
    ordered: bool,
    start: u64,
    items: &[ListItem],
    indent: usize,
) {
    let pad = "  ".repeat(indent);
    for (i, item) in items.iter().enumerate() {
        let marker = if ordered {
            format!("{}.", start + i as u64)
        } else {
            "•".to_string()
        };
        lines.push(format!("{pad}{marker} {}", inline_text(&item.content)));
        for child in &item.children {
            push_block_lines(lines, child, indent + 1);
        }
    }
}

/// Inline tokens back to display text with their markers.
fn inline_text(nodes: &[Inline]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Inline::Text(t) => out.push_str(t),
            Inline::Strong(inner) => {
                out.push_str("**");
                out.push_str(&inline_text(inner));
                out.push_str("**");
            }
            Inline::Emphasis(inner) => {
                out.push('*');
                out.push_str(&inline_text(inner));
                out.push('*');
            }
            Inline::Strikethrough(inner) => {
                out.push_str("~~");
                out.push_str(&inline_text(inner));
                out.push_str("~~");
            }
            Inline::Code(code) => {
                out.push('`');
                out.push_str(code);
                out.push('`');
            }
            Inline::Link { href, content, .. } => {
                out.push_str(&inline_text(content));
                out.push_str(" (");
                out.push_str(href);
                out.push(')');
            }
            Inline::Image { src, alt } => {
                out.push_str(&format!("[image: {} {}]", alt, src));
            }
            Inline::Html(_) => {}
            Inline::HardBreak | Inline::SoftBreak => out.push(' '),
        }
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let (file, html_mode) = match args.as_slice() {
        [_, file] => (PathBuf::from(file), false),
        [_, file, flag] if flag == "--html" => (PathBuf::from(file), true),
        _ => {
            eprintln!("Usage: {} <slide.md> [--html]", args[0]);
            process::exit(1);
        }
    };

    if !file.exists() {
        eprintln!("Error: file '{}' does not exist", file.display());
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: failed to load config file: {e}");
            process::exit(1);
        }
    };

    if html_mode {
        let bytes = std::fs::read(&file)?;
        let document = Document::from_bytes(&bytes)?;
        let html = markdown::render_html(
            &document.text(),
            &RenderOptions {
                theme: config.theme,
                parse: config.parse_options(),
            },
        );
        println!("{html}");
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(file, config.theme, config.parse_options())?;
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                KeyCode::Char('t') => app.toggle_theme(),
                KeyCode::Char('r') => {
                    if let Err(e) = app.reload() {
                        log::warn!("reload failed: {e}");
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    let title = format!(
        " {} [{}] ",
        app.path.display(),
        match app.theme {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    );

    let content_text: Vec<Line> = app
        .content
        .iter()
        .map(|line| {
            let style = if line.starts_with('#') {
                Style::default().add_modifier(Modifier::BOLD)
            } else if line.starts_with("```") {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };
            Line::from(vec![Span::styled(line.clone(), style)])
        })
        .collect();

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));

    f.render_widget(content, chunks[0]);

    let help = Paragraph::new(Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Scroll | "),
        Span::raw("t: Toggle theme | "),
        Span::raw("r: Reload"),
    ]));
    f.render_widget(help, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_for(text: &str) -> Vec<String> {
        let document = Document::from_str(text);
        render_document_lines(&document, &ParseOptions::default())
    }

    #[test]
    fn heading_and_paragraph_lines() {
        let lines = lines_for("# Title\n\nbody text");
        assert_eq!(lines[0], "# Title");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "body text");
    }

    #[test]
    fn list_items_get_bullets() {
        let lines = lines_for("- one\n- two\n");
        assert_eq!(lines[0], "• one");
        assert_eq!(lines[1], "• two");
    }

    #[test]
    fn ordered_list_numbers_from_start() {
        let lines = lines_for("3. c\n4. d\n");
        assert_eq!(lines[0], "3. c");
        assert_eq!(lines[1], "4. d");
    }

    #[test]
    fn code_fence_reconstructed() {
        let lines = lines_for("```rust\nfn main() {}\n```");
        assert_eq!(lines[0], "```rust");
        assert_eq!(lines[1], "fn main() {}");
        assert_eq!(lines[2], "```");
    }

    #[test]
    fn quote_lines_prefixed() {
        let lines = lines_for("> wise words");
        assert_eq!(lines[0], "> wise words");
    }

    #[test]
    fn table_rows_piped() {
        let lines = lines_for("| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert_eq!(lines[0], "| A | B |");
        assert_eq!(lines[1], "|---|---|");
        assert_eq!(lines[2], "| 1 | 2 |");
    }

    #[test]
    fn empty_document_shows_placeholder() {
        let lines = lines_for("");
        assert_eq!(lines[0], "Start typing to see your preview...");
    }

    #[test]
    fn inline_markers_survive_flattening() {
        let lines = lines_for("a **b** and [x](https://e.com)");
        assert_eq!(lines[0], "a **b** and x (https://e.com)");
    }
}
