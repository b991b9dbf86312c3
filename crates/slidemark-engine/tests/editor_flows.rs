//! End-to-end flows through the public editor API: type, command, render.

use pretty_assertions::assert_eq;

use slidemark_engine::{
    Cmd, EditorOptions, EditorSession, HeadlessWidget, Key, KeydownResult, Modifiers,
    ParseOptions, RenderOptions, TextWidget, Theme, WidgetRect, WrapStyle,
};

fn session(text: &str) -> EditorSession<HeadlessWidget> {
    let mut s = EditorSession::new(text, EditorOptions::default());
    s.attach_widget(HeadlessWidget::new(text));
    s
}

fn rect() -> WidgetRect {
    WidgetRect {
        top: 0.0,
        left: 0.0,
        width: 800.0,
        height: 600.0,
    }
}

#[test]
fn author_a_slide_from_scratch() {
    let mut s = session("");
    s.widget_mut().unwrap().set_selection(0..0);

    // Heading via the mutation engine.
    s.execute(Cmd::InsertHeading { level: 1 });
    assert_eq!(s.text(), "# Heading");

    // Continue with a list below.
    s.flush_pending_cursor();
    s.execute(Cmd::InsertList { ordered: false });
    let text = s.text();
    assert!(text.contains("- "), "list marker inserted, got {text:?}");

    // The preview renders what the document holds, sanitized.
    let html = s.render_preview();
    assert!(html.contains("<h1>"));
    assert!(html.contains("<ul>"));
}

#[test]
fn slash_palette_inserts_quote_block() {
    let mut s = session("");
    let typed = "/qu";
    s.widget_mut().unwrap().set_value(typed);
    s.widget_mut().unwrap().set_selection(3..3);
    s.set_text(typed);
    s.handle_selection_event(&rect());
    assert!(s.palette().is_active());

    assert_eq!(
        s.handle_keydown(&Key::Enter, &Modifiers::NONE),
        KeydownResult::Handled
    );
    assert_eq!(s.text(), "\n> Quote\n");
    assert!(s.render_preview().contains("<blockquote>"));
}

#[test]
fn keyboard_shortcut_then_preview_round_trip() {
    let mut s = session("make this strong");
    s.widget_mut().unwrap().set_selection(5..9);
    s.handle_keydown(&Key::Character('b'), &Modifiers::CTRL);
    assert_eq!(s.text(), "make **this** strong");
    assert!(s.render_preview().contains("<strong>this</strong>"));
}

#[test]
fn hostile_document_never_renders_scripts() {
    let hostile = "# T\n\n<script>alert(1)</script>\n\n<span style=\"color:red\" \
                   onclick=\"steal()\">red</span>\n\n<iframe src=\"https://evil\"></iframe>\n";
    let s = session(hostile);
    let html = s.render_preview();
    assert!(!html.contains("<script"));
    assert!(!html.contains("onclick"));
    assert!(!html.contains("<iframe"));
    assert!(html.contains("<span style=\"color:red\">red</span>"));
}

#[test]
fn render_is_a_pure_function_of_text_and_theme() {
    let text = "# A\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\n```rust\nfn x() {}\n```\n";
    let light = RenderOptions {
        theme: Theme::Light,
        parse: ParseOptions::default(),
    };
    let first = slidemark_engine::render_html(text, &light);
    let second = slidemark_engine::render_html(text, &light);
    assert_eq!(first, second);

    assert!(first.contains("<th>A</th>"));
    assert!(first.contains("<td>2</td>"));
}

#[test]
fn detached_editor_stays_usable() {
    let mut s: EditorSession<HeadlessWidget> = EditorSession::new("notes", EditorOptions::default());

    // No widget mounted: mutations append instead of failing.
    s.execute(Cmd::Wrap(WrapStyle::InlineCode));
    assert_eq!(s.text(), "notes`code`");

    s.insert_snippet("\n\n---\n", false);
    assert!(s.text().ends_with("---\n"));

    // Mounting later restores cursor-relative editing.
    let widget = HeadlessWidget::new(&s.text());
    s.attach_widget(widget);
    s.widget_mut().unwrap().set_selection(0..5);
    s.execute(Cmd::Wrap(WrapStyle::Bold));
    assert!(s.text().starts_with("**notes**"));
}

#[test]
fn on_change_reports_every_mutation() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let count: Rc<RefCell<usize>> = Rc::default();
    let sink = count.clone();

    let mut s = session("x");
    s.on_change(move |_| *sink.borrow_mut() += 1);
    s.widget_mut().unwrap().set_selection(1..1);

    s.execute(Cmd::InsertRule);
    s.execute(Cmd::Wrap(WrapStyle::Bold));
    s.insert_snippet("!", false);
    assert_eq!(*count.borrow(), 3);
}
