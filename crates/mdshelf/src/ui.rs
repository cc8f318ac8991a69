//! Frame layout: file shelf sidebar, chunked viewer pane, one-line status bar.

use crate::app::App;
use crate::app::Pane;
use mdshelf_markdown::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

const SIDEBAR_WIDTH: u16 = 32;

pub fn draw(f: &mut Frame, app: &mut App) {
    let theme = app.theme();
    let [main, status] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(f.area());
    let [sidebar, viewer] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .areas(main);

    draw_sidebar(f, app, &theme, sidebar);
    draw_viewer(f, app, &theme, viewer);
    draw_status(f, app, &theme, status);
}

fn draw_sidebar(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = pane_block(" mdshelf ", theme, app.focus == Pane::Files);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if app.library.is_empty() {
        lines.push(Line::from(Span::styled(
            "Shelf is empty.",
            theme.text_muted,
        )));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Drop .md files onto the terminal or pass them on the command line.",
            theme.text_muted,
        )));
    } else {
        for (idx, doc) in app.library.documents().iter().enumerate() {
            let is_cursor = idx == app.file_cursor;
            let is_selected = app.library.selected_name() == Some(doc.name.as_str());
            let mut style = if is_selected {
                theme.accent
            } else {
                theme.text_primary
            };
            if is_cursor && app.focus == Pane::Files {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let marker = if is_selected { "▸ " } else { "  " };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}", doc.name),
                style,
            )));
        }
    }

    if let Some(error) = &app.error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(error.clone(), theme.danger)));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_viewer(f: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let title = app
        .library
        .selected_name()
        .map(|name| format!(" {name} "))
        .unwrap_or_else(|| " no file selected ".to_string());
    let block = pane_block(&title, theme, app.focus == Pane::Viewer);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.viewer.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Select a file to view its content, or drop a markdown file to get started.",
            theme.text_muted,
        )))
        .wrap(Wrap { trim: true });
        f.render_widget(hint, inner);
        return;
    }

    let buf = f.buffer_mut();
    app.viewer.render(inner, buf, theme);
}

fn draw_status(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let scroll = app
        .viewer
        .scroll_percent()
        .map(|p| format!("{p}%"))
        .unwrap_or_else(|| "all".to_string());
    let mode = if app.dark_mode { "dark" } else { "light" };
    let status = format!(
        " {} file(s)  {} chunk(s)  scroll {scroll}  {mode}   [tab] pane  [enter] open  [d] delete  [t] theme  [q] quit",
        app.library.len(),
        app.viewer.chunk_count(),
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(status, theme.text_muted))),
        area,
    );
}

fn pane_block<'a>(title: &'a str, theme: &Theme, focused: bool) -> Block<'a> {
    let border_style = if focused {
        theme.accent
    } else {
        theme.text_muted
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdshelf_core::storage::Storage;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::fs;

    fn render_to_string(app: &mut App) -> String {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer.cell((x, y)).unwrap().symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn temp_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(Some(dir.path().join("state"))).unwrap();
        (dir, App::new(storage, 5000))
    }

    #[test]
    fn empty_shelf_shows_hints() {
        let (_dir, mut app) = temp_app();
        let screen = render_to_string(&mut app);
        assert!(screen.contains("Shelf is empty."));
        assert!(screen.contains("no file selected"));
    }

    #[test]
    fn document_content_reaches_the_screen() {
        let (dir, mut app) = temp_app();
        let path = dir.path().join("hello.md");
        fs::write(&path, "# Greetings\n\nplain body text").unwrap();
        app.submit_paths(vec![path]);

        let screen = render_to_string(&mut app);
        assert!(screen.contains("hello.md"));
        assert!(screen.contains("Greetings"));
        assert!(screen.contains("plain body text"));
    }

    #[test]
    fn intake_error_is_shown() {
        let (_dir, mut app) = temp_app();
        app.submit_paths(vec!["/nope/x.md".into()]);
        let screen = render_to_string(&mut app);
        assert!(screen.contains("failed to read"));
    }
}
