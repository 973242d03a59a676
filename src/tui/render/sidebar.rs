use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Focus, Mode};
use crate::tui::navigation::NodeKind;
use crate::util::unicode::fit_to_width;

/// Render the Project → Video → Script → Component tree
pub fn render_sidebar(frame: &mut Frame, app: &mut App, area: Rect) {
    app.layout.sidebar = area;
    let bg = app.theme.background;
    let focused = app.focus == Focus::Sidebar && app.mode == Mode::Navigate;
    let border = if focused { app.theme.accent } else { app.theme.dim };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Scenes ", Style::default().fg(app.theme.text_bright)))
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.sidebar.is_empty() {
        let line = Line::from(Span::styled(
            " No projects",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line), inner);
        app.layout.sidebar_scroll = 0;
        return;
    }

    let height = inner.height as usize;
    let scroll = if height > 0 && app.sidebar_cursor >= height {
        app.sidebar_cursor + 1 - height
    } else {
        0
    };
    app.layout.sidebar_scroll = scroll;

    let width = inner.width as usize;
    let lines: Vec<Line> = app
        .sidebar
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, item)| {
            let marker = match (item.kind, item.expanded) {
                (NodeKind::Component, _) => "  ",
                (_, true) => "\u{25BE} ",
                (_, false) => "\u{25B8} ",
            };
            let text = format!(" {}{}{}", "  ".repeat(item.depth), marker, item.label);
            let style = if focused && i == app.sidebar_cursor {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else if app.nav.is_selected(item) {
                Style::default().fg(app.theme.accent).bg(bg)
            } else {
                Style::default().fg(app.theme.text).bg(bg)
            };
            Line::from(Span::styled(fit_to_width(&text, width), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
