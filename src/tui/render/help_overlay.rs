use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Focus};

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.panel_bg;
    let key_style = Style::default()
        .fg(app.theme.accent)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // The focused pane's keys come first
    let sidebar = |lines: &mut Vec<Line>| {
        lines.push(Line::from(Span::styled(" Sidebar", header_style)));
        add_binding(lines, " \u{2191}\u{2193}/jk", "Move cursor", key_style, desc_style);
        add_binding(lines, " Enter/l", "Expand / open component", key_style, desc_style);
        add_binding(lines, " h", "Go to parent", key_style, desc_style);
        lines.push(Line::from(""));
    };
    let table = |lines: &mut Vec<Line>| {
        lines.push(Line::from(Span::styled(" Shot table", header_style)));
        add_binding(lines, " hjkl", "Move between cells", key_style, desc_style);
        add_binding(lines, " Enter/i", "Edit cell", key_style, desc_style);
        add_binding(lines, " Space", "Toggle done", key_style, desc_style);
        add_binding(lines, " a", "Add shot", key_style, desc_style);
        add_binding(lines, " d", "Delete shot", key_style, desc_style);
        lines.push(Line::from(""));
    };
    match app.focus {
        Focus::Sidebar => {
            sidebar(&mut lines);
            table(&mut lines);
        }
        Focus::Table => {
            table(&mut lines);
            sidebar(&mut lines);
        }
    }

    lines.push(Line::from(Span::styled(" Editing", header_style)));
    add_binding(&mut lines, " \u{2191}\u{2193}", "Highlight option", key_style, desc_style);
    add_binding(&mut lines, " Enter", "Choose option", key_style, desc_style);
    add_binding(&mut lines, " Esc", "Close list / stop editing", key_style, desc_style);
    add_binding(&mut lines, " Tab", "Next cell", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+U", "Clear text", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Custom value", header_style)));
    add_binding(&mut lines, " 1-9", "Use a suggestion", key_style, desc_style);
    add_binding(&mut lines, " Enter/y", "Keep as Other", key_style, desc_style);
    add_binding(&mut lines, " Esc/n", "Keep previous value", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " Tab", "Switch pane", key_style, desc_style);
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.panel_border).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 12;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
