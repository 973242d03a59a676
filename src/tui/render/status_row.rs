use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Focus, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let mut spans = match app.mode {
        Mode::ConfirmDelete => {
            let number = app
                .table
                .as_ref()
                .and_then(|t| t.current())
                .map(|r| r.shot.shot_number)
                .unwrap_or_default();
            vec![Span::styled(
                format!(" Delete shot {number}? y/n"),
                Style::default()
                    .fg(app.theme.warning)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )]
        }
        _ => match &app.status {
            Some(status) => {
                let fg = if status.error {
                    app.theme.error
                } else {
                    app.theme.text
                };
                vec![Span::styled(
                    format!(" {}", status.text),
                    Style::default().fg(fg).bg(bg),
                )]
            }
            None => Vec::new(),
        },
    };

    let hint = match (app.mode, app.focus) {
        _ if app.show_help => "Esc close help",
        (Mode::ConfirmDelete, _) => "",
        (Mode::Edit, _) if app.prompt_field().is_some() => "Enter keep  Esc cancel",
        (Mode::Edit, _) => "Tab next  Esc done",
        (Mode::Navigate, Focus::Sidebar) => "Enter open  Tab shots  ? help",
        (Mode::Navigate, Focus::Table) => "Enter edit  a add  ? help",
    };

    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_w = display_width(hint) + 1;
    if used + hint_w < width {
        spans.push(Span::styled(
            " ".repeat(width - used - hint_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(format!("{hint} "), dim));
    } else if let Some(first) = spans.first_mut() {
        first.content = truncate_to_width(&first.content, width).into();
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
