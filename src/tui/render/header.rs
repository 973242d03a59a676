use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::navigation::NodeKind;
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the breadcrumb line and "Last saved" indicator, with a separator below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect, now: DateTime<Utc>) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);
    let bg = app.theme.background;
    let width = area.width as usize;

    let saved = format!("Last saved: {} ", app.last_saved.format(now));
    let saved_w = display_width(&saved);

    let crumbs = breadcrumb(app);
    let crumb_text = if crumbs.is_empty() {
        "Select a project".to_string()
    } else {
        crumbs.join(" \u{203A} ")
    };
    // icon + spaces take 3 cells
    let crumb_budget = width.saturating_sub(saved_w + 4);
    let crumb_text = truncate_to_width(&crumb_text, crumb_budget);

    let mut spans = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.accent).bg(bg)),
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            crumb_text,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if used + saved_w <= width {
        spans.push(Span::styled(
            " ".repeat(width - used - saved_w),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(saved, Style::default().fg(app.theme.dim).bg(bg)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let separator = Span::styled(
        "\u{2500}".repeat(width),
        Style::default().fg(app.theme.dim).bg(bg),
    );
    frame.render_widget(Paragraph::new(Line::from(separator)), chunks[1]);
}

/// Labels of the selected path, taken from the sidebar lines
fn breadcrumb(app: &App) -> Vec<String> {
    let selected = [
        (NodeKind::Project, app.nav.project()),
        (NodeKind::Video, app.nav.video()),
        (NodeKind::Script, app.nav.script()),
        (NodeKind::Component, app.nav.component()),
    ];
    selected
        .into_iter()
        .filter_map(|(kind, id)| {
            let id = id?;
            app.sidebar
                .iter()
                .find(|i| i.kind == kind && i.id == id)
                .map(|i| match kind {
                    // component lines carry the first line of content
                    NodeKind::Component => i.label.split(' ').next().unwrap_or("").to_string(),
                    _ => i.label.clone(),
                })
        })
        .collect()
}
