use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, DialogAction};

/// Render the confirmation for a value that matches no option.
///
/// Records the dialog area and its clickable lines in `app.layout`.
pub fn render_custom_value_dialog(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some((_, field, f)) = app.prompt_field() else {
        return;
    };
    let Some(prompt) = f.prompt() else {
        return;
    };

    let popup_w: u16 = 50.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.panel_bg;
    let header_style = Style::default()
        .fg(app.theme.accent)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let choice_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let key_style = Style::default()
        .fg(app.theme.accent)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    // (line, clickable action)
    let mut rows: Vec<(Line, Option<DialogAction>)> = Vec::new();
    rows.push((
        Line::from(Span::styled(format!(" {}: custom value", field.label()), header_style)),
        None,
    ));
    rows.push((Line::from(""), None));
    for s in wrap_text(" ", &prompt.message(), inner_w) {
        rows.push((Line::from(Span::styled(s, text_style)), None));
    }
    if !prompt.suggestions().is_empty() {
        rows.push((Line::from(""), None));
        rows.push((Line::from(Span::styled(" Did you mean:", text_style)), None));
        for (i, suggestion) in prompt.suggestions().iter().enumerate() {
            rows.push((
                Line::from(vec![
                    Span::styled(format!("   {}", i + 1), key_style),
                    Span::styled(format!("  {suggestion}"), choice_style),
                ]),
                Some(DialogAction::Suggestion(i)),
            ));
        }
    }
    rows.push((Line::from(""), None));
    rows.push((
        Line::from(vec![
            Span::styled(" Enter", key_style),
            Span::styled(format!("  {}", prompt.confirm_label()), choice_style),
        ]),
        Some(DialogAction::Confirm),
    ));
    rows.push((
        Line::from(vec![
            Span::styled(" Esc", key_style),
            Span::styled("    Keep the previous value", choice_style),
        ]),
        Some(DialogAction::Cancel),
    ));

    // Dynamic height from content + 2 for borders
    let popup_h = ((rows.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);

    let actions: Vec<(Rect, DialogAction)> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, (_, action))| {
            let y = overlay_area.y + 1 + i as u16;
            if y + 1 >= overlay_area.bottom() {
                // clipped by the bottom border
                return None;
            }
            action.map(|a| (Rect::new(overlay_area.x + 1, y, popup_w.saturating_sub(2), 1), a))
        })
        .collect();

    frame.render_widget(Clear, overlay_area);
    let lines: Vec<Line> = rows.into_iter().map(|(line, _)| line).collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.panel_border).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);

    app.layout.dialog = Some(overlay_area);
    app.layout.dialog_actions = actions;
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Word-wrap `text` into lines of at most `max_width` characters.
/// Every line (including the first) is prefixed with `indent`.
fn wrap_text(indent: &str, text: &str, max_width: usize) -> Vec<String> {
    let indent_len = indent.len();
    let mut lines = Vec::new();
    let mut current = indent.to_string();

    for word in text.split_whitespace() {
        let space = if current.len() == indent_len { 0 } else { 1 };
        if current.len() + space + word.len() > max_width && current.len() > indent_len {
            lines.push(current);
            current = indent.to_string();
        }
        if current.len() > indent_len {
            current.push(' ');
        }
        current.push_str(word);
    }
    if current.len() > indent_len || lines.is_empty() {
        lines.push(current);
    }
    lines
}
