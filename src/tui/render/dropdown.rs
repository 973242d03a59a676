use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::autocomplete::AutocompleteField;
use crate::model::ShotField;
use crate::tui::app::{App, Column};
use crate::tui::theme::Theme;
use crate::util::unicode::fit_to_width;

/// Place and draw the option panel of the open field, if any.
///
/// Every field with a panel from the previous frame is laid out again so a
/// field that closed since then drops its placement.
pub fn render_dropdowns(frame: &mut Frame, app: &mut App, viewport: Rect) {
    let max_rows = app.config.editing.dropdown_rows;
    let Some(table) = app.table.as_mut() else {
        return;
    };
    for (ri, row) in table.rows.iter_mut().enumerate() {
        for field in ShotField::ALL {
            let f = row.field_mut(field);
            if !f.is_open() && f.panel_rect().is_none() {
                continue;
            }
            let anchor = Column::ALL
                .iter()
                .position(|c| *c == Column::Field(field))
                .and_then(|ci| app.layout.cell_rect(ri, ci));
            if let Some(rect) = f.layout(anchor, viewport, max_rows, &app.listeners) {
                render_panel(frame, &app.theme, f, rect);
            }
        }
    }
}

fn render_panel(frame: &mut Frame, theme: &Theme, field: &AutocompleteField, area: Rect) {
    let bg = theme.panel_bg;
    let inner_w = area.width.saturating_sub(2) as usize;
    let visible = area.height.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    if field.offers_custom_entry() {
        let label = format!("+ Add \"{}\" as Other", field.text().trim());
        lines.push(Line::from(Span::styled(
            fit_to_width(&label, inner_w),
            Style::default().fg(theme.custom).bg(bg),
        )));
    } else {
        let scroll = field.panel_scroll(visible);
        for (i, entry) in field
            .filtered()
            .iter()
            .enumerate()
            .skip(scroll)
            .take(visible)
        {
            let selected = field.highlighted() == Some(i);
            let style = if selected {
                Style::default()
                    .fg(theme.text_bright)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text).bg(bg)
            };
            let prefix = if selected { "\u{25B8} " } else { "  " };
            lines.push(Line::from(Span::styled(
                fit_to_width(&format!("{prefix}{entry}"), inner_w),
                style,
            )));
        }
    }

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.panel_border).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
