pub mod custom_value_dialog;
pub mod dropdown;
pub mod header;
pub mod help_overlay;
pub mod shot_table;
pub mod sidebar;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

const DEFAULT_SIDEBAR_WIDTH: u16 = 32;

/// Main render function. Records screen regions in `app.layout` for mouse
/// hit testing and dropdown placement.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.layout.viewport = area;

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | body | status row (1 row)
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);

    header::render_header(frame, app, chunks[0], Utc::now());

    let sidebar_w = app
        .config
        .ui
        .sidebar_width
        .unwrap_or(DEFAULT_SIDEBAR_WIDTH)
        .min(chunks[1].width / 4);
    let body = Layout::horizontal([Constraint::Length(sidebar_w), Constraint::Min(1)])
        .split(chunks[1]);
    sidebar::render_sidebar(frame, app, body[0]);
    shot_table::render_shot_table(frame, app, body[1]);

    // Floating layers, drawn over the body
    dropdown::render_dropdowns(frame, app, area);
    app.layout.dialog = None;
    app.layout.dialog_actions.clear();
    if app.prompt_field().is_some() {
        custom_value_dialog::render_custom_value_dialog(frame, app, area);
    }
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
