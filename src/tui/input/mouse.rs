use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::model::ShotField;
use crate::tui::app::{App, Column, DialogAction, Focus, Mode};

use super::edit::{begin_edit, end_edit};

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => press(app, mouse.column, mouse.row),
        MouseEventKind::ScrollDown => scroll(app, 1),
        MouseEventKind::ScrollUp => scroll(app, -1),
        _ => {}
    }
}

fn press(app: &mut App, x: u16, y: u16) {
    let pos = Position { x, y };
    if app.show_help {
        app.show_help = false;
        return;
    }
    if app.mode == Mode::ConfirmDelete {
        app.mode = Mode::Navigate;
        return;
    }
    if app.prompt_field().is_some() {
        press_dialog(app, pos);
        return;
    }
    // the panel gets the press before the field loses focus
    if press_panel(app, pos) {
        return;
    }

    if let Some((row, col, _)) = app.layout.cell_at(x, y) {
        let same = app
            .table
            .as_ref()
            .is_some_and(|t| t.row == row && t.col == col);
        if app.mode == Mode::Edit && (same || !end_edit(app)) {
            return;
        }
        app.focus = Focus::Table;
        if let Some(table) = app.table.as_mut() {
            table.row = row;
            table.col = col;
        }
        if Column::ALL.get(col) == Some(&Column::Done) {
            app.toggle_done();
        } else {
            begin_edit(app);
        }
        return;
    }

    if app.mode == Mode::Edit && !end_edit(app) {
        return;
    }
    let sidebar = app.layout.sidebar;
    if sidebar.contains(pos) && y > sidebar.y {
        let index = app.layout.sidebar_scroll + (y - sidebar.y - 1) as usize;
        if index < app.sidebar.len() {
            app.focus = Focus::Sidebar;
            app.sidebar_cursor = index;
            let result = app.activate_sidebar_item();
            app.report(result);
        }
    }
}

/// Route a press inside the open dropdown panel to its field.
fn press_panel(app: &mut App, pos: Position) -> bool {
    let Some((row, field, rect)) = open_panel(app) else {
        return false;
    };
    if !rect.contains(pos) {
        return false;
    }
    let inner_top = rect.y + 1;
    if pos.y < inner_top || pos.y + 1 >= rect.bottom() {
        // border
        return true;
    }
    let line = (pos.y - inner_top) as usize;
    let visible = rect.height.saturating_sub(2) as usize;

    let Some(f) = app
        .table
        .as_mut()
        .and_then(|t| t.rows.get_mut(row))
        .map(|r| r.field_mut(field))
    else {
        return true;
    };
    if f.offers_custom_entry() {
        f.press_custom_entry();
        return true;
    }
    let index = f.panel_scroll(visible) + line;
    let commits = f.press_option(index);
    app.apply_commits(row, field, commits);
    end_edit(app);
    true
}

fn open_panel(app: &App) -> Option<(usize, ShotField, Rect)> {
    let table = app.table.as_ref()?;
    table.rows.iter().enumerate().find_map(|(i, r)| {
        r.fields()
            .find(|(_, f)| f.is_open())
            .and_then(|(field, f)| f.panel_rect().map(|rect| (i, field, rect)))
    })
}

/// Presses while the custom value dialog is up. Outside the dialog cancels it.
fn press_dialog(app: &mut App, pos: Position) {
    let action = app
        .layout
        .dialog_actions
        .iter()
        .find(|(rect, _)| rect.contains(pos))
        .map(|(_, action)| *action);
    let inside = app.layout.dialog.is_some_and(|d| d.contains(pos));
    let action = match action {
        Some(action) => action,
        None if inside => return,
        None => DialogAction::Cancel,
    };

    let Some((row, field, _)) = app.prompt_field() else {
        return;
    };
    let Some(f) = app
        .table
        .as_mut()
        .and_then(|t| t.rows.get_mut(row))
        .map(|r| r.field_mut(field))
    else {
        return;
    };
    let commits = match action {
        DialogAction::Suggestion(i) => f.choose_suggestion(i),
        DialogAction::Confirm => f.confirm_custom(),
        DialogAction::Cancel => {
            f.cancel_custom();
            Vec::new()
        }
    };
    app.apply_commits(row, field, commits);
    end_edit(app);
}

fn scroll(app: &mut App, delta: isize) {
    let visible = app.layout.visible_rows;
    if let Some(table) = app.table.as_mut() {
        let max = table.rows.len().saturating_sub(visible.max(1));
        table.scroll = (table.scroll as isize + delta).clamp(0, max as isize) as usize;
        // open panels follow their input
        app.listeners.notify();
    }
}
