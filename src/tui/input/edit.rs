use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::autocomplete::{AutocompleteField, KeyOutcome};
use crate::model::{ShotField, TextField};
use crate::tui::app::{App, Column, Mode};
use crate::util::unicode::prev_grapheme_boundary;

/// Start editing the cell under the cursor. Returns false when it is not editable.
pub(crate) fn begin_edit(app: &mut App) -> bool {
    let Some(table) = app.table.as_mut() else {
        return false;
    };
    let column = table.column();
    let Some(row) = table.current_mut() else {
        return false;
    };
    let editable = match column {
        Column::Field(f) => {
            let field = row.field_mut(f);
            field.focus();
            field.is_focused()
        }
        Column::Other(f) => row.field(f).shows_custom_slot(),
        Column::Text(_) => true,
        Column::Number | Column::Done => false,
    };
    if editable {
        app.mode = Mode::Edit;
    }
    editable
}

/// Blur the cell being edited and persist what it commits.
///
/// Returns false when the blur opened the custom value prompt, which keeps
/// the cell in edit mode until it is answered.
pub(crate) fn end_edit(app: &mut App) -> bool {
    let mut committed = None;
    if let Some(table) = app.table.as_mut() {
        let column = table.column();
        let row_index = table.row;
        if let Some(row) = table.current_mut() {
            committed = match column {
                Column::Field(f) => Some((row_index, f, row.field_mut(f).blur())),
                Column::Other(f) => Some((row_index, f, row.field_mut(f).blur_other())),
                _ => None,
            };
        }
    }
    if let Some((row, field, commits)) = committed {
        app.apply_commits(row, field, commits);
    }
    if app.prompt_field().is_some() {
        return false;
    }
    app.mode = Mode::Navigate;
    true
}

/// Leave the current cell and move `delta` columns, editing the new cell if possible.
fn tab_to(app: &mut App, delta: isize) {
    if !end_edit(app) {
        return;
    }
    if let Some(table) = app.table.as_mut() {
        let last = (Column::ALL.len() - 1) as isize;
        table.col = (table.col as isize + delta).clamp(0, last) as usize;
    }
    begin_edit(app);
}

fn field_at(app: &mut App, row: usize, field: ShotField) -> Option<&mut AutocompleteField> {
    app.table
        .as_mut()
        .and_then(|t| t.rows.get_mut(row))
        .map(|r| r.field_mut(field))
}

pub(super) fn handle_edit(app: &mut App, key: KeyEvent, now: Instant) {
    let Some((row, column)) = app.table.as_ref().map(|t| (t.row, t.column())) else {
        app.mode = Mode::Navigate;
        return;
    };
    match column {
        Column::Field(f) => edit_field(app, row, f, key),
        Column::Other(f) => edit_other(app, row, f, key),
        Column::Text(t) => edit_text(app, row, t, key, now),
        Column::Number | Column::Done => app.mode = Mode::Navigate,
    }
}

fn edit_field(app: &mut App, row: usize, f: ShotField, key: KeyEvent) {
    let Some(field) = field_at(app, row, f) else {
        app.mode = Mode::Navigate;
        return;
    };
    let was_prompting = field.prompt().is_some();
    let outcome = field.handle_key(key);
    let prompting = field.prompt().is_some();

    match outcome {
        KeyOutcome::Handled(commits) => {
            app.apply_commits(row, f, commits);
            // answering the prompt in any way finishes the cell, like Enter does
            if (key.code == KeyCode::Enter || was_prompting) && !prompting {
                end_edit(app);
            }
        }
        KeyOutcome::Ignored => match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                end_edit(app);
            }
            KeyCode::Tab => tab_to(app, 1),
            KeyCode::BackTab => tab_to(app, -1),
            _ => {}
        },
    }
}

fn edit_other(app: &mut App, row: usize, f: ShotField, key: KeyEvent) {
    let Some(field) = field_at(app, row, f) else {
        app.mode = Mode::Navigate;
        return;
    };
    if let KeyOutcome::Ignored = field.handle_other_key(key) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                end_edit(app);
            }
            KeyCode::Tab => tab_to(app, 1),
            KeyCode::BackTab => tab_to(app, -1),
            _ => {}
        }
    }
}

fn edit_text(app: &mut App, row: usize, field: TextField, key: KeyEvent, now: Instant) {
    let Some(current) = app
        .table
        .as_ref()
        .and_then(|t| t.rows.get(row).map(|r| t.text(r, field)))
    else {
        app.mode = Mode::Navigate;
        return;
    };
    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    match key.code {
        KeyCode::Char(c) if plain => {
            let mut text = current;
            text.push(c);
            app.edit_text(row, field, text, now);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.edit_text(row, field, String::new(), now);
        }
        KeyCode::Backspace => {
            if let Some(prev) = prev_grapheme_boundary(&current, current.len()) {
                let mut text = current;
                text.truncate(prev);
                app.edit_text(row, field, text, now);
            }
        }
        KeyCode::Esc | KeyCode::Enter => app.mode = Mode::Navigate,
        KeyCode::Tab => tab_to(app, 1),
        KeyCode::BackTab => tab_to(app, -1),
        _ => {}
    }
}

pub(super) fn paste_into_cell(app: &mut App, text: &str, now: Instant) {
    let Some((row, column)) = app.table.as_ref().map(|t| (t.row, t.column())) else {
        return;
    };
    match column {
        Column::Field(f) => {
            if let Some(field) = field_at(app, row, f) {
                for c in text.chars() {
                    field.insert_char(c);
                }
            }
        }
        Column::Other(f) => {
            if let Some(field) = field_at(app, row, f) {
                let combined = format!("{}{}", field.other_text(), text);
                field.set_other_text(&combined);
            }
        }
        Column::Text(t) => {
            let current = app
                .table
                .as_ref()
                .and_then(|tb| tb.rows.get(row).map(|r| tb.text(r, t)))
                .unwrap_or_default();
            app.edit_text(row, t, current + text, now);
        }
        Column::Number | Column::Done => {}
    }
}
