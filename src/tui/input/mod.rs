mod confirm;
mod edit;
mod mouse;
mod navigate;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

// Submodules reach each other through `use super::*;`
#[allow(unused_imports)]
use confirm::*;
#[allow(unused_imports)]
use edit::*;
#[allow(unused_imports)]
use navigate::*;

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    handle_key_at(app, key, Instant::now());
}

/// Handle a key event as if it arrived at `now`; text edits are debounced from it.
pub fn handle_key_at(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Edit => handle_edit(app, key, now),
        Mode::ConfirmDelete => handle_confirm(app, key),
    }
}

/// Insert pasted text into the cell being edited.
pub fn handle_paste(app: &mut App, text: &str) {
    handle_paste_at(app, text, Instant::now());
}

pub fn handle_paste_at(app: &mut App, text: &str, now: Instant) {
    if app.mode != Mode::Edit {
        return;
    }
    // Cells are single line
    let text: String = text.chars().filter(|c| !c.is_control()).collect();
    paste_into_cell(app, &text, now);
}

/// Shift+letter arrives as a lowercase char with SHIFT on some terminals.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}
