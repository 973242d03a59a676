use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Column, Focus, Mode};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.quit();
            return;
        }
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            return;
        }
        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => {
            app.focus = match app.focus {
                Focus::Sidebar if app.table.is_some() => Focus::Table,
                _ => Focus::Sidebar,
            };
            return;
        }
        (_, KeyCode::Esc) => {
            app.status = None;
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Sidebar => handle_sidebar(app, key),
        Focus::Table => handle_table(app, key),
    }
}

fn handle_sidebar(app: &mut App, key: KeyEvent) {
    let len = app.sidebar.len();
    if len == 0 {
        return;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.sidebar_cursor = app.sidebar_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.sidebar_cursor = (app.sidebar_cursor + 1).min(len - 1);
        }
        KeyCode::Home | KeyCode::Char('g') => app.sidebar_cursor = 0,
        KeyCode::End | KeyCode::Char('G') => app.sidebar_cursor = len - 1,
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            let result = app.activate_sidebar_item();
            app.report(result);
        }
        KeyCode::Left | KeyCode::Char('h') => {
            // jump to the parent line
            let cursor = app.sidebar_cursor.min(len - 1);
            let depth = app.sidebar[cursor].depth;
            if let Some(parent) = app.sidebar[..cursor].iter().rposition(|i| i.depth < depth) {
                app.sidebar_cursor = parent;
            }
        }
        _ => {}
    }
}

fn handle_table(app: &mut App, key: KeyEvent) {
    let visible = app.layout.visible_rows;
    let Some(table) = app.table.as_mut() else {
        app.focus = Focus::Sidebar;
        return;
    };
    let rows = table.rows.len();
    let last_col = Column::ALL.len() - 1;

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => table.row = table.row.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            table.row = (table.row + 1).min(rows.saturating_sub(1));
        }
        KeyCode::Left | KeyCode::Char('h') => table.col = table.col.saturating_sub(1),
        KeyCode::Right | KeyCode::Char('l') => table.col = (table.col + 1).min(last_col),
        KeyCode::Home | KeyCode::Char('g') => table.row = 0,
        KeyCode::End | KeyCode::Char('G') => table.row = rows.saturating_sub(1),
        KeyCode::Enter | KeyCode::Char('i') => {
            if table.column() == Column::Done {
                app.toggle_done();
            } else if !begin_edit(app) && app.catalog.is_none() {
                app.set_info("Options are still loading".into());
            }
            return;
        }
        KeyCode::Char(' ') => {
            app.toggle_done();
            return;
        }
        KeyCode::Char('a') => {
            let result = app.add_shot();
            app.report(result);
        }
        KeyCode::Char('d') => {
            if rows > 0 {
                app.mode = Mode::ConfirmDelete;
            }
            return;
        }
        _ => return,
    }

    if let Some(table) = app.table.as_mut() {
        table.scroll_to_cursor(visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::test_keys::{ch, key};
    use crate::tui::render::test_helpers::sample_app;
    use pretty_assertions::assert_eq;

    #[test]
    fn sidebar_enter_opens_component_table() {
        let mut app = sample_app();
        app.close_table();
        app.focus = Focus::Sidebar;
        // Project, Video, Script, C1, C2, C3, Video
        app.sidebar_cursor = 4;
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Table);
        let table = app.table.as_ref().unwrap();
        assert_eq!(table.component.id, "comp-2");
        assert_eq!(app.nav.component(), Some("comp-2"));
    }

    #[test]
    fn sidebar_left_jumps_to_parent() {
        let mut app = sample_app();
        app.focus = Focus::Sidebar;
        app.sidebar_cursor = 5;
        handle_key(&mut app, ch('h'));
        assert_eq!(app.sidebar_cursor, 2);
        handle_key(&mut app, ch('h'));
        assert_eq!(app.sidebar_cursor, 1);
    }

    #[test]
    fn table_cursor_is_clamped() {
        let mut app = sample_app();
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('j'));
        assert_eq!(app.table.as_ref().unwrap().row, 1);
        for _ in 0..20 {
            handle_key(&mut app, ch('l'));
        }
        assert_eq!(app.table.as_ref().unwrap().column(), Column::Done);
    }

    #[test]
    fn add_then_confirm_delete() {
        let mut app = sample_app();
        handle_key(&mut app, ch('a'));
        assert_eq!(app.table.as_ref().unwrap().rows.len(), 3);
        handle_key(&mut app, ch('d'));
        assert_eq!(app.mode, Mode::ConfirmDelete);
        handle_key(&mut app, ch('n'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.table.as_ref().unwrap().rows.len(), 3);
        handle_key(&mut app, ch('d'));
        handle_key(&mut app, ch('y'));
        assert_eq!(app.table.as_ref().unwrap().rows.len(), 2);
    }

    #[test]
    fn space_toggles_done() {
        let mut app = sample_app();
        handle_key(&mut app, ch(' '));
        assert!(app.store().shot("shot-1").unwrap().completed);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = sample_app();
        handle_key(&mut app, ch('?'));
        assert!(app.show_help);
        handle_key(&mut app, ch('a'));
        assert_eq!(app.table.as_ref().unwrap().rows.len(), 2);
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn q_quits() {
        let mut app = sample_app();
        handle_key(&mut app, ch('q'));
        assert!(app.should_quit);
    }
}
