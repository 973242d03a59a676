use std::time::Instant;

use chrono::Utc;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::sample::sample_data;
use crate::io::state::UiState;
use crate::io::store::JsonStore;
use crate::model::AppConfig;
use crate::tui::app::App;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Sample data with the first component open and options not yet loaded.
pub fn sample_app_loading() -> App {
    let store = JsonStore::in_memory(sample_data(Utc::now()));
    let mut app = App::new(Box::new(store), AppConfig::default(), None).unwrap();
    let state = UiState {
        project: Some("proj-1".into()),
        video: Some("vid-1".into()),
        script: Some("script-1".into()),
        component: Some("comp-1".into()),
        sidebar_cursor: 0,
    };
    app.restore(&state).unwrap();
    app
}

/// Sample data with the first component open and options loaded.
pub fn sample_app() -> App {
    let mut app = sample_app_loading();
    app.tick(Instant::now());
    app
}
