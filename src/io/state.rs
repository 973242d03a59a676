use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

const STATE_FILE: &str = ".scenes-state.json";

/// Persisted TUI state (written to .scenes-state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    /// Component whose shot table was open
    #[serde(default)]
    pub component: Option<String>,
    /// Row of the sidebar cursor
    #[serde(default)]
    pub sidebar_cursor: usize,
}

/// Read the UI state from the data directory. Missing or unreadable state is `None`.
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(dir.join(STATE_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(dir.join(STATE_FILE), content)
}
