use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::autocomplete::{
    AutocompleteField, DropdownError, FieldCommit, FieldProps, Scope, ViewportListeners,
};
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{JsonStore, SceneStore, StoreError};
use crate::model::{
    AppConfig, EditingConfig, NewShot, OptionCatalog, ScriptComponent, Shot, ShotField,
    ShotUpdate, TextField,
};
use crate::ops::shot_ops;

use super::debounce::DebouncedEdits;
use super::input;
use super::last_saved::LastSaved;
use super::navigation::{Navigation, NodeKind, SidebarItem, build_sidebar};
use super::render;
use super::theme::Theme;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Dropdown(#[from] DropdownError),
}

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Table,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Keys go to the cell under the cursor
    Edit,
    /// Waiting for y/n on deleting the shot under the cursor
    ConfirmDelete,
}

/// A column of the shot table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Number,
    Field(ShotField),
    /// Custom text paired with a field's `Other` value
    Other(ShotField),
    Text(TextField),
    Done,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Number,
        Column::Field(ShotField::ShotType),
        Column::Field(ShotField::Location),
        Column::Other(ShotField::Location),
        Column::Field(ShotField::Movement),
        Column::Field(ShotField::Subject),
        Column::Other(ShotField::Subject),
        Column::Text(TextField::Variant),
        Column::Text(TextField::Action),
        Column::Done,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Column::Number => "#",
            Column::Field(f) => f.label(),
            Column::Other(ShotField::Subject) => "Subj. Other",
            Column::Other(_) => "Loc. Other",
            Column::Text(t) => t.label(),
            Column::Done => "Done",
        }
    }
}

/// Debounce key for free-text cells: shot id and column
pub type TextKey = (String, TextField);

/// A mounted shot: the stored row plus one autocomplete field per [`ShotField`]
#[derive(Debug)]
pub struct ShotRow {
    pub shot: Shot,
    fields: Vec<AutocompleteField>,
}

fn field_index(field: ShotField) -> usize {
    match field {
        ShotField::ShotType => 0,
        ShotField::Location => 1,
        ShotField::Movement => 2,
        ShotField::Subject => 3,
    }
}

impl ShotRow {
    fn mount(
        scope: &Scope,
        catalog: Option<&OptionCatalog>,
        editing: &EditingConfig,
        shot: Shot,
    ) -> Result<Self, DropdownError> {
        let fields = ShotField::ALL
            .into_iter()
            .map(|f| AutocompleteField::new(scope, field_props(catalog, editing, &shot, f)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ShotRow { shot, fields })
    }

    pub fn field(&self, field: ShotField) -> &AutocompleteField {
        &self.fields[field_index(field)]
    }

    pub fn field_mut(&mut self, field: ShotField) -> &mut AutocompleteField {
        &mut self.fields[field_index(field)]
    }

    pub fn fields(&self) -> impl Iterator<Item = (ShotField, &AutocompleteField)> {
        ShotField::ALL.into_iter().zip(self.fields.iter())
    }

    fn sync(&mut self, catalog: Option<&OptionCatalog>, editing: &EditingConfig) {
        for field in ShotField::ALL {
            let props = field_props(catalog, editing, &self.shot, field);
            self.field_mut(field).sync(props);
        }
    }
}

/// Props for the field editing `field` of `shot`. No catalog means still loading.
pub fn field_props(
    catalog: Option<&OptionCatalog>,
    editing: &EditingConfig,
    shot: &Shot,
    field: ShotField,
) -> FieldProps {
    FieldProps {
        value: shot.field(field).map(str::to_owned),
        options: catalog.map(|c| c.labels(field)).unwrap_or_default(),
        allow_custom: field.has_custom_slot(),
        is_loading: catalog.is_none(),
        disabled: false,
        has_custom_slot: field.has_custom_slot(),
        other_value: shot.other(field).map(str::to_owned),
        placeholder: editing.placeholder.clone(),
        max_suggestions: editing.max_suggestions,
    }
}

/// The shot table for one script component
#[derive(Debug)]
pub struct ShotTable {
    pub component: ScriptComponent,
    pub rows: Vec<ShotRow>,
    pub row: usize,
    pub col: usize,
    /// First visible row
    pub scroll: usize,
    /// First visible column after `#`, which is always drawn
    pub col_scroll: usize,
    pub edits: DebouncedEdits<TextKey>,
}

impl ShotTable {
    pub fn column(&self) -> Column {
        Column::ALL[self.col.min(Column::ALL.len() - 1)]
    }

    pub fn current(&self) -> Option<&ShotRow> {
        self.rows.get(self.row)
    }

    pub fn current_mut(&mut self) -> Option<&mut ShotRow> {
        self.rows.get_mut(self.row)
    }

    /// Text shown in a free-text cell: the pending edit, else the stored value
    pub fn text(&self, row: &ShotRow, field: TextField) -> String {
        self.edits
            .text(&(row.shot.id.clone(), field))
            .map(str::to_owned)
            .or_else(|| row.shot.text(field).map(str::to_owned))
            .unwrap_or_default()
    }

    /// Keep the cursor row inside a window of `visible` rows.
    pub fn scroll_to_cursor(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + visible {
            self.scroll = self.row + 1 - visible;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub error: bool,
}

/// Regions drawn by the last frame, for mouse hit testing and positioning
#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    pub viewport: Rect,
    pub sidebar: Rect,
    /// First sidebar item drawn
    pub sidebar_scroll: usize,
    pub table: Rect,
    /// (row index, column index, area) for every visible cell
    pub cells: Vec<(usize, usize, Rect)>,
    pub visible_rows: usize,
    pub dialog: Option<Rect>,
    /// Clickable lines of the custom value dialog
    pub dialog_actions: Vec<(Rect, DialogAction)>,
}

/// What a click on a line of the custom value dialog does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Suggestion(usize),
    Confirm,
    Cancel,
}

impl ScreenLayout {
    pub fn cell_at(&self, x: u16, y: u16) -> Option<(usize, usize, Rect)> {
        self.cells
            .iter()
            .copied()
            .find(|(_, _, r)| r.width > 0 && r.contains(ratatui::layout::Position { x, y }))
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Option<Rect> {
        self.cells
            .iter()
            .find(|(r, c, _)| *r == row && *c == col)
            .map(|(_, _, rect)| *rect)
    }
}

/// Main application state
pub struct App {
    store: Box<dyn SceneStore>,
    pub data_dir: Option<PathBuf>,
    pub config: AppConfig,
    pub theme: Theme,
    /// Every field is created in this scope, so at most one dropdown is open
    scope: Scope,
    pub listeners: ViewportListeners,
    pub nav: Navigation,
    pub sidebar: Vec<SidebarItem>,
    pub sidebar_cursor: usize,
    pub focus: Focus,
    pub mode: Mode,
    /// None until the option lists have been fetched
    pub catalog: Option<OptionCatalog>,
    pub table: Option<ShotTable>,
    pub last_saved: LastSaved,
    pub status: Option<StatusMessage>,
    pub show_help: bool,
    pub should_quit: bool,
    pub layout: ScreenLayout,
}

impl App {
    pub fn new(
        store: Box<dyn SceneStore>,
        config: AppConfig,
        data_dir: Option<PathBuf>,
    ) -> Result<Self, AppError> {
        let theme = Theme::from_config(&config.ui);
        let mut app = App {
            store,
            data_dir,
            config,
            theme,
            scope: Scope::root().with_dropdown_provider(),
            listeners: ViewportListeners::new(),
            nav: Navigation::default(),
            sidebar: Vec::new(),
            sidebar_cursor: 0,
            focus: Focus::Sidebar,
            mode: Mode::Navigate,
            catalog: None,
            table: None,
            last_saved: LastSaved::default(),
            status: None,
            show_help: false,
            should_quit: false,
            layout: ScreenLayout::default(),
        };
        app.rebuild_sidebar()?;
        Ok(app)
    }

    pub fn store(&self) -> &dyn SceneStore {
        self.store.as_ref()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    // -----------------------------------------------------------------------
    // Navigation

    pub fn restore(&mut self, state: &UiState) -> Result<(), AppError> {
        self.nav = Navigation::from_state(state);
        self.rebuild_sidebar()?;
        self.sidebar_cursor = state.sidebar_cursor.min(self.sidebar.len().saturating_sub(1));
        if let Some(component) = self.nav.component().map(str::to_owned) {
            self.open_component(&component)?;
        }
        if self.table.is_some() {
            self.focus = Focus::Table;
        }
        Ok(())
    }

    pub fn ui_state(&self) -> UiState {
        let mut state = UiState {
            sidebar_cursor: self.sidebar_cursor,
            ..UiState::default()
        };
        self.nav.write_state(&mut state);
        state
    }

    pub fn rebuild_sidebar(&mut self) -> Result<(), AppError> {
        self.sidebar = build_sidebar(self.store.as_ref(), &mut self.nav)?;
        self.sidebar_cursor = self.sidebar_cursor.min(self.sidebar.len().saturating_sub(1));
        Ok(())
    }

    /// Select the sidebar item under the cursor.
    pub fn activate_sidebar_item(&mut self) -> Result<(), AppError> {
        let Some(item) = self.sidebar.get(self.sidebar_cursor).cloned() else {
            return Ok(());
        };
        self.nav.select(&item);
        if item.kind == NodeKind::Component {
            self.open_component(&item.id)?;
            self.focus = Focus::Table;
        } else {
            self.close_table();
        }
        self.rebuild_sidebar()?;
        if let Some(pos) = self
            .sidebar
            .iter()
            .position(|i| i.kind == item.kind && i.id == item.id)
        {
            self.sidebar_cursor = pos;
        }
        Ok(())
    }

    /// Mount the shot table for a component, unmounting the previous one.
    pub fn open_component(&mut self, component_id: &str) -> Result<(), AppError> {
        self.close_table();
        let Some(script) = self.nav.script().map(str::to_owned) else {
            return Ok(());
        };
        let Some(component) = self
            .store
            .components(&script)?
            .into_iter()
            .find(|c| c.id == component_id)
        else {
            return Ok(());
        };
        let rows = self
            .store
            .shots(component_id)?
            .into_iter()
            .map(|shot| {
                ShotRow::mount(&self.scope, self.catalog.as_ref(), &self.config.editing, shot)
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(component = component_id, rows = rows.len(), "shot table mounted");
        self.table = Some(ShotTable {
            component,
            rows,
            row: 0,
            col: 1,
            scroll: 0,
            col_scroll: 1,
            edits: DebouncedEdits::new(self.config.editing.debounce()),
        });
        Ok(())
    }

    /// Unmount the shot table. Pending text edits are cancelled, not saved.
    pub fn close_table(&mut self) {
        if let Some(mut table) = self.table.take() {
            let cancelled = table.edits.cancel_all();
            if cancelled > 0 {
                tracing::debug!(cancelled, "pending text edits cancelled on unmount");
            }
        }
        self.mode = Mode::Navigate;
    }

    /// Refetch the table's shots. Existing rows keep their fields and are resynced.
    pub fn reload_shots(&mut self) -> Result<(), AppError> {
        let Some(table) = self.table.as_mut() else {
            return Ok(());
        };
        let shots = self.store.shots(&table.component.id)?;
        let mut existing: HashMap<String, ShotRow> = table
            .rows
            .drain(..)
            .map(|row| (row.shot.id.clone(), row))
            .collect();
        let mut rows = Vec::with_capacity(shots.len());
        for shot in shots {
            match existing.remove(&shot.id) {
                Some(mut row) => {
                    row.shot = shot;
                    row.sync(self.catalog.as_ref(), &self.config.editing);
                    rows.push(row);
                }
                None => rows.push(ShotRow::mount(
                    &self.scope,
                    self.catalog.as_ref(),
                    &self.config.editing,
                    shot,
                )?),
            }
        }
        table.rows = rows;
        table.row = table.row.min(table.rows.len().saturating_sub(1));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Option lists

    pub fn load_catalog(&mut self) -> Result<(), AppError> {
        let options = self.store.dropdown_options(None)?;
        let catalog = OptionCatalog::from_options(options);
        tracing::debug!(fields = catalog.fields().count(), "option lists loaded");
        self.catalog = Some(catalog);
        if let Some(table) = self.table.as_mut() {
            for row in &mut table.rows {
                row.sync(self.catalog.as_ref(), &self.config.editing);
            }
        }
        Ok(())
    }

    /// Periodic work: fetch options after the first frame, fire due text edits.
    pub fn tick(&mut self, now: Instant) {
        if self.catalog.is_none() {
            let result = self.load_catalog();
            self.report(result);
        }
        let due = match self.table.as_mut() {
            Some(table) => table.edits.fire_due(now),
            None => Vec::new(),
        };
        for ((shot_id, field), value) in due {
            tracing::debug!(shot = %shot_id, field = field.column(), "debounced edit fired");
            self.persist(&shot_id, vec![ShotUpdate::Text(field, value)]);
        }
    }

    /// How long the event loop may block waiting for input
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let idle = Duration::from_millis(250);
        match self.table.as_ref().and_then(|t| t.edits.next_deadline()) {
            Some(deadline) => deadline.saturating_duration_since(now).min(idle),
            None => idle,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence

    /// Save updates for one shot. On failure the table is reloaded so every
    /// field resyncs to what the store holds.
    pub fn persist(&mut self, shot_id: &str, updates: Vec<ShotUpdate>) {
        if updates.is_empty() {
            return;
        }
        match self.store.update_shot(shot_id, &updates) {
            Ok(shot) => {
                tracing::info!(shot = shot_id, updates = ?updates, "shot saved");
                self.last_saved.record(Utc::now());
                if let Some(table) = self.table.as_mut()
                    && let Some(row) = table.rows.iter_mut().find(|r| r.shot.id == shot_id)
                {
                    row.shot = shot;
                    row.sync(self.catalog.as_ref(), &self.config.editing);
                }
            }
            Err(e) => {
                tracing::warn!(shot = shot_id, error = %e, "save failed");
                self.set_error(format!("save failed: {e}"));
                let reload = self.reload_shots();
                self.report(reload);
            }
        }
    }

    /// Persist the commits produced by the field for `field` on row `row`.
    pub fn apply_commits(&mut self, row: usize, field: ShotField, commits: Vec<FieldCommit>) {
        if commits.is_empty() {
            return;
        }
        let Some(shot_id) = self
            .table
            .as_ref()
            .and_then(|t| t.rows.get(row))
            .map(|r| r.shot.id.clone())
        else {
            return;
        };
        let updates: Vec<ShotUpdate> = commits
            .iter()
            .flat_map(|c| shot_ops::commit_updates(field, c))
            .collect();
        self.persist(&shot_id, updates);
    }

    /// Buffer new text for a free-text cell; it is saved after the quiet period.
    pub fn edit_text(&mut self, row: usize, field: TextField, text: String, now: Instant) {
        if let Some(table) = self.table.as_mut()
            && let Some(shot_id) = table.rows.get(row).map(|r| r.shot.id.clone())
        {
            table.edits.edit((shot_id, field), text, now);
        }
    }

    /// Save every pending text edit now.
    pub fn flush_edits(&mut self) {
        let pending = match self.table.as_mut() {
            Some(table) => table.edits.flush_all(),
            None => Vec::new(),
        };
        for ((shot_id, field), value) in pending {
            self.persist(&shot_id, vec![ShotUpdate::Text(field, value)]);
        }
    }

    pub fn add_shot(&mut self) -> Result<(), AppError> {
        let Some(table) = self.table.as_ref() else {
            return Ok(());
        };
        let shots: Vec<Shot> = table.rows.iter().map(|r| r.shot.clone()).collect();
        let new = NewShot {
            script_component_id: table.component.id.clone(),
            shot_number: shot_ops::next_shot_number(&shots),
            ..NewShot::default()
        };
        let shot = self.store.insert_shot(new)?;
        self.last_saved.record(Utc::now());
        self.reload_shots()?;
        if let Some(table) = self.table.as_mut()
            && let Some(pos) = table.rows.iter().position(|r| r.shot.id == shot.id)
        {
            table.row = pos;
        }
        Ok(())
    }

    pub fn delete_current_shot(&mut self) -> Result<(), AppError> {
        let Some(table) = self.table.as_mut() else {
            return Ok(());
        };
        let Some(shot_id) = table.current().map(|r| r.shot.id.clone()) else {
            return Ok(());
        };
        table.edits.cancel_where(|(id, _)| *id == shot_id);
        self.store.delete_shot(&shot_id)?;
        self.last_saved.record(Utc::now());
        self.reload_shots()
    }

    pub fn toggle_done(&mut self) {
        let Some((id, done)) = self
            .table
            .as_ref()
            .and_then(|t| t.current())
            .map(|r| (r.shot.id.clone(), r.shot.completed))
        else {
            return;
        };
        self.persist(&id, vec![ShotUpdate::Completed(!done)]);
    }

    pub fn quit(&mut self) {
        self.flush_edits();
        self.should_quit = true;
    }

    // -----------------------------------------------------------------------
    // Status

    pub fn set_error(&mut self, text: String) {
        self.status = Some(StatusMessage { text, error: true });
    }

    pub fn set_info(&mut self, text: String) {
        self.status = Some(StatusMessage { text, error: false });
    }

    pub fn report(&mut self, result: Result<(), AppError>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "operation failed");
            self.set_error(e.to_string());
        }
    }

    /// The field showing a custom value prompt, if any
    pub fn prompt_field(&self) -> Option<(usize, ShotField, &AutocompleteField)> {
        let table = self.table.as_ref()?;
        table.rows.iter().enumerate().find_map(|(i, row)| {
            row.fields()
                .find(|(_, f)| f.prompt().is_some())
                .map(|(field, f)| (i, field, f))
        })
    }
}

/// Restore UI state from .scenes-state.json
pub fn restore_ui_state(app: &mut App) {
    let Some(dir) = app.data_dir.clone() else {
        return;
    };
    if let Some(state) = read_ui_state(&dir) {
        let result = app.restore(&state);
        app.report(result);
    }
}

/// Save UI state to .scenes-state.json
pub fn save_ui_state(app: &App) {
    if let Some(dir) = &app.data_dir
        && let Err(e) = write_ui_state(dir, &app.ui_state())
    {
        tracing::warn!(error = %e, "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(data_dir: &Path, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonStore::open(&data_dir.join(&config.store.file))?;
    let mut app = App::new(Box::new(store), config, Some(data_dir.to_path_buf()))?;
    restore_ui_state(&mut app);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    tracing::info!("tui started");
    let result = run_event_loop(&mut terminal, &mut app);

    if !app.should_quit {
        app.flush_edits();
    }
    save_ui_state(&app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;
        app.tick(Instant::now());

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                Event::Resize(_, _) => app.listeners.notify(),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
