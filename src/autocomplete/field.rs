use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use crate::model::OTHER;
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

use super::confirm::CustomValuePrompt;
use super::filter::{exact_match, filter_options};
use super::position::{DropdownPlacement, ViewportListeners};
use super::registry::{DropdownError, DropdownId, DropdownRegistry, Scope};

/// Inputs owned by the container. Passed in on creation and on every [`sync`](AutocompleteField::sync).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProps {
    /// Authoritative value; None means unset
    pub value: Option<String>,
    pub options: Vec<String>,
    /// Unmatched text may be stored as `Other` plus custom text
    pub allow_custom: bool,
    pub is_loading: bool,
    pub disabled: bool,
    /// The field has a paired text slot shown while the value is `Other`
    pub has_custom_slot: bool,
    pub other_value: Option<String>,
    pub placeholder: String,
    pub max_suggestions: usize,
}

impl Default for FieldProps {
    fn default() -> Self {
        FieldProps {
            value: None,
            options: Vec::new(),
            allow_custom: false,
            is_loading: false,
            disabled: false,
            has_custom_slot: false,
            other_value: None,
            placeholder: "Type to search...".into(),
            max_suggestions: 3,
        }
    }
}

/// A value handed back to the container for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCommit {
    /// New primary value (`onChange`)
    Value(Option<String>),
    /// New text for the paired custom slot (`onOtherChange`)
    Other(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The field did not use the key; the caller may handle it.
    Ignored,
    Handled(Vec<FieldCommit>),
}

impl KeyOutcome {
    pub fn commits(self) -> Vec<FieldCommit> {
        match self {
            KeyOutcome::Ignored => Vec::new(),
            KeyOutcome::Handled(commits) => commits,
        }
    }
}

/// Text input with a filtered option list.
///
/// Open/closed is never stored: the field is open exactly when its id is the
/// active id of the shared registry. Commits are returned to the caller rather
/// than persisted here, and the field treats its own commits as authoritative
/// until the next [`sync`](Self::sync) says otherwise.
#[derive(Debug)]
pub struct AutocompleteField {
    id: DropdownId,
    registry: DropdownRegistry,
    props: FieldProps,
    /// Last authoritative value, including our own optimistic commits
    committed: Option<String>,
    buffer: String,
    cursor: usize,
    filtered: Vec<String>,
    highlighted: Option<usize>,
    prompt: Option<CustomValuePrompt>,
    /// Buffer holds keystrokes not yet resolved by blur/Enter
    edited: bool,
    /// Set by Escape so the buffer revert does not reopen the panel
    suppress_reopen: bool,
    focused: bool,
    other_buffer: String,
    other_edited: bool,
    placement: DropdownPlacement,
}

impl AutocompleteField {
    pub fn new(scope: &Scope, props: FieldProps) -> Result<Self, DropdownError> {
        let registry = scope.dropdown()?.clone();
        let id = registry.register();
        let buffer = props.value.clone().unwrap_or_default();
        let mut field = AutocompleteField {
            id,
            registry,
            committed: props.value.clone(),
            cursor: buffer.len(),
            buffer,
            filtered: Vec::new(),
            highlighted: None,
            prompt: None,
            edited: false,
            suppress_reopen: false,
            focused: false,
            other_buffer: props.other_value.clone().unwrap_or_default(),
            other_edited: false,
            placement: DropdownPlacement::default(),
            props,
        };
        field.recompute_filtered();
        Ok(field)
    }

    // -----------------------------------------------------------------------
    // Derived state

    pub fn id(&self) -> DropdownId {
        self.id
    }

    pub fn props(&self) -> &FieldProps {
        &self.props
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Byte offset of the edit cursor in [`text`](Self::text)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Authoritative value as this field knows it
    pub fn value(&self) -> Option<&str> {
        self.committed.as_deref()
    }

    pub fn filtered(&self) -> &[String] {
        &self.filtered
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn prompt(&self) -> Option<&CustomValuePrompt> {
        self.prompt.as_ref()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn is_open(&self) -> bool {
        self.registry.is_active(self.id)
    }

    pub fn is_loading(&self) -> bool {
        self.props.is_loading
    }

    fn interactive(&self) -> bool {
        !self.props.disabled && !self.props.is_loading
    }

    /// Option list is drawn
    pub fn shows_panel(&self) -> bool {
        self.is_open() && !self.props.is_loading && !self.filtered.is_empty()
    }

    /// The panel shows a single `Add "<text>" as Other` entry instead of options
    pub fn offers_custom_entry(&self) -> bool {
        self.is_open()
            && !self.props.is_loading
            && self.props.allow_custom
            && self.prompt.is_none()
            && self.filtered.is_empty()
            && !self.buffer.trim().is_empty()
    }

    /// The paired free-text input is visible
    pub fn shows_custom_slot(&self) -> bool {
        self.props.has_custom_slot && self.committed.as_deref() == Some(OTHER)
    }

    pub fn other_text(&self) -> &str {
        &self.other_buffer
    }

    // -----------------------------------------------------------------------
    // Container updates

    /// Receive fresh props from the container.
    ///
    /// A value different from the one this field last committed or saw
    /// replaces the buffer. Option or loading changes refilter the list but
    /// never open the dropdown.
    pub fn sync(&mut self, props: FieldProps) {
        if props.value != self.committed {
            tracing::debug!(id = ?self.id, value = ?props.value, "field resynced from container");
            self.committed = props.value.clone();
            self.set_buffer(self.committed.clone().unwrap_or_default());
            self.edited = false;
        }
        if !self.other_edited {
            self.other_buffer = props.other_value.clone().unwrap_or_default();
        }
        let list_changed =
            props.options != self.props.options || props.is_loading != self.props.is_loading;
        self.props = props;
        if list_changed {
            self.recompute_filtered();
            self.highlighted = None;
        }
        if !self.interactive() {
            self.close();
        }
    }

    // -----------------------------------------------------------------------
    // Focus

    pub fn focus(&mut self) {
        if !self.interactive() {
            return;
        }
        self.focused = true;
        self.suppress_reopen = false;
        if !self.buffer.is_empty() || !self.filtered.is_empty() {
            self.claim();
        }
    }

    /// Leave the field: resolve edited text to a commit, a revert, or a prompt.
    ///
    /// Ignored while the confirmation prompt is up, since the prompt owns the
    /// interaction until it is answered.
    pub fn blur(&mut self) -> Vec<FieldCommit> {
        if self.prompt.is_some() {
            return Vec::new();
        }
        self.focused = false;
        self.resolve()
    }

    fn resolve(&mut self) -> Vec<FieldCommit> {
        if !self.edited {
            self.revert_buffer();
            self.close();
            return Vec::new();
        }
        self.validate()
    }

    fn validate(&mut self) -> Vec<FieldCommit> {
        let trimmed = self.buffer.trim().to_string();

        if trimmed.is_empty() {
            self.set_buffer(String::new());
            self.close();
            return self.commit(None);
        }

        if let Some(matched) = exact_match(&trimmed, &self.props.options).map(str::to_owned) {
            self.set_buffer(matched.clone());
            self.close();
            return self.commit(Some(matched));
        }

        if !self.props.allow_custom {
            tracing::debug!(id = ?self.id, text = %trimmed, "value not in options, reverting");
            self.edited = false;
            self.revert_buffer();
            self.close();
            return Vec::new();
        }

        self.open_prompt(&trimmed);
        Vec::new()
    }

    fn open_prompt(&mut self, pending: &str) {
        let prompt =
            CustomValuePrompt::new(pending, &self.props.options, self.props.max_suggestions);
        self.filtered = filter_options(pending, &self.props.options)
            .into_iter()
            .map(str::to_owned)
            .collect();
        self.highlighted = None;
        self.prompt = Some(prompt);
        // keep the option list visible behind the prompt
        self.claim();
    }

    fn commit(&mut self, value: Option<String>) -> Vec<FieldCommit> {
        self.edited = false;
        self.prompt = None;
        self.highlighted = None;
        if value == self.committed {
            return Vec::new();
        }
        tracing::debug!(id = ?self.id, ?value, "field committed");
        self.committed = value.clone();
        vec![FieldCommit::Value(value)]
    }

    // -----------------------------------------------------------------------
    // Typing

    /// Replace the whole buffer, as a paste over a selection would.
    pub fn set_text(&mut self, text: &str) {
        if !self.interactive() || self.prompt.is_some() {
            return;
        }
        self.set_buffer(text.to_string());
        self.buffer_changed();
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.interactive() || self.prompt.is_some() {
            return;
        }
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.buffer_changed();
    }

    pub fn backspace(&mut self) {
        if !self.interactive() || self.prompt.is_some() {
            return;
        }
        if let Some(prev) = prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
            self.buffer_changed();
        }
    }

    pub fn delete_forward(&mut self) {
        if !self.interactive() || self.prompt.is_some() {
            return;
        }
        if let Some(next) = next_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(self.cursor..next, "");
            self.buffer_changed();
        }
    }

    fn buffer_changed(&mut self) {
        self.edited = true;
        self.refresh();
    }

    /// Refilter and decide open/closed from the buffer.
    fn refresh(&mut self) {
        self.recompute_filtered();
        self.highlighted = None;
        if self.suppress_reopen {
            self.suppress_reopen = false;
            self.close();
        } else if !self.filtered.is_empty() || !self.buffer.is_empty() {
            self.claim();
        } else {
            self.close();
        }
    }

    fn recompute_filtered(&mut self) {
        if self.props.is_loading {
            self.filtered.clear();
            return;
        }
        self.filtered = filter_options(&self.buffer, &self.props.options)
            .into_iter()
            .map(str::to_owned)
            .collect();
    }

    fn set_buffer(&mut self, text: String) {
        self.cursor = text.len();
        self.buffer = text;
    }

    fn revert_buffer(&mut self) {
        self.set_buffer(self.committed.clone().unwrap_or_default());
    }

    fn claim(&mut self) {
        self.registry.set_active(Some(self.id));
    }

    fn close(&mut self) {
        self.registry.release(self.id);
        self.highlighted = None;
    }

    // -----------------------------------------------------------------------
    // Keyboard

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if !self.interactive() {
            return KeyOutcome::Ignored;
        }
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Down | KeyCode::Up => {
                if !self.is_open() {
                    // a closed field opens from the keyboard without moving the cursor
                    self.suppress_reopen = false;
                    self.claim();
                } else if key.code == KeyCode::Down {
                    self.highlight_next();
                } else {
                    self.highlight_prev();
                }
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Enter => {
                let chosen = self
                    .highlighted
                    .filter(|_| self.is_open())
                    .and_then(|i| self.filtered.get(i).cloned());
                match chosen {
                    Some(option) => KeyOutcome::Handled(self.select(option)),
                    None => KeyOutcome::Handled(self.resolve()),
                }
            }
            KeyCode::Esc => {
                if !self.is_open() && !self.edited {
                    return KeyOutcome::Ignored;
                }
                self.edited = false;
                self.revert_buffer();
                self.suppress_reopen = true;
                self.refresh();
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Char(c) if plain => {
                self.insert_char(c);
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.set_text("");
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Backspace => {
                self.backspace();
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Delete => {
                self.delete_forward();
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Left => {
                if let Some(prev) = prev_grapheme_boundary(&self.buffer, self.cursor) {
                    self.cursor = prev;
                }
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Right => {
                if let Some(next) = next_grapheme_boundary(&self.buffer, self.cursor) {
                    self.cursor = next;
                }
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Home => {
                self.cursor = 0;
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::End => {
                self.cursor = self.buffer.len();
                KeyOutcome::Handled(Vec::new())
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let commits = match key.code {
            KeyCode::Enter | KeyCode::Char('y') => self.confirm_custom(),
            KeyCode::Esc | KeyCode::Char('n') => {
                self.cancel_custom();
                Vec::new()
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                self.choose_suggestion(index)
            }
            // modal: swallow everything else
            _ => Vec::new(),
        };
        KeyOutcome::Handled(commits)
    }

    fn highlight_next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        });
    }

    fn highlight_prev(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i > 0 => i - 1,
            _ => len - 1,
        });
    }

    // -----------------------------------------------------------------------
    // Pointer

    /// Activate a panel entry. Callers deliver this on mouse press, before any
    /// blur caused by the same press, so the selection wins over a revert.
    pub fn press_option(&mut self, index: usize) -> Vec<FieldCommit> {
        match self.filtered.get(index).cloned() {
            Some(option) => self.select(option),
            None => Vec::new(),
        }
    }

    /// Activate the `Add "<text>" as Other` entry.
    pub fn press_custom_entry(&mut self) {
        if !self.offers_custom_entry() {
            return;
        }
        let pending = self.buffer.trim().to_string();
        self.open_prompt(&pending);
    }

    fn select(&mut self, option: String) -> Vec<FieldCommit> {
        self.set_buffer(option.clone());
        self.close();
        self.commit(Some(option))
    }

    // -----------------------------------------------------------------------
    // Custom value prompt

    pub fn choose_suggestion(&mut self, index: usize) -> Vec<FieldCommit> {
        let suggestion = self
            .prompt
            .as_ref()
            .and_then(|p| p.suggestion(index))
            .map(str::to_owned);
        match suggestion {
            Some(option) => self.select(option),
            None => Vec::new(),
        }
    }

    /// Store the pending text as `Other` plus custom text.
    ///
    /// Both commits are sent on every confirmation, even when the value
    /// already was `Other`.
    pub fn confirm_custom(&mut self) -> Vec<FieldCommit> {
        let Some(prompt) = self.prompt.take() else {
            return Vec::new();
        };
        let pending = prompt.pending().to_string();
        self.set_buffer(OTHER.to_string());
        self.close();
        self.edited = false;
        self.highlighted = None;
        self.committed = Some(OTHER.to_string());
        tracing::debug!(id = ?self.id, text = %pending, "custom value confirmed");
        self.other_buffer = pending.clone();
        self.other_edited = false;
        vec![
            FieldCommit::Value(Some(OTHER.to_string())),
            FieldCommit::Other(Some(pending)),
        ]
    }

    pub fn cancel_custom(&mut self) {
        if self.prompt.take().is_none() {
            return;
        }
        self.edited = false;
        self.revert_buffer();
        self.recompute_filtered();
        self.close();
    }

    // -----------------------------------------------------------------------
    // Paired custom slot

    pub fn set_other_text(&mut self, text: &str) {
        if self.props.disabled || !self.shows_custom_slot() {
            return;
        }
        self.other_buffer = text.to_string();
        self.other_edited = true;
    }

    /// Keys for the paired input. Printable characters edit it; Esc reverts.
    pub fn handle_other_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if self.props.disabled || !self.shows_custom_slot() {
            return KeyOutcome::Ignored;
        }
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.other_buffer.push(c);
                self.other_edited = true;
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Backspace => {
                if let Some(prev) = prev_grapheme_boundary(&self.other_buffer, self.other_buffer.len()) {
                    self.other_buffer.truncate(prev);
                    self.other_edited = true;
                }
                KeyOutcome::Handled(Vec::new())
            }
            KeyCode::Esc if self.other_edited => {
                self.other_buffer = self.props.other_value.clone().unwrap_or_default();
                self.other_edited = false;
                KeyOutcome::Handled(Vec::new())
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Save the paired input if it was edited. Empty text clears it.
    pub fn blur_other(&mut self) -> Vec<FieldCommit> {
        if !self.other_edited {
            return Vec::new();
        }
        self.other_edited = false;
        let value = (!self.other_buffer.is_empty()).then(|| self.other_buffer.clone());
        vec![FieldCommit::Other(value)]
    }

    // -----------------------------------------------------------------------
    // Placement

    /// Recompute the panel rectangle for this frame; None when nothing is drawn.
    ///
    /// A missing anchor means the input is not on screen, which hides the panel.
    pub fn layout(
        &mut self,
        anchor: Option<Rect>,
        viewport: Rect,
        max_rows: u16,
        listeners: &ViewportListeners,
    ) -> Option<Rect> {
        let rows = if self.shows_panel() {
            self.filtered.len().min(max_rows as usize) as u16
        } else if self.offers_custom_entry() {
            1
        } else {
            0
        };
        let open = self.is_open() && rows > 0 && anchor.is_some();
        self.placement.update(
            self.id,
            open,
            anchor.unwrap_or_default(),
            viewport,
            rows,
            listeners,
        )
    }

    pub fn panel_rect(&self) -> Option<Rect> {
        self.placement.rect()
    }

    /// First visible entry when the panel shows `rows` entries
    pub fn panel_scroll(&self, rows: usize) -> usize {
        match self.highlighted {
            Some(i) if rows > 0 && i >= rows => i + 1 - rows,
            _ => 0,
        }
    }
}

impl Drop for AutocompleteField {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn props(value: Option<&str>, options: &[&str], allow_custom: bool) -> FieldProps {
        FieldProps {
            value: value.map(String::from),
            options: options.iter().map(|s| s.to_string()).collect(),
            allow_custom,
            has_custom_slot: allow_custom,
            ..FieldProps::default()
        }
    }

    fn field(scope: &Scope, value: Option<&str>, options: &[&str], allow_custom: bool) -> AutocompleteField {
        AutocompleteField::new(scope, props(value, options, allow_custom)).unwrap()
    }

    fn type_text(field: &mut AutocompleteField, text: &str) {
        for c in text.chars() {
            assert_eq!(field.handle_key(key(KeyCode::Char(c))), KeyOutcome::Handled(vec![]));
        }
    }

    fn value(v: &str) -> FieldCommit {
        FieldCommit::Value(Some(v.to_string()))
    }

    fn scope() -> Scope {
        Scope::root().with_dropdown_provider()
    }

    #[test]
    fn requires_a_provider() {
        let err = AutocompleteField::new(&Scope::root(), FieldProps::default()).unwrap_err();
        assert_eq!(err, DropdownError::NoProvider);
    }

    #[test]
    fn exact_match_on_blur_commits_canonical_case() {
        let scope = scope();
        let mut f = field(&scope, None, &["WS", "MID", "CU"], false);
        f.focus();
        type_text(&mut f, "ws");
        assert_eq!(f.filtered(), &["WS"]);
        assert_eq!(f.blur(), vec![value("WS")]);
        assert_eq!(f.text(), "WS");
        assert!(!f.is_open());
    }

    #[test]
    fn unmatched_text_reverts_on_fixed_list() {
        let scope = scope();
        let mut f = field(&scope, Some("WS"), &["WS", "MID"], false);
        f.focus();
        f.set_text("ZZZ");
        assert!(f.blur().is_empty());
        assert_eq!(f.text(), "WS");
        assert_eq!(f.value(), Some("WS"));
        assert!(!f.is_open());
    }

    #[test]
    fn unmatched_text_prompts_when_custom_allowed() {
        let scope = scope();
        let mut f = field(&scope, None, &["WS", "MID"], true);
        f.focus();
        f.set_text("CUSTOM");
        assert!(f.blur().is_empty());

        let prompt = f.prompt().expect("prompt shown");
        assert_eq!(prompt.pending(), "CUSTOM");
        assert!(prompt.message().contains("CUSTOM"));

        assert_eq!(
            f.confirm_custom(),
            vec![value("Other"), FieldCommit::Other(Some("CUSTOM".into()))]
        );
        assert_eq!(f.text(), "Other");
        assert!(f.prompt().is_none());
        assert!(f.shows_custom_slot());
        assert_eq!(f.other_text(), "CUSTOM");
    }

    #[test]
    fn arrows_then_enter_commit_highlighted_option() {
        let scope = scope();
        let mut f = field(&scope, None, &["A", "B", "C"], false);
        f.focus();
        assert!(f.is_open());
        f.handle_key(key(KeyCode::Down));
        f.handle_key(key(KeyCode::Down));
        assert_eq!(f.highlighted(), Some(1));
        assert_eq!(f.handle_key(key(KeyCode::Enter)), KeyOutcome::Handled(vec![value("B")]));
        assert!(!f.is_open());
    }

    #[test]
    fn opening_another_field_closes_the_first() {
        let scope = scope();
        let mut first = field(&scope, None, &["WS"], false);
        let mut second = field(&scope, None, &["MID"], false);
        first.focus();
        assert!(first.is_open());
        second.focus();
        assert!(second.is_open());
        assert!(!first.is_open());
    }

    #[test]
    fn at_most_one_open_under_any_interleaving() {
        let scope = scope();
        let mut fields: Vec<AutocompleteField> = (0..5)
            .map(|_| field(&scope, None, &["WS", "MID", "CU"], true))
            .collect();
        let mut seed: u64 = 0x5eed;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let target = (seed >> 33) as usize % fields.len();
            let f = &mut fields[target];
            match (seed >> 40) % 7 {
                0 => f.focus(),
                1 => {
                    f.blur();
                }
                2 => f.insert_char('w'),
                3 => {
                    f.handle_key(key(KeyCode::Down));
                }
                4 => {
                    f.handle_key(key(KeyCode::Esc));
                }
                5 => {
                    f.cancel_custom();
                }
                _ => f.backspace(),
            }
            let open = fields.iter().filter(|f| f.is_open()).count();
            assert!(open <= 1, "{open} fields open at once");
        }
    }

    #[test]
    fn reblur_without_edits_does_not_recommit() {
        let scope = scope();
        let mut f = field(&scope, None, &["WS", "MID"], false);
        f.focus();
        type_text(&mut f, "mid");
        assert_eq!(f.blur(), vec![value("MID")]);
        f.focus();
        assert!(f.blur().is_empty());
        f.focus();
        f.set_text("Mid");
        assert!(f.blur().is_empty());
        assert_eq!(f.text(), "MID");
    }

    #[test]
    fn blank_blur_clears_value() {
        let scope = scope();
        let mut f = field(&scope, Some("WS"), &["WS"], false);
        f.focus();
        f.set_text("   ");
        assert_eq!(f.blur(), vec![FieldCommit::Value(None)]);
        assert_eq!(f.text(), "");
        assert_eq!(f.value(), None);
    }

    #[test]
    fn enter_without_highlight_validates_like_blur() {
        let scope = scope();
        let mut f = field(&scope, None, &["WS", "MID"], false);
        f.focus();
        type_text(&mut f, "mid");
        assert_eq!(f.handle_key(key(KeyCode::Enter)), KeyOutcome::Handled(vec![value("MID")]));
    }

    #[test]
    fn escape_reverts_closes_and_stays_closed() {
        let scope = scope();
        let mut f = field(&scope, Some("WS"), &["WS", "MID"], false);
        f.focus();
        type_text(&mut f, "x");
        assert!(f.is_open());
        f.handle_key(key(KeyCode::Down));

        assert_eq!(f.handle_key(key(KeyCode::Esc)), KeyOutcome::Handled(vec![]));
        assert_eq!(f.text(), "WS");
        assert!(!f.is_open());
        assert_eq!(f.highlighted(), None);
        assert!(!f.is_edited());

        // nothing left to dismiss
        assert_eq!(f.handle_key(key(KeyCode::Esc)), KeyOutcome::Ignored);

        // the next affirmative action reopens
        type_text(&mut f, "m");
        assert!(f.is_open());
    }

    #[test]
    fn arrow_opens_a_closed_field_without_moving() {
        let scope = scope();
        let mut f = field(&scope, None, &["A", "B"], false);
        assert!(!f.is_open());
        f.handle_key(key(KeyCode::Up));
        assert!(f.is_open());
        assert_eq!(f.highlighted(), None);
    }

    #[test]
    fn highlight_wraps_both_ways() {
        let scope = scope();
        let mut f = field(&scope, None, &["A", "B", "C"], false);
        f.focus();
        f.handle_key(key(KeyCode::Up));
        assert_eq!(f.highlighted(), Some(2));
        f.handle_key(key(KeyCode::Down));
        assert_eq!(f.highlighted(), Some(0));
        f.handle_key(key(KeyCode::Up));
        assert_eq!(f.highlighted(), Some(2));
    }

    #[test]
    fn typing_clears_highlight_and_refilters() {
        let scope = scope();
        let mut f = field(&scope, None, &["WS", "MID", "CU"], false);
        f.focus();
        f.handle_key(key(KeyCode::Down));
        type_text(&mut f, "c");
        assert_eq!(f.highlighted(), None);
        assert_eq!(f.filtered(), &["CU"]);
    }

    #[test]
    fn emptied_buffer_with_no_options_closes() {
        let scope = scope();
        let mut f = field(&scope, None, &[], true);
        f.focus();
        assert!(!f.is_open());
        type_text(&mut f, "a");
        assert!(f.is_open());
        assert!(f.offers_custom_entry());
        f.handle_key(key(KeyCode::Backspace));
        assert!(!f.is_open());
    }

    #[test]
    fn press_beats_the_following_blur() {
        let scope = scope();
        let mut f = field(&scope, Some("WS"), &["WS", "MID", "CU"], false);
        f.focus();
        f.set_text("zz");
        f.set_text("m");
        assert_eq!(f.press_option(0), vec![value("MID")]);
        assert!(!f.is_open());
        assert!(f.blur().is_empty());
        assert_eq!(f.text(), "MID");
    }

    #[test]
    fn loading_forces_empty_list_and_ignores_input() {
        let scope = scope();
        let mut p = props(None, &["WS", "MID"], false);
        p.is_loading = true;
        let mut f = AutocompleteField::new(&scope, p.clone()).unwrap();
        assert!(f.filtered().is_empty());
        f.focus();
        assert!(!f.is_open());
        assert_eq!(f.handle_key(key(KeyCode::Char('w'))), KeyOutcome::Ignored);

        p.is_loading = false;
        f.sync(p);
        assert_eq!(f.filtered(), &["WS", "MID"]);
        assert!(!f.is_open());
    }

    #[test]
    fn disabled_field_ignores_everything() {
        let scope = scope();
        let mut p = props(Some("WS"), &["WS"], false);
        p.disabled = true;
        let mut f = AutocompleteField::new(&scope, p).unwrap();
        f.focus();
        f.insert_char('x');
        assert!(!f.is_open());
        assert_eq!(f.text(), "WS");
        assert_eq!(f.handle_key(key(KeyCode::Down)), KeyOutcome::Ignored);
    }

    #[test]
    fn external_value_change_resyncs_buffer() {
        let scope = scope();
        let mut f = field(&scope, Some("WS"), &["WS", "CU"], false);
        f.sync(props(Some("CU"), &["WS", "CU"], false));
        assert_eq!(f.text(), "CU");

        // same value while editing keeps keystrokes
        f.focus();
        f.set_text("c");
        f.sync(props(Some("CU"), &["WS", "CU"], false));
        assert_eq!(f.text(), "c");
    }

    #[test]
    fn failed_save_is_overwritten_by_refetch() {
        let scope = scope();
        let mut f = field(&scope, None, &["WS"], false);
        f.focus();
        f.set_text("ws");
        assert_eq!(f.blur(), vec![value("WS")]);
        // store rejected the write and the container reloaded the old row
        f.sync(props(None, &["WS"], false));
        assert_eq!(f.text(), "");
        assert_eq!(f.value(), None);
    }

    #[test]
    fn options_arriving_do_not_open_the_field() {
        let scope = scope();
        let mut f = field(&scope, None, &[], false);
        f.sync(props(None, &["WS"], false));
        assert!(!f.is_open());
        assert_eq!(f.filtered(), &["WS"]);
    }

    #[test]
    fn prompt_offers_near_matches() {
        let scope = scope();
        let mut f = field(&scope, None, &["Standard", "Stand-in", "Rooftop"], true);
        f.focus();
        f.set_text("Stand");
        f.blur();
        let prompt = f.prompt().unwrap();
        assert_eq!(prompt.suggestions(), &["Standard", "Stand-in"]);
        assert!(f.is_open());

        assert_eq!(f.choose_suggestion(1), vec![value("Stand-in")]);
        assert!(f.prompt().is_none());
        assert_eq!(f.text(), "Stand-in");
    }

    #[test]
    fn prompt_keys_pick_suggestions() {
        let scope = scope();
        let mut f = field(&scope, None, &["Standard", "Stand-in"], true);
        f.focus();
        f.set_text("Stand");
        f.blur();
        assert_eq!(f.handle_key(key(KeyCode::Char('x'))), KeyOutcome::Handled(vec![]));
        assert_eq!(
            f.handle_key(key(KeyCode::Char('1'))),
            KeyOutcome::Handled(vec![value("Standard")])
        );
    }

    #[test]
    fn cancelling_prompt_reverts_without_commit() {
        let scope = scope();
        let mut f = field(&scope, Some("Standard"), &["Standard"], true);
        f.focus();
        f.set_text("Mars");
        f.blur();
        assert!(f.prompt().is_some());
        // blur is ignored while the prompt is up
        assert!(f.blur().is_empty());
        assert!(f.prompt().is_some());

        assert_eq!(f.handle_key(key(KeyCode::Esc)), KeyOutcome::Handled(vec![]));
        assert!(f.prompt().is_none());
        assert_eq!(f.text(), "Standard");
        assert!(!f.is_open());
    }

    #[test]
    fn custom_entry_opens_prompt() {
        let scope = scope();
        let mut f = field(&scope, None, &["WS"], true);
        f.focus();
        type_text(&mut f, "zzz");
        assert!(f.offers_custom_entry());
        f.press_custom_entry();
        assert_eq!(f.prompt().map(|p| p.pending()), Some("zzz"));
    }

    #[test]
    fn reconfirming_other_sends_both_commits() {
        let scope = scope();
        let mut p = props(Some("Other"), &["Standard", "Other"], true);
        p.other_value = Some("Roof".into());
        let mut f = AutocompleteField::new(&scope, p).unwrap();
        f.focus();
        f.set_text("Garden");
        f.blur();
        assert_eq!(
            f.confirm_custom(),
            vec![value("Other"), FieldCommit::Other(Some("Garden".into()))]
        );
        assert_eq!(f.other_text(), "Garden");
        // nothing left to resolve afterwards
        assert!(f.blur().is_empty());
    }

    #[test]
    fn custom_slot_saves_on_blur() {
        let scope = scope();
        let mut p = props(Some("Other"), &["Standard", "Other"], true);
        p.other_value = Some("Roof".into());
        let mut f = AutocompleteField::new(&scope, p).unwrap();
        assert!(f.shows_custom_slot());
        assert_eq!(f.other_text(), "Roof");

        assert!(f.blur_other().is_empty());
        f.handle_other_key(key(KeyCode::Char('s')));
        assert_eq!(f.blur_other(), vec![FieldCommit::Other(Some("Roofs".into()))]);

        f.set_other_text("");
        assert_eq!(f.blur_other(), vec![FieldCommit::Other(None)]);
    }

    #[test]
    fn custom_slot_hidden_unless_other() {
        let scope = scope();
        let f = field(&scope, Some("Standard"), &["Standard", "Other"], true);
        assert!(!f.shows_custom_slot());
        let g = field(&scope, Some("Other"), &["Other"], false);
        assert!(!g.shows_custom_slot());
    }

    #[test]
    fn dropping_the_open_field_releases_registry() {
        let scope = scope();
        {
            let mut f = field(&scope, None, &["WS"], false);
            f.focus();
            assert!(f.is_open());
        }
        assert_eq!(scope.dropdown().unwrap().active(), None);
    }

    #[test]
    fn layout_tracks_open_state() {
        let scope = scope();
        let listeners = ViewportListeners::new();
        let viewport = Rect::new(0, 0, 80, 24);
        let anchor = Rect::new(4, 2, 10, 1);
        let mut f = field(&scope, None, &["WS", "MID", "CU"], false);

        assert_eq!(f.layout(Some(anchor), viewport, 8, &listeners), None);
        f.focus();
        assert_eq!(f.layout(Some(anchor), viewport, 8, &listeners), Some(Rect::new(4, 3, 10, 5)));
        assert!(listeners.is_listening(f.id()));

        f.handle_key(key(KeyCode::Esc));
        f.layout(Some(anchor), viewport, 8, &listeners);
        assert!(listeners.is_empty());

        // scrolled out of view
        f.handle_key(key(KeyCode::Down));
        assert!(f.is_open());
        assert_eq!(f.layout(None, viewport, 8, &listeners), None);
        assert_eq!(f.panel_rect(), None);
    }

    #[test]
    fn panel_scrolls_to_keep_highlight_visible() {
        let scope = scope();
        let options: Vec<String> = (0..10).map(|i| format!("Opt {i}")).collect();
        let refs: Vec<&str> = options.iter().map(String::as_str).collect();
        let mut f = field(&scope, None, &refs, false);
        f.focus();
        for _ in 0..6 {
            f.handle_key(key(KeyCode::Down));
        }
        assert_eq!(f.highlighted(), Some(5));
        assert_eq!(f.panel_scroll(4), 2);
        assert_eq!(f.panel_scroll(8), 0);
    }
}
