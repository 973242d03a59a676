use crate::autocomplete::{FieldCommit, exact_match, filter_options};
use crate::model::{OTHER, Shot, ShotField, ShotUpdate, TextField};

/// Error type for shot operations issued outside the editor
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShotOpError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("\"{value}\" is not an option for {field}{hint}")]
    NotAnOption {
        field: &'static str,
        value: String,
        hint: String,
    },
    #[error("invalid value for done: {0} (expected true or false)")]
    InvalidBool(String),
}

// ---------------------------------------------------------------------------
// Commits from the editor
// ---------------------------------------------------------------------------

/// Updates to persist for one commit of an autocomplete field.
///
/// Leaving `Other` on a field with a custom slot also clears the paired text.
pub fn commit_updates(field: ShotField, commit: &FieldCommit) -> Vec<ShotUpdate> {
    match commit {
        FieldCommit::Value(value) => {
            let mut updates = vec![ShotUpdate::Field(field, value.clone())];
            if field.has_custom_slot() && value.as_deref() != Some(OTHER) {
                updates.push(ShotUpdate::Other(field, None));
            }
            updates
        }
        FieldCommit::Other(text) => vec![ShotUpdate::Other(field, text.clone())],
    }
}

/// Number for a shot appended after `shots`
pub fn next_shot_number(shots: &[Shot]) -> u32 {
    shots.iter().map(|s| s.shot_number).max().unwrap_or(0) + 1
}

// ---------------------------------------------------------------------------
// Values typed on the command line
// ---------------------------------------------------------------------------

/// Resolve a typed value the way the editor does on blur.
///
/// Blank clears the field. A case-insensitive match stores the canonical
/// option. Anything else is stored as `Other` plus the text when `as_other`
/// is set and the field has a custom slot, and rejected otherwise. A
/// rejection names up to `max_suggestions` near matches.
pub fn resolve_field_value(
    field: ShotField,
    raw: &str,
    options: &[String],
    as_other: bool,
    max_suggestions: usize,
) -> Result<Vec<ShotUpdate>, ShotOpError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(commit_updates(field, &FieldCommit::Value(None)));
    }
    if let Some(canonical) = exact_match(trimmed, options) {
        return Ok(commit_updates(
            field,
            &FieldCommit::Value(Some(canonical.to_string())),
        ));
    }
    if as_other && field.has_custom_slot() {
        return Ok(vec![
            ShotUpdate::Field(field, Some(OTHER.to_string())),
            ShotUpdate::Other(field, Some(trimmed.to_string())),
        ]);
    }

    let near: Vec<&str> = filter_options(trimmed, options)
        .into_iter()
        .take(max_suggestions)
        .collect();
    let hint = if !near.is_empty() {
        format!(" (did you mean: {}?)", near.join(", "))
    } else if field.has_custom_slot() {
        " (use --other to store it as a custom value)".to_string()
    } else {
        String::new()
    };
    Err(ShotOpError::NotAnOption {
        field: field.column(),
        value: trimmed.to_string(),
        hint,
    })
}

/// Free-text columns store the text verbatim; empty clears.
pub fn resolve_text_value(field: TextField, raw: &str) -> ShotUpdate {
    let value = (!raw.is_empty()).then(|| raw.to_string());
    ShotUpdate::Text(field, value)
}

/// Resolve `<field> <value>` as given to `scenes set`.
pub fn resolve_named_value(
    name: &str,
    raw: &str,
    options_for: impl Fn(ShotField) -> Vec<String>,
    as_other: bool,
    max_suggestions: usize,
) -> Result<Vec<ShotUpdate>, ShotOpError> {
    if let Some(field) = ShotField::parse(name) {
        return resolve_field_value(field, raw, &options_for(field), as_other, max_suggestions);
    }
    if let Some(field) = TextField::parse(name) {
        return Ok(vec![resolve_text_value(field, raw)]);
    }
    match name {
        "done" | "completed" => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(vec![ShotUpdate::Completed(true)]),
            "false" | "no" | "0" => Ok(vec![ShotUpdate::Completed(false)]),
            _ => Err(ShotOpError::InvalidBool(raw.to_string())),
        },
        _ => Err(ShotOpError::UnknownField(name.to_string())),
    }
}
