use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel value meaning "free text not in the predefined list".
/// The text itself lives in the field's paired `*_other` column.
pub const OTHER: &str = "Other";

/// A planned shot for one script component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: String,
    pub script_component_id: String,
    pub shot_number: u32,
    #[serde(default)]
    pub shot_type: Option<String>,
    #[serde(default)]
    pub location_start_point: Option<String>,
    #[serde(default)]
    pub location_other: Option<String>,
    #[serde(default)]
    pub movement_type: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub subject_other: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
    #[serde(default)]
    pub owner_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Shot columns edited through an autocomplete field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotField {
    ShotType,
    #[serde(rename = "location_start_point")]
    Location,
    #[serde(rename = "movement_type")]
    Movement,
    Subject,
}

impl ShotField {
    pub const ALL: [ShotField; 4] = [
        ShotField::ShotType,
        ShotField::Location,
        ShotField::Movement,
        ShotField::Subject,
    ];

    /// Column name in the store (also the dropdown `field_name`)
    pub fn column(self) -> &'static str {
        match self {
            ShotField::ShotType => "shot_type",
            ShotField::Location => "location_start_point",
            ShotField::Movement => "movement_type",
            ShotField::Subject => "subject",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShotField::ShotType => "Shot Type",
            ShotField::Location => "Location",
            ShotField::Movement => "Movement",
            ShotField::Subject => "Subject",
        }
    }

    /// Whether the field has a paired free-text column for `Other`.
    pub fn has_custom_slot(self) -> bool {
        matches!(self, ShotField::Location | ShotField::Subject)
    }

    pub fn parse(name: &str) -> Option<ShotField> {
        ShotField::ALL
            .into_iter()
            .find(|f| f.column() == name || f.label().eq_ignore_ascii_case(name))
            .or(match name {
                "location" => Some(ShotField::Location),
                "movement" | "tracking_type" => Some(ShotField::Movement),
                _ => None,
            })
    }
}

/// Shot columns edited as plain debounced text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Variant,
    Action,
}

impl TextField {
    pub const ALL: [TextField; 2] = [TextField::Variant, TextField::Action];

    pub fn column(self) -> &'static str {
        match self {
            TextField::Variant => "variant",
            TextField::Action => "action",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextField::Variant => "Variant",
            TextField::Action => "Action",
        }
    }

    pub fn parse(name: &str) -> Option<TextField> {
        TextField::ALL
            .into_iter()
            .find(|f| f.column() == name || f.label().eq_ignore_ascii_case(name))
    }
}

/// A single column change applied to a shot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShotUpdate {
    Field(ShotField, Option<String>),
    /// The free text paired with a field's `Other` value
    Other(ShotField, Option<String>),
    Text(TextField, Option<String>),
    Completed(bool),
}

impl Shot {
    pub fn field(&self, field: ShotField) -> Option<&str> {
        match field {
            ShotField::ShotType => self.shot_type.as_deref(),
            ShotField::Location => self.location_start_point.as_deref(),
            ShotField::Movement => self.movement_type.as_deref(),
            ShotField::Subject => self.subject.as_deref(),
        }
    }

    /// Paired custom text; None for fields without a custom slot.
    pub fn other(&self, field: ShotField) -> Option<&str> {
        match field {
            ShotField::Location => self.location_other.as_deref(),
            ShotField::Subject => self.subject_other.as_deref(),
            ShotField::ShotType | ShotField::Movement => None,
        }
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Variant => self.variant.as_deref(),
            TextField::Action => self.action.as_deref(),
        }
    }

    /// Apply an update and bump `updated_at`.
    pub fn apply(&mut self, update: &ShotUpdate, now: DateTime<Utc>) {
        match update {
            ShotUpdate::Field(field, value) => {
                let slot = match field {
                    ShotField::ShotType => &mut self.shot_type,
                    ShotField::Location => &mut self.location_start_point,
                    ShotField::Movement => &mut self.movement_type,
                    ShotField::Subject => &mut self.subject,
                };
                *slot = value.clone();
            }
            ShotUpdate::Other(field, value) => match field {
                ShotField::Location => self.location_other = value.clone(),
                ShotField::Subject => self.subject_other = value.clone(),
                // no custom slot to write
                ShotField::ShotType | ShotField::Movement => {}
            },
            ShotUpdate::Text(field, value) => match field {
                TextField::Variant => self.variant = value.clone(),
                TextField::Action => self.action = value.clone(),
            },
            ShotUpdate::Completed(done) => self.completed = *done,
        }
        self.updated_at = now;
    }
}

/// Fields accepted when inserting a shot
#[derive(Debug, Clone, Default)]
pub struct NewShot {
    pub script_component_id: String,
    pub shot_number: u32,
    pub shot_type: Option<String>,
    pub location_start_point: Option<String>,
    pub movement_type: Option<String>,
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_json() -> &'static str {
        r#"{
            "id": "shot-1",
            "script_component_id": "comp-1",
            "shot_number": 1,
            "shot_type": "WS",
            "location_start_point": "Other",
            "location_other": "Rooftop",
            "movement_type": null,
            "completed": null,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }"#
    }

    #[test]
    fn missing_and_null_columns_become_none() {
        let shot: Shot = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(shot.shot_type.as_deref(), Some("WS"));
        assert_eq!(shot.movement_type, None);
        assert_eq!(shot.subject, None);
        assert!(!shot.completed);
        assert_eq!(shot.other(ShotField::Location), Some("Rooftop"));
    }

    #[test]
    fn apply_updates_column_and_timestamp() {
        let mut shot: Shot = serde_json::from_str(sample_json()).unwrap();
        let now = "2025-02-01T10:00:00Z".parse().unwrap();
        shot.apply(&ShotUpdate::Field(ShotField::Subject, Some("Standard".into())), now);
        shot.apply(&ShotUpdate::Other(ShotField::Location, None), now);
        shot.apply(&ShotUpdate::Text(TextField::Action, Some("Demo".into())), now);
        shot.apply(&ShotUpdate::Completed(true), now);

        assert_eq!(shot.field(ShotField::Subject), Some("Standard"));
        assert_eq!(shot.other(ShotField::Location), None);
        assert_eq!(shot.text(TextField::Action), Some("Demo"));
        assert!(shot.completed);
        assert_eq!(shot.updated_at, now);
    }

    #[test]
    fn other_on_field_without_slot_is_ignored() {
        let mut shot: Shot = serde_json::from_str(sample_json()).unwrap();
        let now = "2025-02-01T10:00:00Z".parse().unwrap();
        shot.apply(&ShotUpdate::Other(ShotField::ShotType, Some("x".into())), now);
        assert_eq!(shot.other(ShotField::ShotType), None);
        assert_eq!(shot.field(ShotField::ShotType), Some("WS"));
    }

    #[test]
    fn parse_field_names() {
        assert_eq!(ShotField::parse("location_start_point"), Some(ShotField::Location));
        assert_eq!(ShotField::parse("location"), Some(ShotField::Location));
        assert_eq!(ShotField::parse("Shot Type"), Some(ShotField::ShotType));
        assert_eq!(ShotField::parse("tracking_type"), Some(ShotField::Movement));
        assert_eq!(ShotField::parse("variant"), None);
        assert_eq!(TextField::parse("variant"), Some(TextField::Variant));
    }
}
