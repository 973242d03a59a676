use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::shot::ShotField;

/// One allowed value for a shot field, as stored in `dropdown_options`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub id: String,
    pub field_name: ShotField,
    pub option_value: String,
    pub option_label: String,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Dropdown options grouped by field, each group ordered by `sort_order`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionCatalog {
    groups: IndexMap<ShotField, Vec<DropdownOption>>,
}

impl OptionCatalog {
    pub fn from_options(options: impl IntoIterator<Item = DropdownOption>) -> Self {
        let mut groups: IndexMap<ShotField, Vec<DropdownOption>> = IndexMap::new();
        for option in options {
            groups.entry(option.field_name).or_default().push(option);
        }
        for group in groups.values_mut() {
            group.sort_by_key(|o| o.sort_order);
        }
        OptionCatalog { groups }
    }

    /// Canonical labels offered for `field`, in display order.
    pub fn labels(&self, field: ShotField) -> Vec<String> {
        self.groups
            .get(&field)
            .map(|group| group.iter().map(|o| o.option_label.clone()).collect())
            .unwrap_or_default()
    }

    pub fn options(&self, field: ShotField) -> &[DropdownOption] {
        self.groups.get(&field).map_or(&[], |g| g.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = ShotField> + '_ {
        self.groups.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
