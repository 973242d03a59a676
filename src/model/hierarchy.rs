use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client project. Videos are linked to it through `eav_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub eav_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub eav_code: String,
    pub created_at: DateTime<Utc>,
}

/// Workflow status of a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStatus {
    #[default]
    PendStart,
    Draft,
    InReview,
    Rework,
    Approved,
    Reuse,
}

impl ScriptStatus {
    pub fn label(self) -> &'static str {
        match self {
            ScriptStatus::PendStart => "pending",
            ScriptStatus::Draft => "draft",
            ScriptStatus::InReview => "in review",
            ScriptStatus::Rework => "rework",
            ScriptStatus::Approved => "approved",
            ScriptStatus::Reuse => "reuse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub video_id: String,
    #[serde(default)]
    pub status: ScriptStatus,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub component_count: u32,
    pub created_at: DateTime<Utc>,
}

/// A numbered paragraph of a script. Shots are planned per component.
/// Components are read-only here; they are edited by the scripting tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptComponent {
    pub id: String,
    pub script_id: String,
    pub component_number: u32,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub word_count: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl ScriptComponent {
    /// One-line label for lists: "C3 First words of the content"
    pub fn label(&self) -> String {
        let first_line = self.content.lines().next().unwrap_or("").trim();
        if first_line.is_empty() {
            format!("C{}", self.component_number)
        } else {
            format!("C{} {}", self.component_number, first_line)
        }
    }
}
