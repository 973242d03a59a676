use serde::Serialize;

use crate::model::{
    DropdownOption, OTHER, Project, Script, ScriptComponent, Shot, ShotField, TextField, Video,
};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProjectJson {
    pub id: String,
    pub title: String,
    pub eav_code: String,
    pub videos: Vec<VideoJson>,
}

#[derive(Serialize)]
pub struct VideoJson {
    pub id: String,
    pub title: String,
    pub scripts: Vec<ScriptJson>,
}

#[derive(Serialize)]
pub struct ScriptJson {
    pub id: String,
    pub status: String,
    pub components: Vec<ComponentJson>,
}

#[derive(Serialize)]
pub struct ComponentJson {
    pub id: String,
    pub number: u32,
    pub content: String,
}

#[derive(Serialize)]
pub struct OptionJson {
    pub field: &'static str,
    pub value: String,
    pub label: String,
}

#[derive(Serialize)]
pub struct ShotJson {
    pub id: String,
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shot_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_other: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_other: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub done: bool,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn project_to_json(project: &Project, videos: Vec<VideoJson>) -> ProjectJson {
    ProjectJson {
        id: project.id.clone(),
        title: project.title.clone(),
        eav_code: project.eav_code.clone(),
        videos,
    }
}

pub fn video_to_json(video: &Video, scripts: Vec<ScriptJson>) -> VideoJson {
    VideoJson {
        id: video.id.clone(),
        title: video.title.clone(),
        scripts,
    }
}

pub fn script_to_json(script: &Script, components: &[ScriptComponent]) -> ScriptJson {
    ScriptJson {
        id: script.id.clone(),
        status: script.status.label().to_string(),
        components: components
            .iter()
            .map(|c| ComponentJson {
                id: c.id.clone(),
                number: c.component_number,
                content: c.content.clone(),
            })
            .collect(),
    }
}

pub fn option_to_json(option: &DropdownOption) -> OptionJson {
    OptionJson {
        field: option.field_name.column(),
        value: option.option_value.clone(),
        label: option.option_label.clone(),
    }
}

pub fn shot_to_json(shot: &Shot) -> ShotJson {
    let own = |s: Option<&str>| s.map(str::to_string);
    ShotJson {
        id: shot.id.clone(),
        number: shot.shot_number,
        shot_type: own(shot.field(ShotField::ShotType)),
        location: own(shot.field(ShotField::Location)),
        location_other: own(shot.other(ShotField::Location)),
        movement: own(shot.field(ShotField::Movement)),
        subject: own(shot.field(ShotField::Subject)),
        subject_other: own(shot.other(ShotField::Subject)),
        variant: own(shot.text(TextField::Variant)),
        action: own(shot.text(TextField::Action)),
        done: shot.completed,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Display value of a combobox column: the custom text stands in for `Other`.
fn field_display(shot: &Shot, field: ShotField) -> String {
    match (shot.field(field), shot.other(field)) {
        (Some(OTHER), Some(text)) if !text.is_empty() => format!("{OTHER}: {text}"),
        (Some(value), _) => value.to_string(),
        (None, _) => "-".to_string(),
    }
}

/// Format a shot as a single line: `[ ] 1. shot-1  WS / Kitchen / Dolly / Presenter`
pub fn format_shot_line(shot: &Shot) -> String {
    let check = if shot.completed { 'x' } else { ' ' };
    let fields: Vec<String> = ShotField::ALL
        .into_iter()
        .map(|f| field_display(shot, f))
        .collect();
    let mut line = format!(
        "[{}] {}. {}  {}",
        check,
        shot.shot_number,
        shot.id,
        fields.join(" / ")
    );
    for field in TextField::ALL {
        if let Some(text) = shot.text(field).filter(|t| !t.is_empty()) {
            line.push_str(&format!("  {}: {}", field.column(), text));
        }
    }
    line
}

pub fn format_project_line(project: &Project) -> String {
    format!("{} ({}) {}", project.title, project.eav_code, project.id)
}

pub fn format_video_line(video: &Video) -> String {
    format!("  {} {}", video.title, video.id)
}

pub fn format_script_line(script: &Script) -> String {
    format!("    Script [{}] {}", script.status.label(), script.id)
}

pub fn format_component_line(component: &ScriptComponent) -> String {
    format!("      {} {}", component.label(), component.id)
}
