use chrono::{DateTime, Utc};

use crate::io::store::SceneData;
use crate::model::{
    DropdownOption, Project, Script, ScriptComponent, ScriptStatus, Shot, ShotField, Video,
};

const SHOT_TYPES: &[&str] = &["WS", "MID", "CU", "ECU", "OTS", "POV"];
const LOCATIONS: &[&str] = &["Standard", "Stand-in", "Kitchen", "Office", "Exterior", "Other"];
const MOVEMENTS: &[&str] = &["Static", "Pan", "Tilt", "Tracking", "Handheld", "Dolly"];
const SUBJECTS: &[&str] = &["Presenter", "Product", "Hands", "Screen", "Other"];

/// Starter data written by `scenes init`: one project, two videos with a
/// script each, a few components, and the default option lists.
pub fn sample_data(now: DateTime<Utc>) -> SceneData {
    let projects = vec![Project {
        id: "proj-1".into(),
        title: "Northwind Kitchens".into(),
        eav_code: "EAV001".into(),
        created_at: now,
    }];

    let videos = vec![
        Video {
            id: "vid-1".into(),
            title: "Brand Film".into(),
            eav_code: "EAV001".into(),
            created_at: now,
        },
        Video {
            id: "vid-2".into(),
            title: "Installation Guide".into(),
            eav_code: "EAV001".into(),
            created_at: now,
        },
    ];

    let scripts = vec![
        Script {
            id: "script-1".into(),
            video_id: "vid-1".into(),
            status: ScriptStatus::Approved,
            plain_text: String::new(),
            component_count: 3,
            created_at: now,
        },
        Script {
            id: "script-2".into(),
            video_id: "vid-2".into(),
            status: ScriptStatus::Draft,
            plain_text: String::new(),
            component_count: 2,
            created_at: now,
        },
    ];

    let component = |id: &str, script: &str, n: u32, content: &str| ScriptComponent {
        id: id.into(),
        script_id: script.into(),
        component_number: n,
        content: content.into(),
        word_count: Some(content.split_whitespace().count() as u32),
        created_at: now,
    };
    let script_components = vec![
        component("comp-1", "script-1", 1, "Every great meal starts in a kitchen that works."),
        component("comp-2", "script-1", 2, "Our cabinets are built to last a lifetime."),
        component("comp-3", "script-1", 3, "Visit a showroom near you."),
        component("comp-4", "script-2", 1, "Unpack the hinge kit and lay out the parts."),
        component("comp-5", "script-2", 2, "Fix the mounting plate with the short screws."),
    ];

    let shot = |id: &str, component: &str, n: u32| Shot {
        id: id.into(),
        script_component_id: component.into(),
        shot_number: n,
        shot_type: None,
        location_start_point: None,
        location_other: None,
        movement_type: None,
        subject: None,
        subject_other: None,
        variant: None,
        action: None,
        completed: false,
        owner_user_id: None,
        created_at: now,
        updated_at: now,
    };
    let shots = vec![
        Shot {
            shot_type: Some("WS".into()),
            location_start_point: Some("Kitchen".into()),
            movement_type: Some("Dolly".into()),
            subject: Some("Presenter".into()),
            action: Some("Walks to the island".into()),
            ..shot("shot-1", "comp-1", 1)
        },
        Shot {
            shot_type: Some("CU".into()),
            location_start_point: Some("Other".into()),
            location_other: Some("Garden window".into()),
            subject: Some("Hands".into()),
            ..shot("shot-2", "comp-1", 2)
        },
        Shot {
            shot_type: Some("MID".into()),
            completed: true,
            ..shot("shot-3", "comp-2", 1)
        },
        shot("shot-4", "comp-4", 1),
    ];

    let mut dropdown_options = Vec::new();
    for (field, values) in [
        (ShotField::ShotType, SHOT_TYPES),
        (ShotField::Location, LOCATIONS),
        (ShotField::Movement, MOVEMENTS),
        (ShotField::Subject, SUBJECTS),
    ] {
        for (i, value) in values.iter().enumerate() {
            dropdown_options.push(DropdownOption {
                id: format!("{}-{}", field.column(), i + 1),
                field_name: field,
                option_value: value.to_string(),
                option_label: value.to_string(),
                sort_order: (i as i32 + 1) * 10,
                created_at: now,
            });
        }
    }

    SceneData {
        projects,
        videos,
        scripts,
        script_components,
        shots,
        dropdown_options,
    }
}
