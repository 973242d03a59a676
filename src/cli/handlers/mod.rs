mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::logging;
use crate::io::store::{JsonStore, SceneStore};
use crate::model::{AppConfig, EditingConfig, NewShot, OptionCatalog, ShotField};
use crate::ops::shot_ops;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    match cli.command {
        None => {
            let dir = resolve_data_dir(cli.data_dir.as_deref())?;
            let config = load_config(&dir)?;
            crate::tui::run(&dir, config)
        }
        Some(Commands::Init(args)) => {
            // Init creates the data directory markers, so there is nothing to discover
            let dir = match cli.data_dir {
                Some(dir) => PathBuf::from(dir),
                None => std::env::current_dir()?,
            };
            cmd_init(args, &dir)
        }
        Some(cmd) => {
            let dir = resolve_data_dir(cli.data_dir.as_deref())?;
            let config = load_config(&dir)?;
            let mut store = open_store(&dir, &config)?;
            match cmd {
                Commands::Init(_) => Ok(()),
                Commands::Tree => cmd_tree(&store, json),
                Commands::Options(args) => cmd_options(&store, args, json),
                Commands::Shots(args) => cmd_shots(&store, args, json),
                Commands::Add(args) => cmd_add(&mut store, args, json),
                Commands::Set(args) => cmd_set(&mut store, args, &config.editing, json),
                Commands::Delete(args) => cmd_delete(&mut store, args),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The `-C` directory when given, otherwise the nearest data directory above the cwd.
pub fn resolve_data_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => {
            let abs = std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
            Ok(config_io::discover_data_dir(&abs)?)
        }
        None => Ok(config_io::discover_data_dir(&std::env::current_dir()?)?),
    }
}

/// Read scenes.toml and start logging to the configured file.
fn load_config(dir: &Path) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = config_io::read_config(dir)?;
    if let Err(e) = logging::init(dir, &config.log) {
        eprintln!("warning: could not open log file: {}", e);
    }
    Ok(config)
}

fn open_store(dir: &Path, config: &AppConfig) -> Result<JsonStore, Box<dyn std::error::Error>> {
    Ok(JsonStore::open(&dir.join(&config.store.file))?)
}

fn parse_field(name: &str) -> Result<ShotField, String> {
    ShotField::parse(name).ok_or_else(|| {
        format!(
            "unknown field: {} (expected shot_type, location, movement or subject)",
            name
        )
    })
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_tree(store: &dyn SceneStore, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut projects = Vec::new();
    let mut lines = Vec::new();
    for project in store.projects()? {
        lines.push(format_project_line(&project));
        let mut videos = Vec::new();
        for video in store.videos(&project.eav_code)? {
            lines.push(format_video_line(&video));
            let mut scripts = Vec::new();
            for script in store.scripts(&video.id)? {
                lines.push(format_script_line(&script));
                let components = store.components(&script.id)?;
                lines.extend(components.iter().map(format_component_line));
                scripts.push(script_to_json(&script, &components));
            }
            videos.push(video_to_json(&video, scripts));
        }
        projects.push(project_to_json(&project, videos));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
    } else if lines.is_empty() {
        println!("no projects");
    } else {
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_options(
    store: &dyn SceneStore,
    args: OptionsArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let field = args.field.as_deref().map(parse_field).transpose()?;
    let options = store.dropdown_options(field)?;

    if json {
        let out: Vec<OptionJson> = options.iter().map(option_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    let catalog = OptionCatalog::from_options(options);
    for field in catalog.fields() {
        println!("{}: {}", field.column(), catalog.labels(field).join(", "));
    }
    Ok(())
}

fn cmd_shots(
    store: &dyn SceneStore,
    args: ShotsArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let shots = store.shots(&args.component)?;
    if json {
        let out: Vec<ShotJson> = shots.iter().map(shot_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if shots.is_empty() {
        println!("no shots for {}", args.component);
    } else {
        for shot in &shots {
            println!("{}", format_shot_line(shot));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(
    store: &mut dyn SceneStore,
    args: AddArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let existing = store.shots(&args.component)?;
    let shot = store.insert_shot(NewShot {
        script_component_id: args.component,
        shot_number: shot_ops::next_shot_number(&existing),
        ..NewShot::default()
    })?;
    if json {
        println!("{}", serde_json::to_string_pretty(&shot_to_json(&shot))?);
    } else {
        println!("{}", shot.id);
    }
    Ok(())
}

fn cmd_set(
    store: &mut dyn SceneStore,
    args: SetArgs,
    editing: &EditingConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // fail on a missing shot before looking at the value
    store.shot(&args.shot)?;
    let catalog = OptionCatalog::from_options(store.dropdown_options(None)?);
    let updates = shot_ops::resolve_named_value(
        &args.field,
        &args.value,
        |field| catalog.labels(field),
        args.other,
        editing.max_suggestions,
    )?;
    let shot = store.update_shot(&args.shot, &updates)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&shot_to_json(&shot))?);
    } else {
        println!("{}", format_shot_line(&shot));
    }
    Ok(())
}

fn cmd_delete(
    store: &mut dyn SceneStore,
    args: DeleteArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    store.delete_shot(&args.shot)?;
    println!("deleted {}", args.shot);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::sample::sample_data;
    use crate::model::OTHER;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn store() -> JsonStore {
        JsonStore::in_memory(sample_data(Utc::now()))
    }

    fn set(store: &mut JsonStore, shot: &str, field: &str, value: &str, other: bool) {
        cmd_set(
            store,
            SetArgs {
                shot: shot.into(),
                field: field.into(),
                value: value.into(),
                other,
            },
            &EditingConfig::default(),
            false,
        )
        .unwrap();
    }

    #[test]
    fn set_canonicalizes_case() {
        let mut store = store();
        set(&mut store, "shot-1", "shot_type", "ecu", false);
        assert_eq!(store.shot("shot-1").unwrap().shot_type.as_deref(), Some("ECU"));
    }

    #[test]
    fn set_custom_value_with_flag() {
        let mut store = store();
        set(&mut store, "shot-1", "subject", "Chef", true);
        let shot = store.shot("shot-1").unwrap();
        assert_eq!(shot.subject.as_deref(), Some(OTHER));
        assert_eq!(shot.subject_other.as_deref(), Some("Chef"));
    }

    #[test]
    fn set_rejects_unknown_value() {
        let mut store = store();
        let err = cmd_set(
            &mut store,
            SetArgs {
                shot: "shot-1".into(),
                field: "movement".into(),
                value: "Crane".into(),
                other: true,
            },
            &EditingConfig::default(),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("\"Crane\" is not an option"));
        assert_eq!(store.shot("shot-1").unwrap().movement_type.as_deref(), Some("Dolly"));
    }

    #[test]
    fn set_suggestions_follow_config() {
        let mut store = store();
        let editing = EditingConfig {
            max_suggestions: 1,
            ..EditingConfig::default()
        };
        let args = SetArgs {
            shot: "shot-1".into(),
            field: "location".into(),
            value: "stan".into(),
            other: false,
        };
        let err = cmd_set(&mut store, args, &editing, false).unwrap_err();
        assert!(err.to_string().ends_with("(did you mean: Standard?)"));
    }

    #[test]
    fn set_on_missing_shot() {
        let mut store = store();
        let err = cmd_set(
            &mut store,
            SetArgs {
                shot: "shot-99".into(),
                field: "action".into(),
                value: "x".into(),
                other: false,
            },
            &EditingConfig::default(),
            false,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "shot not found: shot-99");
    }

    #[test]
    fn add_numbers_after_last_shot() {
        let mut store = store();
        cmd_add(&mut store, AddArgs { component: "comp-1".into() }, false).unwrap();
        let numbers: Vec<u32> = store
            .shots("comp-1")
            .unwrap()
            .iter()
            .map(|s| s.shot_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn unknown_option_field() {
        assert!(parse_field("lens").is_err());
        assert_eq!(parse_field("location"), Ok(ShotField::Location));
    }
}
