use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::{
    DropdownOption, NewShot, Project, Script, ScriptComponent, Shot, ShotField, ShotUpdate, Video,
};

/// Error type for the scene store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("shot not found: {0}")]
    ShotNotFound(String),
    #[error("script component not found: {0}")]
    ComponentNotFound(String),
}

/// Every table, as stored in scenes.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub scripts: Vec<Script>,
    #[serde(default)]
    pub script_components: Vec<ScriptComponent>,
    #[serde(default)]
    pub shots: Vec<Shot>,
    #[serde(default)]
    pub dropdown_options: Vec<DropdownOption>,
}

/// Reads the hierarchy and option lists, and persists shot edits.
pub trait SceneStore {
    fn projects(&self) -> Result<Vec<Project>, StoreError>;
    /// Videos belonging to the project with this EAV code
    fn videos(&self, eav_code: &str) -> Result<Vec<Video>, StoreError>;
    fn scripts(&self, video_id: &str) -> Result<Vec<Script>, StoreError>;
    /// Components of a script, by component number
    fn components(&self, script_id: &str) -> Result<Vec<ScriptComponent>, StoreError>;
    /// Shots of a component, by shot number
    fn shots(&self, component_id: &str) -> Result<Vec<Shot>, StoreError>;
    fn shot(&self, id: &str) -> Result<Shot, StoreError>;
    /// Options for one field, or all of them, by sort order
    fn dropdown_options(&self, field: Option<ShotField>)
    -> Result<Vec<DropdownOption>, StoreError>;
    fn insert_shot(&mut self, new: NewShot) -> Result<Shot, StoreError>;
    fn update_shot(&mut self, id: &str, updates: &[ShotUpdate]) -> Result<Shot, StoreError>;
    fn delete_shot(&mut self, id: &str) -> Result<(), StoreError>;
}

/// A [`SceneStore`] backed by one JSON document.
///
/// Mutations are applied to a copy, written out, and only then kept, so a
/// failed write leaves the store as it was.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: Option<PathBuf>,
    data: SceneData,
}

impl JsonStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path).map_err(|source| StoreError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let data = serde_json::from_str(&text).map_err(|source| StoreError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "store opened");
        Ok(JsonStore {
            path: Some(path.to_path_buf()),
            data,
        })
    }

    /// Write `data` to `path` and open it.
    pub fn create(path: &Path, data: SceneData) -> Result<Self, StoreError> {
        let store = JsonStore {
            path: Some(path.to_path_buf()),
            data,
        };
        store.persist(&store.data)?;
        Ok(store)
    }

    /// A store that never touches the disk.
    pub fn in_memory(data: SceneData) -> Self {
        JsonStore { path: None, data }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data(&self) -> &SceneData {
        &self.data
    }

    fn persist(&self, data: &SceneData) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write_err = |source: io::Error| StoreError::WriteError {
            path: path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(data).map_err(|e| write_err(e.into()))?;
        atomic_write(path, json.as_bytes()).map_err(write_err)
    }

    fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut SceneData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.data.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        self.data = next;
        Ok(out)
    }
}

impl SceneStore for JsonStore {
    fn projects(&self) -> Result<Vec<Project>, StoreError> {
        let mut projects = self.data.projects.clone();
        projects.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(projects)
    }

    fn videos(&self, eav_code: &str) -> Result<Vec<Video>, StoreError> {
        let mut videos: Vec<Video> = self
            .data
            .videos
            .iter()
            .filter(|v| v.eav_code == eav_code)
            .cloned()
            .collect();
        videos.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(videos)
    }

    fn scripts(&self, video_id: &str) -> Result<Vec<Script>, StoreError> {
        Ok(self
            .data
            .scripts
            .iter()
            .filter(|s| s.video_id == video_id)
            .cloned()
            .collect())
    }

    fn components(&self, script_id: &str) -> Result<Vec<ScriptComponent>, StoreError> {
        let mut components: Vec<ScriptComponent> = self
            .data
            .script_components
            .iter()
            .filter(|c| c.script_id == script_id)
            .cloned()
            .collect();
        components.sort_by_key(|c| c.component_number);
        Ok(components)
    }

    fn shots(&self, component_id: &str) -> Result<Vec<Shot>, StoreError> {
        let mut shots: Vec<Shot> = self
            .data
            .shots
            .iter()
            .filter(|s| s.script_component_id == component_id)
            .cloned()
            .collect();
        shots.sort_by_key(|s| s.shot_number);
        Ok(shots)
    }

    fn shot(&self, id: &str) -> Result<Shot, StoreError> {
        self.data
            .shots
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::ShotNotFound(id.to_string()))
    }

    fn dropdown_options(
        &self,
        field: Option<ShotField>,
    ) -> Result<Vec<DropdownOption>, StoreError> {
        let mut options: Vec<DropdownOption> = self
            .data
            .dropdown_options
            .iter()
            .filter(|o| field.is_none_or(|f| o.field_name == f))
            .cloned()
            .collect();
        options.sort_by_key(|o| o.sort_order);
        Ok(options)
    }

    fn insert_shot(&mut self, new: NewShot) -> Result<Shot, StoreError> {
        let shot = self.mutate(|data| {
            if !data
                .script_components
                .iter()
                .any(|c| c.id == new.script_component_id)
            {
                return Err(StoreError::ComponentNotFound(new.script_component_id));
            }
            let now = Utc::now();
            let shot = Shot {
                id: next_shot_id(&data.shots),
                script_component_id: new.script_component_id,
                shot_number: new.shot_number,
                shot_type: new.shot_type,
                location_start_point: new.location_start_point,
                location_other: None,
                movement_type: new.movement_type,
                subject: new.subject,
                subject_other: None,
                variant: None,
                action: None,
                completed: false,
                owner_user_id: None,
                created_at: now,
                updated_at: now,
            };
            data.shots.push(shot.clone());
            Ok(shot)
        })?;
        tracing::info!(id = %shot.id, component = %shot.script_component_id, "shot inserted");
        Ok(shot)
    }

    fn update_shot(&mut self, id: &str, updates: &[ShotUpdate]) -> Result<Shot, StoreError> {
        let shot = self.mutate(|data| {
            let shot = data
                .shots
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| StoreError::ShotNotFound(id.to_string()))?;
            let now = Utc::now();
            for update in updates {
                shot.apply(update, now);
            }
            Ok(shot.clone())
        })?;
        tracing::debug!(id, count = updates.len(), "shot updated");
        Ok(shot)
    }

    fn delete_shot(&mut self, id: &str) -> Result<(), StoreError> {
        self.mutate(|data| {
            let before = data.shots.len();
            data.shots.retain(|s| s.id != id);
            if data.shots.len() == before {
                return Err(StoreError::ShotNotFound(id.to_string()));
            }
            Ok(())
        })?;
        tracing::info!(id, "shot deleted");
        Ok(())
    }
}

/// `shot-<n>` with `n` one past the highest numeric suffix in use
fn next_shot_id(shots: &[Shot]) -> String {
    let max = shots
        .iter()
        .filter_map(|s| s.id.strip_prefix("shot-")?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("shot-{}", max + 1)
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
