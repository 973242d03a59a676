use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

pub const CONFIG_FILE: &str = "scenes.toml";
pub const DATA_FILE: &str = "scenes.json";

/// Error type for locating and reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("not a scenes directory: no scenes.toml or scenes.json found above {0}")]
    NotFound(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Template written by `scenes init`. Every key is optional.
pub const DEFAULT_CONFIG: &str = r##"[store]
file = "scenes.json"

[editing]
# quiet period before Variant/Action edits are saved
debounce_ms = 500
# near-matches offered when a typed value is not in the list
max_suggestions = 3
dropdown_rows = 8
placeholder = "Type to search..."

[ui.colors]
# highlight = "#FB4196"

[log]
file = ".scenes.log"
level = "info"
"##;

/// Walk up from `start` looking for a directory holding scenes.toml or scenes.json.
pub fn discover_data_dir(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() || current.join(DATA_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::NotFound(start.to_path_buf()));
        }
    }
}

/// Read scenes.toml from `dir`. A missing file yields the defaults.
pub fn read_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => return Err(ConfigError::ReadError { path, source }),
    };
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
}
