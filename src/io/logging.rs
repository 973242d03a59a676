use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::model::config::LogConfig;

/// Build the filter: `RUST_LOG` when set, the configured level otherwise.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber, appending to the configured log file in `dir`.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
pub fn init(dir: &Path, config: &LogConfig) -> std::io::Result<()> {
    let path = dir.join(&config.file);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
    if installed.is_ok() {
        tracing::info!(path = %path.display(), "logging started");
    }
    Ok(())
}
