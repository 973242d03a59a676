use std::fs;
use std::path::Path;

use chrono::Utc;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE, DATA_FILE, DEFAULT_CONFIG};
use crate::io::sample::sample_data;
use crate::io::store::JsonStore;

pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = dir.join(CONFIG_FILE);
    let data_path = dir.join(DATA_FILE);

    if !args.force && (config_path.exists() || data_path.exists()) {
        return Err(format!(
            "scenes data already exists in {} (use --force to overwrite)",
            dir.display()
        )
        .into());
    }

    // Note an enclosing data directory, since commands run here will now stop at this one
    if let Some(parent) = dir.parent()
        && let Ok(outer) = config_io::discover_data_dir(parent)
    {
        eprintln!("Note: scenes data also found in {}/", outer.display());
    }

    fs::create_dir_all(dir)?;
    fs::write(&config_path, DEFAULT_CONFIG)?;
    JsonStore::create(&data_path, sample_data(Utc::now()))?;

    println!("Initialized scenes in {}", dir.display());
    println!("  {CONFIG_FILE}  settings");
    println!("  {DATA_FILE}  sample project, scripts and option lists");
    Ok(())
}
