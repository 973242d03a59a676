use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scenes", about = concat!("scenes v", env!("CARGO_PKG_VERSION"), " - plan the shots for every script component"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create scenes.toml and a sample scenes.json in the current directory
    Init(InitArgs),
    /// Show the project / video / script / component tree
    Tree,
    /// List dropdown options
    Options(OptionsArgs),
    /// List the shots of a script component
    Shots(ShotsArgs),
    /// Append a shot to a script component
    Add(AddArgs),
    /// Set one column of a shot
    Set(SetArgs),
    /// Delete a shot
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite existing scenes.toml and scenes.json
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct OptionsArgs {
    /// Only this field (shot_type, location, movement, subject)
    #[arg(long)]
    pub field: Option<String>,
}

#[derive(Args)]
pub struct ShotsArgs {
    /// Script component ID
    pub component: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Script component ID
    pub component: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// Shot ID
    pub shot: String,
    /// Column: shot_type, location, movement, subject, variant, action, done
    pub field: String,
    /// New value (empty clears)
    pub value: String,
    /// Store a value that is not in the option list as a custom "Other" value
    #[arg(long)]
    pub other: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Shot ID
    pub shot: String,
}
