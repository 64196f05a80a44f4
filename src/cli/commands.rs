use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "crib", about = concat!("toolcrib v", env!("CARGO_PKG_VERSION"), " - tool checkout board for crews"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default config.toml to the data directory
    Init(InitArgs),
    /// List saved days, most recent first
    History,
    /// Show today's board or a saved day
    Show(DayArgs),
    /// Print the plain-text checkout report
    Report(ReportArgs),
    /// Add a tool to the inventory
    Add(AddArgs),
    /// Return every checked-out tool to the crib
    ReturnAll,
    /// Edit config.toml
    Config(ConfigCmd),
    /// View or prune the recovery log
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct DayArgs {
    /// Day to show (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Day to report (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
    /// Also write the report under <data-dir>/reports/
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Tool name
    pub name: String,
    /// Number of units
    pub quantity: String,
    /// Category (hammers, saws, drills, drivers, measuring, levels, ladders, safety)
    #[arg(long, short)]
    pub category: String,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set a value, keeping comments and layout
    Set(ConfigSetArgs),
    /// Print the path of config.toml
    Path,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key, e.g. crews.count
    pub key: String,
    pub value: String,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Remove entries older than 30 days
    #[arg(long)]
    pub prune: bool,
    /// Remove every entry
    #[arg(long, requires = "prune")]
    pub all: bool,
    /// Maximum number of entries to show
    #[arg(long, default_value = "10")]
    pub limit: usize,
}
