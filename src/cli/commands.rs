use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "te",
    about = concat!("taskease v", env!("CARGO_PKG_VERSION"), " - to do, in progress, done"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the stored tasks and theme
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the board: stats, progress, and the three columns (default)
    Board(FilterArgs),
    /// List tasks matching a search and priority filter
    List(ListArgs),
    /// Add a task to To Do
    Add(AddArgs),
    /// Move a task to another column
    Status(StatusArgs),
    /// Change a task's priority
    Priority(PriorityArgs),
    /// Star or unstar a task
    Star(IdArgs),
    /// Permanently delete a task
    Rm(IdArgs),
    /// Show task counts and progress
    Stats,
    /// Show the current theme, or switch to another one
    Theme(ThemeArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args, Default)]
pub struct FilterArgs {
    /// Only tasks whose text or category contains this (case-insensitive)
    #[arg(short = 's', long)]
    pub search: Option<String>,
    /// Only tasks with this priority (all, high, medium, low)
    #[arg(short = 'p', long)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only one column, sorted as on the board (todo, in-progress, done)
    #[arg(long)]
    pub status: Option<String>,
    #[command(flatten)]
    pub filter: FilterArgs,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// Priority: high, medium (default), or low
    #[arg(short = 'p', long)]
    pub priority: Option<String>,
    /// Optional category label
    #[arg(short = 'c', long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task ID
    pub id: u64,
    /// New status: todo, in-progress, or done
    pub status: String,
}

#[derive(Args)]
pub struct PriorityArgs {
    /// Task ID
    pub id: u64,
    /// New priority: high, medium, or low
    pub priority: String,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: u64,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// Theme to switch to: light, dark, ocean, or sunset
    pub name: Option<String>,
}
