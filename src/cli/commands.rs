use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tuck", about = concat!("tuck v", env!("CARGO_PKG_VERSION"), " - a small task list with an archive"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read and write tasks in this directory
    #[arg(short = 'D', long = "data-dir", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the top of the list
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Complete a task and move it to the archive
    Done(TaskRefArg),
    /// Move an archived task back to the top of the list
    Restore(TaskRefArg),
    /// Change an active task's title
    Edit(EditArgs),
    /// Delete a task
    Rm(RmArgs),
    /// Show or change the color theme
    Theme(ThemeCmd),
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// List the archive instead of active tasks
    #[arg(long, conflicts_with = "all")]
    pub archived: bool,
    /// List both active and archived tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct TaskRefArg {
    /// Task id, unique id prefix, or 1-based position in the list
    pub task: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id, unique id prefix, or 1-based position in the active list
    pub task: String,
    /// New title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task id, unique id prefix, or 1-based position in the list
    pub task: String,
    /// Delete from the archive instead of the active list
    #[arg(long)]
    pub archived: bool,
}

// ---------------------------------------------------------------------------
// Theme args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ThemeCmd {
    #[command(subcommand)]
    pub action: Option<ThemeAction>,
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Show the current theme (default)
    Show,
    /// Switch to a preset: moss, midnight, stone
    Set(ThemeSetArgs),
    /// Use custom colors (#rrggbb)
    Custom(ThemeCustomArgs),
}

#[derive(Args)]
pub struct ThemeSetArgs {
    /// Preset name
    pub preset: String,
}

#[derive(Args)]
pub struct ThemeCustomArgs {
    /// Background color
    #[arg(long)]
    pub bg: String,
    /// Panel color
    #[arg(long)]
    pub panel: String,
    /// Accent color
    #[arg(long)]
    pub accent: String,
    /// Text color
    #[arg(long)]
    pub text: String,
}
