use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use taskflow_core::Priority;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "Track your tasks from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Act as this user instead of the configured one
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<String>,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new task
    #[command(alias = "new")]
    Add {
        /// Task name
        title: Vec<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// List your tasks, newest first
    #[command(alias = "ls")]
    List {
        /// Only tasks that are not completed
        #[arg(long, conflicts_with = "done")]
        pending: bool,
        /// Only completed tasks
        #[arg(long)]
        done: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single task
    Show {
        /// Task ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change fields of an existing task
    Edit {
        /// Task ID or unique ID prefix
        id: String,
        /// New task name
        #[arg(short, long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Mark a task completed, or reopen it
    #[command(alias = "done")]
    Toggle {
        /// Task ID or unique ID prefix
        id: String,
    },
    /// Delete a task permanently
    #[command(alias = "rm")]
    Delete {
        /// Task ID or unique ID prefix
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Sync local replica with remote Turso database
    Sync,
    /// Inspect or change the CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Output file, or a directory to place the script in (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Optional task fields shared by `add` and `edit`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    /// Longer description (empty string clears it on edit)
    #[arg(short, long)]
    pub description: Option<String>,
    /// Due date, kept as entered (e.g. 2026-10-31)
    #[arg(long, value_name = "DATE")]
    pub due: Option<String>,
    /// Task priority
    #[arg(short, long, value_enum)]
    pub priority: Option<PriorityArg>,
    /// Category label (empty string clears it on edit)
    #[arg(short, long)]
    pub category: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Persist a single setting
    Set {
        #[arg(value_enum)]
        key: ConfigKey,
        value: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ConfigKey {
    User,
    DbPath,
    RemoteUrl,
    AuthToken,
    SyncInterval,
    SwipeThreshold,
}
