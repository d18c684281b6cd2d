use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskboard", about = "Personal task dashboard", version)]
pub struct Cli {
    /// Path to the SQLite database [default: ~/.taskboard/tasks.db]
    #[arg(long, env = "TASKBOARD_DB", global = true)]
    pub db: Option<String>,

    /// Use the cloud database location (system temp dir)
    #[arg(
        long,
        env = "TASKBOARD_CLOUD",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub cloud: bool,

    /// Log debug output to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Task fields shared by `add` and `edit`. For `edit`, omitted fields keep
/// their current value.
#[derive(Args, Default)]
pub struct FieldArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: Option<String>,
    /// Owner
    #[arg(short, long)]
    pub people: Option<String>,
    /// Plan, "In Progress", Stuck, or Complete
    #[arg(long)]
    pub status: Option<String>,
    /// Eisenhower quadrant, e.g. "Urgent and Important"
    #[arg(short, long)]
    pub importance: Option<String>,
    /// daily, weekly, monthly, or yearly
    #[arg(short, long)]
    pub view: Option<String>,
    /// Free-text notes
    #[arg(short, long)]
    pub notes: Option<String>,
    /// Attachment reference (link or path)
    #[arg(short, long)]
    pub attachments: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a task
    Add {
        /// Task title
        title: String,
        #[command(flatten)]
        fields: FieldArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a task
    Edit {
        /// Task ID
        id: i64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Mark a task complete
    Done {
        /// Task ID
        id: i64,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: i64,
    },

    /// Show task details
    Show {
        /// Task ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tasks (all of them, newest first, unless a view is chosen)
    List {
        /// Open tasks in this time view (daily, weekly, monthly, yearly)
        #[arg(long, conflicts_with_all = ["importance", "completed"])]
        view: Option<String>,
        /// Open tasks in this importance quadrant
        #[arg(long, conflicts_with = "completed")]
        importance: Option<String>,
        /// Completed tasks
        #[arg(long)]
        completed: bool,
        /// Completed-view order: end-date or importance
        #[arg(long, requires = "completed")]
        sort: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export all tasks to tasks_<date>.csv
    Export {
        /// Target directory
        #[arg(long, default_value = ".")]
        dir: String,
    },

    /// Import tasks from a CSV file (spreadsheet column layout)
    Import {
        /// CSV file path
        file: String,
    },

    /// Launch the terminal dashboard
    Dashboard {
        /// Poll interval in milliseconds
        #[arg(long, default_value = "1000")]
        poll_interval: u64,
    },

    /// Serve the web dashboard
    Serve {
        /// Listen address [default: 127.0.0.1:8501]
        #[arg(long)]
        bind: Option<String>,
    },
}
