use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Created,
    Description,
    Id,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFieldArg {
    Description,
    Tags,
}

#[derive(Parser, Debug)]
#[command(name = "tasks5", version, about = "Task manager backed by a single JSON file")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the tasks JSON file (overrides config and TASKS5_DATA_FILE).
    #[arg(long, global = true)]
    pub data_file: Option<String>,

    /// Show debug logs and full error chains.
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AddArgs {
    pub description: String,

    /// Comma-separated tags.
    #[arg(long, short = 't')]
    pub tags: Option<String>,

    /// Explicit id instead of a generated one.
    #[arg(long)]
    pub id: Option<String>,

    /// Print the task that would be created without saving it.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, short = 't')]
    pub tag: Option<String>,

    #[arg(long, conflicts_with = "incomplete")]
    pub completed: bool,

    #[arg(long)]
    pub incomplete: bool,

    #[arg(long, value_enum)]
    pub sort: Option<SortField>,

    /// Show at most N tasks; zero or negative means no limit.
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SearchArgs {
    pub query: String,

    /// Field to search; repeat to search several. Defaults to all fields.
    #[arg(long, value_enum, action = clap::ArgAction::Append)]
    pub field: Vec<SearchFieldArg>,

    #[arg(long, short = 'i')]
    pub ignore_case: bool,

    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ShowArgs {
    /// Task id or a unique prefix of it.
    pub id: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct IdArgs {
    /// Task id or a unique prefix of it.
    pub id: String,
}

#[derive(ClapArgs, Debug, Clone)]
#[command(group(
    ArgGroup::new("changes")
        .required(true)
        .multiple(true)
        .args(["description", "tags"])
))]
pub struct EditArgs {
    /// Task id or a unique prefix of it.
    pub id: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Replace all tags (comma-separated; empty string clears them).
    #[arg(long, short = 't')]
    pub tags: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task.
    Add(AddArgs),
    /// List tasks.
    List(ListArgs),
    /// Search tasks by substring.
    Search(SearchArgs),
    /// Show one task.
    Show(ShowArgs),
    /// Mark a task as completed.
    Complete(IdArgs),
    /// Mark a task as not completed.
    Uncomplete(IdArgs),
    /// Change a task's description or tags.
    Edit(EditArgs),
    /// Delete a task.
    #[command(alias = "rm")]
    Delete(IdArgs),
}
