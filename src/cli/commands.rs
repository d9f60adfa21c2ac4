use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - one plain-text task list per category"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the category files (default: $TASKBOARD_DIR or cwd)
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured categories
    Categories,
    /// List the tasks of a category
    List(CategoryArgs),
    /// Show every field of one task
    Show(TaskRef),
    /// Add a task to the end of a category
    Add(AddArgs),
    /// Change a task's description (prompts if none is given)
    Edit(EditArgs),
    /// Edit progress, date, notes, subtasks and attachments
    Details(DetailsArgs),
    /// Mark a task completed
    Done(TaskRef),
    /// Delete a task
    Delete(TaskRef),
    /// Move a task one place up
    Up(TaskRef),
    /// Move a task one place down
    Down(TaskRef),
    /// Search descriptions, notes and subtasks by regex
    Search(SearchArgs),
}

#[derive(Args)]
pub struct CategoryArgs {
    /// Category name (case-insensitive)
    pub category: String,
}

/// A task addressed by category and 1-based position
#[derive(Args)]
pub struct TaskRef {
    /// Category name (case-insensitive)
    pub category: String,
    /// Position in the list, starting at 1
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub position: u64,
}

impl TaskRef {
    /// Zero-based index into the store
    pub fn index(&self) -> usize {
        (self.position - 1) as usize
    }
}

#[derive(Args)]
pub struct AddArgs {
    /// Category name (case-insensitive)
    pub category: String,
    /// Task description
    pub description: String,
    /// Due date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// low, medium or high
    #[arg(long, default_value = "low")]
    pub priority: String,
}

#[derive(Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub task: TaskRef,
    /// New description; asked for interactively when omitted
    pub description: Option<String>,
}

#[derive(Args)]
pub struct DetailsArgs {
    #[command(flatten)]
    pub task: TaskRef,
    /// Progress in percent (0-100)
    #[arg(long, allow_negative_numbers = true)]
    pub progress: Option<i32>,
    /// Due date, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
    /// Replace the notes
    #[arg(long, conflicts_with = "clear_notes")]
    pub notes: Option<String>,
    /// Remove the notes
    #[arg(long)]
    pub clear_notes: bool,
    /// Append a subtask (repeatable)
    #[arg(long = "subtask")]
    pub subtasks: Vec<String>,
    /// Remove the subtask at this 1-based position (repeatable)
    #[arg(long = "remove-subtask", value_parser = clap::value_parser!(u64).range(1..))]
    pub remove_subtasks: Vec<u64>,
    /// Attach a file path (repeatable)
    #[arg(long = "attach")]
    pub attachments: Vec<String>,
    /// Remove the attachment at this 1-based position (repeatable)
    #[arg(long = "detach", value_parser = clap::value_parser!(u64).range(1..))]
    pub detach: Vec<u64>,
    /// Ask for a subtask interactively
    #[arg(long)]
    pub prompt_subtask: bool,
    /// Ask for a file to attach interactively
    #[arg(long)]
    pub pick_attachment: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regular expression
    pub pattern: String,
    /// Only search this category
    #[arg(long)]
    pub category: Option<String>,
}
