use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use flow_core::VERSION;

/// Flow - tasks, money, and notes in one personal workspace
#[derive(Parser)]
#[command(name = "flow")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the document store file
    #[arg(short, long, global = true, env = "FLOW_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the config file and create the data directory
    Init(InitArgs),

    /// Create a local account and sign in
    Register(AccountArgs),

    /// Sign in to an existing account
    Login(AccountArgs),

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami(WhoamiArgs),

    /// Manage tasks
    Tasks(TasksArgs),

    /// Track income and expenses
    Finance(FinanceArgs),

    /// Write notes, optionally locked with a password
    Notes(NotesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Where documents are stored
    #[arg(long)]
    pub store_path: Option<String>,

    /// Where local accounts are stored
    #[arg(long)]
    pub auth_path: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `register` and `login`
#[derive(Args)]
pub struct AccountArgs {
    /// Account email
    #[arg(value_name = "EMAIL")]
    pub email: Option<String>,

    /// Disable interactive prompts (password from FLOW_PASSWORD)
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args)]
pub struct WhoamiArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksSubcommand,
}

#[derive(Subcommand)]
pub enum TasksSubcommand {
    /// List tasks, high priority first
    List(TaskListArgs),
    /// Add a task
    Add(TaskAddArgs),
    /// Edit a task
    Edit(TaskEditArgs),
    /// Toggle a task's completion
    Done(IdArgs),
    /// Delete a task
    Delete(DeleteArgs),
    /// Show list names
    Lists(JsonArgs),
}

#[derive(Args)]
pub struct TaskListArgs {
    /// Only show tasks in this list
    #[arg(long, value_name = "LIST")]
    pub list: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Task title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Priority (high, medium, low or 1-3)
    #[arg(short, long, default_value = "high")]
    pub priority: String,

    /// List name
    #[arg(short, long)]
    pub list: Option<String>,

    /// Deadline (ISO-8601 or YYYY-MM-DD)
    #[arg(long)]
    pub deadline: Option<String>,

    /// Longer description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct TaskEditArgs {
    /// Task ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    /// Priority (high, medium, low or 1-3)
    #[arg(short, long)]
    pub priority: Option<String>,

    #[arg(short, long)]
    pub list: Option<String>,

    /// Deadline (ISO-8601 or YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_deadline")]
    pub deadline: Option<String>,

    /// Remove the deadline
    #[arg(long)]
    pub clear_deadline: bool,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct FinanceArgs {
    #[command(subcommand)]
    pub command: FinanceSubcommand,
}

#[derive(Subcommand)]
pub enum FinanceSubcommand {
    /// List transactions, newest first
    List(JsonArgs),
    /// Record a transaction
    Add(TransactionAddArgs),
    /// Edit a transaction
    Edit(TransactionEditArgs),
    /// Delete a transaction
    Delete(DeleteArgs),
    /// Show income, expense, and balance
    Summary(JsonArgs),
}

#[derive(Args)]
pub struct TransactionAddArgs {
    /// What the money was for
    #[arg(value_name = "DESCRIPTION")]
    pub description: String,

    /// Amount (a positive number)
    #[arg(value_name = "AMOUNT")]
    pub amount: String,

    /// Record as income instead of expense
    #[arg(long)]
    pub income: bool,

    /// Date (ISO-8601 or YYYY-MM-DD, default now)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct TransactionEditArgs {
    /// Transaction ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub amount: Option<String>,

    /// Mark as income
    #[arg(long, conflicts_with = "expense")]
    pub income: bool,

    /// Mark as expense
    #[arg(long)]
    pub expense: bool,

    /// Date (ISO-8601 or YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct NotesArgs {
    #[command(subcommand)]
    pub command: NotesSubcommand,
}

#[derive(Subcommand)]
pub enum NotesSubcommand {
    /// List notes, most recently modified first
    List(JsonArgs),
    /// Write a note
    Add(NoteAddArgs),
    /// Show a note, unlocking it if needed
    Show(NoteShowArgs),
    /// Edit a note
    Edit(NoteEditArgs),
    /// Delete a note
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct NoteAddArgs {
    /// Note title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Note body (overrides stdin)
    #[arg(long)]
    pub body: Option<String>,

    /// Lock the note with a password
    #[arg(long)]
    pub lock: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args)]
pub struct NoteShowArgs {
    /// Note ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args)]
pub struct NoteEditArgs {
    /// Note ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    /// New body (overrides stdin)
    #[arg(long)]
    pub body: Option<String>,

    /// Lock the note (asks for a new password)
    #[arg(long, conflicts_with = "unlock")]
    pub lock: bool,

    /// Store the note as plain text
    #[arg(long)]
    pub unlock: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args)]
pub struct IdArgs {
    /// Record ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Record ID (or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}
