//! Command-line interface.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::logging;

/// weft - git-backed issue tracker.
#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(
    author,
    version,
    about = "Git-backed issue tracker (data lives on its own branch)",
    long_about = None,
    after_help = "Issue data is committed to the weft/data branch; the project's own history is never touched."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize issue tracking in the current repository
    Init(InitArgs),

    /// Create a new issue
    Create(CreateArgs),

    /// Show issue details
    Show(ShowArgs),

    /// Update an existing issue
    Update(UpdateArgs),

    /// Start work on an issue
    Start(StartArgs),

    /// Close one or more issues
    Close(CloseArgs),

    /// Reopen a closed issue
    Reopen(ReopenArgs),

    /// Defer an issue until a future date
    Defer(DeferArgs),

    /// Clear defer state
    Undefer(UndeferArgs),

    /// List issues
    List(ListArgs),

    /// List ready (unblocked) issues
    Ready,

    /// List blocked issues
    Blocked,

    /// Manage dependencies
    Dep(DepCommand),

    /// Manage labels
    Label(LabelCommand),

    /// Manage comments (alias: comment)
    #[command(alias = "comment")]
    Comments(CommentsCommand),

    /// Delete an issue (preview unless --force)
    Delete(DeleteArgs),

    /// Sync the data branch with the remote
    Sync,

    /// Read/write configuration
    Config(ConfigCommand),

    /// Migrate issue data to the latest schema
    Upgrade,

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// ID prefix for new issues
    #[arg(long, default_value = "wf")]
    pub prefix: String,

    /// Tear down and rebuild an existing data branch
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Issue title
    pub title: String,

    /// Description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Priority (0-4 or P0-P4)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Issue type (task, bug, feature, epic, chore)
    #[arg(short = 't', long = "type")]
    pub type_: Option<String>,

    /// Assignee
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Defer until date (YYYY-MM-DD); implies deferred status
    #[arg(long)]
    pub defer: Option<String>,

    /// Parent issue ID
    #[arg(long)]
    pub parent: Option<String>,

    /// Label(s) to attach
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Explicit issue ID (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Issue ID
    pub id: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Issue ID
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description (empty string clears)
    #[arg(short, long)]
    pub description: Option<String>,

    /// New status (open, in_progress, deferred, closed)
    #[arg(short, long)]
    pub status: Option<String>,

    /// New priority (0-4 or P0-P4)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// New issue type
    #[arg(short = 't', long = "type")]
    pub type_: Option<String>,

    /// New assignee (empty string clears)
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// New defer date (YYYY-MM-DD, empty string clears)
    #[arg(long)]
    pub defer: Option<String>,

    /// New parent issue ID (empty string clears)
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Issue ID
    pub id: String,

    /// Assignee to record (defaults to $USER)
    #[arg(short, long, env = "WEFT_ASSIGNEE")]
    pub assignee: Option<String>,
}

#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Issue ID(s)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Close reason
    #[arg(short, long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReopenArgs {
    /// Issue ID
    pub id: String,
}

#[derive(Args, Debug)]
pub struct DeferArgs {
    /// Issue ID
    pub id: String,

    /// Defer until date (YYYY-MM-DD)
    pub until: String,
}

#[derive(Args, Debug)]
pub struct UndeferArgs {
    /// Issue ID
    pub id: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status (repeatable)
    #[arg(short, long)]
    pub status: Vec<String>,

    /// Filter by type (repeatable)
    #[arg(short = 't', long = "type")]
    pub type_: Vec<String>,

    /// Filter by priority (repeatable)
    #[arg(short, long)]
    pub priority: Vec<String>,

    /// Filter by assignee
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Only unassigned issues
    #[arg(long, conflicts_with = "assignee")]
    pub unassigned: bool,

    /// Include closed issues
    #[arg(long)]
    pub closed: bool,

    /// Include deferred issues
    #[arg(long)]
    pub deferred: bool,

    /// Case-insensitive substring match on title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by label (repeatable, all must match)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Maximum number of issues to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DepCommand {
    /// Dependency subcommand
    #[command(subcommand)]
    pub command: DepSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DepSubcommand {
    /// Record that one issue blocks another
    Add {
        /// The blocking issue
        blocker: String,
        /// The issue being blocked
        blocked: String,
    },

    /// Remove a dependency
    Remove {
        /// The blocking issue
        blocker: String,
        /// The issue being blocked
        blocked: String,
    },

    /// Show the dependency tree rooted at an issue
    Tree {
        /// Root issue (all issues when omitted)
        root: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct LabelCommand {
    /// Label subcommand
    #[command(subcommand)]
    pub command: LabelSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum LabelSubcommand {
    /// Add label(s) to an issue
    Add {
        /// Issue ID
        id: String,
        /// Labels to add
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Remove label(s) from an issue
    Remove {
        /// Issue ID
        id: String,
        /// Labels to remove
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// List labels for an issue
    List {
        /// Issue ID
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct CommentsCommand {
    /// Comments subcommand
    #[command(subcommand)]
    pub command: CommentsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentsSubcommand {
    /// Add a comment
    Add {
        /// Issue ID
        id: String,
        /// Comment text
        text: String,
        /// Comment author (defaults to $USER)
        #[arg(long)]
        author: Option<String>,
    },

    /// List comments
    List {
        /// Issue ID
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Issue ID
    pub id: String,

    /// Actually delete (previews the blast radius otherwise)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },

    /// List config values
    List,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, None)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let json = cli.json;
    match cli.command {
        Some(Commands::Init(args)) => commands::init::execute(&args)?,
        Some(Commands::Create(args)) => commands::create::execute(args, json)?,
        Some(Commands::Show(args)) => commands::show::execute(&args, json)?,
        Some(Commands::Update(args)) => commands::update::execute(&args)?,
        Some(Commands::Start(args)) => commands::start::execute(&args)?,
        Some(Commands::Close(args)) => commands::close::execute(&args)?,
        Some(Commands::Reopen(args)) => commands::reopen::execute(&args)?,
        Some(Commands::Defer(args)) => commands::defer::execute(&args)?,
        Some(Commands::Undefer(args)) => commands::undefer::execute(&args)?,
        Some(Commands::List(args)) => commands::list::execute(&args, json)?,
        Some(Commands::Ready) => commands::ready::execute(json)?,
        Some(Commands::Blocked) => commands::blocked::execute(json)?,
        Some(Commands::Dep(dep)) => commands::dep::execute(dep.command, json)?,
        Some(Commands::Label(label)) => commands::label::execute(label.command, json)?,
        Some(Commands::Comments(comments)) => {
            commands::comment::execute(comments.command, json)?;
        }
        Some(Commands::Delete(args)) => commands::delete::execute(&args, json)?,
        Some(Commands::Sync) => commands::sync::execute(json)?,
        Some(Commands::Config(config)) => commands::config::execute(config.command)?,
        Some(Commands::Upgrade) => commands::upgrade::execute()?,
        Some(Commands::Version) => {
            println!("weft {}", env!("CARGO_PKG_VERSION"));
        }
        None => println!("weft - git-backed issue tracker. Use --help for usage."),
    }

    Ok(())
}
