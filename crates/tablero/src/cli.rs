//! Clap derive structures for the `tablero` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use tablero_core::ActivityType;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tablero -- admin CLI for the tablero resource backend
#[derive(Debug, Parser)]
#[command(
    name = "tablero",
    version,
    about = "Manage tablero resources from the command line",
    long_about = "A CLI for administering the tablero backend.\n\n\
        Works against the same REST API as the admin panel: generic\n\
        CRUD over named resources, plus session management.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "TABLERO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "TABLERO_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Bearer token
    #[arg(long, env = "TABLERO_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TABLERO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "TABLERO_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage activities
    #[command(alias = "act", alias = "a")]
    Activities(ActivitiesArgs),

    /// Log in and store the session token
    Login(LoginArgs),

    /// Show the authenticated user
    Whoami,

    /// Log out and discard the stored token
    Logout,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACTIVITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ActivitiesArgs {
    #[command(subcommand)]
    pub command: ActivitiesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ActivitiesCommand {
    /// List all activities
    #[command(alias = "ls")]
    List {
        /// Case-insensitive substring filter on the title
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },

    /// Get activity details
    Get {
        /// Activity id
        id: i64,
    },

    /// Create an activity
    Create {
        /// Activity title
        #[arg(long, required = true)]
        title: String,

        /// Activity description
        #[arg(long, required = true)]
        description: String,

        /// Activity type
        #[arg(long, default_value = "digital", value_enum)]
        r#type: ActivityTypeArg,

        /// Image URL
        #[arg(long)]
        image_url: Option<String>,

        /// Resource URL (downloadable material)
        #[arg(long)]
        resource_url: Option<String>,
    },

    /// Update an activity
    Update {
        /// Activity id
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New type
        #[arg(long, value_enum)]
        r#type: Option<ActivityTypeArg>,

        /// New image URL
        #[arg(long)]
        image_url: Option<String>,

        /// New resource URL
        #[arg(long)]
        resource_url: Option<String>,
    },

    /// Delete an activity
    Delete {
        /// Activity id
        id: i64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActivityTypeArg {
    /// On-screen activity
    Digital,
    /// Physical-world activity
    NonDigital,
}

impl From<ActivityTypeArg> for ActivityType {
    fn from(arg: ActivityTypeArg) -> Self {
        match arg {
            ActivityTypeArg::Digital => Self::Digital,
            ActivityTypeArg::NonDigital => Self::NonDigital,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted interactively if omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
