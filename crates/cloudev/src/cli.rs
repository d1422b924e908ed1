//! Clap derive structures for the `cloudev` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use cloudev_core::ResourceKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cloudev -- manage cloud development environments from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "cloudev",
    version,
    about = "Manage cloud dev environments from the command line",
    long_about = "Browse organizations, projects, repositories and branches, and\n\
        drive dev environments through their lifecycle.",
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
    /// Config profile to use
    #[arg(long, short = 'p', env = "CLOUDEV_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service endpoint URL (overrides profile)
    #[arg(long, short = 'e', env = "CLOUDEV_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Service region (overrides profile)
    #[arg(long, short = 'r', env = "CLOUDEV_REGION", global = true)]
    pub region: Option<String>,

    /// Bearer token
    #[arg(long, env = "CLOUDEV_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CLOUDEV_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CLOUDEV_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify the token and show who it belongs to
    Whoami,

    /// List every resource of one kind the caller can see
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single organization, project or repository clone URL
    Show(ShowArgs),

    /// List or create source repository branches
    #[command(alias = "br")]
    Branches(BranchesArgs),

    /// Manage dev environments
    #[command(alias = "envs")]
    Env(EnvArgs),

    /// Manage personal access tokens
    Token(TokenArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── List ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Resource kind to list
    pub kind: KindArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    #[value(alias = "orgs")]
    Org,
    #[value(alias = "projects")]
    Project,
    #[value(alias = "repos")]
    Repo,
    #[value(alias = "envs")]
    Env,
    #[value(alias = "branches")]
    Branch,
}

impl From<KindArg> for ResourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Org => Self::Org,
            KindArg::Project => Self::Project,
            KindArg::Repo => Self::Repo,
            KindArg::Env => Self::Env,
            KindArg::Branch => Self::Branch,
        }
    }
}

// ── Show ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(subcommand)]
    pub command: ShowCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShowCommand {
    /// Show an organization
    Org { name: String },

    /// Show a project
    Project { org: String, project: String },

    /// Print a repository's HTTPS clone URL
    CloneUrl(RepoTarget),
}

/// Positional `<org> <project> <repo>` triple.
#[derive(Debug, Args)]
pub struct RepoTarget {
    pub org: String,
    pub project: String,
    pub repo: String,
}

// ── Branches ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BranchesArgs {
    #[command(subcommand)]
    pub command: BranchesCommand,
}

#[derive(Debug, Subcommand)]
pub enum BranchesCommand {
    /// List branches of a repository
    #[command(alias = "ls")]
    List(RepoTarget),

    /// Create a branch
    Create {
        #[command(flatten)]
        repo: RepoTarget,

        /// Branch name
        name: String,

        /// Commit the branch points at (defaults to the service's choice)
        #[arg(long)]
        head: Option<String>,
    },
}

// ── Dev environments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EnvArgs {
    #[command(subcommand)]
    pub command: EnvCommand,
}

/// Positional `<org> <project> <id>` triple.
#[derive(Debug, Args)]
pub struct EnvTarget {
    pub org: String,
    pub project: String,
    /// Dev environment id
    pub id: String,
}

#[derive(Debug, Subcommand)]
pub enum EnvCommand {
    /// List dev environments in a project
    #[command(alias = "ls")]
    List { org: String, project: String },

    /// Show a dev environment
    Get(EnvTarget),

    /// Start a dev environment and wait until it is running
    Start {
        #[command(flatten)]
        target: EnvTarget,

        /// Send the start command and return without waiting
        #[arg(long)]
        no_wait: bool,
    },

    /// Stop a dev environment
    Stop(EnvTarget),

    /// Delete a dev environment
    #[command(alias = "rm")]
    Delete(EnvTarget),

    /// Create a dev environment
    Create {
        org: String,
        project: String,

        /// IDE to install (repeatable)
        #[arg(long = "ide", default_value = "VSCode")]
        ides: Vec<String>,

        /// Instance type
        #[arg(long)]
        instance_type: Option<String>,

        /// Persistent storage size in GiB
        #[arg(long)]
        storage: Option<i32>,

        /// Repository to clone, as NAME or NAME@BRANCH (repeatable)
        #[arg(long = "repo")]
        repos: Vec<String>,

        /// Human-friendly alias
        #[arg(long)]
        alias: Option<String>,

        /// Minutes of inactivity before the environment stops
        #[arg(long)]
        inactivity_timeout: Option<i32>,
    },

    /// Change a dev environment's settings
    Update {
        #[command(flatten)]
        target: EnvTarget,

        #[arg(long)]
        alias: Option<String>,

        /// Replace the IDE list (repeatable)
        #[arg(long = "ide")]
        ides: Vec<String>,

        #[arg(long)]
        instance_type: Option<String>,

        #[arg(long)]
        inactivity_timeout: Option<i32>,
    },
}

// ── Access tokens ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Create a personal access token and print its secret once
    Create {
        /// Token name
        #[arg(long)]
        name: String,

        /// Expiry time (RFC 3339)
        #[arg(long)]
        expires: Option<DateTime<Utc>>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the current configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use { name: String },

    /// Set a field on the active profile
    Set { key: String, value: String },

    /// Store the active profile's token in the system keyring
    SetToken {
        /// Profile to store the token for (defaults to the active one)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
