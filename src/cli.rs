//! Command-line interface of the `sportrent` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser.
#[derive(Debug, Parser)]
#[command(
    name = "sportrent",
    version,
    about = "Operator tooling for the SportRent ASGI project"
)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Project root (defaults to SPORTRENT_PROJECT_DIR, then the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Operator commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run daphne on 127.0.0.1:8000 serving HTTP and WebSocket
    Serve,
    /// Create the virtual environment, install dependencies, migrate
    Bootstrap,
    /// Migrate, then populate demonstration data
    Seed(SeedArgs),
    /// Back up, list or prune SQLite database backups
    Backup(BackupArgs),
    /// Report the state of the project without changing it
    Status(StatusArgs),
    /// Check that a running server answers HTTP and WebSocket handshakes
    Probe(ProbeArgs),
}

/// Arguments of `seed`.
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Back up the database before seeding
    #[arg(long)]
    pub backup: bool,
}

/// Arguments of `backup`; without a subcommand a backup is created.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct BackupArgs {
    /// Backup action.
    #[command(subcommand)]
    pub action: Option<BackupAction>,

    /// Options for the implicit `create`.
    #[command(flatten)]
    pub create: CreateArgs,
}

/// Backup actions.
#[derive(Debug, Subcommand)]
pub enum BackupAction {
    /// Copy the database to backups/db-<YYYYMMDD-HHMMSS>.sqlite3
    Create(CreateArgs),
    /// List backups, newest first
    List(ListArgs),
    /// Delete all but the newest backups
    Prune(PruneArgs),
}

/// Arguments of `backup create`.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct CreateArgs {
    /// Snapshot through SQLite (safe while the server is writing)
    #[arg(long)]
    pub online: bool,
}

/// Arguments of `backup list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `backup prune`.
#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Number of newest backups to keep
    #[arg(long)]
    pub keep: usize,
}

/// Arguments of `status`.
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `probe`.
#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}
