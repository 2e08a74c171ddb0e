//! Demo data seeder: migrate, then run the population command.

use serde::Serialize;

use super::backup::{BackupEntry, BackupMode, create_backup};
use super::tools::manage_command;
use crate::context::OpsContext;
use crate::domain::VirtualEnv;
use crate::error::OpsError;
use crate::process::CommandRunner;

/// Django management command that inserts the demonstration data.
pub const POPULATE_COMMAND: &str = "populate_db";

/// Seeder switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOptions {
    /// Back up the database before touching it, when it exists.
    pub backup_first: bool,
}

/// What a seeding run did.
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    /// Backup taken before seeding, if requested and a database existed.
    pub backup: Option<BackupEntry>,
}

/// Applies migrations and then populates demo data.
///
/// Migrations always run first, so a fresh checkout ends fully migrated
/// and seeded. Whether a second run duplicates records is up to the
/// population command itself.
///
/// # Errors
///
/// Returns [`OpsError::EntryPointMissing`], [`OpsError::VirtualEnvMissing`]
/// or [`OpsError::InterpreterMissing`] before running anything, backup
/// errors when `backup_first` is set, or the failing tool's status.
pub async fn seed<R: CommandRunner>(
    ctx: &OpsContext,
    runner: &R,
    options: SeedOptions,
) -> Result<SeedReport, OpsError> {
    ctx.layout.require_entry_point()?;
    let venv = VirtualEnv::require(&ctx.layout)?;
    let python = venv.require_interpreter()?;

    let backup = if options.backup_first && ctx.layout.database().is_file() {
        let taken_at = chrono::Local::now().naive_local();
        Some(
            create_backup(
                ctx.layout.database(),
                ctx.layout.backups_dir(),
                taken_at,
                BackupMode::Copy,
            )
            .await?,
        )
    } else {
        None
    };

    runner
        .run(&manage_command(ctx, &venv, &python, "migrate", ["migrate", "--noinput"]))
        .await?;
    runner
        .run(&manage_command(ctx, &venv, &python, POPULATE_COMMAND, [POPULATE_COMMAND]))
        .await?;

    tracing::info!("demo data populated");
    Ok(SeedReport { backup })
}
