//! Project bootstrap: environment, dependencies, log directory, schema.

use std::path::PathBuf;

use serde::Serialize;

use super::tools::{activate, manage_command, resolve_system_python};
use crate::context::OpsContext;
use crate::domain::VirtualEnv;
use crate::error::OpsError;
use crate::process::{CommandRunner, ToolCommand};

/// What a bootstrap run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// Environment used for the remaining steps.
    pub venv: PathBuf,
    /// `true` if the environment was created by this run.
    pub venv_created: bool,
    /// `true` if the log directory was created by this run.
    pub logs_created: bool,
}

/// Brings the project to a runnable state. Safe to run repeatedly.
///
/// Steps, in order: require the entry point, locate or create the virtual
/// environment, install the pinned manifest, create the log directory,
/// apply migrations.
///
/// # Errors
///
/// Precondition failures ([`OpsError::EntryPointMissing`],
/// [`OpsError::InterpreterNotFound`], [`OpsError::InterpreterMissing`],
/// [`OpsError::ManifestMissing`]) stop the run before the affected step.
/// A failing child tool stops it with the tool's own status.
pub async fn bootstrap<R: CommandRunner>(
    ctx: &OpsContext,
    runner: &R,
) -> Result<BootstrapReport, OpsError> {
    ctx.layout.require_entry_point()?;

    let (venv, venv_created) = match VirtualEnv::locate(&ctx.layout) {
        Some(venv) => {
            tracing::info!(venv = %venv.root().display(), "using existing virtual environment");
            (venv, false)
        }
        None => {
            let venv = VirtualEnv::at(ctx.layout.default_venv_dir());
            let python = resolve_system_python(ctx)?;
            tracing::info!(venv = %venv.root().display(), python = %python.display(), "creating virtual environment");
            let create = ToolCommand::new("venv", python)
                .args(["-m", "venv"])
                .arg(venv.root())
                .current_dir(ctx.layout.root());
            runner.run(&create).await?;
            (venv, true)
        }
    };

    let python = venv.require_interpreter()?;
    let manifest = ctx.layout.require_requirements()?;

    let install = ToolCommand::new("pip", &python)
        .args(["-m", "pip", "install", "-r"])
        .arg(manifest)
        .current_dir(ctx.layout.root());
    runner.run(&activate(install, &venv, ctx)).await?;

    let logs_dir = ctx.layout.logs_dir();
    let logs_created = !logs_dir.is_dir();
    if logs_created {
        tokio::fs::create_dir_all(logs_dir)
            .await
            .map_err(OpsError::io(format!("creating {}", logs_dir.display())))?;
        tracing::info!(logs = %logs_dir.display(), "created log directory");
    }

    runner
        .run(&manage_command(ctx, &venv, &python, "migrate", ["migrate", "--noinput"]))
        .await?;

    tracing::info!("bootstrap complete");
    Ok(BootstrapReport {
        venv: venv.root().to_path_buf(),
        venv_created,
        logs_created,
    })
}
