//! ASGI launcher: runs daphne against the project's application target.

use std::path::Path;

use super::tools::{activate, resolve_executable};
use crate::config::SETTINGS_ENV_VAR;
use crate::context::OpsContext;
use crate::domain::VirtualEnv;
use crate::error::OpsError;
use crate::process::{CommandRunner, ToolCommand};

/// Name of the ASGI server executable.
pub const SERVER_BINARY: &str = "daphne";

/// Builds `daphne -b <host> -p <port> <target>` for the project.
///
/// Runs from the application directory with the settings module always
/// exported, whatever the caller's environment holds.
#[must_use]
pub fn launch_command(ctx: &OpsContext, daphne: &Path, venv: Option<&VirtualEnv>) -> ToolCommand {
    let command = ToolCommand::new(SERVER_BINARY, daphne)
        .args(["-b", ctx.config.host.as_str()])
        .args(["-p".to_string(), ctx.config.port.to_string()])
        .arg(&ctx.config.asgi_target)
        .current_dir(ctx.layout.app_dir())
        .env(SETTINGS_ENV_VAR, &ctx.config.settings_module);

    match venv {
        Some(venv) => activate(command, venv, ctx),
        None => command,
    }
}

/// Starts the ASGI server and waits for it to exit.
///
/// No process is spawned unless the entry point and the server binary are
/// both present.
///
/// # Errors
///
/// Returns [`OpsError::EntryPointMissing`] or
/// [`OpsError::ExecutableNotFound`] before spawning, or the server's own
/// failure status.
pub async fn serve<R: CommandRunner>(ctx: &OpsContext, runner: &R) -> Result<(), OpsError> {
    ctx.layout.require_entry_point()?;

    let venv = VirtualEnv::locate(&ctx.layout);
    let daphne = resolve_executable(SERVER_BINARY, venv.as_ref(), ctx)?;
    let command = launch_command(ctx, &daphne, venv.as_ref());

    tracing::info!(
        addr = %ctx.config.bind_address(),
        target = %ctx.config.asgi_target,
        settings = %ctx.config.settings_module,
        "starting ASGI server"
    );
    runner.run(&command).await
}
