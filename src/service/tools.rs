//! Executable resolution and the common shape of project commands.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::SETTINGS_ENV_VAR;
use crate::context::OpsContext;
use crate::domain::VirtualEnv;
use crate::error::OpsError;
use crate::process::ToolCommand;

/// Interpreters tried, in order, when none is configured.
pub const DEFAULT_PYTHONS: [&str; 2] = ["python3", "python"];

/// Finds `name` in the virtual environment first, then on the search path.
///
/// # Errors
///
/// Returns [`OpsError::ExecutableNotFound`] if neither location has it.
pub fn resolve_executable(
    name: &str,
    venv: Option<&VirtualEnv>,
    ctx: &OpsContext,
) -> Result<PathBuf, OpsError> {
    if let Some(venv) = venv {
        let candidate = venv.executable(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    which::which_in(name, ctx.search_path.as_ref(), ctx.layout.root())
        .map_err(|_| OpsError::ExecutableNotFound(name.to_string()))
}

/// Finds the system interpreter used to create a virtual environment.
///
/// Uses the configured interpreter when set, otherwise the first of
/// [`DEFAULT_PYTHONS`] found on the search path.
///
/// # Errors
///
/// Returns [`OpsError::InterpreterNotFound`] listing what was tried.
pub fn resolve_system_python(ctx: &OpsContext) -> Result<PathBuf, OpsError> {
    let candidates: Vec<&str> = match ctx.config.python.as_deref() {
        Some(python) => vec![python],
        None => DEFAULT_PYTHONS.to_vec(),
    };

    for candidate in &candidates {
        let path = Path::new(candidate);
        if path.components().count() > 1 {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            continue;
        }
        if let Ok(found) = which::which_in(candidate, ctx.search_path.as_ref(), ctx.layout.root())
        {
            return Ok(found);
        }
    }

    Err(OpsError::InterpreterNotFound(candidates.join(", ")))
}

/// Adds what activating the environment would: `VIRTUAL_ENV` and the
/// environment's bin directory at the front of `PATH`.
#[must_use]
pub fn activate(command: ToolCommand, venv: &VirtualEnv, ctx: &OpsContext) -> ToolCommand {
    let mut dirs = vec![venv.bin_dir()];
    if let Some(path) = &ctx.search_path {
        dirs.extend(std::env::split_paths(path));
    }

    let command = command.env("VIRTUAL_ENV", venv.root());
    match std::env::join_paths(dirs) {
        Ok(path) => command.env("PATH", path),
        Err(error) => {
            tracing::warn!(%error, "cannot prepend environment to PATH");
            command
        }
    }
}

/// `python manage.py <args>` run from the application directory with the
/// settings module exported.
#[must_use]
pub fn manage_command<I, S>(
    ctx: &OpsContext,
    venv: &VirtualEnv,
    python: &Path,
    label: &str,
    args: I,
) -> ToolCommand
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let command = ToolCommand::new(label, python)
        .arg(crate::domain::layout::ENTRY_POINT)
        .args(args)
        .current_dir(ctx.layout.app_dir())
        .env(SETTINGS_ENV_VAR, &ctx.config.settings_module);
    activate(command, venv, ctx)
}
