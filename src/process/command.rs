//! Description of a single child tool invocation.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// A child process to run: program, arguments, working directory and extra
/// environment. Stdio is always inherited so the operator sees the tool's
/// own output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    label: String,
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
}

impl ToolCommand {
    /// Creates a command; `label` names the tool in logs and errors.
    #[must_use]
    pub fn new(label: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            envs: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Adds an environment variable for the child.
    #[must_use]
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// Tool name used in logs and errors.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Program to execute.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments, in order.
    #[must_use]
    pub fn arg_list(&self) -> &[OsString] {
        &self.args
    }

    /// Working directory, if set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Extra environment variables, in insertion order.
    #[must_use]
    pub fn env_list(&self) -> &[(OsString, OsString)] {
        &self.envs
    }

    /// Looks up an extra environment variable by name.
    #[must_use]
    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_everything() {
        let cmd = ToolCommand::new("migrate", "/srv/venv/bin/python")
            .arg("manage.py")
            .args(["migrate", "--noinput"])
            .current_dir("/srv/sportrent")
            .env("DJANGO_SETTINGS_MODULE", "config.settings");

        assert_eq!(cmd.label(), "migrate");
        assert_eq!(cmd.arg_list().len(), 3);
        assert_eq!(cmd.working_dir(), Some(Path::new("/srv/sportrent")));
        assert_eq!(
            cmd.env_value("DJANGO_SETTINGS_MODULE"),
            Some(OsStr::new("config.settings"))
        );
        assert_eq!(
            cmd.to_string(),
            "/srv/venv/bin/python manage.py migrate --noinput"
        );
    }

    #[test]
    fn later_env_wins() {
        let cmd = ToolCommand::new("daphne", "daphne")
            .env("DJANGO_SETTINGS_MODULE", "a")
            .env("DJANGO_SETTINGS_MODULE", "b");
        assert_eq!(cmd.env_value("DJANGO_SETTINGS_MODULE"), Some(OsStr::new("b")));
        assert_eq!(cmd.env_value("PATH"), None);
    }
}
