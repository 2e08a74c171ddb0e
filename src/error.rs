//! Operator error types with process exit code mapping.
//!
//! [`OpsError`] is the central error type for every subcommand. Each variant
//! maps to a process exit code, the way an HTTP service maps its errors to
//! status codes.

use std::path::PathBuf;

/// Operator-facing error enum with exit code mapping.
///
/// # Exit codes
///
/// | Category                        | Exit code                  |
/// |---------------------------------|----------------------------|
/// | Precondition (missing path/bin) | 1                          |
/// | Child tool failure              | the child's own exit code  |
/// | I/O, database, probe, config    | 1                          |
#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    /// The project entry-point file (`manage.py`) is missing.
    #[error("entry-point file not found: {0} (run from the project root or pass --project)")]
    EntryPointMissing(PathBuf),

    /// No virtual environment exists under the project root.
    #[error("virtual environment not found under {0} (run `sportrent bootstrap` first)")]
    VirtualEnvMissing(PathBuf),

    /// The virtual environment exists but has no interpreter.
    #[error("python interpreter not found at {0}")]
    InterpreterMissing(PathBuf),

    /// No system interpreter could be found to create the environment.
    #[error("no python interpreter found on PATH (tried: {0})")]
    InterpreterNotFound(String),

    /// A required executable is neither in the environment nor on `PATH`.
    #[error("executable not found: {0}")]
    ExecutableNotFound(String),

    /// The dependency manifest is missing.
    #[error("dependency manifest not found: {0}")]
    ManifestMissing(PathBuf),

    /// The SQLite database file is missing.
    #[error("database file not found: {0}")]
    DatabaseMissing(PathBuf),

    /// A backup with the same timestamp already exists.
    #[error("backup already exists: {0}")]
    BackupExists(PathBuf),

    /// A child tool exited unsuccessfully.
    #[error("{tool} failed with {}", describe_status(.code))]
    ToolFailed {
        /// Short name of the tool (e.g. `pip`, `migrate`).
        tool: String,
        /// Exit code, `None` when the child was killed by a signal.
        code: Option<i32>,
    },

    /// A child tool could not be started.
    #[error("failed to start {tool}: {source}")]
    Spawn {
        /// Short name of the tool.
        tool: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Filesystem failure.
    #[error("{context}: {source}")]
    Io {
        /// What was being done when the error occurred.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// SQLite access failure.
    #[error("database error: {0}")]
    Database(String),

    /// The running server could not be reached or did not answer as expected.
    #[error("probe failed: {0}")]
    Probe(String),

    /// Configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl OpsError {
    /// Returns a closure that wraps an [`std::io::Error`] with context.
    ///
    /// Intended for `map_err`:
    /// `fs::create_dir_all(dir).map_err(OpsError::io("creating backups dir"))`.
    pub fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| Self::Io { context, source }
    }

    /// Returns the process exit code for this variant.
    ///
    /// Child failures propagate the child's status unmodified when it fits
    /// in a process exit code; everything else exits with `1`.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ToolFailed {
                code: Some(code), ..
            } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preconditions_exit_with_one() {
        let err = OpsError::DatabaseMissing(PathBuf::from("sportrent/db.sqlite3"));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("db.sqlite3"));
    }

    #[test]
    fn tool_failure_propagates_child_code() {
        let err = OpsError::ToolFailed {
            tool: "migrate".to_string(),
            code: Some(3),
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "migrate failed with exit code 3");
    }

    #[test]
    fn tool_failure_without_representable_code_exits_with_one() {
        let signalled = OpsError::ToolFailed {
            tool: "daphne".to_string(),
            code: None,
        };
        assert_eq!(signalled.exit_code(), 1);
        assert_eq!(signalled.to_string(), "daphne failed with termination by signal");

        let negative = OpsError::ToolFailed {
            tool: "pip".to_string(),
            code: Some(-1),
        };
        assert_eq!(negative.exit_code(), 1);
    }

    #[test]
    fn io_helper_keeps_context() {
        let err = OpsError::io("creating logs dir")(std::io::Error::other("denied"));
        assert_eq!(err.to_string(), "creating logs dir: denied");
    }
}
