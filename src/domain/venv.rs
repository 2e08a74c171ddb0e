//! Python virtual environment located under the project root.

use std::path::{Path, PathBuf};

use super::ProjectLayout;
use crate::error::OpsError;

#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

#[cfg(windows)]
const EXE_SUFFIX: &str = ".exe";
#[cfg(not(windows))]
const EXE_SUFFIX: &str = "";

/// An isolated interpreter directory (`venv/` or `.venv/`).
///
/// Only describes where things live; creation is done by the bootstrap
/// service through `python -m venv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    root: PathBuf,
}

impl VirtualEnv {
    /// Wraps an environment directory, existing or not.
    #[must_use]
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the first candidate directory of `layout` that exists.
    #[must_use]
    pub fn locate(layout: &ProjectLayout) -> Option<Self> {
        layout
            .venv_candidates()
            .find(|dir| dir.is_dir())
            .map(Self::at)
    }

    /// Like [`VirtualEnv::locate`], but missing is an error.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::VirtualEnvMissing`] naming the project root.
    pub fn require(layout: &ProjectLayout) -> Result<Self, OpsError> {
        Self::locate(layout).ok_or_else(|| OpsError::VirtualEnvMissing(layout.root().to_path_buf()))
    }

    /// Environment directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables.
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// Path of an executable installed into the environment.
    #[must_use]
    pub fn executable(&self, name: &str) -> PathBuf {
        self.bin_dir().join(format!("{name}{EXE_SUFFIX}"))
    }

    /// The environment's Python interpreter.
    #[must_use]
    pub fn interpreter(&self) -> PathBuf {
        self.executable("python")
    }

    /// Returns the interpreter path, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InterpreterMissing`] with the expected path.
    pub fn require_interpreter(&self) -> Result<PathBuf, OpsError> {
        let python = self.interpreter();
        if python.is_file() {
            Ok(python)
        } else {
            Err(OpsError::InterpreterMissing(python))
        }
    }
}
