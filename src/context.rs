//! Shared operator context handed to every service.

use std::ffi::OsString;

use crate::config::OpsConfig;
use crate::domain::ProjectLayout;

/// Configuration plus everything derived from it once at startup.
#[derive(Debug, Clone)]
pub struct OpsContext {
    /// Loaded configuration.
    pub config: OpsConfig,
    /// Resolved project paths.
    pub layout: ProjectLayout,
    /// Search path for executables outside the virtual environment.
    /// Captured from `PATH` so lookups are deterministic under test.
    pub search_path: Option<OsString>,
}

impl OpsContext {
    /// Builds the context from `config` and the process `PATH`.
    #[must_use]
    pub fn new(config: OpsConfig) -> Self {
        let layout = ProjectLayout::new(&config);
        Self {
            config,
            layout,
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Replaces the executable search path.
    #[must_use]
    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }
}
