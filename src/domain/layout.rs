//! Resolved filesystem layout of a SportRent project.

use std::path::{Path, PathBuf};

use crate::config::OpsConfig;
use crate::error::OpsError;

/// Name of the Django entry-point file inside the application directory.
pub const ENTRY_POINT: &str = "manage.py";

/// Directory a new virtual environment is created in.
pub const DEFAULT_VENV: &str = "venv";

/// Directory names probed for an existing virtual environment, in order.
pub const VENV_CANDIDATES: [&str; 2] = [DEFAULT_VENV, ".venv"];

/// Absolute paths of everything the operator commands touch.
///
/// Built once from [`OpsConfig`]; relative config paths are joined onto the
/// project root, absolute ones are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    app_dir: PathBuf,
    requirements: PathBuf,
    database: PathBuf,
    backups_dir: PathBuf,
    logs_dir: PathBuf,
}

impl ProjectLayout {
    /// Resolves the layout for the given configuration.
    #[must_use]
    pub fn new(config: &OpsConfig) -> Self {
        let root = config.project_dir.clone();
        Self {
            app_dir: root.join(&config.app_dir),
            requirements: root.join(&config.requirements),
            database: root.join(&config.database),
            backups_dir: root.join(&config.backups_dir),
            logs_dir: root.join(&config.logs_dir),
            root,
        }
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Application directory; the working directory of every child tool.
    #[must_use]
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// `manage.py` inside the application directory.
    #[must_use]
    pub fn entry_point(&self) -> PathBuf {
        self.app_dir.join(ENTRY_POINT)
    }

    /// Dependency manifest.
    #[must_use]
    pub fn requirements(&self) -> &Path {
        &self.requirements
    }

    /// SQLite database file.
    #[must_use]
    pub fn database(&self) -> &Path {
        &self.database
    }

    /// Backup directory.
    #[must_use]
    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Application log directory.
    #[must_use]
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Candidate virtual environment directories, in lookup order.
    pub fn venv_candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        VENV_CANDIDATES.iter().map(|name| self.root.join(name))
    }

    /// Directory a new virtual environment is created in.
    #[must_use]
    pub fn default_venv_dir(&self) -> PathBuf {
        self.root.join(DEFAULT_VENV)
    }

    /// Fails unless the entry-point file exists.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::EntryPointMissing`] with the expected path.
    pub fn require_entry_point(&self) -> Result<PathBuf, OpsError> {
        let entry = self.entry_point();
        if entry.is_file() {
            Ok(entry)
        } else {
            Err(OpsError::EntryPointMissing(entry))
        }
    }

    /// Fails unless the dependency manifest exists.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::ManifestMissing`] with the expected path.
    pub fn require_requirements(&self) -> Result<&Path, OpsError> {
        if self.requirements.is_file() {
            Ok(&self.requirements)
        } else {
            Err(OpsError::ManifestMissing(self.requirements.clone()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn layout_for(root: &Path) -> ProjectLayout {
        let config = OpsConfig::from_lookup(root.to_path_buf(), |_| None).unwrap();
        ProjectLayout::new(&config)
    }

    #[test]
    fn paths_resolve_against_root() {
        let layout = layout_for(Path::new("/srv/sportrent"));
        assert_eq!(
            layout.entry_point(),
            PathBuf::from("/srv/sportrent/sportrent/manage.py")
        );
        assert_eq!(
            layout.database(),
            Path::new("/srv/sportrent/sportrent/db.sqlite3")
        );
        assert_eq!(layout.backups_dir(), Path::new("/srv/sportrent/backups"));
        assert_eq!(layout.default_venv_dir(), PathBuf::from("/srv/sportrent/venv"));
        let candidates: Vec<PathBuf> = layout.venv_candidates().collect();
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/srv/sportrent/venv"),
                PathBuf::from("/srv/sportrent/.venv")
            ]
        );
    }

    #[test]
    fn absolute_config_paths_are_kept() {
        let config = OpsConfig::from_lookup(PathBuf::from("/srv/sportrent"), |key| {
            (key == "SPORTRENT_BACKUPS_DIR").then(|| "/var/backups/sportrent".to_string())
        })
        .unwrap();
        let layout = ProjectLayout::new(&config);
        assert_eq!(layout.backups_dir(), Path::new("/var/backups/sportrent"));
    }

    #[test]
    fn entry_point_check() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = layout_for(tmp.path());

        let err = layout.require_entry_point().unwrap_err();
        assert!(matches!(err, OpsError::EntryPointMissing(ref p) if p == &layout.entry_point()));

        std::fs::create_dir_all(layout.app_dir()).unwrap();
        std::fs::write(layout.entry_point(), "").unwrap();
        assert_eq!(layout.require_entry_point().unwrap(), layout.entry_point());
    }

    #[test]
    fn manifest_check() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = layout_for(tmp.path());
        assert!(matches!(
            layout.require_requirements(),
            Err(OpsError::ManifestMissing(_))
        ));
        std::fs::write(layout.requirements(), "Django==5.0\n").unwrap();
        assert!(layout.require_requirements().is_ok());
    }
}
